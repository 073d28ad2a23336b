use thiserror::Error;

/// Reasons a graph dataset is rejected at load time.
#[derive(Debug, Error)]
pub enum GraphDataError {
	#[error("graph data does not match the expected schema: {0}")]
	Schema(#[from] serde_json::Error),

	#[error("node id `{0}` appears more than once")]
	DuplicateNode(String),
}
