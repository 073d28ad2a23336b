//! Input data contract for the planet graph.
//!
//! The dataset arrives as JSON with nullable numeric fields. Loading validates
//! the shape and applies defaults once, so everything downstream works with
//! plain values.

use std::collections::HashSet;

use log::info;
use serde::Deserialize;

use super::error::GraphDataError;

/// Community id given to nodes the dataset leaves unassigned.
pub const NO_COMMUNITY: i64 = -1;

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Unique within one snapshot; edges refer to nodes by this id.
	pub id: String,
	pub label: String,
	pub community: i64,
	pub level: i64,
	pub degree: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub weight: Option<f64>,
	pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

/// Headline counts shown above the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	pub nodes: usize,
	pub edges: usize,
	pub communities: usize,
}

#[derive(Deserialize)]
struct RawNode {
	id: String,
	label: String,
	#[serde(deserialize_with = "Option::deserialize")]
	community: Option<i64>,
	#[serde(deserialize_with = "Option::deserialize")]
	level: Option<i64>,
	#[serde(deserialize_with = "Option::deserialize")]
	degree: Option<i64>,
}

#[derive(Deserialize)]
struct RawEdge {
	id: String,
	source: String,
	target: String,
	/// Nullable but required, like the node counters.
	#[serde(deserialize_with = "Option::deserialize")]
	weight: Option<f64>,
	#[serde(default)]
	description: Option<String>,
}

#[derive(Deserialize)]
struct RawGraph {
	nodes: Vec<RawNode>,
	edges: Vec<RawEdge>,
}

impl From<RawNode> for GraphNode {
	fn from(raw: RawNode) -> Self {
		Self {
			id: raw.id,
			label: raw.label,
			community: raw.community.unwrap_or(NO_COMMUNITY),
			level: raw.level.unwrap_or(0),
			degree: raw.degree.unwrap_or(0),
		}
	}
}

impl From<RawEdge> for GraphEdge {
	fn from(raw: RawEdge) -> Self {
		Self {
			id: raw.id,
			source: raw.source,
			target: raw.target,
			weight: raw.weight,
			description: raw.description,
		}
	}
}

impl GraphData {
	/// Parses and validates a dataset. Dangling edges are kept here; the view
	/// model drops them.
	pub fn from_json(text: &str) -> Result<Self, GraphDataError> {
		let raw: RawGraph = serde_json::from_str(text)?;

		let mut seen = HashSet::with_capacity(raw.nodes.len());
		for node in &raw.nodes {
			if !seen.insert(node.id.as_str()) {
				return Err(GraphDataError::DuplicateNode(node.id.clone()));
			}
		}

		let data = Self {
			nodes: raw.nodes.into_iter().map(GraphNode::from).collect(),
			edges: raw.edges.into_iter().map(GraphEdge::from).collect(),
		};
		info!(
			"planet-graph: loaded {} nodes, {} edges",
			data.nodes.len(),
			data.edges.len()
		);
		Ok(data)
	}

	pub fn community_count(&self) -> usize {
		self.nodes
			.iter()
			.map(|node| node.community)
			.collect::<HashSet<_>>()
			.len()
	}

	pub fn stats(&self) -> GraphStats {
		GraphStats {
			nodes: self.nodes.len(),
			edges: self.edges.len(),
			communities: self.community_count(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"nodes": [
			{"id": "a", "label": "Alpha", "community": 3, "level": 1, "degree": 4, "extra": true},
			{"id": "b", "label": "Beta", "community": null, "level": null, "degree": null}
		],
		"edges": [
			{"id": "e1", "source": "a", "target": "b", "weight": 0.5, "description": "links"},
			{"id": "e2", "source": "b", "target": "zzz", "weight": null}
		]
	}"#;

	#[test]
	fn applies_null_defaults() {
		let data = GraphData::from_json(SAMPLE).unwrap();
		assert_eq!(data.nodes[0].community, 3);
		assert_eq!(data.nodes[0].degree, 4);
		assert_eq!(data.nodes[1].community, NO_COMMUNITY);
		assert_eq!(data.nodes[1].level, 0);
		assert_eq!(data.nodes[1].degree, 0);
		assert_eq!(data.edges[0].description.as_deref(), Some("links"));
		assert_eq!(data.edges[1].description, None);
		assert_eq!(data.edges[1].weight, None);
	}

	#[test]
	fn keeps_dangling_edges_for_the_view_model() {
		let data = GraphData::from_json(SAMPLE).unwrap();
		assert_eq!(data.edges.len(), 2);
	}

	#[test]
	fn rejects_schema_violations() {
		let wrong_type = r#"{"nodes": [{"id": 1, "label": "x", "community": null, "level": null, "degree": null}], "edges": []}"#;
		assert!(matches!(
			GraphData::from_json(wrong_type),
			Err(GraphDataError::Schema(_))
		));

		let missing_edges = r#"{"nodes": []}"#;
		assert!(matches!(
			GraphData::from_json(missing_edges),
			Err(GraphDataError::Schema(_))
		));
	}

	#[test]
	fn nullable_keys_must_be_present() {
		let no_community = r#"{"nodes": [{"id": "a", "label": "A", "level": 0, "degree": 0}], "edges": []}"#;
		assert!(matches!(
			GraphData::from_json(no_community),
			Err(GraphDataError::Schema(_))
		));

		let bare_node = r#"{"nodes": [{"id": "a", "label": "A"}], "edges": [{"id": "e", "source": "a", "target": "a"}]}"#;
		assert!(matches!(
			GraphData::from_json(bare_node),
			Err(GraphDataError::Schema(_))
		));

		let no_weight = r#"{"nodes": [{"id": "a", "label": "A", "community": null, "level": null, "degree": null}],
			"edges": [{"id": "e", "source": "a", "target": "a"}]}"#;
		assert!(matches!(
			GraphData::from_json(no_weight),
			Err(GraphDataError::Schema(_))
		));
	}

	#[test]
	fn rejects_duplicate_ids() {
		let duplicated = r#"{"nodes": [
			{"id": "a", "label": "x", "community": 1, "level": 0, "degree": 1},
			{"id": "a", "label": "y", "community": 1, "level": 0, "degree": 1}
		], "edges": []}"#;
		let err = GraphData::from_json(duplicated).unwrap_err();
		assert_eq!(err.to_string(), "node id `a` appears more than once");
	}

	#[test]
	fn stats_count_defaulted_communities() {
		let data = GraphData::from_json(SAMPLE).unwrap();
		assert_eq!(
			data.stats(),
			GraphStats {
				nodes: 2,
				edges: 2,
				communities: 2,
			}
		);
	}
}
