//! Render-ready view of a graph snapshot.
//!
//! [`ViewModel::build`] is a pure function of the graph and the current asset
//! registry. It is recomputed from scratch whenever either changes, never
//! patched.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use log::{debug, warn};

use super::assets::AssetRegistry;
use super::preset::PRESETS;
use super::types::{GraphData, GraphNode};

#[derive(Clone, Debug, PartialEq)]
pub struct VisualNode {
	pub id: String,
	pub name: String,
	/// Raw community id, `-1` when the dataset had none.
	pub group: i64,
	/// 1-based community number in order of first appearance.
	pub display_group: usize,
	pub level: i64,
	pub degree: i64,
	pub size_value: f64,
	pub asset_index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualEdge {
	pub id: String,
	pub source: Arc<VisualNode>,
	pub target: Arc<VisualNode>,
	pub weight: Option<f64>,
	pub description: Option<String>,
	pub visual_weight: f64,
}

impl VisualEdge {
	/// Weight with two decimals; unweighted edges read as `1.00`.
	pub fn weight_label(&self) -> String {
		format!("{:.2}", self.weight.unwrap_or(1.0))
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommunityInfo {
	pub asset_index: usize,
	pub member_count: usize,
	pub display_label: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
	pub community: i64,
	pub label: usize,
	pub planet_name: String,
	pub icon: &'static str,
	pub preview: Option<String>,
	pub accent: String,
	pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewModel {
	pub nodes: Vec<Arc<VisualNode>>,
	pub edges: Vec<Arc<VisualEdge>>,
	pub legend: Vec<LegendEntry>,
	/// Counts rebuilds; two builds never share an epoch once chained through
	/// [`ViewModel::rebuild`].
	pub epoch: u64,
}

/// Community buckets for one build, in first-seen order.
#[derive(Debug, Default)]
struct CommunityRegistry {
	order: Vec<(i64, CommunityInfo)>,
	index: HashMap<i64, usize>,
}

impl CommunityRegistry {
	fn admit(&mut self, community: i64, asset_count: usize) -> CommunityInfo {
		let seen = self.order.len();
		let slot = match self.index.entry(community) {
			Entry::Occupied(entry) => *entry.get(),
			Entry::Vacant(entry) => {
				// Once the pool is exhausted later communities share the last asset.
				let asset_index = seen.min(asset_count.saturating_sub(1));
				self.order.push((
					community,
					CommunityInfo {
						asset_index,
						member_count: 0,
						display_label: seen + 1,
					},
				));
				*entry.insert(seen)
			}
		};

		let info = &mut self.order[slot].1;
		info.member_count += 1;
		*info
	}
}

impl ViewModel {
	pub fn build(graph: &GraphData, assets: &AssetRegistry) -> Self {
		let mut communities = CommunityRegistry::default();
		let nodes: Vec<Arc<VisualNode>> = graph
			.nodes
			.iter()
			.map(|node| {
				let info = communities.admit(node.community, assets.len());
				Arc::new(visual_node(node, info))
			})
			.collect();

		let by_id: HashMap<&str, &Arc<VisualNode>> =
			nodes.iter().map(|node| (node.id.as_str(), node)).collect();

		let mut dropped = 0usize;
		let mut edges = Vec::with_capacity(graph.edges.len());
		for edge in &graph.edges {
			let (Some(source), Some(target)) = (
				by_id.get(edge.source.as_str()),
				by_id.get(edge.target.as_str()),
			) else {
				debug!(
					"dropping edge `{}`: endpoint `{}` or `{}` missing",
					edge.id, edge.source, edge.target
				);
				dropped += 1;
				continue;
			};

			edges.push(Arc::new(VisualEdge {
				id: edge.id.clone(),
				source: Arc::clone(source),
				target: Arc::clone(target),
				weight: edge.weight,
				description: edge.description.clone(),
				visual_weight: edge.weight.unwrap_or(1.0).max(1.0),
			}));
		}
		if dropped > 0 {
			warn!("planet-graph: dropped {dropped} edges with missing endpoints");
		}

		let legend = build_legend(communities.order, assets);
		Self {
			nodes,
			edges,
			legend,
			epoch: 0,
		}
	}

	/// Builds the successor of `previous`, one epoch later.
	pub fn rebuild(previous: Option<&ViewModel>, graph: &GraphData, assets: &AssetRegistry) -> Self {
		Self {
			epoch: previous.map_or(0, |view| view.epoch + 1),
			..Self::build(graph, assets)
		}
	}
}

fn visual_node(node: &GraphNode, info: CommunityInfo) -> VisualNode {
	VisualNode {
		id: node.id.clone(),
		name: node.label.clone(),
		group: node.community,
		display_group: info.display_label,
		level: node.level,
		degree: node.degree,
		size_value: (node.degree as f64).max(1.0),
		asset_index: info.asset_index,
	}
}

fn build_legend(mut order: Vec<(i64, CommunityInfo)>, assets: &AssetRegistry) -> Vec<LegendEntry> {
	// Stable: equal counts keep first-seen order.
	order.sort_by(|a, b| b.1.member_count.cmp(&a.1.member_count));

	order
		.into_iter()
		.map(|(community, info)| {
			let (planet_name, icon, preview, accent) = match assets.get(info.asset_index) {
				Some(asset) => (
					asset.name.clone(),
					asset.icon,
					asset.preview.clone(),
					asset.accent.to_hex(),
				),
				None => {
					let preset = &PRESETS[(info.display_label - 1) % PRESETS.len()];
					(preset.name.to_string(), preset.icon, None, preset.accent.to_hex())
				}
			};

			LegendEntry {
				community,
				label: info.display_label,
				planet_name,
				icon,
				preview,
				accent,
				count: info.member_count,
			}
		})
		.collect()
}
