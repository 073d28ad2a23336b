//! Hover focus: at most one node or one link is inspected at a time.

use std::sync::Arc;

use super::assets::AssetRegistry;
use super::preset::DEFAULT_ICON;
use super::view_model::{VisualEdge, VisualNode};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Focus {
	#[default]
	Idle,
	Node(Arc<VisualNode>),
	Link(Arc<VisualEdge>),
}

impl Focus {
	/// Node hover callback. Entering replaces any focus; leaving only clears a
	/// node focus, so a late exit cannot wipe a newer link focus.
	pub fn hover_node(&mut self, node: Option<Arc<VisualNode>>) {
		match node {
			Some(node) => *self = Focus::Node(node),
			None => {
				if matches!(self, Focus::Node(_)) {
					*self = Focus::Idle;
				}
			}
		}
	}

	/// Link counterpart of [`Focus::hover_node`].
	pub fn hover_link(&mut self, link: Option<Arc<VisualEdge>>) {
		match link {
			Some(link) => *self = Focus::Link(link),
			None => {
				if matches!(self, Focus::Link(_)) {
					*self = Focus::Idle;
				}
			}
		}
	}

	/// Drops any focus. Called whenever the view model is replaced.
	pub fn reset(&mut self) {
		*self = Focus::Idle;
	}

	pub fn hovered_node(&self) -> Option<&Arc<VisualNode>> {
		match self {
			Focus::Node(node) => Some(node),
			_ => None,
		}
	}

	pub fn hovered_link(&self) -> Option<&Arc<VisualEdge>> {
		match self {
			Focus::Link(link) => Some(link),
			_ => None,
		}
	}

	pub fn node_summary(&self, assets: &AssetRegistry) -> Option<NodeSummary> {
		self.hovered_node().map(|node| NodeSummary::new(node, assets))
	}

	pub fn link_summary(&self) -> Option<LinkSummary> {
		self.hovered_link().map(|link| LinkSummary::new(link))
	}
}

/// Focus tied to the view-model epoch it was taken in. Once the view model is
/// rebuilt the old focus reads as [`Focus::Idle`], and the next hover event
/// starts over from it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopedFocus {
	epoch: u64,
	focus: Focus,
}

impl ScopedFocus {
	pub fn hover_node(&mut self, epoch: u64, node: Option<Arc<VisualNode>>) {
		self.enter_epoch(epoch);
		self.focus.hover_node(node);
	}

	pub fn hover_link(&mut self, epoch: u64, link: Option<Arc<VisualEdge>>) {
		self.enter_epoch(epoch);
		self.focus.hover_link(link);
	}

	/// The focus as seen from view-model `epoch`.
	pub fn current(&self, epoch: u64) -> Focus {
		if self.epoch == epoch {
			self.focus.clone()
		} else {
			Focus::Idle
		}
	}

	fn enter_epoch(&mut self, epoch: u64) {
		if self.epoch != epoch {
			self.focus.reset();
			self.epoch = epoch;
		}
	}
}

/// Read-only content of the node side panel.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSummary {
	pub label: String,
	pub icon: &'static str,
	pub planet: String,
	pub community: usize,
	pub degree: i64,
}

impl NodeSummary {
	pub fn new(node: &VisualNode, assets: &AssetRegistry) -> Self {
		let asset = assets.get(node.asset_index);
		Self {
			label: node.name.clone(),
			icon: asset.map_or(DEFAULT_ICON, |asset| asset.icon),
			planet: asset.map_or_else(|| "Unassigned".to_string(), |asset| asset.name.clone()),
			community: node.display_group,
			degree: node.degree,
		}
	}
}

/// Read-only content of the connection side panel.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSummary {
	pub source: String,
	pub target: String,
	pub weight: String,
	pub description: String,
}

impl LinkSummary {
	pub fn new(edge: &VisualEdge) -> Self {
		Self {
			source: edge.source.name.clone(),
			target: edge.target.name.clone(),
			weight: edge.weight_label(),
			description: edge
				.description
				.clone()
				.unwrap_or_else(|| "No additional details".to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn node(id: &str) -> Arc<VisualNode> {
		Arc::new(VisualNode {
			id: id.into(),
			name: format!("Node {id}"),
			group: 1,
			display_group: 2,
			level: 0,
			degree: 3,
			size_value: 3.0,
			asset_index: 1,
		})
	}

	fn link(source: &str, target: &str) -> Arc<VisualEdge> {
		Arc::new(VisualEdge {
			id: format!("{source}-{target}"),
			source: node(source),
			target: node(target),
			weight: Some(2.5),
			description: None,
			visual_weight: 2.5,
		})
	}

	#[test]
	fn node_hover_clears_link_focus() {
		let mut focus = Focus::default();
		let a = node("a");
		focus.hover_link(Some(link("a", "b")));
		focus.hover_node(Some(Arc::clone(&a)));
		assert!(focus.hovered_link().is_none());
		assert!(Arc::ptr_eq(focus.hovered_node().unwrap(), &a));
	}

	#[test]
	fn link_hover_clears_node_focus() {
		let mut focus = Focus::default();
		focus.hover_node(Some(node("a")));
		focus.hover_link(Some(link("a", "b")));
		assert!(focus.hovered_node().is_none());
		assert!(focus.hovered_link().is_some());
	}

	#[test]
	fn stale_exit_keeps_newer_focus() {
		let mut focus = Focus::default();
		focus.hover_node(Some(node("a")));
		focus.hover_link(Some(link("a", "b")));
		focus.hover_node(None);
		assert!(focus.hovered_link().is_some());

		focus.hover_node(Some(node("c")));
		focus.hover_link(None);
		assert!(focus.hovered_node().is_some());
	}

	#[test]
	fn matching_exit_returns_to_idle() {
		let mut focus = Focus::default();
		focus.hover_node(Some(node("a")));
		focus.hover_node(None);
		assert_eq!(focus, Focus::Idle);

		focus.hover_link(Some(link("a", "b")));
		focus.hover_link(None);
		assert_eq!(focus, Focus::Idle);
	}

	#[test]
	fn reset_drops_focus() {
		let mut focus = Focus::default();
		focus.hover_link(Some(link("a", "b")));
		focus.reset();
		assert_eq!(focus, Focus::Idle);
	}

	#[test]
	fn rebuilt_view_model_reads_as_idle() {
		let mut scoped = ScopedFocus::default();
		scoped.hover_node(0, Some(node("a")));
		assert!(scoped.current(0).hovered_node().is_some());
		assert_eq!(scoped.current(1), Focus::Idle);

		// a late exit from the old scene must not resurrect anything
		scoped.hover_node(1, None);
		assert_eq!(scoped.current(1), Focus::Idle);

		scoped.hover_link(1, Some(link("a", "b")));
		assert!(scoped.current(1).hovered_link().is_some());
		assert_eq!(scoped.current(2), Focus::Idle);
	}

	#[test]
	fn summaries_describe_focus() {
		let mut registry = AssetRegistry::with_rng(SmallRng::seed_from_u64(5));
		registry.ensure(6);

		let mut focus = Focus::default();
		assert!(focus.node_summary(&registry).is_none());

		focus.hover_node(Some(node("a")));
		let summary = focus.node_summary(&registry).unwrap();
		assert_eq!(summary.label, "Node a");
		assert_eq!(summary.planet, "Crimson Forge");
		assert_eq!(summary.community, 2);
		assert_eq!(summary.degree, 3);

		focus.hover_link(Some(link("a", "b")));
		let summary = focus.link_summary().unwrap();
		assert_eq!(summary.source, "Node a");
		assert_eq!(summary.target, "Node b");
		assert_eq!(summary.weight, "2.50");
		assert_eq!(summary.description, "No additional details");
	}

	#[test]
	fn node_summary_without_assets() {
		let registry = AssetRegistry::with_rng(SmallRng::seed_from_u64(5));
		let summary = NodeSummary::new(&node("a"), &registry);
		assert_eq!(summary.planet, "Unassigned");
		assert_eq!(summary.icon, DEFAULT_ICON);
	}
}
