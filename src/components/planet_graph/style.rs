use super::assets::{AssetRegistry, PlanetAsset, PlanetObject};
use super::color::Rgb;
use super::engine::GraphStyle;
use super::view_model::{VisualEdge, VisualNode};

const FALLBACK_ACCENT: Rgb = Rgb::hex(0x38bdf8);
/// Opacity of link colours, 0x55 / 0xff.
const LINK_ALPHA: f64 = 0x55 as f64 / 255.0;

/// Styles every node and link after the planet of its community.
pub struct PlanetStyle<'a> {
	assets: &'a AssetRegistry,
}

impl<'a> PlanetStyle<'a> {
	pub fn new(assets: &'a AssetRegistry) -> Self {
		Self { assets }
	}

	fn planet(&self, node: &VisualNode) -> Option<&'a PlanetAsset> {
		self.assets.get(node.asset_index)
	}

	fn accent(&self, node: &VisualNode) -> Rgb {
		self.planet(node).map_or(FALLBACK_ACCENT, |asset| asset.accent)
	}
}

/// Planet scale grows with the log of the node size.
pub fn planet_scale(size_value: f64) -> f64 {
	1.6 + (size_value + 1.0).log2()
}

impl GraphStyle for PlanetStyle<'_> {
	fn node_color(&self, node: &VisualNode) -> Rgb {
		self.accent(node)
	}

	fn node_size(&self, node: &VisualNode) -> f64 {
		node.size_value
	}

	fn node_label(&self, node: &VisualNode) -> String {
		let planet = self.planet(node).map_or("Unknown", |asset| asset.name.as_str());
		format!(
			"{}\nCommunity: {}\nPlanet: {}",
			node.name, node.display_group, planet
		)
	}

	fn node_object(&self, node: &VisualNode) -> Option<PlanetObject> {
		self.planet(node)
			.map(|asset| asset.build(planet_scale(node.size_value)))
	}

	fn link_color(&self, edge: &VisualEdge) -> String {
		self.accent(&edge.source).to_rgba(LINK_ALPHA)
	}

	fn link_width(&self, edge: &VisualEdge) -> f64 {
		(edge.visual_weight + 1.0).log2()
	}

	fn link_label(&self, edge: &VisualEdge) -> String {
		let mut label = format!(
			"{} ➜ {}\nWeight: {}",
			edge.source.name,
			edge.target.name,
			edge.weight_label()
		);
		if let Some(description) = &edge.description {
			label.push('\n');
			label.push_str(description);
		}
		label
	}

	fn link_particle_color(&self, edge: &VisualEdge) -> Rgb {
		self.accent(&edge.target)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn node(id: &str, asset_index: usize, size_value: f64) -> Arc<VisualNode> {
		Arc::new(VisualNode {
			id: id.into(),
			name: id.to_uppercase(),
			group: asset_index as i64,
			display_group: asset_index + 1,
			level: 0,
			degree: size_value as i64,
			size_value,
			asset_index,
		})
	}

	fn registry() -> AssetRegistry {
		let mut registry = AssetRegistry::with_rng(SmallRng::seed_from_u64(9));
		registry.ensure(6);
		registry
	}

	#[test]
	fn node_accessors_use_community_planet() {
		let registry = registry();
		let style = PlanetStyle::new(&registry);
		let n = node("a", 2, 3.0);

		assert_eq!(style.node_color(&n), Rgb::hex(0x34d399));
		assert_eq!(style.node_size(&n), 3.0);
		assert_eq!(style.node_label(&n), "A\nCommunity: 3\nPlanet: Verdant Bloom");
		let object = style.node_object(&n).unwrap();
		assert!((object.scale - 3.6).abs() < 1e-12);
	}

	#[test]
	fn link_accessors() {
		let registry = registry();
		let style = PlanetStyle::new(&registry);
		let edge = VisualEdge {
			id: "e".into(),
			source: node("a", 0, 1.0),
			target: node("b", 1, 1.0),
			weight: Some(3.0),
			description: Some("shared assay".into()),
			visual_weight: 3.0,
		};

		assert_eq!(style.link_width(&edge), 2.0);
		assert_eq!(style.link_color(&edge), Rgb::hex(0x38bdf8).to_rgba(LINK_ALPHA));
		assert_eq!(style.link_particle_color(&edge), Rgb::hex(0xf97316));
		assert_eq!(style.link_label(&edge), "A ➜ B\nWeight: 3.00\nshared assay");
	}

	#[test]
	fn empty_registry_uses_fallbacks() {
		let registry = AssetRegistry::with_rng(SmallRng::seed_from_u64(9));
		let style = PlanetStyle::new(&registry);
		let n = node("a", 0, 1.0);
		assert_eq!(style.node_color(&n), FALLBACK_ACCENT);
		assert!(style.node_object(&n).is_none());
		assert!(style.node_label(&n).ends_with("Planet: Unknown"));
	}
}
