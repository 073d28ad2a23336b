//! Lazily grown, append-only cache of planet assets.

use std::f64::consts::PI;
use std::rc::Rc;

use log::debug;
use rand::rngs::SmallRng;

use super::color::Rgb;
use super::preset::{PlanetPreset, preset_for};
use super::texture::{Texture, jitter_rng, synthesize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereGeometry {
	pub radius: f64,
	pub width_segments: u32,
	pub height_segments: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusGeometry {
	pub radius: f64,
	pub tube: f64,
	pub radial_segments: u32,
	pub tubular_segments: u32,
}

/// Drawable primitives shared by every planet. Owned by the registry; assets and
/// built objects only hold references.
#[derive(Debug, PartialEq)]
pub struct PlanetGeometry {
	pub sphere: SphereGeometry,
	pub ring: TorusGeometry,
}

impl Default for PlanetGeometry {
	fn default() -> Self {
		Self {
			sphere: SphereGeometry {
				radius: 1.0,
				width_segments: 48,
				height_segments: 48,
			},
			ring: TorusGeometry {
				radius: 1.35,
				tube: 0.08,
				radial_segments: 16,
				tubular_segments: 60,
			},
		}
	}
}

#[derive(Debug)]
pub struct PlanetMaterial {
	pub map: Texture,
	pub roughness: f64,
	pub metalness: f64,
	pub emissive: Rgb,
	pub emissive_intensity: f64,
}

#[derive(Debug, PartialEq)]
pub struct RingMaterial {
	pub color: Rgb,
	pub emissive: Rgb,
	pub emissive_intensity: f64,
	pub opacity: f64,
}

#[derive(Clone, Debug)]
pub struct PlanetRing {
	pub material: Rc<RingMaterial>,
	/// Rotation about the x and y axes, radians.
	pub tilt: (f64, f64),
	pub scale: f64,
}

/// A placed planet: shared geometry and materials plus a per-node scale.
#[derive(Clone, Debug)]
pub struct PlanetObject {
	pub geometry: Rc<PlanetGeometry>,
	pub material: Rc<PlanetMaterial>,
	pub ring: Option<PlanetRing>,
	pub scale: f64,
}

/// One community's visual identity.
#[derive(Debug)]
pub struct PlanetAsset {
	pub name: String,
	pub icon: &'static str,
	pub preview: Option<String>,
	pub accent: Rgb,
	geometry: Rc<PlanetGeometry>,
	material: Rc<PlanetMaterial>,
	ring_material: Option<Rc<RingMaterial>>,
}

impl PlanetAsset {
	fn new(preset: &PlanetPreset, geometry: Rc<PlanetGeometry>, rng: &mut SmallRng) -> Self {
		let surface = synthesize(preset, rng);
		let material = PlanetMaterial {
			map: surface.texture,
			roughness: 0.5,
			metalness: 0.15,
			emissive: preset.ambient.mix(preset.accent, 0.55),
			emissive_intensity: 0.35,
		};
		let ring_material = preset.ring.map(|ring| {
			Rc::new(RingMaterial {
				color: ring,
				emissive: ring.mix(Rgb::WHITE, 0.2),
				emissive_intensity: 0.25,
				opacity: 0.85,
			})
		});

		Self {
			name: preset.name.to_string(),
			icon: preset.icon,
			preview: surface.preview,
			accent: preset.accent,
			geometry,
			material: Rc::new(material),
			ring_material,
		}
	}

	pub fn has_ring(&self) -> bool {
		self.ring_material.is_some()
	}

	pub fn material(&self) -> &PlanetMaterial {
		&self.material
	}

	pub fn build(&self, scale: f64) -> PlanetObject {
		PlanetObject {
			geometry: Rc::clone(&self.geometry),
			material: Rc::clone(&self.material),
			ring: self.ring_material.as_ref().map(|material| PlanetRing {
				material: Rc::clone(material),
				tilt: (PI / 2.15, PI / 4.0),
				scale: 1.2,
			}),
			scale,
		}
	}
}

/// Assets are indexed by position. Entries are never removed or rebuilt, so an
/// index keeps its look for the life of the registry.
pub struct AssetRegistry {
	geometry: Rc<PlanetGeometry>,
	assets: Vec<PlanetAsset>,
	rng: SmallRng,
}

impl Default for AssetRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl AssetRegistry {
	pub fn new() -> Self {
		Self::with_rng(jitter_rng())
	}

	pub fn with_rng(rng: SmallRng) -> Self {
		Self {
			geometry: Rc::new(PlanetGeometry::default()),
			assets: Vec::new(),
			rng,
		}
	}

	/// Grows the registry to at least `count` assets. Returns how many were added.
	pub fn ensure(&mut self, count: usize) -> usize {
		let before = self.assets.len();
		for index in before..count {
			let preset = preset_for(index);
			let asset = PlanetAsset::new(&preset, Rc::clone(&self.geometry), &mut self.rng);
			self.assets.push(asset);
		}

		let added = self.assets.len() - before;
		if added > 0 {
			debug!("planet registry grew to {} assets", self.assets.len());
		}
		added
	}

	/// Wraps `index` over the current length; `None` only while empty.
	pub fn get(&self, index: usize) -> Option<&PlanetAsset> {
		if self.assets.is_empty() {
			return None;
		}
		self.assets.get(index % self.assets.len())
	}

	pub fn len(&self) -> usize {
		self.assets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.assets.is_empty()
	}

	pub fn geometry(&self) -> &Rc<PlanetGeometry> {
		&self.geometry
	}

	pub fn iter(&self) -> impl Iterator<Item = &PlanetAsset> {
		self.assets.iter()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::*;
	use crate::components::planet_graph::preset::PRESETS;

	fn registry() -> AssetRegistry {
		AssetRegistry::with_rng(SmallRng::seed_from_u64(11))
	}

	fn names(registry: &AssetRegistry) -> Vec<String> {
		registry.iter().map(|asset| asset.name.clone()).collect()
	}

	#[test]
	fn ensure_grows_monotonically() {
		let mut registry = registry();
		assert_eq!(registry.ensure(8), 8);
		let snapshot = names(&registry);

		assert_eq!(registry.ensure(8), 0);
		assert_eq!(registry.ensure(3), 0);
		assert_eq!(registry.ensure(0), 0);
		assert_eq!(names(&registry), snapshot);

		assert_eq!(registry.ensure(10), 2);
		assert_eq!(&names(&registry)[..8], &snapshot[..]);
	}

	#[test]
	fn existing_entries_are_not_rebuilt() {
		let mut registry = registry();
		registry.ensure(2);
		let first = Rc::as_ptr(&registry.get(0).map(|a| Rc::clone(&a.material)).unwrap());
		registry.ensure(20);
		let again = Rc::as_ptr(&registry.get(0).map(|a| Rc::clone(&a.material)).unwrap());
		assert_eq!(first, again);
	}

	#[test]
	fn authored_presets_fill_low_indices() {
		let mut registry = registry();
		registry.ensure(8);
		let names = names(&registry);
		for (name, preset) in names.iter().zip(PRESETS.iter()) {
			assert_eq!(name.as_str(), preset.name);
		}
		assert_eq!(names[6], "Orbital-7");
		assert_eq!(names[7], "Orbital-8");
	}

	#[test]
	fn get_wraps_around() {
		let mut registry = registry();
		assert!(registry.get(0).is_none());
		registry.ensure(6);
		assert_eq!(registry.get(7).map(|a| &a.name), registry.get(1).map(|a| &a.name));
		assert_eq!(registry.get(6000).map(|a| &a.name), registry.get(0).map(|a| &a.name));
	}

	#[test]
	fn geometry_is_shared_not_copied() {
		let mut registry = registry();
		registry.ensure(12);
		let shared = registry.geometry();
		for asset in registry.iter() {
			let object = asset.build(2.0);
			assert!(Rc::ptr_eq(&object.geometry, shared));
		}
	}

	#[test]
	fn build_attaches_ring_when_preset_has_one() {
		let mut registry = registry();
		registry.ensure(6);
		let ringless = registry.get(0).map(|a| a.build(1.5)).unwrap();
		assert!(ringless.ring.is_none());
		assert_eq!(ringless.scale, 1.5);

		let ringed = registry.get(3).map(|a| a.build(3.0)).unwrap();
		let ring = ringed.ring.expect("Solar Halo carries a ring");
		assert_eq!(ring.material.color, Rgb::hex(0xfde68a));
		assert_eq!(ring.scale, 1.2);
	}

	#[test]
	fn material_follows_preset() {
		let mut registry = registry();
		registry.ensure(1);
		let asset = registry.get(0).unwrap();
		let preset = &PRESETS[0];
		assert_eq!(asset.accent, preset.accent);
		assert_eq!(asset.material().emissive, preset.ambient.mix(preset.accent, 0.55));
		assert_eq!(asset.preview, None);
	}
}
