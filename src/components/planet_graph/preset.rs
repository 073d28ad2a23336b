//! Planet recipes: the hand-authored set plus an endless golden-angle sequence.

use std::borrow::Cow;

use super::color::Rgb;

/// Golden angle in degrees; consecutive indices land far apart on the hue wheel.
pub const GOLDEN_ANGLE: f64 = 137.508;

pub const DEFAULT_ICON: &str = "🪐";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
	Bands,
	Spots,
	Swirl,
	Storm,
}

impl Pattern {
	pub const ALL: [Pattern; 4] = [Pattern::Bands, Pattern::Spots, Pattern::Swirl, Pattern::Storm];
}

/// Colour and surface recipe for one planet identity.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetPreset {
	pub name: Cow<'static, str>,
	pub icon: &'static str,
	pub base: Rgb,
	pub accent: Rgb,
	pub ambient: Rgb,
	pub pattern: Pattern,
	/// Ring colour; `None` means no ring.
	pub ring: Option<Rgb>,
}

impl PlanetPreset {
	pub fn has_ring(&self) -> bool {
		self.ring.is_some()
	}
}

const fn authored(
	name: &'static str,
	icon: &'static str,
	colors: [u32; 3],
	pattern: Pattern,
	ring: Option<u32>,
) -> PlanetPreset {
	PlanetPreset {
		name: Cow::Borrowed(name),
		icon,
		base: Rgb::hex(colors[0]),
		accent: Rgb::hex(colors[1]),
		ambient: Rgb::hex(colors[2]),
		pattern,
		ring: match ring {
			Some(value) => Some(Rgb::hex(value)),
			None => None,
		},
	}
}

pub const PRESETS: [PlanetPreset; 6] = [
	authored("Aqua Atlas", "🌊", [0x2563eb, 0x38bdf8, 0x1d4ed8], Pattern::Bands, None),
	authored("Crimson Forge", "🔥", [0xef4444, 0xf97316, 0x991b1b], Pattern::Spots, None),
	authored("Verdant Bloom", "🌿", [0x22c55e, 0x34d399, 0x166534], Pattern::Swirl, None),
	authored("Solar Halo", "🌟", [0xf59e0b, 0xfacc15, 0xb45309], Pattern::Storm, Some(0xfde68a)),
	authored("Aurora Drift", "💫", [0x8b5cf6, 0xc084fc, 0x5b21b6], Pattern::Bands, None),
	authored("Mist Opal", "🪶", [0x0ea5e9, 0x67e8f9, 0x075985], Pattern::Spots, Some(0xbae6fd)),
];

/// Generated recipe for `index`, independent of the hand-authored set.
pub fn derive_preset(index: usize) -> PlanetPreset {
	let hue = (index as f64 * GOLDEN_ANGLE) % 360.0;
	let has_ring = index % 5 == 0;

	PlanetPreset {
		name: Cow::Owned(format!("Orbital-{}", index + 1)),
		icon: DEFAULT_ICON,
		base: Rgb::from_hsl(hue, 70.0, 45.0),
		accent: Rgb::from_hsl(hue + 25.0, 75.0, 60.0),
		ambient: Rgb::from_hsl(hue + 330.0, 65.0, 35.0),
		pattern: Pattern::ALL[index % Pattern::ALL.len()],
		ring: has_ring.then(|| Rgb::from_hsl(hue + 180.0, 50.0, 75.0)),
	}
}

/// Hand-authored recipe for low indices, generated beyond.
pub fn preset_for(index: usize) -> PlanetPreset {
	PRESETS
		.get(index)
		.cloned()
		.unwrap_or_else(|| derive_preset(index))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pattern_cycles_every_four() {
		for i in 0..40 {
			assert_eq!(derive_preset(i).pattern, derive_preset(i + 4).pattern);
			assert_eq!(derive_preset(i).pattern, Pattern::ALL[i % 4]);
		}
		assert_ne!(derive_preset(0).pattern, derive_preset(1).pattern);
	}

	#[test]
	fn ring_every_fifth_index() {
		for i in 0..50 {
			assert_eq!(derive_preset(i).has_ring(), i % 5 == 0, "index {i}");
		}
	}

	#[test]
	fn hues_follow_golden_angle() {
		assert_eq!(derive_preset(0).base, Rgb::from_hsl(0.0, 70.0, 45.0));
		assert_eq!(derive_preset(1).base, Rgb::from_hsl(137.508, 70.0, 45.0));
		assert_eq!(derive_preset(3).base, Rgb::from_hsl(412.524 % 360.0, 70.0, 45.0));
		assert_eq!(derive_preset(1).accent, Rgb::from_hsl(162.508, 75.0, 60.0));
		assert_eq!(derive_preset(1).ambient, Rgb::from_hsl(107.508, 65.0, 35.0));
		assert_eq!(derive_preset(5).ring, Some(Rgb::from_hsl(5.0 * 137.508 + 180.0, 50.0, 75.0)));
	}

	#[test]
	fn consecutive_generated_presets_differ() {
		for i in 0..30 {
			assert_ne!(derive_preset(i).base, derive_preset(i + 1).base);
		}
	}

	#[test]
	fn authored_presets_come_first() {
		assert_eq!(preset_for(0).name, "Aqua Atlas");
		assert_eq!(preset_for(3).ring, Some(Rgb::hex(0xfde68a)));
		assert_eq!(preset_for(6).name, "Orbital-7");
		assert_eq!(preset_for(6).icon, DEFAULT_ICON);
	}
}
