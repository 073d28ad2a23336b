//! Procedural planet surfaces.
//!
//! Synthesis happens in two steps. [`TexturePlan::new`] lays out every mark of
//! the surface pattern, including its random jitter, as plain data. [`paint`]
//! then replays the plan onto a 2D canvas. Outside a browser there is no canvas
//! to paint on and [`synthesize`] hands back a placeholder instead.

use std::f64::consts::PI;

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::color::Rgb;
use super::preset::{Pattern, PlanetPreset};

pub const TEXTURE_SIZE: u32 = 256;
const PATTERN_TILT_DEGREES: f64 = -18.0;

const BAND_STEPS: i32 = 6;
const SPOT_COUNT: usize = 28;
const SWIRL_PATHS: usize = 5;
const SWIRL_STEPS: usize = 15;
const STORM_CELLS: usize = 7;

/// One element of the surface pattern, in pattern space (origin at the texture
/// centre, before the tilt is applied).
#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
	Band {
		y: f64,
		rx: f64,
		ry: f64,
		alpha: f64,
	},
	Spot {
		x: f64,
		y: f64,
		rx: f64,
		ry: f64,
		rotation: f64,
		alpha: f64,
	},
	Swirl {
		points: Vec<(f64, f64)>,
		width: f64,
		alpha: f64,
	},
	Storm {
		x: f64,
		y: f64,
		radius: f64,
		alpha: f64,
	},
}

/// Everything needed to paint one planet surface.
#[derive(Clone, Debug, PartialEq)]
pub struct TexturePlan {
	pub size: f64,
	pub pattern: Pattern,
	/// Inner stop of the base disc gradient.
	pub core: Rgb,
	/// Outer stop of the base disc gradient.
	pub rim: Rgb,
	pub stroke: Rgb,
	pub fill: Rgb,
	/// Centre colour of storm cells.
	pub glow: Rgb,
	pub line_width: f64,
	/// Pattern rotation in radians.
	pub tilt: f64,
	pub marks: Vec<Mark>,
}

impl TexturePlan {
	pub fn new<R: Rng>(preset: &PlanetPreset, rng: &mut R) -> Self {
		let size = TEXTURE_SIZE as f64;
		Self {
			size,
			pattern: preset.pattern,
			core: preset.base.mix(Rgb::WHITE, 0.35),
			rim: preset.ambient.mix(Rgb::BLACK, 0.2),
			stroke: preset.accent.mix(Rgb::BLACK, 0.3),
			fill: preset.accent,
			glow: preset.accent.mix(Rgb::WHITE, 0.2),
			line_width: size * 0.04,
			tilt: PATTERN_TILT_DEGREES.to_radians(),
			marks: layout_marks(preset.pattern, size, rng),
		}
	}
}

fn layout_marks<R: Rng>(pattern: Pattern, size: f64, rng: &mut R) -> Vec<Mark> {
	match pattern {
		Pattern::Bands => (-BAND_STEPS..=BAND_STEPS)
			.map(|i| Mark::Band {
				y: (i as f64 / BAND_STEPS as f64) * (size / 2.0),
				rx: size * 0.52,
				ry: size * 0.48,
				alpha: 0.5 + rng.random_range(0.0..0.25),
			})
			.collect(),
		Pattern::Spots => (0..SPOT_COUNT)
			.map(|_| {
				let angle = rng.random_range(0.0..2.0 * PI);
				let radius = rng.random_range(0.0..size * 0.48);
				let spot = size * (0.04 + rng.random_range(0.0..0.05));
				Mark::Spot {
					x: angle.cos() * radius * 0.5,
					y: angle.sin() * radius * 0.35,
					rx: spot,
					ry: spot * 0.8,
					rotation: angle,
					alpha: 0.35 + rng.random_range(0.0..0.3),
				}
			})
			.collect(),
		Pattern::Swirl => (0..SWIRL_PATHS)
			.map(|i| {
				let start_y = -size * 0.45 + i as f64 * (size * 0.18);
				let mut points = vec![(-size * 0.6, start_y)];
				points.extend((0..=SWIRL_STEPS).map(|step| {
					let x = -size * 0.6 + step as f64 * size * 0.08;
					let y = start_y + (x / size * PI * 2.0 + i as f64).sin() * size * 0.07;
					(x, y)
				}));
				Mark::Swirl {
					points,
					width: size * 0.05,
					alpha: 0.45,
				}
			})
			.collect(),
		Pattern::Storm => (0..STORM_CELLS)
			.map(|i| {
				let angle = (i as f64 / STORM_CELLS as f64) * PI * 2.0;
				let orbit = size * 0.3;
				Mark::Storm {
					x: angle.cos() * orbit * 0.4,
					y: angle.sin() * orbit * 0.45,
					radius: size * 0.22,
					alpha: 0.25,
				}
			})
			.collect(),
	}
}

/// A planet surface image. `Placeholder` stands in when no canvas exists.
#[derive(Clone, Debug, Default)]
pub enum Texture {
	#[default]
	Placeholder,
	Canvas(HtmlCanvasElement),
}

impl Texture {
	pub fn canvas(&self) -> Option<&HtmlCanvasElement> {
		match self {
			Texture::Canvas(canvas) => Some(canvas),
			Texture::Placeholder => None,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct SynthesizedTexture {
	pub texture: Texture,
	/// Encoded `data:` URL of the painted surface, used by the legend and panels.
	pub preview: Option<String>,
}

pub fn synthesize<R: Rng>(preset: &PlanetPreset, rng: &mut R) -> SynthesizedTexture {
	let plan = TexturePlan::new(preset, rng);
	let Some((canvas, ctx)) = acquire_surface(TEXTURE_SIZE) else {
		debug!("no drawing surface for planet `{}`, using placeholder", preset.name);
		return SynthesizedTexture::default();
	};

	if let Err(err) = paint(&plan, &ctx) {
		warn!("painting planet `{}` failed: {:?}", preset.name, err);
	}
	let preview = canvas.to_data_url().ok();

	SynthesizedTexture {
		texture: Texture::Canvas(canvas),
		preview,
	}
}

#[cfg(target_arch = "wasm32")]
fn acquire_surface(size: u32) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
	use wasm_bindgen::JsCast;

	let document = web_sys::window()?.document()?;
	let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
	canvas.set_width(size);
	canvas.set_height(size);
	let ctx = canvas.get_context("2d").ok()??.dyn_into().ok()?;
	Some((canvas, ctx))
}

#[cfg(not(target_arch = "wasm32"))]
fn acquire_surface(_size: u32) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
	None
}

pub fn paint(plan: &TexturePlan, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let (size, centre) = (plan.size, plan.size / 2.0);

	let disc = ctx.create_radial_gradient(centre, centre, size * 0.15, centre, centre, size * 0.52)?;
	disc.add_color_stop(0.0, &plan.core.to_hex())?;
	disc.add_color_stop(1.0, &plan.rim.to_hex())?;
	#[allow(deprecated)]
	ctx.set_fill_style(&disc);
	ctx.fill_rect(0.0, 0.0, size, size);

	ctx.save();
	ctx.translate(centre, centre)?;
	ctx.rotate(plan.tilt)?;
	ctx.set_stroke_style_str(&plan.stroke.to_hex());
	ctx.set_fill_style_str(&plan.fill.to_hex());
	ctx.set_line_width(plan.line_width);

	for mark in &plan.marks {
		match mark {
			Mark::Band { y, rx, ry, alpha } => {
				ctx.set_global_alpha(*alpha);
				ctx.begin_path();
				ctx.ellipse(0.0, *y, *rx, *ry, 0.0, 0.0, 2.0 * PI)?;
				ctx.stroke();
			}
			Mark::Spot {
				x,
				y,
				rx,
				ry,
				rotation,
				alpha,
			} => {
				ctx.set_global_alpha(*alpha);
				ctx.begin_path();
				ctx.ellipse(*x, *y, *rx, *ry, *rotation, 0.0, 2.0 * PI)?;
				ctx.fill();
			}
			Mark::Swirl { points, width, alpha } => {
				ctx.set_global_alpha(*alpha);
				ctx.set_line_width(*width);
				ctx.begin_path();
				let mut iter = points.iter();
				if let Some(&(x, y)) = iter.next() {
					ctx.move_to(x, y);
				}
				for &(x, y) in iter {
					ctx.line_to(x, y);
				}
				ctx.stroke();
			}
			Mark::Storm { x, y, radius, alpha } => {
				let cell = ctx.create_radial_gradient(*x, *y, 0.0, *x, *y, *radius)?;
				cell.add_color_stop(0.0, &plan.glow.to_hex())?;
				cell.add_color_stop(1.0, "rgba(255,255,255,0)")?;
				ctx.set_global_alpha(*alpha);
				#[allow(deprecated)]
				ctx.set_fill_style(&cell);
				ctx.begin_path();
				ctx.arc(*x, *y, *radius, 0.0, 2.0 * PI)?;
				ctx.fill();
			}
		}
	}

	ctx.restore();
	Ok(())
}

/// Jitter source for texture synthesis. Seeded from the environment, so
/// surfaces differ between sessions.
pub fn jitter_rng() -> SmallRng {
	SmallRng::seed_from_u64(entropy_seed())
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
	use std::time::{SystemTime, UNIX_EPOCH};

	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_nanos() as u64)
		.unwrap_or(0x9e37_79b9_7f4a_7c15)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::planet_graph::preset::{PRESETS, derive_preset};

	fn rng() -> SmallRng {
		SmallRng::seed_from_u64(7)
	}

	fn plan_for(pattern: Pattern) -> TexturePlan {
		let preset = PlanetPreset {
			pattern,
			..PRESETS[0].clone()
		};
		TexturePlan::new(&preset, &mut rng())
	}

	#[test]
	fn mark_count_matches_pattern() {
		assert_eq!(plan_for(Pattern::Bands).marks.len(), 13);
		assert_eq!(plan_for(Pattern::Spots).marks.len(), 28);
		assert_eq!(plan_for(Pattern::Swirl).marks.len(), 5);
		assert_eq!(plan_for(Pattern::Storm).marks.len(), 7);
	}

	#[test]
	fn marks_match_their_pattern_kind() {
		for pattern in Pattern::ALL {
			let plan = plan_for(pattern);
			assert_eq!(plan.pattern, pattern);
			assert!(plan.marks.iter().all(|mark| matches!(
				(pattern, mark),
				(Pattern::Bands, Mark::Band { .. })
					| (Pattern::Spots, Mark::Spot { .. })
					| (Pattern::Swirl, Mark::Swirl { .. })
					| (Pattern::Storm, Mark::Storm { .. })
			)));
		}
	}

	#[test]
	fn jitter_stays_in_range() {
		let size = TEXTURE_SIZE as f64;
		for seed in 0..20 {
			let mut rng = SmallRng::seed_from_u64(seed);
			let bands = TexturePlan::new(&derive_preset(0), &mut rng);
			for mark in &bands.marks {
				let Mark::Band { alpha, .. } = mark else { panic!("expected band") };
				assert!((0.5..0.75).contains(alpha));
			}

			let spots = TexturePlan::new(&derive_preset(1), &mut rng);
			for mark in &spots.marks {
				let Mark::Spot { x, y, rx, ry, alpha, .. } = mark else { panic!("expected spot") };
				assert!((0.35..0.65).contains(alpha));
				assert!(*rx >= size * 0.04 && *rx < size * 0.09);
				assert!((ry / rx - 0.8).abs() < 1e-9);
				assert!(x.abs() <= size * 0.24 && y.abs() <= size * 0.168);
			}
		}
	}

	#[test]
	fn palette_derives_from_preset() {
		let preset = &PRESETS[3];
		let plan = TexturePlan::new(preset, &mut rng());
		assert_eq!(plan.core, preset.base.mix(Rgb::WHITE, 0.35));
		assert_eq!(plan.rim, preset.ambient.mix(Rgb::BLACK, 0.2));
		assert_eq!(plan.stroke, preset.accent.mix(Rgb::BLACK, 0.3));
		assert_eq!(plan.fill, preset.accent);
		assert!((plan.tilt + 18f64.to_radians()).abs() < 1e-12);
		assert_eq!(plan.size, 256.0);
	}

	#[test]
	fn swirl_paths_span_the_surface() {
		let plan = plan_for(Pattern::Swirl);
		for mark in &plan.marks {
			let Mark::Swirl { points, .. } = mark else { panic!("expected swirl") };
			assert_eq!(points.len(), SWIRL_STEPS + 2);
			let last = points.last().map(|p| p.0).unwrap_or_default();
			assert!((last - 256.0 * 0.6).abs() < 1e-9);
		}
	}

	#[test]
	fn degrades_to_placeholder_without_surface() {
		let synthesized = synthesize(&PRESETS[0], &mut rng());
		assert!(matches!(synthesized.texture, Texture::Placeholder));
		assert!(synthesized.texture.canvas().is_none());
		assert_eq!(synthesized.preview, None);
	}
}
