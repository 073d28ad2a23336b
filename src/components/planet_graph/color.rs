//! sRGB colour helpers shared by the texture synthesizer and the scene renderer.

use std::fmt;

/// An opaque 8-bit sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const WHITE: Rgb = Rgb::hex(0xffffff);
	pub const BLACK: Rgb = Rgb::hex(0x000000);

	/// Builds a colour from a packed `0xRRGGBB` value.
	pub const fn hex(value: u32) -> Self {
		Self {
			r: ((value >> 16) & 0xff) as u8,
			g: ((value >> 8) & 0xff) as u8,
			b: (value & 0xff) as u8,
		}
	}

	/// Converts hue (degrees, wrapped), saturation and lightness (percent, clamped).
	pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
		let h = hue.rem_euclid(360.0) / 360.0;
		let s = saturation.clamp(0.0, 100.0) / 100.0;
		let l = lightness.clamp(0.0, 100.0) / 100.0;

		if s == 0.0 {
			return Self::from_unit(l, l, l);
		}

		let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
		let p = 2.0 * l - q;
		Self::from_unit(
			hue_to_channel(p, q, h + 1.0 / 3.0),
			hue_to_channel(p, q, h),
			hue_to_channel(p, q, h - 1.0 / 3.0),
		)
	}

	fn from_unit(r: f64, g: f64, b: f64) -> Self {
		let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
		Self {
			r: to_byte(r),
			g: to_byte(g),
			b: to_byte(b),
		}
	}

	/// Linear interpolation towards `other`; `amount` 0 keeps `self`, 1 yields `other`.
	pub fn mix(self, other: Rgb, amount: f64) -> Self {
		let t = amount.clamp(0.0, 1.0);
		let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
		Self {
			r: lerp(self.r, other.r),
			g: lerp(self.g, other.g),
			b: lerp(self.b, other.b),
		}
	}

	/// `#rrggbb`
	pub fn to_hex(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	/// CSS `rgba(...)` string with the given opacity.
	pub fn to_rgba(self, alpha: f64) -> String {
		format!(
			"rgba({}, {}, {}, {})",
			self.r,
			self.g,
			self.b,
			alpha.clamp(0.0, 1.0)
		)
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
	let t = t.rem_euclid(1.0);
	if t < 1.0 / 6.0 {
		p + (q - p) * 6.0 * t
	} else if t < 0.5 {
		q
	} else if t < 2.0 / 3.0 {
		p + (q - p) * 6.0 * (2.0 / 3.0 - t)
	} else {
		p
	}
}
