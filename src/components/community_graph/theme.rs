//! Colors and styles for communities.
//!
//! Provides the RGB color type, the size gradient used for the community
//! picker, random dark colors for multi-community views, and the base
//! stylesheet handed to the rendering engine.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::elements::{INTERCLUSTER_CLASS, StyleRule};

/// RGB color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Build from hue (degrees), saturation and value (both 0.0..=1.0).
	pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
		let h = h.rem_euclid(360.0) / 60.0;
		let (s, v) = (s.clamp(0.0, 1.0), v.clamp(0.0, 1.0));
		let c = v * s;
		let x = c * (1.0 - (h % 2.0 - 1.0).abs());
		let (r, g, b) = match h as u32 {
			0 => (c, x, 0.0),
			1 => (x, c, 0.0),
			2 => (0.0, c, x),
			3 => (0.0, x, c),
			4 => (x, 0.0, c),
			_ => (c, 0.0, x),
		};
		let m = v - c;
		let channel = |f: f64| ((f + m) * 255.0).round() as u8;
		Self::rgb(channel(r), channel(g), channel(b))
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 + t * (b as f64 - a as f64)).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
		}
	}

	/// Perceived brightness (ITU-R BT.601 luma), 0.0..=1.0.
	pub fn luma(self) -> f64 {
		(0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
	}

	pub fn to_css_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Teal accent: single-community nodes, default nodes, intercluster edges.
pub const ACCENT: Color = Color::rgb(0, 200, 199);
/// Pink used for intra-community edges and the large end of the size gradient.
pub const EDGE_PINK: Color = Color::rgb(255, 95, 150);

/// Color for `value` on the accent→pink gradient between `min` and `max`.
///
/// The position is logarithmic so small size differences stay visible; the
/// `+ 1` keeps `ln` away from zero.
pub fn interpolate_gradient(min: usize, max: usize, value: usize) -> Color {
	let span = max.saturating_sub(min) as f64;
	let offset = value.saturating_sub(min) as f64;
	let t = if span > 0.0 {
		(offset + 1.0).ln() / (span + 1.0).ln()
	} else {
		0.0
	};
	ACCENT.lerp(EDGE_PINK, t)
}

/// Gradient colors for a list of community sizes, one per entry.
pub fn size_gradient(sizes: &[usize]) -> Vec<Color> {
	let (Some(&min), Some(&max)) = (sizes.iter().min(), sizes.iter().max()) else {
		return Vec::new();
	};
	sizes
		.iter()
		.map(|&size| interpolate_gradient(min, max, size))
		.collect()
}

/// A random saturated color with low brightness, readable under white labels.
pub fn random_dark_color<R: Rng>(rng: &mut R) -> Color {
	let hue = rng.random_range(0.0..360.0);
	let saturation = rng.random_range(0.55..=1.0);
	let value = rng.random_range(0.30..=0.55);
	Color::from_hsv(hue, saturation, value)
}

/// Style assigned to one active community: a class name and its node color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommunityStyle {
	pub index: usize,
	pub class: String,
	pub color: Color,
}

impl CommunityStyle {
	pub fn new(index: usize, color: Color) -> Self {
		Self {
			index,
			class: format!("community-{index}"),
			color,
		}
	}

	/// Stylesheet rule matching nodes tagged with this community's class.
	pub fn rule(&self) -> StyleRule {
		StyleRule::new(format!(".{}", self.class))
			.with("background-color", self.color.to_css_rgb())
	}
}

/// Hands out community styles.
///
/// While at most one community is active the accent color is used, so the
/// default view looks the same across algorithm switches. From the second
/// active community on, every new style gets a random dark color.
pub struct StyleAllocator {
	rng: StdRng,
}

impl StyleAllocator {
	pub fn new() -> Self {
		Self {
			rng: StdRng::from_os_rng(),
		}
	}

	pub fn with_seed(seed: u64) -> Self {
		Self {
			rng: StdRng::seed_from_u64(seed),
		}
	}

	/// Style for `index`, given the active count including `index` itself.
	pub fn assign(&mut self, index: usize, active_count: usize) -> CommunityStyle {
		if active_count < 2 {
			CommunityStyle::new(index, ACCENT)
		} else {
			CommunityStyle::new(index, random_dark_color(&mut self.rng))
		}
	}
}

impl Default for StyleAllocator {
	fn default() -> Self {
		Self::new()
	}
}

/// Fixed rules applied before any community rule.
pub fn base_stylesheet() -> Vec<StyleRule> {
	vec![
		StyleRule::new("node")
			.with("background-color", ACCENT.to_css_rgb())
			.with("color", "#fff")
			.with("label", "data(symbol)"),
		StyleRule::new("edge")
			.with("width", "0.25")
			.with("line-color", EDGE_PINK.to_css_rgb())
			.with("curve-style", "haystack"),
		StyleRule::new(format!(".{INTERCLUSTER_CLASS}"))
			.with("width", "1")
			.with("line-color", ACCENT.to_css_rgb())
			.with("curve-style", "haystack"),
	]
}
