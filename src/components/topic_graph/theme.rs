//! Visual theming for the topic graph.
//!
//! Category colors, background, line styles and the selection ring.

use indexmap::IndexMap;
use log::warn;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB`, `#RGB` and `rgb()`/`rgba()` notation.
	pub fn parse(s: &str) -> Option<Self> {
		let s = s.trim();
		if let Some(hex) = s.strip_prefix('#') {
			let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
			return match hex.len() {
				6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
				3 => {
					let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
					Some(Self::rgb(short(0)?, short(1)?, short(2)?))
				}
				_ => None,
			};
		}
		let inner = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
		let (r, g, b) = match parts.as_slice() {
			[r, g, b] | [r, g, b, _] => (r.parse().ok()?, g.parse().ok()?, b.parse().ok()?),
			_ => return None,
		};
		let a = match parts.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Self::rgba(r, g, b, a))
	}
}

/// Color applied to topics whose category has no entry.
pub const DEFAULT_CATEGORY_COLOR: Color = Color::rgb(0x21, 0x9e, 0xbc);

/// Category name to fill color, kept in legend order.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryPalette {
	colors: IndexMap<String, Color>,
	fallback: Color,
}

impl CategoryPalette {
	pub fn new(colors: IndexMap<String, Color>) -> Self {
		Self {
			colors,
			fallback: DEFAULT_CATEGORY_COLOR,
		}
	}

	/// Build from CSS color strings. Unparseable entries fall back to the default color.
	pub fn from_css(entries: &IndexMap<String, String>) -> Self {
		let colors = entries
			.iter()
			.map(|(name, css)| {
				let color = Color::parse(css).unwrap_or_else(|| {
					warn!("topic-graph: category {name:?} has unparseable color {css:?}");
					DEFAULT_CATEGORY_COLOR
				});
				(name.clone(), color)
			})
			.collect();
		Self::new(colors)
	}

	/// Marine-topic categories used when a dataset ships none.
	pub fn marine() -> Self {
		let colors = [
			("Concepts", Color::rgb(0x2a, 0x9d, 0x8f)),
			("Fields", Color::rgb(0x83, 0x38, 0xec)),
			("Ecosystems", Color::rgb(0x21, 0x9e, 0xbc)),
			("Biodiversity", Color::rgb(0x2a, 0x9d, 0x8f)),
			("Ecology", Color::rgb(0x43, 0x61, 0xee)),
			("Microbiology", Color::rgb(0xfb, 0x85, 0x00)),
			("Phycology", Color::rgb(0x38, 0xb0, 0x00)),
			("Oceanography", Color::rgb(0x3a, 0x86, 0xff)),
			("Processes", Color::rgb(0x43, 0x61, 0xee)),
			("Symbiosis", Color::rgb(0xff, 0x9f, 0x1c)),
			("Applications", Color::rgb(0xef, 0x47, 0x6f)),
			("Conservation", Color::rgb(0xef, 0x47, 0x6f)),
			("Methods", Color::rgb(0xff, 0xa5, 0x00)),
		]
		.into_iter()
		.map(|(k, v)| (k.to_string(), v))
		.collect();
		Self::new(colors)
	}

	pub fn color_of(&self, category: &str) -> Color {
		self.colors.get(category).copied().unwrap_or(self.fallback)
	}

	/// Legend entries in declaration order.
	pub fn legend(&self) -> impl Iterator<Item = (&str, Color)> {
		self.colors.iter().map(|(k, v)| (k.as_str(), *v))
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}
}

impl Default for CategoryPalette {
	fn default() -> Self {
		Self::marine()
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Top of the vertical gradient
	pub color_top: Color,
	/// Bottom of the vertical gradient
	pub color_bottom: Color,
}

/// Base line styles, before any highlight is applied.
#[derive(Clone, Debug)]
pub struct LineStyle {
	/// Cluster-to-cluster links
	pub cluster_link: Color,
	pub cluster_link_width: f64,
	pub cluster_link_opacity: f64,
	/// Leaf-to-leaf links, drawn dashed
	pub leaf_link: Color,
	pub leaf_link_width: f64,
	pub leaf_link_opacity: f64,
	pub leaf_link_dash: (f64, f64),
	/// Parent-to-leaf lines take the leaf's category color
	pub membership_width: f64,
	pub membership_opacity: f64,
}

/// Node fill and label style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether to use a radial gradient fill
	pub use_gradient: bool,
	pub label_color: Color,
	/// Label font size for large topics, in pixels
	pub label_size_large: f64,
	/// Label font size for medium and small topics, in pixels
	pub label_size_small: f64,
	/// Ring drawn around the selected node
	pub ring_color: Color,
	pub ring_width: f64,
	pub ring_offset: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub line: LineStyle,
	pub node: NodeStyle,
}

impl Theme {
	/// Deep ocean theme (default)
	pub fn ocean() -> Self {
		Self {
			background: BackgroundStyle {
				color_top: Color::rgb(30, 58, 138),
				color_bottom: Color::rgb(23, 37, 84),
			},
			line: LineStyle {
				cluster_link: Color::rgb(255, 255, 255),
				cluster_link_width: 1.5,
				cluster_link_opacity: 0.4,
				leaf_link: Color::rgb(255, 255, 255),
				leaf_link_width: 1.0,
				leaf_link_opacity: 0.5,
				leaf_link_dash: (3.0, 3.0),
				membership_width: 2.0,
				membership_opacity: 0.7,
			},
			node: NodeStyle {
				use_gradient: true,
				label_color: Color::rgb(255, 255, 255),
				label_size_large: 16.0,
				label_size_small: 13.0,
				ring_color: Color::rgb(255, 255, 255),
				ring_width: 2.0,
				ring_offset: 3.0,
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::ocean()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_and_functional_colors() {
		assert_eq!(Color::parse("#2a9d8f"), Some(Color::rgb(42, 157, 143)));
		assert_eq!(Color::parse("#fff"), Some(Color::rgb(255, 255, 255)));
		assert_eq!(Color::parse("rgb(1, 2, 3)"), Some(Color::rgb(1, 2, 3)));
		assert_eq!(
			Color::parse("rgba(10, 20, 30, 0.5)"),
			Some(Color::rgba(10, 20, 30, 0.5))
		);
		assert_eq!(Color::parse("#12345"), None);
		assert_eq!(Color::parse("teal"), None);
	}

	#[test]
	fn unknown_category_uses_default_color() {
		let palette = CategoryPalette::marine();
		assert_eq!(palette.color_of("Methods"), Color::rgb(0xff, 0xa5, 0x00));
		assert_eq!(palette.color_of("Astrology"), DEFAULT_CATEGORY_COLOR);
		assert_eq!(palette.color_of(""), DEFAULT_CATEGORY_COLOR);
	}

	#[test]
	fn css_palette_keeps_order_and_tolerates_bad_entries() {
		let mut entries = IndexMap::new();
		entries.insert("B".to_string(), "#000000".to_string());
		entries.insert("A".to_string(), "not a color".to_string());
		let palette = CategoryPalette::from_css(&entries);
		let legend: Vec<_> = palette.legend().collect();
		assert_eq!(
			legend,
			[("B", Color::rgb(0, 0, 0)), ("A", DEFAULT_CATEGORY_COLOR)]
		);
	}

	#[test]
	fn css_output_round_trips_opaque_colors() {
		assert_eq!(Color::rgb(0x21, 0x9e, 0xbc).to_css(), "#219ebc");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}
}
