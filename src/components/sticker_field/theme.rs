//! Colors for the sticker field.
//!
//! The canvas background, the outline ink for procedural stickers, and the
//! CSS color parsing used for the configured palette.

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

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation;
	/// anything else falls back to mid gray.
	pub fn parse(color_str: &str) -> Color {
		if color_str.starts_with('#') && color_str.len() == 7 {
			let r = u8::from_str_radix(&color_str[1..3], 16).unwrap_or(128);
			let g = u8::from_str_radix(&color_str[3..5], 16).unwrap_or(128);
			let b = u8::from_str_radix(&color_str[5..7], 16).unwrap_or(128);
			Color::rgb(r, g, b)
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.collect();
			let r = nums
				.first()
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(128);
			let g = nums
				.get(1)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(128);
			let b = nums
				.get(2)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(128);
			let a = nums
				.get(3)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(1.0);
			Color::rgba(r, g, b, a)
		} else {
			Color::rgb(128, 128, 128)
		}
	}
}

/// Fixed visual theme for the field: canvas background and outline ink.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Background fill; drawn each frame with the trail alpha applied.
	pub background: Color,
	/// Outline stroke for procedural stickers.
	pub ink: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(227, 223, 242),
			ink: Color::rgb(20, 18, 26),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_hex() {
		assert_eq!(Color::parse("#ffd400"), Color::rgb(255, 212, 0));
		assert_eq!(Color::parse("#2dd4bf"), Color::rgb(45, 212, 191));
	}

	#[test]
	fn parse_rgb_functional() {
		assert_eq!(Color::parse("rgb(1, 2, 3)"), Color::rgb(1, 2, 3));
		assert_eq!(Color::parse("rgba(1, 2, 3, 0.5)"), Color::rgba(1, 2, 3, 0.5));
	}

	#[test]
	fn parse_garbage_falls_back_to_gray() {
		assert_eq!(Color::parse("cornflowerblue"), Color::rgb(128, 128, 128));
	}

	#[test]
	fn to_css_opaque_is_hex() {
		assert_eq!(Color::rgb(255, 61, 119).to_css(), "#ff3d77");
	}

	#[test]
	fn to_css_translucent_is_rgba() {
		assert_eq!(
			Color::rgb(227, 223, 242).with_alpha(0.5).to_css(),
			"rgba(227, 223, 242, 0.5)"
		);
	}
}
