//! Sticker providers: the shapes particles are drawn as.
//!
//! A [`Sticker`] knows its pixel dimensions and how to draw itself centered
//! on the canvas origin, scaled to fit a bounding box. Two providers exist:
//! image-backed ([`ImageSticker`], the normal case) and procedural palette
//! shapes ([`ShapeSticker`], the fallback when no images are configured or
//! their elements cannot be created).

use std::f64::consts::TAU;

use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::config::FieldConfig;
use super::theme::{Color, Theme};

/// A drawable sticker shape.
pub trait Sticker {
	/// Native width in pixels.
	fn width(&self) -> f64;
	/// Native height in pixels.
	fn height(&self) -> f64;
	/// Draws the sticker centered on the origin, scaled to fit a `size`
	/// bounding box with aspect ratio preserved. The caller has already
	/// translated/rotated the context.
	fn draw(&self, ctx: &CanvasRenderingContext2d, size: f64);
}

/// Scales `(width, height)` to fit a square `target` box, preserving aspect
/// ratio. Zero or unknown dimensions (an image element that has not loaded
/// yet) fall back to the target itself.
pub fn fit_size(width: f64, height: f64, target: f64) -> (f64, f64) {
	let w = if width > 0.0 { width } else { target };
	let h = if height > 0.0 { height } else { target };
	let ratio = w / h;
	if ratio >= 1.0 {
		(target, target / ratio)
	} else {
		(target * ratio, target)
	}
}

/// A sticker backed by a loaded image element.
pub struct ImageSticker {
	image: HtmlImageElement,
}

impl Sticker for ImageSticker {
	fn width(&self) -> f64 {
		self.image.natural_width() as f64
	}

	fn height(&self) -> f64 {
		self.image.natural_height() as f64
	}

	fn draw(&self, ctx: &CanvasRenderingContext2d, size: f64) {
		let (w, h) = fit_size(self.width(), self.height(), size);
		let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
			&self.image,
			-w / 2.0,
			-h / 2.0,
			w,
			h,
		);
	}
}

/// Procedural sticker geometry.
#[derive(Clone, Copy, Debug)]
pub enum Shape {
	Circle,
	Triangle,
	Diamond,
	/// A star with the given number of points.
	Star(u32),
	/// A flower with the given number of petals.
	Flower(u32),
}

/// A flat palette shape with an outline, drawn from canvas paths.
pub struct ShapeSticker {
	shape: Shape,
	fill: Color,
	outline: Color,
	outline_width: f64,
	size: f64,
}

impl Sticker for ShapeSticker {
	fn width(&self) -> f64 {
		self.size
	}

	fn height(&self) -> f64 {
		self.size
	}

	fn draw(&self, ctx: &CanvasRenderingContext2d, size: f64) {
		// Keep the stroke inside the bounding box.
		let radius = (size - self.outline_width) * 0.5;
		ctx.set_fill_style_str(&self.fill.to_css());
		ctx.set_stroke_style_str(&self.outline.to_css());
		ctx.set_line_width(self.outline_width);
		ctx.set_line_join("round");

		match self.shape {
			Shape::Circle => {
				ctx.begin_path();
				let _ = ctx.arc(0.0, 0.0, radius, 0.0, TAU);
				ctx.fill();
				ctx.stroke();
			}
			Shape::Triangle => {
				trace_polygon(ctx, &ring_points(3, radius));
				ctx.fill();
				ctx.stroke();
			}
			Shape::Diamond => {
				trace_polygon(ctx, &ring_points(4, radius));
				ctx.fill();
				ctx.stroke();
			}
			Shape::Star(points) => {
				trace_polygon(ctx, &star_points(points, radius, radius * 0.45));
				ctx.fill();
				ctx.stroke();
			}
			Shape::Flower(petals) => {
				let petal_radius = radius * 0.42;
				for (px, py) in ring_points(petals, radius - petal_radius) {
					ctx.begin_path();
					let _ = ctx.arc(px, py, petal_radius, 0.0, TAU);
					ctx.fill();
					ctx.stroke();
				}
				ctx.begin_path();
				let _ = ctx.arc(0.0, 0.0, radius * 0.45, 0.0, TAU);
				ctx.fill();
				ctx.stroke();
			}
		}
	}
}

/// Vertices of a regular `n`-gon of the given radius, first vertex up.
fn ring_points(n: u32, radius: f64) -> Vec<(f64, f64)> {
	(0..n)
		.map(|i| {
			let angle = i as f64 / n as f64 * TAU - TAU / 4.0;
			(radius * angle.cos(), radius * angle.sin())
		})
		.collect()
}

/// Alternating outer/inner vertices of an `n`-pointed star, first point up.
fn star_points(n: u32, outer: f64, inner: f64) -> Vec<(f64, f64)> {
	(0..n * 2)
		.map(|i| {
			let angle = i as f64 / (n * 2) as f64 * TAU - TAU / 4.0;
			let r = if i % 2 == 0 { outer } else { inner };
			(r * angle.cos(), r * angle.sin())
		})
		.collect()
}

fn trace_polygon(ctx: &CanvasRenderingContext2d, points: &[(f64, f64)]) {
	ctx.begin_path();
	if let Some(&(x, y)) = points.first() {
		ctx.move_to(x, y);
		for &(x, y) in &points[1..] {
			ctx.line_to(x, y);
		}
	}
	ctx.close_path();
}

/// The shared, read-only set of stickers particles index into.
pub struct StickerSet {
	stickers: Vec<Box<dyn Sticker>>,
}

impl StickerSet {
	/// Builds the set the configuration asks for: image stickers when
	/// enabled and available, procedural palette shapes otherwise.
	pub fn from_config(config: &FieldConfig, theme: &Theme) -> Self {
		if config.use_sticker_images && !config.sticker_urls.is_empty() {
			match Self::from_images(&config.sticker_urls) {
				Ok(set) => return set,
				Err(err) => {
					warn!("sticker-field: image stickers unavailable ({err:?}), using shapes");
				}
			}
		}
		Self::procedural(config, theme)
	}

	/// Creates one image-backed sticker per URL. The elements load
	/// asynchronously; until they do, [`fit_size`] treats them as square.
	pub fn from_images(urls: &[String]) -> Result<Self, JsValue> {
		let mut stickers: Vec<Box<dyn Sticker>> = Vec::with_capacity(urls.len());
		for url in urls {
			let image = HtmlImageElement::new()?;
			image.set_src(url);
			stickers.push(Box::new(ImageSticker { image }));
		}
		Ok(Self { stickers })
	}

	/// Generates the placeholder set: every shape in every palette color.
	pub fn procedural(config: &FieldConfig, theme: &Theme) -> Self {
		const SHAPES: [Shape; 6] = [
			Shape::Circle,
			Shape::Triangle,
			Shape::Diamond,
			Shape::Star(4),
			Shape::Star(5),
			Shape::Flower(6),
		];
		let mut stickers: Vec<Box<dyn Sticker>> = Vec::new();
		for color in &config.palette {
			let fill = Color::parse(color);
			for shape in SHAPES {
				stickers.push(Box::new(ShapeSticker {
					shape,
					fill,
					outline: theme.ink,
					outline_width: config.outline_px,
					size: config.sticker_size,
				}));
			}
		}
		Self { stickers }
	}

	pub fn len(&self) -> usize {
		self.stickers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stickers.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&dyn Sticker> {
		self.stickers.get(index).map(|s| s.as_ref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fit_size_caps_the_long_edge() {
		assert_eq!(fit_size(200.0, 100.0, 80.0), (80.0, 40.0));
		assert_eq!(fit_size(100.0, 200.0, 80.0), (40.0, 80.0));
		assert_eq!(fit_size(64.0, 64.0, 80.0), (80.0, 80.0));
	}

	#[test]
	fn fit_size_tolerates_unloaded_images() {
		assert_eq!(fit_size(0.0, 0.0, 80.0), (80.0, 80.0));
		assert_eq!(fit_size(0.0, 100.0, 80.0), (64.0, 80.0));
	}

	#[test]
	fn ring_points_lie_on_the_radius() {
		for (x, y) in ring_points(5, 30.0) {
			let r = (x * x + y * y).sqrt();
			assert!((r - 30.0).abs() < 1e-9, "vertex radius {r}");
		}
	}

	#[test]
	fn star_points_alternate_radii() {
		let pts = star_points(5, 30.0, 13.5);
		assert_eq!(pts.len(), 10);
		for (i, (x, y)) in pts.iter().enumerate() {
			let r = (x * x + y * y).sqrt();
			let expected = if i % 2 == 0 { 30.0 } else { 13.5 };
			assert!((r - expected).abs() < 1e-9, "vertex {i} radius {r}");
		}
	}
}
