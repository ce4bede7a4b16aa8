//! Tuning parameters for the sticker field.
//!
//! Every hand-picked constant of the animation lives in [`FieldConfig`] so a
//! host page can override any of it from embedded JSON; [`Default`] carries
//! the shipped values. None of these are physical quantities — they are
//! tuned for aesthetic effect.

use std::f64::consts::PI;

use serde::Deserialize;

/// Directional bias added to the sampled flow angle.
///
/// `Flowfield` leaves the field unbiased (free drift). The cardinal variants
/// push the whole field in one direction and also align sticker rotation to
/// the flow angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
	/// Unbiased free drift.
	#[default]
	Flowfield,
	Up,
	Down,
	Left,
	Right,
}

impl FlowDirection {
	/// Bias angle in radians, added to the sampled noise angle.
	pub fn bias_angle(self) -> f64 {
		match self {
			FlowDirection::Flowfield | FlowDirection::Right => 0.0,
			FlowDirection::Down => PI / 2.0,
			FlowDirection::Up => -PI / 2.0,
			FlowDirection::Left => PI,
		}
	}

	/// Whether sticker rotation locks to the flow direction.
	pub fn is_biased(self) -> bool {
		self != FlowDirection::Flowfield
	}
}

/// Complete configuration for one sticker field instance.
///
/// Deserializes from partial JSON: absent fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	/// Fill colors for procedural stickers, as CSS color strings.
	pub palette: Vec<String>,
	/// Outline stroke width for procedural stickers, in px.
	pub outline_px: f64,
	/// Bounding box a sticker is scaled to fit, in px.
	pub sticker_size: f64,
	/// Minimum spacing below which particles repel each other, in px.
	pub particle_padding: f64,
	/// Particles per square pixel of canvas.
	pub density: f64,
	/// Spatial frequency of the noise field.
	pub noise_scale: f64,
	/// Advance of the noise time axis per tick.
	pub noise_speed: f64,
	/// Velocity decay factor per tick; below 1.
	pub drag: f64,
	/// Flow influence on velocity per tick.
	pub accel: f64,
	/// Velocity magnitude cap, px per tick.
	pub max_vel: f64,
	/// Background fill alpha (0-255); lower values leave longer trails.
	pub trail_alpha: f64,
	/// Whether pointer attraction is applied at all.
	pub mouse_enabled: bool,
	/// Pointer attraction radius, in px.
	pub mouse_radius: f64,
	/// Pointer attraction strength at zero distance.
	pub mouse_force: f64,
	/// Falloff exponent of the pointer attraction.
	pub mouse_exp: f64,
	/// Directional bias of the flow.
	pub flow_direction: FlowDirection,
	/// Sticker image assets, resolved relative to the host page.
	pub sticker_urls: Vec<String>,
	/// When false (or the list is empty), procedural shapes are used.
	pub use_sticker_images: bool,
	/// Reduced-motion preference: thins the field and slows the drift.
	pub reduced_motion: bool,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			palette: vec![
				"#ffd400".into(),
				"#ff3d77".into(),
				"#2dd4bf".into(),
				"#6366f1".into(),
			],
			outline_px: 5.0,
			sticker_size: 80.0,
			particle_padding: 100.0,
			density: 0.00008,
			noise_scale: 0.007,
			noise_speed: 0.0025,
			drag: 0.90,
			accel: 0.07,
			max_vel: 1.6,
			trail_alpha: 200.0,
			mouse_enabled: true,
			mouse_radius: 240.0,
			mouse_force: 0.35,
			mouse_exp: 1.5,
			flow_direction: FlowDirection::Up,
			sticker_urls: vec![
				"assets/stickers/union-1.png".into(),
				"assets/stickers/ellipse-6.png".into(),
				"assets/stickers/polygon-2.png".into(),
				"assets/stickers/star-4.png".into(),
				"assets/stickers/star-5.png".into(),
				"assets/stickers/star-6.png".into(),
				"assets/stickers/union-2.png".into(),
				"assets/stickers/union-3.png".into(),
				"assets/stickers/union.png".into(),
				"assets/stickers/vector-1.png".into(),
				"assets/stickers/vector.png".into(),
				"assets/stickers/flower.png".into(),
				"assets/stickers/flower-1.png".into(),
				"assets/stickers/flower-2.png".into(),
			],
			use_sticker_images: true,
			reduced_motion: false,
		}
	}
}

impl FieldConfig {
	/// Density multiplier applied to the particle count target.
	pub fn density_scale(&self) -> f64 {
		if self.reduced_motion { 0.6 } else { 1.0 }
	}

	/// Noise time advance per running tick.
	pub fn noise_advance(&self) -> f64 {
		if self.reduced_motion {
			self.noise_speed * 0.5
		} else {
			self.noise_speed
		}
	}
}

/// Whether the platform reports a reduced-motion preference.
///
/// Returns false outside a browser context or when the query fails.
pub fn prefers_reduced_motion() -> bool {
	web_sys::window()
		.and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok())
		.flatten()
		.map(|list| list.matches())
		.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_shipped_tuning() {
		let cfg = FieldConfig::default();
		assert_eq!(cfg.density, 0.00008);
		assert_eq!(cfg.drag, 0.90);
		assert_eq!(cfg.max_vel, 1.6);
		assert_eq!(cfg.flow_direction, FlowDirection::Up);
		assert_eq!(cfg.palette.len(), 4);
		assert_eq!(cfg.sticker_urls.len(), 14);
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let cfg: FieldConfig =
			serde_json::from_str(r#"{ "density": 0.0002, "flow_direction": "left" }"#)
				.expect("partial config should parse");
		assert_eq!(cfg.density, 0.0002);
		assert_eq!(cfg.flow_direction, FlowDirection::Left);
		assert_eq!(cfg.max_vel, FieldConfig::default().max_vel);
	}

	#[test]
	fn bias_angles() {
		assert_eq!(FlowDirection::Flowfield.bias_angle(), 0.0);
		assert_eq!(FlowDirection::Right.bias_angle(), 0.0);
		assert_eq!(FlowDirection::Down.bias_angle(), PI / 2.0);
		assert_eq!(FlowDirection::Up.bias_angle(), -PI / 2.0);
		assert_eq!(FlowDirection::Left.bias_angle(), PI);
		assert!(!FlowDirection::Flowfield.is_biased());
		assert!(FlowDirection::Up.is_biased());
	}

	#[test]
	fn reduced_motion_scales() {
		let mut cfg = FieldConfig::default();
		assert_eq!(cfg.density_scale(), 1.0);
		assert_eq!(cfg.noise_advance(), cfg.noise_speed);
		cfg.reduced_motion = true;
		assert_eq!(cfg.density_scale(), 0.6);
		assert_eq!(cfg.noise_advance(), cfg.noise_speed * 0.5);
	}
}
