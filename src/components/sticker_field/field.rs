//! Flowfield particle simulation.
//!
//! A [`ParticleField`] owns the particle list, the Perlin noise generator
//! behind the direction field, and a seeded RNG for jitter and respawns.
//! Created once when the component mounts, then stepped by the animation
//! loop whenever the lifecycle controller says the field is running.
//!
//! One call to [`ParticleField::step`] is one tick: velocities integrate
//! flow, pointer attraction and pairwise repulsion, get clamped, positions
//! advance and wrap toroidally. The repulsion pass reads a snapshot of all
//! positions taken at the start of the tick, so the result does not depend
//! on iteration order.

use std::f64::consts::TAU;

use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::config::FieldConfig;

/// Uniform per-axis velocity jitter added every tick.
const JITTER: f64 = 0.07;
/// Strength of the pairwise repulsion at zero distance.
const REPULSION: f64 = 0.12;
/// How long pointer attraction stays suppressed after a reset, in ms.
const POINTER_COOLDOWN_MS: f64 = 600.0;
/// Lower bound on the particle count regardless of canvas area.
const MIN_PARTICLES: usize = 12;
/// Noise z-axis offset between consecutive particles, decorrelating their
/// flow angles.
const NOISE_SLICE_OFFSET: f64 = 100.0;
/// Squared-distance floor below which force terms are zeroed.
const EPS2: f64 = 1e-6;

/// A single drifting sticker.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Rotation in radians.
	pub rot: f64,
	/// Index into the shared sticker set.
	pub sticker: usize,
}

/// The particle simulation: positions, velocities, and the noise clock.
pub struct ParticleField {
	pub particles: Vec<Particle>,
	config: FieldConfig,
	width: f64,
	height: f64,
	noise: Perlin,
	rng: SmallRng,
	field_time: f64,
	sticker_count: usize,
	cooldown_until: f64,
}

impl ParticleField {
	/// Creates a field sized to the canvas and populates it to the density
	/// target. `sticker_count` is the size of the shared sticker set the
	/// particles index into.
	pub fn new(
		config: FieldConfig,
		width: f64,
		height: f64,
		sticker_count: usize,
		seed: u64,
	) -> Self {
		let mut field = Self {
			particles: Vec::new(),
			config,
			width,
			height,
			noise: Perlin::new(seed as u32),
			rng: SmallRng::seed_from_u64(seed),
			field_time: 0.0,
			sticker_count,
			cooldown_until: 0.0,
		};
		field.adjust_count(width, height);
		field
	}

	/// Current noise time.
	pub fn field_time(&self) -> f64 {
		self.field_time
	}

	/// The configuration this field was built with.
	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	/// Canvas extent the field currently simulates over.
	pub fn extent(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Whether pointer attraction is still suppressed at `now_ms`.
	pub fn pointer_suppressed(&self, now_ms: f64) -> bool {
		now_ms < self.cooldown_until
	}

	/// Particle count target for a canvas of the given size.
	pub fn target_count(&self, width: f64, height: f64) -> usize {
		let raw = (width * height * self.config.density * self.config.density_scale()).round();
		(raw as usize).max(MIN_PARTICLES)
	}

	/// Resizes the field and grows/shrinks the particle list to the new
	/// target. Surviving particles keep their state; growth spawns fresh
	/// particles, shrinking truncates.
	pub fn adjust_count(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		let target = self.target_count(width, height);
		while self.particles.len() < target {
			let p = self.make_particle();
			self.particles.push(p);
		}
		self.particles.truncate(target);
	}

	/// Reseeds the noise field, zeroes the noise clock, respawns every
	/// particle, and starts the pointer cooldown.
	pub fn reset(&mut self, seed: u64, now_ms: f64) {
		self.noise = Perlin::new(seed as u32);
		self.field_time = 0.0;
		for i in 0..self.particles.len() {
			let fresh = self.make_particle();
			self.particles[i] = fresh;
		}
		self.cooldown_until = now_ms + POINTER_COOLDOWN_MS;
	}

	/// Advances the simulation by one tick.
	///
	/// `pointer` is the current pointer position in canvas space, if one is
	/// active over the canvas. `now_ms` only gates the post-reset cooldown.
	pub fn step(&mut self, pointer: Option<(f64, f64)>, now_ms: f64) {
		self.field_time += self.config.noise_advance();

		let pointer = if self.config.mouse_enabled && !self.pointer_suppressed(now_ms) {
			pointer
		} else {
			None
		};

		// Positions frozen at tick start; the repulsion pass below reads
		// these, never the already-advanced neighbors.
		let snapshot: Vec<(f64, f64)> = self.particles.iter().map(|p| (p.x, p.y)).collect();

		let margin = self.config.sticker_size * 0.5;
		let field_time = self.field_time;
		let Self {
			particles,
			config,
			noise,
			rng,
			width,
			height,
			..
		} = self;

		for (i, p) in particles.iter_mut().enumerate() {
			let n = noise.get([
				p.x * config.noise_scale,
				p.y * config.noise_scale,
				field_time + i as f64 * NOISE_SLICE_OFFSET,
			]);
			let angle = (n + 1.0) * 0.5 * TAU + config.flow_direction.bias_angle();
			let (ax, ay) = (angle.cos(), angle.sin());

			p.vx = config.drag * p.vx + config.accel * ax + rng.gen_range(-JITTER..JITTER);
			p.vy = config.drag * p.vy + config.accel * ay + rng.gen_range(-JITTER..JITTER);

			if let Some((mx, my)) = pointer {
				let (fx, fy) = attraction(
					mx - p.x,
					my - p.y,
					config.mouse_radius,
					config.mouse_force,
					config.mouse_exp,
				);
				p.vx += fx;
				p.vy += fy;
			}

			for (j, &(ox, oy)) in snapshot.iter().enumerate() {
				if i == j {
					continue;
				}
				let (fx, fy) = repulsion(p.x - ox, p.y - oy, config.particle_padding);
				p.vx += fx;
				p.vy += fy;
			}

			let (vx, vy) = clamp_speed(p.vx, p.vy, config.max_vel);
			p.vx = vx;
			p.vy = vy;

			p.x += p.vx;
			p.y += p.vy;

			p.rot = if config.flow_direction.is_biased() {
				ay.atan2(ax)
			} else {
				angle
			};

			p.x = wrap(p.x, *width, margin);
			p.y = wrap(p.y, *height, margin);
		}
	}

	fn make_particle(&mut self) -> Particle {
		let x = random_span(&mut self.rng, self.width);
		let y = random_span(&mut self.rng, self.height);
		let rot = self.rng.gen_range(0.0..TAU);
		let sticker = if self.sticker_count > 0 {
			self.rng.gen_range(0..self.sticker_count)
		} else {
			0
		};
		Particle {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			rot,
			sticker,
		}
	}
}

/// Pointer attraction force for a particle offset `(dx, dy)` from the
/// pointer. Zero outside `radius` and at near-zero distance.
fn attraction(dx: f64, dy: f64, radius: f64, force: f64, exp: f64) -> (f64, f64) {
	let d2 = dx * dx + dy * dy;
	if d2 >= radius * radius || d2 <= EPS2 {
		return (0.0, 0.0);
	}
	let d = d2.sqrt();
	let falloff = 1.0 - (d / radius).powf(exp);
	((dx / d) * force * falloff, (dy / d) * force * falloff)
}

/// Soft spacing force along the separation vector `(dx, dy)`. Zero at and
/// beyond `padding`, and for coincident particles.
fn repulsion(dx: f64, dy: f64, padding: f64) -> (f64, f64) {
	let d2 = dx * dx + dy * dy;
	if d2 >= padding * padding || d2 <= EPS2 {
		return (0.0, 0.0);
	}
	let d = d2.sqrt();
	let force = REPULSION * (1.0 - d / padding);
	((dx / d) * force, (dy / d) * force)
}

/// Caps the speed at `max`, preserving direction.
fn clamp_speed(vx: f64, vy: f64, max: f64) -> (f64, f64) {
	let speed = (vx * vx + vy * vy).sqrt();
	if speed > max && speed > 0.0 {
		let s = max / speed;
		(vx * s, vy * s)
	} else {
		(vx, vy)
	}
}

/// Toroidal wrap of one coordinate over `[-margin, extent + margin]`.
fn wrap(v: f64, extent: f64, margin: f64) -> f64 {
	if v < -margin {
		extent + margin
	} else if v > extent + margin {
		-margin
	} else {
		v
	}
}

fn random_span(rng: &mut SmallRng, extent: f64) -> f64 {
	if extent > 0.0 {
		rng.gen_range(0.0..extent)
	} else {
		0.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn field(width: f64, height: f64) -> ParticleField {
		ParticleField::new(FieldConfig::default(), width, height, 8, 42)
	}

	#[test]
	fn target_count_matches_density_formula() {
		let f = field(800.0, 600.0);
		// 800 * 600 * 0.00008 = 38.4 -> 38
		assert_eq!(f.target_count(800.0, 600.0), 38);
		assert_eq!(f.particles.len(), 38);
	}

	#[test]
	fn target_count_floors_at_minimum() {
		let f = field(100.0, 100.0);
		assert_eq!(f.target_count(100.0, 100.0), 12);
	}

	#[test]
	fn reduced_motion_thins_the_field() {
		let mut cfg = FieldConfig::default();
		cfg.reduced_motion = true;
		let f = ParticleField::new(cfg, 800.0, 600.0, 8, 42);
		// 38.4 * 0.6 = 23.04 -> 23
		assert_eq!(f.target_count(800.0, 600.0), 23);
	}

	#[test]
	fn adjust_count_preserves_survivors() {
		let mut f = field(800.0, 600.0);
		for _ in 0..5 {
			f.step(None, 0.0);
		}
		let before = f.particles.clone();

		// Shrink: survivors are an untouched prefix.
		f.adjust_count(400.0, 300.0);
		assert_eq!(f.particles.len(), 12);
		assert_eq!(&before[..12], &f.particles[..]);

		// Grow: the prefix still survives, new particles fill the rest.
		f.adjust_count(1600.0, 900.0);
		assert_eq!(f.particles.len(), f.target_count(1600.0, 900.0));
		assert_eq!(&before[..12], &f.particles[..12]);
	}

	#[test]
	fn speed_stays_clamped() {
		let mut f = field(800.0, 600.0);
		for tick in 0..120 {
			f.step(Some((400.0, 300.0)), 1000.0 + tick as f64 * 16.0);
			for p in &f.particles {
				let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
				assert!(
					speed <= f.config.max_vel + 1e-9,
					"speed {speed} exceeds cap at tick {tick}"
				);
			}
		}
	}

	#[test]
	fn positions_stay_within_wrap_bounds() {
		let mut f = field(300.0, 200.0);
		let half = f.config.sticker_size * 0.5;
		for _ in 0..500 {
			f.step(None, 0.0);
			for p in &f.particles {
				assert!(
					p.x >= -half && p.x <= 300.0 + half,
					"x {} outside wrap bounds",
					p.x
				);
				assert!(
					p.y >= -half && p.y <= 200.0 + half,
					"y {} outside wrap bounds",
					p.y
				);
			}
		}
	}

	#[test]
	fn wrap_is_toroidal() {
		assert_eq!(wrap(-41.0, 800.0, 40.0), 840.0);
		assert_eq!(wrap(841.0, 800.0, 40.0), -40.0);
		assert_eq!(wrap(400.0, 800.0, 40.0), 400.0);
	}

	#[test]
	fn reset_zeroes_time_and_velocities() {
		let mut f = field(800.0, 600.0);
		for _ in 0..50 {
			f.step(None, 0.0);
		}
		assert!(f.field_time() > 0.0);

		f.reset(7, 10_000.0);
		assert_eq!(f.field_time(), 0.0);
		for p in &f.particles {
			assert_eq!((p.vx, p.vy), (0.0, 0.0));
			assert!(p.x >= 0.0 && p.x < 800.0, "x {} outside canvas", p.x);
			assert!(p.y >= 0.0 && p.y < 600.0, "y {} outside canvas", p.y);
			assert!(p.sticker < 8);
		}
	}

	#[test]
	fn reset_suppresses_pointer_for_cooldown() {
		let mut f = field(800.0, 600.0);
		f.reset(7, 10_000.0);
		assert!(f.pointer_suppressed(10_000.0));
		assert!(f.pointer_suppressed(10_599.0));
		assert!(!f.pointer_suppressed(10_600.0));
	}

	#[test]
	fn empty_field_steps_without_panicking() {
		let mut f = field(800.0, 600.0);
		f.particles.clear();
		f.step(Some((10.0, 10.0)), 0.0);
		assert!(f.particles.is_empty());
		assert!(f.field_time() > 0.0);
	}

	#[test]
	fn attraction_zero_at_pointer_position() {
		assert_eq!(attraction(0.0, 0.0, 240.0, 0.35, 1.5), (0.0, 0.0));
	}

	#[test]
	fn attraction_zero_at_and_beyond_radius() {
		assert_eq!(attraction(240.0, 0.0, 240.0, 0.35, 1.5), (0.0, 0.0));
		assert_eq!(attraction(500.0, 0.0, 240.0, 0.35, 1.5), (0.0, 0.0));
	}

	#[test]
	fn attraction_pulls_toward_pointer_inside_radius() {
		let (fx, fy) = attraction(100.0, 0.0, 240.0, 0.35, 1.5);
		assert!(fx > 0.0, "should pull along +x, got {fx}");
		assert_eq!(fy, 0.0);
	}

	#[test]
	fn repulsion_zero_at_exact_padding() {
		assert_eq!(repulsion(100.0, 0.0, 100.0), (0.0, 0.0));
	}

	#[test]
	fn repulsion_pushes_apart_inside_padding() {
		let (fx, fy) = repulsion(50.0, 0.0, 100.0);
		assert!(fx > 0.0, "separation along +x should push +x, got {fx}");
		assert_eq!(fy, 0.0);
		assert!((fx - REPULSION * 0.5).abs() < 1e-12);
	}

	#[test]
	fn repulsion_zero_for_coincident_particles() {
		assert_eq!(repulsion(0.0, 0.0, 100.0), (0.0, 0.0));
	}

	#[test]
	fn clamp_preserves_direction() {
		let (vx, vy) = clamp_speed(3.0, 4.0, 1.6);
		let speed = (vx * vx + vy * vy).sqrt();
		assert!((speed - 1.6).abs() < 1e-12);
		assert!((vy / vx - 4.0 / 3.0).abs() < 1e-12);

		let (vx, vy) = clamp_speed(0.3, 0.4, 1.6);
		assert_eq!((vx, vy), (0.3, 0.4));
	}
}
