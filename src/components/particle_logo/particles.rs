//! Image particles and their per-frame motion.

use rand::Rng;

use super::color::Color;
use super::config::{ParticleStyle, RestlessConfig};
use super::pixels::Seed;

/// A particle counts as settled once it is this close to its destination...
const SETTLE_DISTANCE: f64 = 0.5;
/// ...and moving slower than this (pixels per frame).
const SETTLE_SPEED: f64 = 0.05;

/// Idle micro-motion state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Restlessness {
	/// Horizontal drift per frame while active.
	pub x_jitter: f64,
	/// Vertical drift per frame while active.
	pub y_jitter: f64,
	/// Jittering this frame instead of following the spring.
	pub active: bool,
}

/// One sampled source pixel, travelling towards its place in the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Current position.
	pub x: f64,
	/// See `x`.
	pub y: f64,
	/// Place in the image, fixed until the next rebuild.
	pub dest_x: f64,
	/// See `dest_x`.
	pub dest_y: f64,
	/// Velocity in pixels per frame.
	pub vx: f64,
	/// See `vx`.
	pub vy: f64,
	/// Last acceleration applied, spring or pointer.
	pub acc_x: f64,
	/// See `acc_x`.
	pub acc_y: f64,
	/// Velocity multiplier applied every frame, fixed at spawn.
	pub friction: f64,
	/// Fill color, sampled once.
	pub color: Color,
	/// Cell edge length in pixels.
	pub size: u32,
	/// Idle micro-motion.
	pub restless: Restlessness,
}

impl Particle {
	/// Create a particle at `start` heading for the seed's destination.
	pub fn spawn<R: Rng + ?Sized>(
		seed: &Seed,
		start: (f64, f64),
		style: &ParticleStyle,
		restless: &RestlessConfig,
		rng: &mut R,
	) -> Self {
		let friction = if style.friction_max > style.friction_min {
			rng.gen_range(style.friction_min..style.friction_max)
		} else {
			style.friction_min
		};
		let size_factor = if style.size_random {
			rng.r#gen::<f64>().max(0.5)
		} else {
			1.0
		};

		Self {
			x: start.0,
			y: start.1,
			dest_x: seed.dest_x,
			dest_y: seed.dest_y,
			vx: (rng.r#gen::<f64>() - 0.5) * style.speed,
			vy: (rng.r#gen::<f64>() - 0.5) * style.speed,
			acc_x: 0.0,
			acc_y: 0.0,
			friction,
			color: seed.color,
			size: (size_factor * style.size as f64).round() as u32,
			restless: jitter(restless.jitter, rng),
		}
	}

	/// Straight-line distance still to travel.
	pub fn distance_to_destination(&self) -> f64 {
		let (dx, dy) = (self.dest_x - self.x, self.dest_y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Velocity magnitude in pixels per frame.
	pub fn speed(&self) -> f64 {
		(self.vx * self.vx + self.vy * self.vy).sqrt()
	}

	/// Advance one frame, without pointer interaction.
	///
	/// Spring branch: `acc = (dest - pos) / divisor`, `vel = (vel + acc) * friction`,
	/// `pos += vel`. With restless motion enabled, a settled particle instead
	/// drifts by its fixed jitter each frame until it is `restless.value`
	/// pixels out, then springs back.
	pub fn step(&mut self, style: &ParticleStyle, restless: &RestlessConfig) {
		if restless.enabled && self.restless.active {
			self.x += self.restless.x_jitter;
			self.y += self.restless.y_jitter;
			if self.distance_to_destination() >= restless.value {
				self.restless.active = false;
			}
			return;
		}

		self.acc_x = (self.dest_x - self.x) / style.spring_divisor;
		self.acc_y = (self.dest_y - self.y) / style.spring_divisor;
		self.vx = (self.vx + self.acc_x) * self.friction;
		self.vy = (self.vy + self.acc_y) * self.friction;
		self.x += self.vx;
		self.y += self.vy;

		if restless.enabled
			&& self.distance_to_destination() < SETTLE_DISTANCE
			&& self.speed() < SETTLE_SPEED
		{
			self.restless.active = true;
		}
	}
}

/// Per-axis jitter in `-max..=max`, never `(0, 0)` unless `max` is 0.
fn jitter<R: Rng + ?Sized>(max: i32, rng: &mut R) -> Restlessness {
	let max = max.abs();
	if max == 0 {
		return Restlessness::default();
	}
	loop {
		let (x, y) = (rng.gen_range(-max..=max), rng.gen_range(-max..=max));
		if x != 0 || y != 0 {
			return Restlessness {
				x_jitter: x as f64,
				y_jitter: y as f64,
				active: false,
			};
		}
	}
}
