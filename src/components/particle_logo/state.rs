//! Particle field state.
//!
//! Owns everything the frame loop mutates: the particles, the pointer, the
//! current canvas size and placement. Configuration is held by value and
//! never changes after construction.
//!
//! The field does not know where pixels come from. [`ParticleField::load`]
//! and [`ParticleField::resize`] take any [`PixelSource`], so the browser
//! host and native tests drive the same code.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::ParticleConfig;
use super::error::ParticleError;
use super::interaction::{Interaction, PointerState};
use super::particles::Particle;
use super::pixels::{PixelSource, sample_seeds};
use super::placement::Placement;

/// Where freshly built particles start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spawn {
	/// Anywhere on the canvas, so the image assembles itself.
	Scattered,
	/// Already in place. Used after a resize.
	AtDestination,
}

/// The running particle image.
pub struct ParticleField {
	config: ParticleConfig,
	width: u32,
	height: u32,
	placement: Option<Placement>,
	particles: Vec<Particle>,
	interactions: Vec<Interaction>,
	pointer: PointerState,
	rng: StdRng,
}

impl ParticleField {
	/// An empty field for a `width`x`height` canvas.
	pub fn new(config: ParticleConfig, width: u32, height: u32) -> Self {
		Self::with_rng(config, width, height, StdRng::from_entropy())
	}

	/// Same as [`new`](Self::new) with a fixed RNG seed.
	pub fn with_seed(config: ParticleConfig, width: u32, height: u32, seed: u64) -> Self {
		Self::with_rng(config, width, height, StdRng::seed_from_u64(seed))
	}

	fn with_rng(config: ParticleConfig, width: u32, height: u32, rng: StdRng) -> Self {
		Self {
			interactions: Interaction::enabled_set(&config.interactions),
			config,
			width,
			height,
			placement: None,
			particles: Vec::new(),
			pointer: PointerState::default(),
			rng,
		}
	}

	/// Configuration the field was built with.
	pub fn config(&self) -> &ParticleConfig {
		&self.config
	}

	/// Canvas size in pixels.
	pub fn size(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	/// Current image rectangle, `None` while empty.
	pub fn placement(&self) -> Option<&Placement> {
		self.placement.as_ref()
	}

	/// Particles in scan order.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Number of particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether there are no particles to draw.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Active interactions, in the order they are applied.
	pub fn interactions(&self) -> &[Interaction] {
		&self.interactions
	}

	/// Pointer as last reported by the host.
	pub fn pointer(&self) -> &PointerState {
		&self.pointer
	}

	/// First build from a freshly loaded image: particles fly in from
	/// random canvas positions. Returns the particle count.
	pub fn load(&mut self, source: &impl PixelSource) -> Result<usize, ParticleError> {
		self.rebuild(source, Spawn::Scattered)
	}

	/// Adopt a new canvas size and rebuild every particle in place.
	///
	/// Old particles are dropped, not moved. With no image loaded yet only
	/// the size is recorded.
	pub fn resize(
		&mut self,
		width: u32,
		height: u32,
		source: Option<&impl PixelSource>,
	) -> Result<usize, ParticleError> {
		self.width = width;
		self.height = height;
		match source {
			Some(source) => self.rebuild(source, Spawn::AtDestination),
			None => {
				self.clear();
				Ok(0)
			}
		}
	}

	/// Drop every particle and the placement.
	pub fn clear(&mut self) {
		self.particles.clear();
		self.placement = None;
	}

	/// Replace the particle set with one sampled from `source`.
	///
	/// On error the field is left empty.
	pub fn rebuild(&mut self, source: &impl PixelSource, spawn: Spawn) -> Result<usize, ParticleError> {
		self.clear();
		let (image_w, image_h) = source.natural_size();
		let placement = Placement::fit(
			self.width,
			self.height,
			image_w,
			image_h,
			&self.config.placement,
		)
		.ok_or(ParticleError::EmptyImage {
			image_w,
			image_h,
			canvas_w: self.width,
			canvas_h: self.height,
		})?;
		let pixels = source.sample(&placement)?;
		let seeds = sample_seeds(&pixels, &placement, &self.config.sampling);

		let (w, h) = (self.width as f64, self.height as f64);
		self.particles.reserve(seeds.len());
		for seed in &seeds {
			let start = match spawn {
				Spawn::Scattered => (self.rng.r#gen::<f64>() * w, self.rng.r#gen::<f64>() * h),
				Spawn::AtDestination => (seed.dest_x, seed.dest_y),
			};
			self.particles.push(Particle::spawn(
				seed,
				start,
				&self.config.particle,
				&self.config.restless,
				&mut self.rng,
			));
		}
		self.placement = Some(placement);

		debug!(
			"particle-logo: built {} particles in {}x{} at ({:.0}, {:.0}), {:?}",
			self.particles.len(),
			placement.width,
			placement.height,
			placement.x,
			placement.y,
			spawn
		);
		Ok(self.particles.len())
	}

	/// Advance every particle one frame, then apply the pointer fields.
	pub fn tick(&mut self) {
		let ParticleConfig {
			particle,
			restless,
			interactions,
			..
		} = &self.config;
		for p in &mut self.particles {
			p.step(particle, restless);
			for interaction in &self.interactions {
				interaction.apply(p, &self.pointer, interactions);
			}
		}
	}

	/// Pointer moved; `buttons` is the event's held-button bitmask.
	pub fn pointer_move(&mut self, x: f64, y: f64, buttons: u16) {
		self.pointer.track(x, y, buttons);
	}

	/// Pointer left the canvas.
	pub fn pointer_leave(&mut self) {
		self.pointer.leave();
	}

	/// Mouse button pressed at `(x, y)`.
	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.pointer.press(x, y);
	}

	/// Mouse button released, on or off the canvas.
	pub fn pointer_up(&mut self) {
		self.pointer.release();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{DynamicImage, Rgba, RgbaImage};

	/// 100x100 logo: left half opaque gold, right half transparent.
	fn half_logo() -> DynamicImage {
		DynamicImage::ImageRgba8(RgbaImage::from_fn(100, 100, |x, _| {
			if x < 50 {
				Rgba([212, 175, 55, 255])
			} else {
				Rgba([0, 0, 0, 0])
			}
		}))
	}

	fn field(width: u32, height: u32) -> ParticleField {
		ParticleField::with_seed(ParticleConfig::default(), width, height, 42)
	}

	#[test]
	fn load_scatters_particles_over_the_canvas() {
		let mut field = field(100, 100);
		let count = field.load(&half_logo()).unwrap();

		// Placement is clamped to 100x100 so the image is sampled 1:1.
		// Stride 4 over 50 opaque columns gives 13 columns of 25 rows.
		assert_eq!(count, 13 * 25);
		assert_eq!(field.len(), count);
		let moved = field
			.particles()
			.iter()
			.filter(|p| (p.x, p.y) != (p.dest_x, p.dest_y))
			.count();
		assert!(moved > count / 2);
		for p in field.particles() {
			assert!((0.0..100.0).contains(&p.x) && (0.0..100.0).contains(&p.y));
		}
	}

	#[test]
	fn destinations_lie_inside_the_placement() {
		let mut field = field(1280, 720);
		field.load(&half_logo()).unwrap();
		let placement = *field.placement().unwrap();
		for p in field.particles() {
			assert!(p.dest_x >= placement.x && p.dest_x < placement.x + placement.width as f64);
			assert!(p.dest_y >= placement.y && p.dest_y < placement.y + placement.height as f64);
		}
	}

	#[test]
	fn resize_rebuilds_at_destination() {
		let mut field = field(1280, 720);
		field.load(&half_logo()).unwrap();
		let before = field.len();

		let count = field.resize(400, 300, Some(&half_logo())).unwrap();
		assert_eq!(field.size(), (400, 300));
		assert_eq!(count, field.len());
		assert_ne!(count, before);
		assert!(
			field
				.particles()
				.iter()
				.all(|p| (p.x, p.y) == (p.dest_x, p.dest_y))
		);
	}

	#[test]
	fn zero_sized_canvas_leaves_field_empty() {
		let mut field = field(1280, 720);
		field.load(&half_logo()).unwrap();
		let err = field.resize(0, 720, Some(&half_logo())).unwrap_err();
		assert!(matches!(err, ParticleError::EmptyImage { canvas_w: 0, .. }));
		assert!(field.is_empty());
		assert!(field.placement().is_none());
	}

	#[test]
	fn resize_without_image_records_size_only() {
		let mut field = field(10, 10);
		assert_eq!(field.resize(300, 200, None::<&DynamicImage>).unwrap(), 0);
		assert_eq!(field.size(), (300, 200));
		assert!(field.is_empty());
	}

	#[test]
	fn hover_pushes_nearby_particles_away() {
		let mut field = field(1280, 720);
		field.load(&half_logo()).unwrap();
		field.resize(1280, 720, Some(&half_logo())).unwrap();

		for p in field.particles.iter_mut() {
			p.vx = 0.0;
			p.vy = 0.0;
		}
		let target = field.particles()[0].clone();
		field.pointer_move(target.x - 10.0, target.y, 0);
		field.tick();
		let pushed = &field.particles()[0];
		assert!(pushed.vx > 0.0, "particle right of the pointer moves right");

		field.pointer_leave();
		assert_eq!(field.pointer().position, None);
	}

	#[test]
	fn button_released_off_canvas_ends_click_field() {
		let mut field = field(800, 600);
		field.pointer_down(10.0, 10.0);
		field.pointer_leave();
		field.pointer_move(12.0, 10.0, 1);
		assert_eq!(field.pointer().click_anchor, Some((10.0, 10.0)));

		field.pointer_leave();
		field.pointer_move(12.0, 10.0, 0);
		assert_eq!(field.pointer().click_anchor, None);
		assert_eq!(field.pointer().position, Some((12.0, 10.0)));
	}

	#[test]
	fn ticking_without_pointer_keeps_settled_particles_still() {
		let mut field = field(800, 600);
		field.load(&half_logo()).unwrap();
		field.resize(800, 600, Some(&half_logo())).unwrap();
		for p in field.particles.iter_mut() {
			p.vx = 0.0;
			p.vy = 0.0;
		}
		field.tick();
		assert!(field.particles().iter().all(|p| p.x == p.dest_x && p.y == p.dest_y));
	}

	#[test]
	fn disabled_interactions_are_not_registered() {
		let mut config = ParticleConfig::default();
		config.interactions.click.enabled = false;
		let field = ParticleField::with_seed(config, 10, 10, 1);
		assert_eq!(field.interactions(), &[Interaction::HoverRepulse]);
	}
}
