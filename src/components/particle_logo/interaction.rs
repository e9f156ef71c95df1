//! Pointer tracking and the repulsion fields it drives.
//!
//! The set of interactions is finite: a gentle field that follows the
//! hovering pointer and a wider, stronger one that only exists while a mouse
//! button is held. Each is a tag in [`Interaction`]; the force itself is a
//! pure function looked up from the tag.

use super::config::{InteractionConfig, RepulseConfig};
use super::particles::Particle;

/// Pointer state as seen by the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
	/// Current pointer position, `None` while outside the canvas.
	pub position: Option<(f64, f64)>,
	/// Where the held button went down, `None` when no button is held.
	pub click_anchor: Option<(f64, f64)>,
}

impl PointerState {
	/// Pointer moved to `(x, y)`.
	pub fn move_to(&mut self, x: f64, y: f64) {
		self.position = Some((x, y));
	}

	/// Pointer moved with the `buttons` bitmask of a mouse event.
	///
	/// A button released outside the canvas never reports a `mouseup` to it,
	/// so a move with no button held also drops the click anchor.
	pub fn track(&mut self, x: f64, y: f64, buttons: u16) {
		self.move_to(x, y);
		if buttons == 0 {
			self.release();
		}
	}

	/// Pointer left the canvas. A held button stays held until released.
	pub fn leave(&mut self) {
		self.position = None;
	}

	/// Button went down at `(x, y)`.
	pub fn press(&mut self, x: f64, y: f64) {
		self.position = Some((x, y));
		self.click_anchor = Some((x, y));
	}

	/// Button came up, wherever the pointer is.
	pub fn release(&mut self) {
		self.click_anchor = None;
	}
}

/// Largest divisor, i.e. the weakest push (`strength` 0 or below).
const MAX_INV_STRENGTH: f64 = 300.0;
/// Smallest divisor, reached at `strength >= 290`.
const MIN_INV_STRENGTH: f64 = 10.0;

/// Velocity gain per pixel of offset for a given strength.
///
/// `1 / clamp(300 - strength, 10, 300)`: grows with strength and tops out
/// at `1/10`, so a maxed-out field can never divide by zero.
pub fn repulse_scale(strength: f64) -> f64 {
	1.0 / (MAX_INV_STRENGTH - strength).clamp(MIN_INV_STRENGTH, MAX_INV_STRENGTH)
}

/// Impulse pushing `point` away from `origin`, or `None` outside the radius.
pub fn repulse_impulse(
	point: (f64, f64),
	origin: (f64, f64),
	config: &RepulseConfig,
) -> Option<(f64, f64)> {
	let (dx, dy) = (point.0 - origin.0, point.1 - origin.1);
	if (dx * dx + dy * dy).sqrt() > config.distance {
		return None;
	}
	let scale = repulse_scale(config.strength);
	Some((dx * scale, dy * scale))
}

type ForceFn = fn(&Particle, &PointerState, &RepulseConfig) -> Option<(f64, f64)>;

fn hover_repulse(p: &Particle, pointer: &PointerState, config: &RepulseConfig) -> Option<(f64, f64)> {
	repulse_impulse((p.x, p.y), pointer.position?, config)
}

fn click_repulse(p: &Particle, pointer: &PointerState, config: &RepulseConfig) -> Option<(f64, f64)> {
	pointer.click_anchor?;
	repulse_impulse((p.x, p.y), pointer.position?, config)
}

/// A kind of pointer interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
	/// Follows the pointer while it is over the canvas.
	HoverRepulse,
	/// Active only while a mouse button is held.
	ClickRepulse,
}

impl Interaction {
	/// Enabled interactions, hover first.
	pub fn enabled_set(config: &InteractionConfig) -> Vec<Interaction> {
		let mut set = Vec::with_capacity(2);
		if config.hover.enabled {
			set.push(Interaction::HoverRepulse);
		}
		if config.click.enabled {
			set.push(Interaction::ClickRepulse);
		}
		set
	}

	fn force(self) -> ForceFn {
		match self {
			Interaction::HoverRepulse => hover_repulse,
			Interaction::ClickRepulse => click_repulse,
		}
	}

	fn preset(self, config: &InteractionConfig) -> &RepulseConfig {
		match self {
			Interaction::HoverRepulse => &config.hover,
			Interaction::ClickRepulse => &config.click,
		}
	}

	/// Push `p` if this interaction is active for `pointer`.
	///
	/// The impulse replaces the particle's acceleration and is added to its
	/// velocity. Returns whether anything was applied.
	pub fn apply(self, p: &mut Particle, pointer: &PointerState, config: &InteractionConfig) -> bool {
		match (self.force())(p, pointer, self.preset(config)) {
			Some((ax, ay)) => {
				p.acc_x = ax;
				p.acc_y = ay;
				p.vx += ax;
				p.vy += ay;
				true
			}
			None => false,
		}
	}
}
