//! Drawing the particle field.
//!
//! Each particle is a flat square of its sampled color. The source image is
//! never drawn; only the cells derived from it are.

use web_sys::CanvasRenderingContext2d;

use super::color::Color;
use super::state::ParticleField;

/// A surface particles can be drawn onto.
pub trait DrawTarget {
	/// Wipe the whole `(width, height)` surface to transparent.
	fn clear(&mut self, size: (u32, u32));

	/// Fill a `size`x`size` square with its top-left corner at `(x, y)`.
	fn fill_cell(&mut self, x: f64, y: f64, size: u32, color: Color);
}

/// Draw every particle at its current position.
pub fn draw_particles(field: &ParticleField, target: &mut impl DrawTarget) {
	for p in field.particles() {
		target.fill_cell(p.x, p.y, p.size, p.color);
	}
}

/// 2d canvas context as a [`DrawTarget`].
///
/// Neighbouring particles usually share a color, so the fill style is only
/// set when it changes.
pub struct CanvasTarget {
	ctx: CanvasRenderingContext2d,
	last_fill: Option<Color>,
}

impl CanvasTarget {
	/// Draw through `ctx`.
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self {
			ctx,
			last_fill: None,
		}
	}

	/// The wrapped context, also used to sample images.
	pub fn context(&self) -> &CanvasRenderingContext2d {
		&self.ctx
	}
}

impl DrawTarget for CanvasTarget {
	fn clear(&mut self, (width, height): (u32, u32)) {
		self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
		// Resizing the canvas resets context state, fill style included.
		self.last_fill = None;
	}

	fn fill_cell(&mut self, x: f64, y: f64, size: u32, color: Color) {
		if self.last_fill != Some(color) {
			self.ctx.set_fill_style_str(&color.to_css());
			self.last_fill = Some(color);
		}
		self.ctx.fill_rect(x, y, size as f64, size as f64);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_logo::config::ParticleConfig;
	use image::{DynamicImage, Rgba, RgbaImage};

	#[derive(Default)]
	struct Cells(Vec<(f64, f64, u32, Color)>);

	impl DrawTarget for Cells {
		fn clear(&mut self, _size: (u32, u32)) {
			self.0.clear();
		}

		fn fill_cell(&mut self, x: f64, y: f64, size: u32, color: Color) {
			self.0.push((x, y, size, color));
		}
	}

	#[test]
	fn one_cell_per_particle_in_sampled_color() {
		let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([9, 8, 7, 255])));
		let mut field = ParticleField::with_seed(ParticleConfig::default(), 100, 100, 5);
		field.load(&img).unwrap();

		let mut cells = Cells::default();
		draw_particles(&field, &mut cells);
		assert_eq!(cells.0.len(), field.len());
		for ((x, y, size, color), p) in cells.0.iter().zip(field.particles()) {
			assert_eq!((*x, *y), (p.x, p.y));
			assert_eq!(*size, 2);
			assert_eq!(*color, Color::rgb(9, 8, 7));
		}
	}
}
