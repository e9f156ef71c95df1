//! Fitting the source image into the canvas.
//!
//! The image keeps its aspect ratio. Its constraining axis is sized to a
//! percentage of the canvas, clamped to pixel bounds, then centred
//! horizontally and anchored around a fraction of the canvas height (the top
//! third by default). Pure function of its inputs.

use super::config::PlacementConfig;

/// Rectangle the sampled image occupies, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
	/// Left edge. May be fractional or negative on narrow canvases.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Rendered size in pixels.
	pub width: u32,
	/// See `width`.
	pub height: u32,
}

impl Placement {
	/// Fit an `image_w`x`image_h` image into a `canvas_w`x`canvas_h` canvas.
	///
	/// Returns `None` if any dimension is zero, which happens while the host
	/// element is still being laid out.
	pub fn fit(
		canvas_w: u32,
		canvas_h: u32,
		image_w: u32,
		image_h: u32,
		config: &PlacementConfig,
	) -> Option<Self> {
		if canvas_w == 0 || canvas_h == 0 || image_w == 0 || image_h == 0 {
			return None;
		}
		let (cw, ch) = (canvas_w as f64, canvas_h as f64);
		let image_aspect = image_w as f64 / image_h as f64;
		let canvas_aspect = cw / ch;
		let (min, max) = (config.min_px as f64, config.max_px as f64);

		let (width, height) = if image_aspect < canvas_aspect {
			let height = (ch * config.canvas_pct / 100.0).round().clamp(min, max);
			(height * image_aspect, height)
		} else {
			let width = (cw * config.canvas_pct / 100.0).round().clamp(min, max);
			(width, width / image_aspect)
		};
		let (width, height) = (width.round().max(1.0) as u32, height.round().max(1.0) as u32);

		Some(Self {
			x: cw / 2.0 - width as f64 / 2.0,
			y: ch * config.vertical_anchor - height as f64 / 2.0,
			width,
			height,
		})
	}

	/// Canvas position of the pixel at `(i, j)` inside the rectangle.
	pub fn destination(&self, i: u32, j: u32) -> (f64, f64) {
		(self.x + i as f64, self.y + j as f64)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> PlacementConfig {
		PlacementConfig::default()
	}

	#[test]
	fn wide_canvas_constrains_height() {
		// Square logo on a 1600x900 canvas: height = 60% of 900.
		let p = Placement::fit(1600, 900, 400, 400, &config()).unwrap();
		assert_eq!((p.width, p.height), (540, 540));
		assert_eq!(p.x, 800.0 - 270.0);
		assert_eq!(p.y, 900.0 * 0.30 - 270.0);
	}

	#[test]
	fn tall_canvas_constrains_width() {
		let p = Placement::fit(400, 1000, 200, 100, &config()).unwrap();
		assert_eq!((p.width, p.height), (240, 120));
		assert_eq!(p.x, 80.0);
	}

	#[test]
	fn size_is_clamped_to_bounds() {
		let small = Placement::fit(100, 100, 50, 50, &config()).unwrap();
		assert_eq!((small.width, small.height), (100, 100));

		let large = Placement::fit(4000, 3000, 50, 50, &config()).unwrap();
		assert_eq!((large.width, large.height), (800, 800));
	}

	#[test]
	fn aspect_ratio_is_preserved() {
		let p = Placement::fit(1920, 1080, 300, 150, &config()).unwrap();
		assert_eq!(p.width, p.height * 2);
	}

	#[test]
	fn zero_dimensions_yield_nothing() {
		assert!(Placement::fit(0, 600, 10, 10, &config()).is_none());
		assert!(Placement::fit(800, 0, 10, 10, &config()).is_none());
		assert!(Placement::fit(800, 600, 0, 10, &config()).is_none());
	}

	#[test]
	fn destination_is_offset_from_origin() {
		let p = Placement {
			x: 10.5,
			y: -4.0,
			width: 2,
			height: 2,
		};
		assert_eq!(p.destination(1, 1), (11.5, -3.0));
	}
}
