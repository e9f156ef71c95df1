//! Pixel buffers and grid sampling.
//!
//! The engine never touches an image directly. It asks a [`PixelSource`] to
//! render the image at the placement size and hand back RGBA bytes, then
//! scans those bytes on a fixed grid. In the browser the source is an
//! `HtmlImageElement` drawn through the canvas; natively it is an
//! [`image::DynamicImage`].

use image::DynamicImage;
use image::imageops::FilterType;

use super::color::Color;
use super::config::SamplingConfig;
use super::error::ParticleError;
use super::placement::Placement;

/// Row-major RGBA8 pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
	width: u32,
	height: u32,
	data: Vec<u8>,
}

impl PixelBuffer {
	/// Wrap `data`, which must hold exactly `width * height` RGBA pixels.
	pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ParticleError> {
		let expected = width as usize * height as usize * 4;
		if data.len() != expected {
			return Err(ParticleError::BufferSize {
				width,
				height,
				expected,
				actual: data.len(),
			});
		}
		Ok(Self {
			width,
			height,
			data,
		})
	}

	/// Width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Pixel at `(x, y)`. Panics if out of bounds.
	pub fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
		let idx = (x as usize + y as usize * self.width as usize) * 4;
		[
			self.data[idx],
			self.data[idx + 1],
			self.data[idx + 2],
			self.data[idx + 3],
		]
	}
}

/// Something that can render an image at a given placement and read it back.
pub trait PixelSource {
	/// Intrinsic image size, used to fit the placement rectangle.
	fn natural_size(&self) -> (u32, u32);

	/// Render at `placement.width`x`placement.height` and return the pixels.
	fn sample(&self, placement: &Placement) -> Result<PixelBuffer, ParticleError>;
}

impl PixelSource for DynamicImage {
	fn natural_size(&self) -> (u32, u32) {
		(self.width(), self.height())
	}

	fn sample(&self, placement: &Placement) -> Result<PixelBuffer, ParticleError> {
		let rgba = if (placement.width, placement.height) == self.natural_size() {
			self.to_rgba8()
		} else {
			self.resize_exact(placement.width, placement.height, FilterType::Triangle)
				.to_rgba8()
		};
		let (width, height) = rgba.dimensions();
		PixelBuffer::new(width, height, rgba.into_raw())
	}
}

/// Where one particle should end up and what it looks like.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seed {
	/// Canvas position the particle settles at.
	pub dest_x: f64,
	/// See `dest_x`.
	pub dest_y: f64,
	/// Sampled pixel color.
	pub color: Color,
}

/// Scan `pixels` on the configured grid, column by column.
///
/// A pixel becomes a seed only if its alpha is above the threshold. Its
/// destination is its offset inside `placement`.
pub fn sample_seeds(
	pixels: &PixelBuffer,
	placement: &Placement,
	config: &SamplingConfig,
) -> Vec<Seed> {
	let stride = config.stride.max(1) as usize;
	let mut seeds = Vec::new();
	for i in (0..pixels.width()).step_by(stride) {
		for j in (0..pixels.height()).step_by(stride) {
			let px = pixels.rgba(i, j);
			if px[3] > config.alpha_threshold {
				let (dest_x, dest_y) = placement.destination(i, j);
				seeds.push(Seed {
					dest_x,
					dest_y,
					color: Color::from_rgba(px),
				});
			}
		}
	}
	seeds
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{Rgba, RgbaImage};

	fn at_origin(width: u32, height: u32) -> Placement {
		Placement {
			x: 0.0,
			y: 0.0,
			width,
			height,
		}
	}

	#[test]
	fn buffer_length_must_match_dimensions() {
		assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());
		let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
		assert!(matches!(
			err,
			ParticleError::BufferSize {
				expected: 16,
				actual: 15,
				..
			}
		));
	}

	#[test]
	fn two_by_two_opaque_at_stride_one_gives_four_seeds() {
		#[rustfmt::skip]
		let data = vec![
			255, 0, 0, 255,    0, 255, 0, 255,
			0, 0, 255, 255,    9, 9, 9, 255,
		];
		let pixels = PixelBuffer::new(2, 2, data).unwrap();
		let placement = Placement {
			x: 100.0,
			y: 50.0,
			width: 2,
			height: 2,
		};
		let config = SamplingConfig {
			stride: 1,
			alpha_threshold: 128,
		};

		let seeds = sample_seeds(&pixels, &placement, &config);
		// Column-major: (0,0), (0,1), (1,0), (1,1).
		let expected = [
			(100.0, 50.0, Color::rgb(255, 0, 0)),
			(100.0, 51.0, Color::rgb(0, 0, 255)),
			(101.0, 50.0, Color::rgb(0, 255, 0)),
			(101.0, 51.0, Color::rgb(9, 9, 9)),
		];
		assert_eq!(seeds.len(), 4);
		for (seed, (x, y, color)) in seeds.iter().zip(expected) {
			assert_eq!((seed.dest_x, seed.dest_y, seed.color), (x, y, color));
		}
	}

	#[test]
	fn alpha_at_threshold_is_excluded() {
		let data = [[0, 0, 0, 128], [0, 0, 0, 129], [0, 0, 0, 0], [0, 0, 0, 255]].concat();
		let pixels = PixelBuffer::new(4, 1, data).unwrap();
		let config = SamplingConfig {
			stride: 1,
			alpha_threshold: 128,
		};
		let seeds = sample_seeds(&pixels, &at_origin(4, 1), &config);
		let xs: Vec<f64> = seeds.iter().map(|s| s.dest_x).collect();
		assert_eq!(xs, vec![1.0, 3.0]);
	}

	#[test]
	fn stride_skips_rows_and_columns() {
		let pixels = PixelBuffer::new(10, 10, vec![255; 400]).unwrap();
		let config = SamplingConfig {
			stride: 4,
			alpha_threshold: 128,
		};
		// Columns and rows 0, 4, 8.
		assert_eq!(sample_seeds(&pixels, &at_origin(10, 10), &config).len(), 9);
	}

	#[test]
	fn dynamic_image_is_rendered_at_placement_size() {
		let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 255])));
		assert_eq!(img.natural_size(), (4, 2));

		let same = img.sample(&at_origin(4, 2)).unwrap();
		assert_eq!((same.width(), same.height()), (4, 2));
		assert_eq!(same.rgba(3, 1), [10, 20, 30, 255]);

		let scaled = img.sample(&at_origin(8, 4)).unwrap();
		assert_eq!((scaled.width(), scaled.height()), (8, 4));
		let px = scaled.rgba(7, 3);
		assert!(px[3] >= 254);
		assert!(px[0].abs_diff(10) <= 1 && px[2].abs_diff(30) <= 1);
	}
}
