//! Error types for the particle engine.
//!
//! None of these reach the visitor. The component logs them and leaves the
//! field empty, so a failed image never breaks the page.

/// Failures while turning an image into particles.
#[derive(Debug, thiserror::Error)]
pub enum ParticleError {
	/// The RGBA byte slice does not match the declared dimensions.
	#[error("pixel buffer is {actual} bytes, expected {expected} for {width}x{height}")]
	BufferSize {
		/// Declared width.
		width: u32,
		/// Declared height.
		height: u32,
		/// `width * height * 4`.
		expected: usize,
		/// Bytes actually supplied.
		actual: usize,
	},
	/// The image has no pixels, or the canvas has no area to place it in.
	#[error("nothing to sample: image {image_w}x{image_h}, canvas {canvas_w}x{canvas_h}")]
	EmptyImage {
		/// Natural image width.
		image_w: u32,
		/// Natural image height.
		image_h: u32,
		/// Canvas width at the time.
		canvas_w: u32,
		/// Canvas height at the time.
		canvas_h: u32,
	},
	/// Reading pixels back was refused, usually a cross-origin taint.
	#[error("canvas is tainted, pixel data unavailable: {0}")]
	Tainted(String),
	/// A DOM or 2d context call failed.
	#[error("canvas operation failed: {0}")]
	Canvas(String),
}

/// A configuration value the engine cannot run with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	/// A stride of 0 would never advance the scan.
	#[error("sampling stride must be at least 1")]
	ZeroStride,
	/// Placement lower bound above the upper bound.
	#[error("placement bounds are inverted: min {min_px}px > max {max_px}px")]
	InvertedBounds {
		/// Configured lower bound.
		min_px: u32,
		/// Configured upper bound.
		max_px: u32,
	},
	/// Placement percentage is not positive.
	#[error("placement size must be a positive percentage, got {0}")]
	CanvasPct(f64),
	/// Friction range is inverted or leaves `(0, 1]`.
	#[error("friction range {min}..{max} must be ordered and within (0, 1]")]
	FrictionRange {
		/// Configured lower bound.
		min: f64,
		/// Configured upper bound.
		max: f64,
	},
	/// Spring divisor is not positive.
	#[error("spring divisor must be positive, got {0}")]
	SpringDivisor(f64),
	/// Every image URL is blank.
	#[error("no image sources configured")]
	NoSources,
	/// The JSON document did not deserialize.
	#[error("invalid configuration document: {0}")]
	Parse(String),
}
