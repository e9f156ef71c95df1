//! Particle fill color.

/// Opaque RGB color sampled from a source pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
}

impl Color {
	/// Color from its channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Build from the first three bytes of an RGBA pixel; alpha is dropped.
	pub fn from_rgba(px: [u8; 4]) -> Self {
		Self::rgb(px[0], px[1], px[2])
	}

	/// CSS fill style, e.g. `rgb(212,175,55)`.
	pub fn to_css(self) -> String {
		format!("rgb({},{},{})", self.r, self.g, self.b)
	}
}
