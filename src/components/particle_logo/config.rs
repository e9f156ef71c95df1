//! Engine configuration.
//!
//! A [`ParticleConfig`] is built once (defaults, optionally overridden from a
//! JSON document on the page) and handed to the engine by value. Nothing
//! mutates it afterwards; per-frame state lives in
//! [`ParticleField`](super::state::ParticleField).
//!
//! Every struct deserializes with field-level defaults, so a partial document
//! such as `{"sampling": {"stride": 2}}` only overrides what it names.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Image URLs, tried in order until one loads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSources {
	/// The real logo asset.
	pub primary: String,
	/// Same-origin copy of the logo.
	pub fallback: String,
	/// Remote demo image, used when both logo copies fail.
	pub demo: String,
}

impl Default for ImageSources {
	fn default() -> Self {
		Self {
			primary: "https://res.cloudinary.com/dhpqnaqgd/image/upload/v1764060858/cropped-logo_tawe2x.png"
				.into(),
			fallback: "/logo.png".into(),
			demo: "https://images.unsplash.com/photo-1621261266833-66023848b873?q=80&w=500&auto=format&fit=crop"
				.into(),
		}
	}
}

impl ImageSources {
	/// Ordered, non-empty URLs.
	pub fn urls(&self) -> Vec<String> {
		[&self.primary, &self.fallback, &self.demo]
			.into_iter()
			.filter(|url| !url.trim().is_empty())
			.cloned()
			.collect()
	}
}

/// How the source image is scanned into particles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
	/// Grid step in pixels, both axes. Density falls with the square of this.
	pub stride: u32,
	/// Pixels with alpha at or below this are skipped.
	pub alpha_threshold: u8,
}

impl Default for SamplingConfig {
	fn default() -> Self {
		Self {
			stride: 4,
			alpha_threshold: 128,
		}
	}
}

/// Where the sampled image sits inside the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
	/// Rendered size as a percentage of the constraining canvas axis.
	pub canvas_pct: f64,
	/// Lower clamp on the constraining axis, in pixels.
	pub min_px: u32,
	/// Upper clamp on the constraining axis, in pixels.
	pub max_px: u32,
	/// Vertical centre of the image as a fraction of canvas height.
	pub vertical_anchor: f64,
}

impl Default for PlacementConfig {
	fn default() -> Self {
		Self {
			canvas_pct: 60.0,
			min_px: 100,
			max_px: 800,
			vertical_anchor: 0.30,
		}
	}
}

/// Per-particle look and motion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleStyle {
	/// Cell size in pixels.
	pub size: u32,
	/// Shrink each cell by a random factor in `[0.5, 1)`.
	pub size_random: bool,
	/// Spread of the initial random velocity.
	pub speed: f64,
	/// Lower bound of the per-particle friction draw.
	pub friction_min: f64,
	/// Upper bound of the per-particle friction draw.
	pub friction_max: f64,
	/// Spring pull is `(destination - position) / spring_divisor`.
	pub spring_divisor: f64,
}

impl Default for ParticleStyle {
	fn default() -> Self {
		Self {
			size: 2,
			size_random: false,
			speed: 1.0,
			friction_min: 0.92,
			friction_max: 0.93,
			spring_divisor: 500.0,
		}
	}
}

/// Idle micro-motion around the destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestlessConfig {
	/// Off by default.
	pub enabled: bool,
	/// Displacement (pixels) at which a jittering particle springs back.
	pub value: f64,
	/// Per-axis jitter is drawn from `-jitter..=jitter`.
	pub jitter: i32,
}

impl Default for RestlessConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			value: 10.0,
			jitter: 3,
		}
	}
}

/// Parameters of one repulsion field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulseConfig {
	/// Whether this field is registered at all.
	pub enabled: bool,
	/// Radius of effect in pixels.
	pub distance: f64,
	/// Higher is stronger. Effective range is `0..=290`.
	pub strength: f64,
}

impl Default for RepulseConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			distance: 100.0,
			strength: 200.0,
		}
	}
}

/// Hover and click repulsion presets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// Applied whenever the pointer is over the canvas.
	pub hover: RepulseConfig,
	/// Applied while a mouse button is held.
	pub click: RepulseConfig,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			hover: RepulseConfig::default(),
			click: RepulseConfig {
				enabled: true,
				distance: 300.0,
				strength: 250.0,
			},
		}
	}
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
	/// Logo URLs, in fallback order.
	pub sources: ImageSources,
	/// Pixel grid scan.
	pub sampling: SamplingConfig,
	/// Where the image sits on the canvas.
	pub placement: PlacementConfig,
	/// Particle size and motion.
	pub particle: ParticleStyle,
	/// Idle shimmer around the destination.
	pub restless: RestlessConfig,
	/// Pointer repulsion fields.
	pub interactions: InteractionConfig,
	/// Quiet period before a window resize rebuilds the field.
	pub resize_debounce_ms: u32,
}

impl Default for ParticleConfig {
	fn default() -> Self {
		Self {
			sources: ImageSources::default(),
			sampling: SamplingConfig::default(),
			placement: PlacementConfig::default(),
			particle: ParticleStyle::default(),
			restless: RestlessConfig::default(),
			interactions: InteractionConfig::default(),
			resize_debounce_ms: 200,
		}
	}
}

impl ParticleConfig {
	/// Check the values the engine divides by or iterates with.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.sampling.stride == 0 {
			return Err(ConfigError::ZeroStride);
		}
		let placement = &self.placement;
		if placement.min_px > placement.max_px {
			return Err(ConfigError::InvertedBounds {
				min_px: placement.min_px,
				max_px: placement.max_px,
			});
		}
		if !(placement.canvas_pct > 0.0) {
			return Err(ConfigError::CanvasPct(placement.canvas_pct));
		}
		let style = &self.particle;
		let (min, max) = (style.friction_min, style.friction_max);
		if !(min > 0.0 && min <= max && max <= 1.0) {
			return Err(ConfigError::FrictionRange { min, max });
		}
		if !(style.spring_divisor > 0.0) {
			return Err(ConfigError::SpringDivisor(style.spring_divisor));
		}
		if self.sources.urls().is_empty() {
			return Err(ConfigError::NoSources);
		}
		Ok(())
	}

	/// Parse a (possibly partial) JSON document and validate it.
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		let config: Self =
			serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_shipped_effect() {
		let config = ParticleConfig::default();
		assert_eq!(config.sampling.stride, 4);
		assert_eq!(config.sampling.alpha_threshold, 128);
		assert_eq!(config.placement.canvas_pct, 60.0);
		assert_eq!((config.placement.min_px, config.placement.max_px), (100, 800));
		assert!(!config.restless.enabled);
		assert_eq!(config.interactions.hover.distance, 100.0);
		assert_eq!(config.interactions.click.strength, 250.0);
		assert_eq!(config.resize_debounce_ms, 200);
		assert_eq!(config.sources.urls().len(), 3);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn partial_json_only_overrides_named_fields() {
		let config =
			ParticleConfig::from_json(r#"{"sampling": {"stride": 2}, "resize_debounce_ms": 50}"#)
				.unwrap();
		assert_eq!(config.sampling.stride, 2);
		assert_eq!(config.sampling.alpha_threshold, 128);
		assert_eq!(config.resize_debounce_ms, 50);
		assert_eq!(config.interactions, InteractionConfig::default());
	}

	#[test]
	fn validation_rejects_unusable_values() {
		let mut config = ParticleConfig::default();
		config.sampling.stride = 0;
		assert_eq!(config.validate(), Err(ConfigError::ZeroStride));

		let mut config = ParticleConfig::default();
		config.placement.min_px = 900;
		assert!(matches!(
			config.validate(),
			Err(ConfigError::InvertedBounds { .. })
		));

		let mut config = ParticleConfig::default();
		config.particle.friction_min = 0.95;
		config.particle.friction_max = 0.90;
		assert!(matches!(
			config.validate(),
			Err(ConfigError::FrictionRange { .. })
		));

		let mut config = ParticleConfig::default();
		config.sources = ImageSources {
			primary: String::new(),
			fallback: " ".into(),
			demo: String::new(),
		};
		assert_eq!(config.validate(), Err(ConfigError::NoSources));
	}

	#[test]
	fn bad_json_is_reported() {
		assert!(matches!(
			ParticleConfig::from_json("{ not json"),
			Err(ConfigError::Parse(_))
		));
		assert_eq!(
			ParticleConfig::from_json(r#"{"sampling": {"stride": 0}}"#),
			Err(ConfigError::ZeroStride)
		);
	}

	#[test]
	fn empty_sources_are_skipped() {
		let sources = ImageSources {
			primary: String::new(),
			..ImageSources::default()
		};
		assert_eq!(sources.urls(), vec!["/logo.png".to_string(), ImageSources::default().demo]);
	}
}
