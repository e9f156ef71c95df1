//! Particle logo component.
//!
//! Samples the opaque pixels of a logo image into a grid of small colored
//! squares that spring towards their place in the image:
//! - Fallback chain of image sources, first one that loads wins
//! - Aspect-preserving placement, clamped and anchored on the canvas
//! - Hover and click repulsion, optional restless shimmer
//! - Debounced rebuild on resize, full teardown on unmount
//!
//! The engine (`ParticleField` and friends) has no browser dependency and
//! accepts any [`PixelSource`]; [`ParticleLogoCanvas`] hosts it on a canvas.
//!
//! # Example
//!
//! ```ignore
//! use particle_logo::{ParticleConfig, ParticleLogoCanvas};
//!
//! let mut config = ParticleConfig::default();
//! config.restless.enabled = true;
//!
//! view! { <div class="hero-logo"><ParticleLogoCanvas config=config /></div> }
//! ```

mod color;
mod component;
pub mod config;
mod error;
mod frame_loop;
mod interaction;
mod particles;
mod pixels;
mod placement;
mod render;
mod sources;
mod state;

pub use color::Color;
pub use component::ParticleLogoCanvas;
pub use config::ParticleConfig;
pub use error::{ConfigError, ParticleError};
pub use frame_loop::{FrameLoop, ListenerRegistry, ListenerTarget, LoopState, Registration};
pub use interaction::{Interaction, PointerState, repulse_impulse, repulse_scale};
pub use particles::{Particle, Restlessness};
pub use pixels::{PixelBuffer, PixelSource, Seed, sample_seeds};
pub use placement::Placement;
pub use render::{CanvasTarget, DrawTarget, draw_particles};
pub use sources::SourceChain;
pub use state::{ParticleField, Spawn};
