//! UI components.

pub mod particle_logo;
