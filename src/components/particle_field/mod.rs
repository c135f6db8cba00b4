//! Animated particle field background.
//!
//! Renders a parallax particle field on an HTML canvas with:
//! - Depth-layered ambient drift with scroll-driven parallax
//! - Pointer wake, click bursts, and passing comets that scatter particles
//! - Spring-back recovery that eases disrupted particles home
//! - Connection lines between nearby particles
//!
//! # Example
//!
//! ```ignore
//! use particle_field::ParticleFieldCanvas;
//!
//! let (scroll, _) = signal(0.5);
//! let (compact, _) = signal(false);
//!
//! view! { <ParticleFieldCanvas scroll_fraction=scroll compact=compact /> }
//! ```

pub mod burst;
pub mod comet;
mod component;
pub mod config;
pub mod disruption;
pub mod parallax;
pub mod particle;
pub mod recovery;
mod render;
pub mod state;
pub mod theme;

pub use component::ParticleFieldCanvas;
pub use config::{CometConfig, FieldConfig, Span};
pub use state::FieldState;
pub use theme::FieldTheme;
