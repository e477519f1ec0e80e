//! Ambient particle-field background component.
//!
//! Renders a continuously animated field of glowing particles on an HTML
//! canvas with:
//! - Orbiting attraction toward a pointer-tracked (or slowly wandering)
//!   target, with per-particle swirl, jitter, and depth-based damping
//! - Expanding ripple shockwaves on pointer press plus a periodic ambient
//!   pulse, bounded to eight live ripples
//! - Proximity links between nearby particles and a motion-trail fade
//! - Theme-aware coloring driven by the document's `data-theme` attribute
//!   and `--color-primary` custom property
//! - A strict pause/resume/teardown lifecycle across blur, visibility,
//!   resize, and reduced-motion changes
//!
//! # Example
//!
//! ```ignore
//! use canvas_drift::{ParticleFieldCanvas, ThemeInfo};
//!
//! let theme = RwSignal::new(ThemeInfo::dark_neon());
//! let reduced_motion = RwSignal::new(false);
//!
//! view! { <ParticleFieldCanvas theme=theme reduced_motion=reduced_motion /> }
//! ```

mod component;
mod particles;
mod render;
mod ripples;
mod state;
pub mod theme;

pub use component::ParticleFieldCanvas;
pub use theme::ThemeInfo;
