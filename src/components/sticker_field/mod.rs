//! Flowfield sticker animation component.
//!
//! Renders a decorative particle field on an HTML canvas with:
//! - A Perlin-noise direction field drifting sticker sprites around
//! - Pointer attraction, soft inter-particle spacing, toroidal wrap
//! - Visibility-driven pause/resume and keyboard pause/reset commands
//! - Image sticker assets with a procedural palette-shape fallback
//!
//! # Example
//!
//! ```ignore
//! use sticker_field::{FieldConfig, StickerFieldCanvas};
//!
//! let config = FieldConfig::default();
//!
//! view! { <StickerFieldCanvas config=Some(config) fullscreen=true /> }
//! ```

mod component;
pub mod config;
mod field;
mod lifecycle;
mod render;
mod sticker;
pub mod theme;

pub use component::StickerFieldCanvas;
pub use config::{FieldConfig, FlowDirection, prefers_reduced_motion};
pub use field::{Particle, ParticleField};
pub use lifecycle::{Lifecycle, LifecycleEvent, RunState};
pub use sticker::{Sticker, StickerSet, fit_size};
pub use theme::Theme;
