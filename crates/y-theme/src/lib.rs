//! # y-theme — categories, styles and their composition
//!
//! Turns classified YAML into concrete terminal styles.
//!
//! # Architecture
//!
//! ```text
//! base hue + Mode
//!     │
//!     ▼
//! palette.rs:  concrete colors per role, contrast-checked (contrast.rs)
//!     │
//!     ▼
//! styles.rs:   Category → Arc<Style>, inheritance resolved up front
//!     │
//!     ▼
//! compose.rs:  override / blend overlays, memoized by identity
//! ```
//!
//! Themes are found by name through the process-wide [`registry`], which
//! starts out holding the [`builtin`] presets.

// Hue/lightness/chroma variable names are inherently similar.
#![allow(clippy::similar_names)]

pub mod builtin;
pub mod category;
pub mod compose;
pub mod contrast;
pub mod error;
pub mod palette;
pub mod registry;
pub mod styles;

pub use category::Category;
pub use compose::{Composer, blend_style, override_style};
pub use error::ThemeError;
pub use palette::{Mode, Palette};
pub use styles::Styles;
