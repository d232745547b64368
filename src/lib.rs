//! Flatpanel - sets up a desktop for a flat panel flight simulator
//!
//! This crate applies an aircraft's accent colors and wallpaper, optionally
//! drawing a flight patch (registration, SelCal code, callsign and labels)
//! onto the wallpaper first, and restores the previous theme afterwards.

pub mod config;
pub mod core;
pub mod error;
pub mod patch;
pub mod prompt;
pub mod render;
pub mod theme;

// Re-export commonly used types
pub use config::{FlatPanelConfig, Settings};
pub use crate::core::session::Session;
pub use error::{ComposeError, ValidationError};
pub use patch::{Callsign, ComposeFlags, FlightPatch, FlightPatchComposer, SelCalCode};
