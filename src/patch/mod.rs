//! Flight patch model: validated identifiers, text styles and the layout
//! rules used to place them on a background image.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

pub mod callsign;
pub mod composer;
pub mod layout;
pub mod selcal;

pub use callsign::Callsign;
pub use composer::{ComposeFlags, FlightPatchComposer};
pub use layout::{resolve_origin, HorizontalReference, Position, Rectangle, VerticalReference};
pub use selcal::SelCalCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Font, size, color and placement of one text item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font file name or path, e.g. `arial.ttf`.
    pub font_name: String,
    /// Pixel size.
    pub font_size: u32,
    pub text_color: RgbColor,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub text: String,
    pub style: TextStyle,
}

/// Everything drawn onto the panel background. All styles are positioned
/// against the single shared `rectangle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPatch {
    pub rectangle: Rectangle,

    pub aircraft_registration: String,
    pub aircraft_registration_style: TextStyle,

    pub sel_cal_code: SelCalCode,
    pub sel_cal_code_style: TextStyle,

    pub callsign: Callsign,
    pub callsign_style: TextStyle,

    #[serde(default)]
    pub descriptions: Vec<Description>,
}

impl FlightPatch {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize flight patch")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse flight patch")
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("📄 Reading flight patch from {}", path.display());
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read flight patch '{}'", path.display()))?;
        Self::from_json(&content)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .await
            .with_context(|| format!("Failed to write flight patch '{}'", path.display()))
    }
}
