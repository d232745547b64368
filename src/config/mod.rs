use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::patch::{ComposeFlags, FlightPatch};
use crate::theme::{DesktopCommands, Theme};

pub const DEFAULT_SETTINGS_PATH: &str = "~/.config/flatpanel/flatpanel.toml";

/// One aircraft: which theme to activate and what to draw on its panel
/// background. Stored as JSON.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlatPanelConfig {
    pub manufacturer: String,
    pub aircraft_type: String,
    pub type_designator_icao: String,
    pub add_flight_patch: bool,

    pub add_registration: bool,
    #[serde(default)]
    pub ask_for_registration: bool,
    #[serde(default)]
    pub default_registration_on_empty: bool,

    pub add_sel_cal_code: bool,
    #[serde(default)]
    pub ask_for_sel_cal_code: bool,
    #[serde(default)]
    pub default_sel_cal_code_on_empty: bool,

    pub add_callsign: bool,
    #[serde(default)]
    pub ask_for_callsign: bool,
    #[serde(default)]
    pub default_callsign_on_empty: bool,

    pub add_descriptions: bool,

    pub theme: Theme,
    pub flight_patch: FlightPatch,
    pub background_image: PathBuf,
}

impl FlatPanelConfig {
    /// Load a config file. A relative `backgroundImage` is resolved against
    /// the directory containing the config.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let expanded = shellexpand::tilde(&path.as_ref().to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);
        info!("📄 Reading aircraft config from: {}", path.display());

        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::ReadFailed {
                path: path.clone(),
                source,
            })?;

        let mut config: FlatPanelConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::InvalidJson {
                path: path.clone(),
                source,
            })?;

        let background = shellexpand::tilde(&config.background_image.to_string_lossy()).into_owned();
        config.background_image = PathBuf::from(background);
        if config.background_image.is_relative() {
            if let Some(dir) = path.parent() {
                config.background_image = dir.join(&config.background_image);
            }
        }

        debug!(
            "📋 Config loaded: {} {} ({}), {} descriptions",
            config.manufacturer,
            config.aircraft_type,
            config.type_designator_icao,
            config.flight_patch.descriptions.len()
        );
        Ok(config)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json).await?;
        Ok(())
    }

    /// Items of the flight patch that should be drawn.
    pub fn compose_flags(&self) -> ComposeFlags {
        ComposeFlags {
            registration: self.add_registration,
            sel_cal_code: self.add_sel_cal_code,
            callsign: self.add_callsign,
            descriptions: self.add_descriptions,
        }
    }

    /// `Manufacturer Type (ICAO)`, as shown when activating.
    pub fn display_name(&self) -> String {
        format!(
            "{} {} ({})",
            self.manufacturer, self.aircraft_type, self.type_designator_icao
        )
    }
}

/// Application settings, stored as TOML. Every field has a default so a
/// missing or partial file works.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory for the original theme snapshot and the generated
    /// panel background.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Extra directories searched for fonts before the system ones.
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub desktop: DesktopCommands,
}

fn default_state_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("flatpanel"))
        .unwrap_or_else(|| PathBuf::from(".tmp"))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            font_dirs: Vec::new(),
            desktop: DesktopCommands::default(),
        }
    }
}

impl Settings {
    pub async fn load(path: &str) -> Result<Self> {
        let expanded_path = PathBuf::from(shellexpand::tilde(path).into_owned());

        if !fs::try_exists(&expanded_path).await.unwrap_or(false) {
            info!(
                "📄 No settings at {}, using defaults",
                expanded_path.display()
            );
            return Ok(Self::default());
        }

        info!("📄 Reading settings from: {}", expanded_path.display());
        let content = fs::read_to_string(&expanded_path)
            .await
            .map_err(|source| ConfigError::ReadFailed {
                path: expanded_path.clone(),
                source,
            })?;

        let mut settings: Settings =
            toml::from_str(&content).map_err(|source| ConfigError::InvalidToml {
                path: expanded_path.clone(),
                source,
            })?;

        settings.state_dir = expand(&settings.state_dir);
        settings.font_dirs = settings.font_dirs.iter().map(|dir| expand(dir)).collect();

        debug!("📋 Settings loaded: state dir {}", settings.state_dir.display());
        Ok(settings)
    }

    pub fn original_theme_path(&self) -> PathBuf {
        self.state_dir.join("original_theme.json")
    }

    pub fn panel_background_path(&self) -> PathBuf {
        self.state_dir.join("panel_background.png")
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
