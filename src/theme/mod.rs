//! Desktop theme snapshot: accent colors, color prevalence and wallpaper.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

use crate::error::ThemeError;

pub mod backend;

pub use backend::{CommandBackend, DesktopBackend, DesktopCommands, ThemeSetting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ThemeColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque ABGR dword as stored by the desktop.
    pub fn to_dword(self) -> u32 {
        (0xff << 24) | ((self.b as u32) << 16) | ((self.g as u32) << 8) | self.r as u32
    }

    /// Inverse of [`ThemeColor::to_dword`]; the alpha byte is ignored.
    pub fn from_dword(value: u32) -> Self {
        let [r, g, b, _] = value.to_le_bytes();
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub dwm_accent_color: ThemeColor,
    pub dwm_accent_color_inactive: ThemeColor,
    pub dwm_color_prevalence: bool,
    pub explorer_accent_color_menu: ThemeColor,

    /// Absolute wallpaper path. Aircraft configs usually leave this empty
    /// and get the generated panel background filled in.
    #[serde(default)]
    pub wallpaper: PathBuf,
}

impl Theme {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read theme '{}'", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse theme '{}'", path.display()))
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write theme '{}'", path.display()))
    }
}

/// Reads and applies [`Theme`]s through a [`DesktopBackend`].
#[derive(Clone)]
pub struct ThemeInterface {
    backend: Arc<dyn DesktopBackend>,
}

impl ThemeInterface {
    pub fn new(backend: Arc<dyn DesktopBackend>) -> Self {
        Self { backend }
    }

    pub fn current_theme(&self) -> Result<Theme, ThemeError> {
        let color = |setting| self.backend.read_setting(setting).map(ThemeColor::from_dword);

        let theme = Theme {
            dwm_accent_color: color(ThemeSetting::DwmAccentColor)?,
            dwm_accent_color_inactive: color(ThemeSetting::DwmAccentColorInactive)?,
            dwm_color_prevalence: self
                .backend
                .read_setting(ThemeSetting::DwmColorPrevalence)?
                != 0,
            explorer_accent_color_menu: color(ThemeSetting::ExplorerAccentColorMenu)?,
            wallpaper: self.backend.wallpaper()?,
        };
        debug!("🎨 Current theme: {:?}", theme);
        Ok(theme)
    }

    /// Apply the four settings, then the wallpaper.
    pub fn load_theme(&self, theme: &Theme) -> Result<(), ThemeError> {
        self.backend
            .write_setting(ThemeSetting::DwmAccentColor, theme.dwm_accent_color.to_dword())?;
        self.backend.write_setting(
            ThemeSetting::DwmAccentColorInactive,
            theme.dwm_accent_color_inactive.to_dword(),
        )?;
        self.backend.write_setting(
            ThemeSetting::DwmColorPrevalence,
            u32::from(theme.dwm_color_prevalence),
        )?;
        self.backend.write_setting(
            ThemeSetting::ExplorerAccentColorMenu,
            theme.explorer_accent_color_menu.to_dword(),
        )?;
        self.backend.set_wallpaper(&theme.wallpaper)?;

        info!("🎨 Applied theme with wallpaper {}", theme.wallpaper.display());
        Ok(())
    }
}

impl std::fmt::Debug for ThemeInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeInterface").finish_non_exhaustive()
    }
}
