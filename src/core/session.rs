use anyhow::{Context, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs, signal};
use tracing::{debug, info, warn};

use crate::config::{FlatPanelConfig, Settings};
use crate::patch::FlightPatchComposer;
use crate::prompt::Prompter;
use crate::render::{save_image, FontLibrary, GlyphRenderer};
use crate::theme::{CommandBackend, DesktopBackend, Theme, ThemeInterface};

/// Activates aircraft themes and restores the desktop afterwards.
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    themes: ThemeInterface,
}

impl Session {
    /// Session driving the desktop through the configured commands.
    pub fn new(settings: Settings) -> Self {
        let backend = Arc::new(CommandBackend::new(settings.desktop.clone()));
        Self::with_backend(settings, backend)
    }

    pub fn with_backend(settings: Settings, backend: Arc<dyn DesktopBackend>) -> Self {
        Self {
            settings,
            themes: ThemeInterface::new(backend),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Snapshot the desktop's current theme so it can be restored later.
    pub async fn save_current_theme(&self) -> Result<Theme> {
        let themes = self.themes.clone();
        let theme = tokio::task::spawn_blocking(move || themes.current_theme()).await??;

        let path = self.settings.original_theme_path();
        theme.save(&path).await?;
        info!("💾 Saved current theme to {}", path.display());
        Ok(theme)
    }

    /// Re-apply the theme saved by [`Session::save_current_theme`].
    pub async fn restore_original_theme(&self) -> Result<Theme> {
        let path = self.settings.original_theme_path();
        let theme = Theme::load(&path)
            .await
            .context("No saved original theme to restore")?;

        let themes = self.themes.clone();
        let applied = theme.clone();
        tokio::task::spawn_blocking(move || themes.load_theme(&applied)).await??;

        info!("♻️  Restored original theme");
        Ok(theme)
    }

    /// Ask for any values the config wants entered on the terminal.
    pub async fn prompt_for_values(config: FlatPanelConfig) -> Result<FlatPanelConfig> {
        if !(config.ask_for_registration || config.ask_for_sel_cal_code || config.ask_for_callsign) {
            return Ok(config);
        }

        let config = tokio::task::spawn_blocking(move || {
            let mut config = config;
            Prompter::stdio().fill_in(&mut config).map(|_| config)
        })
        .await??;
        Ok(config)
    }

    /// Draw the config's flight patch onto its background image and write
    /// the result as PNG to `output`.
    pub async fn render(&self, config: &FlatPanelConfig, output: &Path) -> Result<PathBuf> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let font_dirs = self.settings.font_dirs.clone();
        let background = config.background_image.clone();
        let patch = config.flight_patch.clone();
        let flags = config.compose_flags();
        let output = output.to_path_buf();

        debug!("🖌️  Composing flight patch with {:?}", flags);
        let written = tokio::task::spawn_blocking(move || {
            let renderer = GlyphRenderer::new(FontLibrary::new(font_dirs));
            let canvas = FlightPatchComposer::from_image(&background, renderer)?
                .compose(&patch, flags)?;
            save_image(&canvas, &output, ImageFormat::Png)?;
            Ok::<_, crate::error::ComposeError>(output)
        })
        .await?
        .with_context(|| format!("Failed to compose panel background for {}", config.display_name()))?;

        info!("🖼️  Generated panel background {}", written.display());
        Ok(written)
    }

    /// Save the current theme, build the panel background and apply the
    /// aircraft theme. Returns the theme that was applied.
    pub async fn activate(&self, config: &FlatPanelConfig) -> Result<Theme> {
        info!("✈️  Loading: {}", config.display_name());

        self.save_current_theme().await?;

        let wallpaper = if config.add_flight_patch {
            self.render(config, &self.settings.panel_background_path())
                .await?
        } else {
            config.background_image.clone()
        };

        let mut theme = config.theme.clone();
        theme.wallpaper = std::path::absolute(&wallpaper)
            .with_context(|| format!("Invalid wallpaper path '{}'", wallpaper.display()))?;

        let themes = self.themes.clone();
        let applied = theme.clone();
        tokio::task::spawn_blocking(move || themes.load_theme(&applied)).await??;

        info!("✅ Activated theme");
        Ok(theme)
    }

    /// Activate `config` and keep it until Ctrl-C, then restore the
    /// original theme.
    pub async fn run(&self, config: &FlatPanelConfig) -> Result<()> {
        self.activate(config).await?;

        info!("🛫 Theme active, press Ctrl-C to restore the original theme");
        match signal::ctrl_c().await {
            Ok(()) => info!("🛑 Received shutdown signal"),
            Err(e) => warn!("⚠️  Could not listen for shutdown signal: {}", e),
        }

        self.restore_original_theme().await?;
        Ok(())
    }
}
