use flatpanel::config::Settings;
use flatpanel::error::ThemeError;
use flatpanel::patch::{ComposeFlags, FlightPatchComposer};
use flatpanel::prompt::Prompter;
use flatpanel::render::{load_image, save_image, Canvas, FontLibrary, GlyphRenderer};
use flatpanel::theme::{DesktopBackend, Theme, ThemeColor, ThemeSetting};
use flatpanel::{ComposeError, FlatPanelConfig, Session};
use image::{ImageFormat, Rgba};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

const A320_CONFIG: &str = r#"{
    "manufacturer": "Airbus",
    "aircraftType": "A320neo",
    "typeDesignatorIcao": "A20N",
    "addFlightPatch": false,
    "addRegistration": true,
    "askForRegistration": true,
    "defaultRegistrationOnEmpty": true,
    "addSelCalCode": true,
    "askForSelCalCode": true,
    "defaultSelCalCodeOnEmpty": false,
    "addCallsign": true,
    "askForCallsign": true,
    "defaultCallsignOnEmpty": true,
    "addDescriptions": true,
    "theme": {
        "dwmAccentColor": {"r": 99, "g": 125, "b": 150},
        "dwmAccentColorInactive": {"r": 99, "g": 125, "b": 150},
        "dwmColorPrevalence": true,
        "explorerAccentColorMenu": {"r": 99, "g": 125, "b": 150}
    },
    "flightPatch": {
        "rectangle": {"x": 20, "y": 10, "width": 200, "height": 60},
        "aircraftRegistration": "D-AIPC",
        "aircraftRegistrationStyle": {
            "fontName": "arial.ttf",
            "fontSize": 24,
            "textColor": {"r": 255, "g": 255, "b": 255},
            "position": {"verticalReference": "Top", "verticalOffset": 0, "horizontalReference": "Left", "horizontalOffset": 0}
        },
        "selCalCode": {"digit1": "C", "digit2": "D", "digit3": "H", "digit4": "J"},
        "selCalCodeStyle": {
            "fontName": "arial.ttf",
            "fontSize": 16,
            "textColor": {"r": 255, "g": 255, "b": 255},
            "position": {"verticalReference": "Top", "verticalOffset": 0, "horizontalReference": "Right", "horizontalOffset": 0}
        },
        "callsign": {"airlineIcaoCode": "DLH", "flightNumber": "2421"},
        "callsignStyle": {
            "fontName": "arial.ttf",
            "fontSize": 16,
            "textColor": {"r": 255, "g": 255, "b": 255},
            "position": {"verticalReference": "Bottom", "verticalOffset": 0, "horizontalReference": "Right", "horizontalOffset": -4}
        },
        "descriptions": [
            {
                "text": "FLAPS",
                "style": {
                    "fontName": "arial.ttf",
                    "fontSize": 12,
                    "textColor": {"r": 200, "g": 200, "b": 200},
                    "position": {"verticalReference": "Bottom", "verticalOffset": -2, "horizontalReference": "Left", "horizontalOffset": 2}
                }
            }
        ]
    },
    "backgroundImage": "background.png"
}"#;

#[derive(Default)]
struct MemoryBackend {
    settings: Mutex<HashMap<ThemeSetting, u32>>,
    wallpaper: Mutex<PathBuf>,
}

impl MemoryBackend {
    fn with_theme(theme: &Theme) -> Self {
        let backend = Self::default();
        backend
            .write_setting(ThemeSetting::DwmAccentColor, theme.dwm_accent_color.to_dword())
            .unwrap();
        backend
            .write_setting(
                ThemeSetting::DwmAccentColorInactive,
                theme.dwm_accent_color_inactive.to_dword(),
            )
            .unwrap();
        backend
            .write_setting(
                ThemeSetting::DwmColorPrevalence,
                u32::from(theme.dwm_color_prevalence),
            )
            .unwrap();
        backend
            .write_setting(
                ThemeSetting::ExplorerAccentColorMenu,
                theme.explorer_accent_color_menu.to_dword(),
            )
            .unwrap();
        backend.set_wallpaper(&theme.wallpaper).unwrap();
        backend
    }
}

impl DesktopBackend for MemoryBackend {
    fn read_setting(&self, setting: ThemeSetting) -> Result<u32, ThemeError> {
        Ok(self.settings.lock().unwrap().get(&setting).copied().unwrap_or(0))
    }

    fn write_setting(&self, setting: ThemeSetting, value: u32) -> Result<(), ThemeError> {
        self.settings.lock().unwrap().insert(setting, value);
        Ok(())
    }

    fn wallpaper(&self) -> Result<PathBuf, ThemeError> {
        Ok(self.wallpaper.lock().unwrap().clone())
    }

    fn set_wallpaper(&self, path: &Path) -> Result<(), ThemeError> {
        *self.wallpaper.lock().unwrap() = path.to_path_buf();
        Ok(())
    }
}

fn original_theme() -> Theme {
    let orange = ThemeColor::new(247, 86, 22);
    Theme {
        dwm_accent_color: orange,
        dwm_accent_color_inactive: ThemeColor::new(99, 125, 150),
        dwm_color_prevalence: false,
        explorer_accent_color_menu: orange,
        wallpaper: PathBuf::from("/home/pilot/original.jpg"),
    }
}

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("a320.json");
    std::fs::write(&path, A320_CONFIG).unwrap();
    let background = Canvas::from_pixel(240, 80, Rgba([30, 30, 30, 255]));
    save_image(&background, dir.join("background.png"), ImageFormat::Png).unwrap();
    path
}

fn test_settings(dir: &Path) -> Settings {
    Settings {
        state_dir: dir.join("state"),
        font_dirs: vec![dir.join("fonts")],
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path());

    let config = FlatPanelConfig::load(&path).await.expect("Failed to load config");

    assert_eq!(config.display_name(), "Airbus A320neo (A20N)");
    assert_eq!(config.background_image, dir.path().join("background.png"));
    assert_eq!(config.flight_patch.sel_cal_code.to_string(), "CD-HJ");
    assert_eq!(config.flight_patch.callsign.to_string(), "DLH 2421");
    assert_eq!(config.flight_patch.descriptions.len(), 1);
    assert_eq!(config.theme.wallpaper, PathBuf::new());
    assert_eq!(config.compose_flags(), ComposeFlags::all());
}

#[tokio::test]
async fn test_config_with_invalid_callsign_is_rejected() {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(A320_CONFIG.replace("\"2421\"", "\"0421\"").as_bytes())
        .expect("Failed to write to temp file");

    let err = FlatPanelConfig::load(temp_file.path()).await.unwrap_err();
    assert!(format!("{err:#}").contains("not a valid flight number"));
}

#[tokio::test]
async fn test_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = FlatPanelConfig::load(write_config(dir.path())).await.unwrap();

    let saved = dir.path().join("saved.json");
    config.save(&saved).await.unwrap();
    let reloaded = FlatPanelConfig::load(&saved).await.unwrap();
    assert_eq!(reloaded, config);
}

#[tokio::test]
async fn test_prompts_fill_in_values() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = FlatPanelConfig::load(write_config(dir.path())).await.unwrap();

    // Registration kept (default on empty), SelCal left empty without a
    // default, callsign re-entered after one invalid answer.
    let input = "\n\nab123\nbaw12\n";
    let mut output = Vec::new();
    Prompter::new(Cursor::new(input), &mut output)
        .fill_in(&mut config)
        .unwrap();

    assert!(config.add_registration);
    assert_eq!(config.flight_patch.aircraft_registration, "D-AIPC");
    assert!(!config.add_sel_cal_code);
    assert!(config.add_callsign);
    assert_eq!(config.flight_patch.callsign.to_string(), "BAW 12");

    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("Aircraft registration [D-AIPC]: "));
    assert!(transcript.contains("SelCal code [CD-HJ]: "));
    assert!(transcript.contains("\"AB1\" is not a valid ICAO airline code"));
}

#[tokio::test]
async fn test_activate_and_restore() {
    let dir = tempfile::tempdir().unwrap();
    let config = FlatPanelConfig::load(write_config(dir.path())).await.unwrap();

    let backend = Arc::new(MemoryBackend::with_theme(&original_theme()));
    let session = Session::with_backend(test_settings(dir.path()), backend.clone());

    let applied = session.activate(&config).await.unwrap();
    assert_eq!(applied.dwm_accent_color, ThemeColor::new(99, 125, 150));
    assert!(applied.dwm_color_prevalence);
    assert_eq!(applied.wallpaper, dir.path().join("background.png"));
    assert_eq!(*backend.wallpaper.lock().unwrap(), applied.wallpaper);

    let snapshot = Theme::load(session.settings().original_theme_path())
        .await
        .unwrap();
    assert_eq!(snapshot, original_theme());

    let restored = session.restore_original_theme().await.unwrap();
    assert_eq!(restored, original_theme());
    assert_eq!(
        backend.settings.lock().unwrap()[&ThemeSetting::DwmAccentColor],
        ThemeColor::new(247, 86, 22).to_dword()
    );
    assert_eq!(
        *backend.wallpaper.lock().unwrap(),
        PathBuf::from("/home/pilot/original.jpg")
    );
}

#[tokio::test]
async fn test_restore_without_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::with_backend(
        test_settings(dir.path()),
        Arc::new(MemoryBackend::default()),
    );
    let err = session.restore_original_theme().await.unwrap_err();
    assert!(err.to_string().contains("No saved original theme"));
}

#[tokio::test]
async fn test_activate_with_missing_font_fails_before_applying() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = FlatPanelConfig::load(write_config(dir.path())).await.unwrap();
    config.add_flight_patch = true;
    for style in [
        &mut config.flight_patch.aircraft_registration_style,
        &mut config.flight_patch.sel_cal_code_style,
        &mut config.flight_patch.callsign_style,
    ] {
        style.font_name = "no-such-font-anywhere.ttf".to_string();
    }

    let backend = Arc::new(MemoryBackend::with_theme(&original_theme()));
    let session = Session::with_backend(test_settings(dir.path()), backend.clone());

    let err = session.activate(&config).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ComposeError>(),
        Some(ComposeError::FontLoad { .. })
    ));
    // The desktop still shows the original theme.
    assert_eq!(
        *backend.wallpaper.lock().unwrap(),
        PathBuf::from("/home/pilot/original.jpg")
    );
}

#[tokio::test]
async fn test_render_without_items_copies_background() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = FlatPanelConfig::load(write_config(dir.path())).await.unwrap();
    config.add_registration = false;
    config.add_sel_cal_code = false;
    config.add_callsign = false;
    config.add_descriptions = false;

    let session = Session::with_backend(
        test_settings(dir.path()),
        Arc::new(MemoryBackend::default()),
    );
    let output = dir.path().join("out").join("panel.png");
    let written = session.render(&config, &output).await.unwrap();

    assert_eq!(written, output);
    assert_eq!(
        load_image(&output).unwrap(),
        load_image(dir.path().join("background.png")).unwrap()
    );
}

#[test]
fn test_glyph_renderer_reports_font_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_json: serde_json::Value = serde_json::from_str(A320_CONFIG).unwrap();
    let patch: flatpanel::FlightPatch =
        serde_json::from_value(config_json["flightPatch"].clone()).unwrap();

    let renderer = GlyphRenderer::new(FontLibrary::with_dirs(vec![dir.path().to_path_buf()]));
    let err = FlightPatchComposer::new(Canvas::new(240, 80), renderer)
        .compose(&patch, ComposeFlags::all())
        .unwrap_err();
    assert!(matches!(err, ComposeError::FontLoad { ref name, .. } if name == "arial.ttf"));
}
