use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::ThemeError;

const DWM_SUBKEY: &str = r"SOFTWARE\Microsoft\Windows\DWM";
const EXPLORER_ACCENT_SUBKEY: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Explorer\Accent";

/// The four numeric desktop settings a theme controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeSetting {
    DwmAccentColor,
    DwmAccentColorInactive,
    DwmColorPrevalence,
    ExplorerAccentColorMenu,
}

impl ThemeSetting {
    pub const ALL: [ThemeSetting; 4] = [
        ThemeSetting::DwmAccentColor,
        ThemeSetting::DwmAccentColorInactive,
        ThemeSetting::DwmColorPrevalence,
        ThemeSetting::ExplorerAccentColorMenu,
    ];

    /// Settings store key holding the value.
    pub fn subkey(self) -> &'static str {
        match self {
            ThemeSetting::ExplorerAccentColorMenu => EXPLORER_ACCENT_SUBKEY,
            _ => DWM_SUBKEY,
        }
    }

    pub fn value_name(self) -> &'static str {
        match self {
            ThemeSetting::DwmAccentColor => "AccentColor",
            ThemeSetting::DwmAccentColorInactive => "AccentColorInactive",
            ThemeSetting::DwmColorPrevalence => "ColorPrevalence",
            ThemeSetting::ExplorerAccentColorMenu => "AccentColorMenu",
        }
    }
}

/// Access to the desktop's theme settings and wallpaper.
///
/// Calls may block (spawn processes, touch the settings store), so async
/// callers should run them on a blocking thread.
pub trait DesktopBackend: Send + Sync {
    fn read_setting(&self, setting: ThemeSetting) -> Result<u32, ThemeError>;

    fn write_setting(&self, setting: ThemeSetting, value: u32) -> Result<(), ThemeError>;

    fn wallpaper(&self) -> Result<PathBuf, ThemeError>;

    fn set_wallpaper(&self, path: &Path) -> Result<(), ThemeError>;
}

/// Shell command templates used by [`CommandBackend`].
///
/// Placeholders: `[subkey]` and `[name]` identify the setting, `[value]` is
/// the decimal value to write, `[file]` the wallpaper path.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DesktopCommands {
    #[serde(default = "default_read_setting")]
    pub read_setting: String,

    #[serde(default = "default_write_setting")]
    pub write_setting: String,

    #[serde(default = "default_read_wallpaper")]
    pub read_wallpaper: String,

    #[serde(default = "default_write_wallpaper")]
    pub write_wallpaper: String,
}

fn default_read_setting() -> String {
    r#"reg query "HKCU\[subkey]" /v [name]"#.to_string()
}

fn default_write_setting() -> String {
    r#"reg add "HKCU\[subkey]" /v [name] /t REG_DWORD /d [value] /f"#.to_string()
}

fn default_read_wallpaper() -> String {
    r#"reg query "HKCU\Control Panel\Desktop" /v WallPaper"#.to_string()
}

fn default_write_wallpaper() -> String {
    r#"reg add "HKCU\Control Panel\Desktop" /v WallPaper /t REG_SZ /d "[file]" /f && RUNDLL32.EXE user32.dll,UpdatePerUserSystemParameters"#.to_string()
}

impl Default for DesktopCommands {
    fn default() -> Self {
        Self {
            read_setting: default_read_setting(),
            write_setting: default_write_setting(),
            read_wallpaper: default_read_wallpaper(),
            write_wallpaper: default_write_wallpaper(),
        }
    }
}

/// Backend that shells out to configurable commands.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    commands: DesktopCommands,
}

impl CommandBackend {
    pub fn new(commands: DesktopCommands) -> Self {
        Self { commands }
    }

    fn setting_command(template: &str, setting: ThemeSetting) -> String {
        template
            .replace("[subkey]", setting.subkey())
            .replace("[name]", setting.value_name())
    }

    fn execute(&self, command: &str) -> Result<String, ThemeError> {
        debug!("🖥️  Running desktop command: {}", command);

        let result = if cfg!(windows) {
            Command::new("cmd").args(["/C", command]).output()
        } else {
            Command::new("sh").args(["-c", command]).output()
        };
        let output = result.map_err(|source| ThemeError::SpawnFailed {
            command: command.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(ThemeError::CommandFailed {
                command: command.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl DesktopBackend for CommandBackend {
    fn read_setting(&self, setting: ThemeSetting) -> Result<u32, ThemeError> {
        let command = Self::setting_command(&self.commands.read_setting, setting);
        let output = self.execute(&command)?;
        parse_dword(&output).ok_or_else(|| ThemeError::UnexpectedOutput {
            setting: setting.value_name().to_string(),
            output: output.trim().to_string(),
        })
    }

    fn write_setting(&self, setting: ThemeSetting, value: u32) -> Result<(), ThemeError> {
        let command = Self::setting_command(&self.commands.write_setting, setting)
            .replace("[value]", &value.to_string());
        self.execute(&command).map(|_| ())
    }

    fn wallpaper(&self) -> Result<PathBuf, ThemeError> {
        let output = self.execute(&self.commands.read_wallpaper)?;
        parse_wallpaper(&output)
            .map(PathBuf::from)
            .ok_or_else(|| ThemeError::UnexpectedOutput {
                setting: "WallPaper".to_string(),
                output: output.trim().to_string(),
            })
    }

    fn set_wallpaper(&self, path: &Path) -> Result<(), ThemeError> {
        let command = self
            .commands
            .write_wallpaper
            .replace("[file]", &path.to_string_lossy());
        self.execute(&command).map(|_| ())
    }
}

/// Last number in `output`, as `0x` hex or decimal.
fn parse_dword(output: &str) -> Option<u32> {
    output.split_whitespace().rev().find_map(|token| {
        match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => token.parse().ok(),
        }
    })
}

/// Wallpaper path from either `reg query` output (text after `REG_SZ`) or a
/// plain command printing the path, possibly quoted or as a `file://` URI.
fn parse_wallpaper(output: &str) -> Option<String> {
    let raw = match output.lines().find_map(|line| line.split_once("REG_SZ")) {
        Some((_, value)) => value.trim(),
        None => output.lines().rev().map(str::trim).find(|l| !l.is_empty())?,
    };

    let unquoted = raw.trim_matches(|c| c == '\'' || c == '"');
    let path = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    Some(path.to_string())
}
