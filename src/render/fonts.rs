use fontdue::{Font, FontSettings};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ComposeError;

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Locates fonts by file name or path and keeps parsed fonts around for the
/// lifetime of the library.
#[derive(Default)]
pub struct FontLibrary {
    search_dirs: Vec<PathBuf>,
    loaded: HashMap<String, Arc<Font>>,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("search_dirs", &self.search_dirs)
            .field("loaded", &self.loaded.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FontLibrary {
    /// Library searching `extra_dirs` first, then the platform font folders.
    pub fn new(extra_dirs: Vec<PathBuf>) -> Self {
        let mut search_dirs = extra_dirs;
        search_dirs.extend(Self::system_font_dirs());
        Self::with_dirs(search_dirs)
    }

    /// Library searching exactly `search_dirs`.
    pub fn with_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs,
            loaded: HashMap::new(),
        }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn system_font_dirs() -> Vec<PathBuf> {
        let mut found = Vec::new();

        if cfg!(windows) {
            let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".to_string());
            found.push(PathBuf::from(windir).join("Fonts"));
            if let Some(local) = dirs::data_local_dir() {
                found.push(local.join("Microsoft").join("Windows").join("Fonts"));
            }
        } else if cfg!(target_os = "macos") {
            found.push(PathBuf::from("/Library/Fonts"));
            found.push(PathBuf::from("/System/Library/Fonts"));
            if let Some(home) = dirs::home_dir() {
                found.push(home.join("Library").join("Fonts"));
            }
        } else {
            if let Some(data) = dirs::data_dir() {
                found.push(data.join("fonts"));
            }
            if let Some(home) = dirs::home_dir() {
                found.push(home.join(".fonts"));
            }
            found.push(PathBuf::from("/usr/local/share/fonts"));
            found.push(PathBuf::from("/usr/share/fonts"));
        }

        found
    }

    /// Find the file for `name`. An existing path wins, otherwise the search
    /// directories are walked for a case-insensitive file name match, trying
    /// the usual font extensions when `name` has none.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let expanded = shellexpand::tilde(name);
        let direct = Path::new(expanded.as_ref());
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        let file_name = direct.file_name()?.to_string_lossy().to_lowercase();
        let candidates: Vec<String> = if direct.extension().is_some() {
            vec![file_name]
        } else {
            FONT_EXTENSIONS
                .iter()
                .map(|ext| format!("{file_name}.{ext}"))
                .collect()
        };

        self.search_dirs
            .iter()
            .find_map(|dir| find_in_dir(dir, &candidates))
    }

    /// Parsed font for `name`, loading it on first use.
    pub fn load(&mut self, name: &str) -> Result<Arc<Font>, ComposeError> {
        if let Some(font) = self.loaded.get(name) {
            return Ok(Arc::clone(font));
        }

        let path = self.resolve(name).ok_or_else(|| ComposeError::FontLoad {
            name: name.to_string(),
            reason: format!("not found in {} search directories", self.search_dirs.len()),
        })?;
        debug!("🔤 Loading font '{}' from {}", name, path.display());

        let bytes = std::fs::read(&path).map_err(|e| ComposeError::FontLoad {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        let font = Font::from_bytes(bytes, FontSettings::default()).map_err(|e| {
            ComposeError::FontLoad {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;

        let font = Arc::new(font);
        self.loaded.insert(name.to_string(), Arc::clone(&font));
        Ok(font)
    }
}

fn find_in_dir(dir: &Path, candidates: &[String]) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if dir.exists() {
                warn!("Cannot read font directory {}: {}", dir.display(), e);
            }
            return None;
        }
    };

    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
            continue;
        }
        let matches = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .is_some_and(|n| candidates.contains(&n));
        if matches {
            return Some(path);
        }
    }

    // Files in a directory take precedence over nested folders.
    subdirs.sort();
    subdirs.iter().find_map(|sub| find_in_dir(sub, candidates))
}
