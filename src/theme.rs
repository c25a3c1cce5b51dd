use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ThemeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                background: Rgb(0xF6, 0xF8, 0xFF),
                card: Rgb(0xFE, 0xFE, 0xFE),
                stats_strip: Rgb(0xF6, 0xF8, 0xFF),
                heading: Rgb(0x2B, 0x34, 0x42),
                body: Rgb(0x69, 0x7C, 0x9A),
                link: Rgb(0x4B, 0x6A, 0x9B),
                accent: ACCENT,
                accent_hover: ACCENT_HOVER,
                error: ERROR,
            },
            Self::Dark => Palette {
                background: Rgb(0x14, 0x1D, 0x2F),
                card: Rgb(0x1E, 0x2A, 0x47),
                stats_strip: Rgb(0x14, 0x1D, 0x2F),
                heading: Rgb(0xFF, 0xFF, 0xFF),
                body: Rgb(0xFF, 0xFF, 0xFF),
                link: Rgb(0xFF, 0xFF, 0xFF),
                accent: ACCENT,
                accent_hover: ACCENT_HOVER,
                error: ERROR,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const ACCENT: Rgb = Rgb(0x00, 0x79, 0xFF);
const ACCENT_HOVER: Rgb = Rgb(0x60, 0xAB, 0xFF);
const ERROR: Rgb = Rgb(0xDC, 0x26, 0x26);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub card: Rgb,
    pub stats_strip: Rgb,
    pub heading: Rgb,
    pub body: Rgb,
    pub link: Rgb,
    pub accent: Rgb,
    pub accent_hover: Rgb,
    pub error: Rgb,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTheme {
    mode: ThemeMode,
}

/// Process-wide light/dark preference. Created once at startup; everyone else
/// reads it through [`ThemeProvider::subscribe`].
pub struct ThemeProvider {
    mode: watch::Sender<ThemeMode>,
    store: Option<PathBuf>,
}

impl ThemeProvider {
    pub fn in_memory(initial: ThemeMode) -> Self {
        let (mode, _) = watch::channel(initial);
        Self { mode, store: None }
    }

    /// Restores the saved mode, falling back to light when nothing usable is stored.
    pub fn load(store: Option<PathBuf>) -> Self {
        let initial = store.as_deref().map(read_stored).unwrap_or_default();
        let (mode, _) = watch::channel(initial);
        Self { mode, store }
    }

    pub fn current(&self) -> ThemeMode {
        *self.mode.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.mode.subscribe()
    }

    /// Switches the mode and persists it. Subscribers see the change even if
    /// persisting fails.
    pub fn set(&self, mode: ThemeMode) -> Result<(), ThemeError> {
        self.mode.send_replace(mode);
        self.persist(mode)
    }

    pub fn toggle(&self) -> Result<ThemeMode, ThemeError> {
        let next = self.current().toggled();
        self.set(next)?;
        Ok(next)
    }

    fn persist(&self, mode: ThemeMode) -> Result<(), ThemeError> {
        let Some(path) = &self.store else {
            return Ok(());
        };

        let io_err = |source| ThemeError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let encoded = serde_json::to_string_pretty(&StoredTheme { mode })?;
        fs::write(path, encoded).map_err(io_err)?;
        debug!(path = %path.display(), ?mode, "theme saved");
        Ok(())
    }
}

fn read_stored(path: &Path) -> ThemeMode {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return ThemeMode::default(),
    };
    match serde_json::from_str::<StoredTheme>(&raw) {
        Ok(stored) => stored.mode,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable theme file");
            ThemeMode::default()
        }
    }
}
