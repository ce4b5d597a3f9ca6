// Command-line options and the persisted theme preference.
use crate::types::{Theme, ViewMode};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "revenue_report", version, about = "Monthly revenue collection report")]
pub struct Cli {
    /// Dataset JSON file (defaults to the built-in dataset)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Render once in this view and exit instead of showing the menu
    #[arg(short, long, value_enum)]
    pub view: Option<ViewMode>,

    /// Viewport width in pixels; below 768 the compact layout is used
    #[arg(short, long, default_value_t = 1280)]
    pub width: u32,

    /// Set and remember the colour theme
    #[arg(short, long, value_enum)]
    pub theme: Option<Theme>,

    /// Preference file holding the theme
    #[arg(long, default_value = ".revenue_report.json")]
    pub prefs: PathBuf,

    /// Directory to export charts, tables and the summary into
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub dark_mode: bool,
}

impl Preferences {
    /// Missing or unreadable preferences fall back to the light theme.
    pub fn load(path: &Path) -> Preferences {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Preferences::default(),
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                return Preferences::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt preferences in {}: {}", path.display(), e);
            Preferences::default()
        })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::debug!("Saved preferences to {}", path.display());
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.dark_mode = theme == Theme::Dark;
    }
}
