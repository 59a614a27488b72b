//! Table editing options
//!
//! Stores user preferences in `~/.config/pipetab/config.yaml`. Every
//! command receives the options explicitly; nothing reads them ambiently.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::table::Alignment;
use crate::util::WidthPolicy;

/// Alignment applied to header cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAlignment {
    /// Same as the column's body cells
    #[default]
    Follow,
    Left,
    Right,
    Center,
}

/// Options shared by every table command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// Characters allowed before the first pipe besides whitespace (e.g. `>`)
    #[serde(default)]
    pub left_margin_chars: BTreeSet<char>,

    /// Minimum content width of a column
    #[serde(default = "default_min_content_width")]
    pub min_content_width: usize,

    /// Treat East Asian Ambiguous characters as wide
    #[serde(default = "default_ambiguous_as_wide")]
    pub ambiguous_as_wide: bool,

    /// Characters always measured as two columns
    #[serde(default)]
    pub always_wide_chars: BTreeSet<char>,

    /// Characters always measured as one column
    #[serde(default)]
    pub always_narrow_chars: BTreeSet<char>,

    /// How `---` columns are rendered (`default` means left)
    #[serde(default = "default_default_alignment")]
    pub default_alignment: Alignment,

    /// How header cells are rendered
    #[serde(default)]
    pub header_alignment: HeaderAlignment,

    /// Remember the starting column across next-cell / next-row sequences
    #[serde(default)]
    pub smart_cursor: bool,
}

fn default_min_content_width() -> usize {
    3
}

fn default_ambiguous_as_wide() -> bool {
    true
}

fn default_default_alignment() -> Alignment {
    Alignment::Left
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            left_margin_chars: BTreeSet::new(),
            min_content_width: default_min_content_width(),
            ambiguous_as_wide: default_ambiguous_as_wide(),
            always_wide_chars: BTreeSet::new(),
            always_narrow_chars: BTreeSet::new(),
            default_alignment: default_default_alignment(),
            header_alignment: HeaderAlignment::default(),
            smart_cursor: false,
        }
    }
}

impl TableOptions {
    pub fn with_min_content_width(mut self, width: usize) -> Self {
        self.min_content_width = width;
        self
    }

    pub fn with_smart_cursor(mut self, enabled: bool) -> Self {
        self.smart_cursor = enabled;
        self
    }

    pub fn with_header_alignment(mut self, alignment: HeaderAlignment) -> Self {
        self.header_alignment = alignment;
        self
    }

    pub fn with_left_margin_chars(mut self, chars: &str) -> Self {
        self.left_margin_chars = chars.chars().collect();
        self
    }

    /// Width measurement policy derived from these options
    pub fn width_policy(&self) -> WidthPolicy<'_> {
        WidthPolicy::new(
            self.ambiguous_as_wide,
            &self.always_wide_chars,
            &self.always_narrow_chars,
        )
    }

    /// Alignment used to render a body cell in a column aligned `alignment`
    pub fn body_alignment(&self, alignment: Alignment) -> Alignment {
        match alignment {
            Alignment::Default => match self.default_alignment {
                Alignment::Default => Alignment::Left,
                other => other,
            },
            other => other,
        }
    }

    /// Alignment used to render a header cell in a column aligned `alignment`
    pub fn header_cell_alignment(&self, alignment: Alignment) -> Alignment {
        match self.header_alignment {
            HeaderAlignment::Follow => self.body_alignment(alignment),
            HeaderAlignment::Left => Alignment::Left,
            HeaderAlignment::Right => Alignment::Right,
            HeaderAlignment::Center => Alignment::Center,
        }
    }

    /// Load options from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(options) => {
                tracing::info!("Loaded config from {}", path.display());
                options
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load options from an explicit YAML file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Save options to the default config file
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save options to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
