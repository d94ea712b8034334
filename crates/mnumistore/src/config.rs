//! # Configuration
//!
//! Settings are loaded with [`confique`] from, in priority order:
//!
//! 1. **Environment variables**: `MNUMI_DATA_DIR`, `MNUMI_API_URL`, ...
//! 2. **Config file**: `mnumi.toml` in the OS config directory (via
//!    `directories`), or the file passed explicitly.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir | Base directory holding the resource directories |
//! | `date_format` | `%B %-d, %Y` | strftime date part of `modified` |
//! | `time_format` | `%-I:%M %P` | strftime time part of `modified` |
//! | `utc_offset_minutes` | `0` | Site timezone for `modified` |
//! | `order` | `store` | Listing order, `store` or `name` |
//! | `per_page` | `10` | Page size when none is requested |
//! | `api_url` | `http://localhost/wp-json` | REST root used in links |
//! | `files_url` | `http://localhost/wp-content/uploads` | Public URL of `data_dir` |
//! | `dictionary_dir` | none | Directory of `<language>.json` source texts |

use crate::dictionary::{Dictionary, EmptyDictionary, JsonDictionary};
use crate::error::{Result, StoreError};
use crate::mapper::RenderContext;
use crate::metadata::{ModifiedFormat, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};
use crate::query::{SortOrder, DEFAULT_PER_PAGE, MAX_PER_PAGE};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "mnumi.toml";

const DEFAULT_API_URL: &str = "http://localhost/wp-json";
const DEFAULT_FILES_URL: &str = "http://localhost/wp-content/uploads";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DesignerConfig {
    /// Base directory; calendars and translations live in subdirectories.
    #[config(env = "MNUMI_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[config(env = "MNUMI_DATE_FORMAT", default = "%B %-d, %Y")]
    pub date_format: String,

    #[config(env = "MNUMI_TIME_FORMAT", default = "%-I:%M %P")]
    pub time_format: String,

    #[config(env = "MNUMI_UTC_OFFSET_MINUTES", default = 0)]
    pub utc_offset_minutes: i32,

    /// `store` or `name`.
    #[config(env = "MNUMI_ORDER", default = "store")]
    pub order: String,

    #[config(env = "MNUMI_PER_PAGE", default = 10)]
    pub per_page: u32,

    #[config(env = "MNUMI_API_URL", default = "http://localhost/wp-json")]
    pub api_url: String,

    #[config(env = "MNUMI_FILES_URL", default = "http://localhost/wp-content/uploads")]
    pub files_url: String,

    #[config(env = "MNUMI_DICTIONARY_DIR")]
    pub dictionary_dir: Option<PathBuf>,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            utc_offset_minutes: 0,
            order: "store".to_string(),
            per_page: DEFAULT_PER_PAGE,
            api_url: DEFAULT_API_URL.to_string(),
            files_url: DEFAULT_FILES_URL.to_string(),
            dictionary_dir: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "mnumi")
}

/// `mnumi.toml` in the OS config directory.
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl DesignerConfig {
    /// Loads env over file over defaults. An explicit `path` must exist;
    /// the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(StoreError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                builder = builder.file(path);
            }
            None => {
                if let Some(path) = default_config_file() {
                    builder = builder.file(path);
                }
            }
        }
        let config = builder
            .load()
            .map_err(|e| StoreError::Config(e.to_string()))?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| StoreError::Config("no home directory to derive data_dir from".into())),
        }
    }

    pub fn sort_order(&self) -> Result<SortOrder> {
        self.order
            .parse()
            .map_err(|_| StoreError::Config(format!("order must be store or name, got {}", self.order)))
    }

    pub fn default_per_page(&self) -> Result<u32> {
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(StoreError::Config(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }
        Ok(self.per_page)
    }

    pub fn modified_format(&self) -> Result<ModifiedFormat> {
        ModifiedFormat::new(&self.date_format, &self.time_format, self.utc_offset_minutes)
    }

    pub fn render_context(&self) -> Result<RenderContext> {
        Ok(RenderContext::new(&self.api_url, &self.files_url)?.with_format(self.modified_format()?))
    }

    /// Source texts for translations; none configured means every lookup
    /// is empty.
    pub fn dictionary(&self) -> Box<dyn Dictionary> {
        match &self.dictionary_dir {
            Some(dir) => Box::new(JsonDictionary::new(dir)),
            None => Box::new(EmptyDictionary),
        }
    }
}
