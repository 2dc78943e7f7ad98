use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::category::{CategoryMap, FolderMap};
use crate::error::Result;

const DEFAULTS_TOML: &str = include_str!("../defaults.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFolder {
    pub label: String,
    pub folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub source_path: PathBuf,
    pub output_root: PathBuf,
    pub extension: String,
    pub type_name: String,
    pub type_module: String,
    pub fallback_folder: String,
    pub categories: Vec<CategoryFolder>,
    pub assignments: Vec<Assignment>,
}

/// Where generated files go and how they refer to the shared record type.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub extension: String,
    pub type_name: String,
    pub type_module: String,
}

impl OutputLayout {
    /// Import path of the record type as seen from `<root>/<folder>/<id>.<ext>`.
    pub fn record_type_import(&self) -> String {
        format!("../../{}", self.type_module)
    }

    /// Import path of the record type as seen from `<root>/index.<ext>`.
    pub fn index_type_import(&self) -> String {
        format!("../{}", self.type_module)
    }

    pub fn record_path(&self, folder: &str, id: &str) -> PathBuf {
        self.root.join(folder).join(format!("{}.{}", id, self.extension))
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(format!("index.{}", self.extension))
    }
}

impl Settings {
    /// Layer the embedded defaults, an optional settings file and `TEMPLATES_*`
    /// environment variables. Later layers replace whole top-level keys, so a
    /// file that sets `categories` replaces the built-in table entirely.
    pub fn load(config_file: Option<&Path>) -> Result<Settings> {
        Self::load_layers(config_file, Environment::with_prefix("TEMPLATES"))
    }

    fn load_layers(config_file: Option<&Path>, env: Environment) -> Result<Settings> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULTS_TOML, FileFormat::Toml));
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings = builder.add_source(env).build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn with_source(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.source_path = p;
        }
        self
    }

    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.output_root = p;
        }
        self
    }

    pub fn category_map(&self) -> Result<CategoryMap> {
        CategoryMap::new(
            self.assignments
                .iter()
                .map(|a| (a.id.clone(), a.category.clone())),
        )
    }

    pub fn folder_map(&self) -> Result<FolderMap> {
        FolderMap::new(
            self.categories
                .iter()
                .map(|c| (c.label.clone(), c.folder.clone())),
            self.fallback_folder.clone(),
        )
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout {
            root: self.output_root.clone(),
            extension: self.extension.clone(),
            type_name: self.type_name.clone(),
            type_module: self.type_module.clone(),
        }
    }
}
