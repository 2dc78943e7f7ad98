//! Migration passes for the theatre template catalogue.
//!
//! Two passes, run in order:
//!   1. categorize: insert a `category` field into every known record
//!   2. split: write one file per record, grouped by category folder,
//!      plus an index with flat, per-category and per-id lookups

pub mod categorize;
pub mod category;
pub mod error;
pub mod naming;
pub mod record;
pub mod render;
pub mod scan;
pub mod settings;
pub mod split;
pub mod utils;

pub use categorize::{categorize, CategorizeReport, Categorized};
pub use category::{unmapped_labels, CategoryMap, FolderMap};
pub use error::{MigrateError, Result};
pub use naming::{assign_symbols, symbol_name};
pub use record::{extract_records, Diagnostic, Extraction, TemplateRecord};
pub use settings::{OutputLayout, Settings};
pub use split::{plan, GeneratedFile, SplitPlan};
