use std::path::PathBuf;

use tracing::debug;

use crate::category::FolderMap;
use crate::error::Result;
use crate::naming::assign_symbols;
use crate::record::TemplateRecord;
use crate::render::{render_index, render_record_file, IndexEntry, IndexGroup};
use crate::settings::OutputLayout;
use crate::utils::write_text;

/// One per-record output file, fully rendered.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub id: String,
    pub name: String,
    pub category: String,
    pub folder: String,
    pub symbol: String,
    pub path: PathBuf,
    pub contents: String,
}

/// Everything the split pass will write, computed before touching the disk.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    /// In source order.
    pub files: Vec<GeneratedFile>,
    pub index_path: PathBuf,
    pub index: String,
    /// Non-empty categories with their record counts, in index order.
    pub counts: Vec<(String, usize)>,
}

pub fn plan(
    records: &[TemplateRecord],
    folders: &FolderMap,
    layout: &OutputLayout,
    generated_at: &str,
) -> Result<SplitPlan> {
    let symbols = assign_symbols(records)?;
    let type_import = layout.record_type_import();

    let files: Vec<GeneratedFile> = records
        .iter()
        .zip(symbols)
        .map(|(record, symbol)| {
            let folder = folders.folder_for(&record.category).to_string();
            let path = layout.record_path(&folder, &record.id);
            debug!(id = %record.id, %folder, path = %path.display(), "planned record file");
            GeneratedFile {
                contents: render_record_file(&symbol, &layout.type_name, &type_import, &record.body),
                id: record.id.clone(),
                name: record.name.clone(),
                category: record.category.clone(),
                folder,
                symbol,
                path,
            }
        })
        .collect();

    let groups = group_for_index(&files, folders);
    let counts = groups
        .iter()
        .filter(|g| !g.entries.is_empty())
        .map(|g| (g.heading.clone(), g.entries.len()))
        .collect();
    let labels: Vec<&str> = folders.labels().collect();
    let index = render_index(
        &groups,
        &labels,
        &layout.type_name,
        &layout.index_type_import(),
        generated_at,
    );

    Ok(SplitPlan {
        files,
        index_path: layout.index_path(),
        index,
        counts,
    })
}

/// Known categories in folder-map order, then a single group headed by the
/// fallback folder holding every unknown label in source order, so every
/// record is listed exactly once.
fn group_for_index(files: &[GeneratedFile], folders: &FolderMap) -> Vec<IndexGroup> {
    let entry = |f: &GeneratedFile| IndexEntry {
        symbol: f.symbol.clone(),
        module: format!("./{}/{}", f.folder, f.id),
    };

    let mut groups: Vec<IndexGroup> = folders
        .labels()
        .map(|label| IndexGroup {
            heading: label.to_string(),
            entries: files.iter().filter(|f| f.category == label).map(entry).collect(),
        })
        .collect();
    groups.push(IndexGroup {
        heading: folders.fallback().to_string(),
        entries: files
            .iter()
            .filter(|f| !folders.contains(&f.category))
            .map(entry)
            .collect(),
    });
    groups
}

impl SplitPlan {
    /// Write every record file, then the index. A failing write aborts; files
    /// already written stay on disk.
    pub fn write<F>(&self, mut on_written: F) -> Result<()>
    where
        F: FnMut(usize, &GeneratedFile),
    {
        for (n, file) in self.files.iter().enumerate() {
            write_text(&file.path, &file.contents)?;
            on_written(n + 1, file);
        }
        write_text(&self.index_path, &self.index)
    }
}
