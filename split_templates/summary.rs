use serde::Serialize;
use template_migration::{Diagnostic, SplitPlan};

#[derive(Serialize)]
pub struct SplitSummary<'a> {
    pub written: bool,
    pub total: usize,
    pub index: String,
    pub files: Vec<FileSummary<'a>>,
    pub categories: Vec<CategoryCount<'a>>,
    pub skipped: Vec<String>,
}

#[derive(Serialize)]
pub struct FileSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub symbol: &'a str,
    pub path: String,
}

#[derive(Serialize)]
pub struct CategoryCount<'a> {
    pub category: &'a str,
    pub count: usize,
}

impl<'a> SplitSummary<'a> {
    pub fn new(plan: &'a SplitPlan, diagnostics: &[Diagnostic], written: bool) -> Self {
        SplitSummary {
            written,
            total: plan.files.len(),
            index: plan.index_path.display().to_string(),
            files: plan
                .files
                .iter()
                .map(|f| FileSummary {
                    id: &f.id,
                    name: &f.name,
                    category: &f.category,
                    symbol: &f.symbol,
                    path: f.path.display().to_string(),
                })
                .collect(),
            categories: plan
                .counts
                .iter()
                .map(|(category, count)| CategoryCount {
                    category,
                    count: *count,
                })
                .collect(),
            skipped: diagnostics.iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn print_counts(plan: &SplitPlan) {
    println!("\nPer category:");
    for (category, count) in &plan.counts {
        println!("  {}: {}", category, count);
    }
}
