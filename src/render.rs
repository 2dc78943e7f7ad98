//! TypeScript text for the generated files.

use itertools::Itertools;

/// One `// heading` block of imports in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGroup {
    pub heading: String,
    pub entries: Vec<IndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub symbol: String,
    /// Module path relative to the index, without extension (`./life/receipt`).
    pub module: String,
}

/// Single-quoted TypeScript string literal.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

pub fn render_record_file(symbol: &str, type_name: &str, type_import: &str, body: &str) -> String {
    format!(
        "import {{ {type_name} }} from {}\n\nexport const {symbol}: {type_name} = {body}\n",
        quote(type_import)
    )
}

pub fn render_index(
    groups: &[IndexGroup],
    labels: &[&str],
    type_name: &str,
    type_import: &str,
    generated_at: &str,
) -> String {
    let total: usize = groups.iter().map(|g| g.entries.len()).sum();
    let mut out = String::new();

    out.push_str("/**\n");
    out.push_str(" * 自动生成 - 请勿手动编辑\n");
    out.push_str(&format!(" * 生成时间: {generated_at}\n"));
    out.push_str(&format!(" * 模板总数: {total}\n"));
    out.push_str(" */\n\n");
    out.push_str(&format!(
        "import {{ {type_name} }} from {}\n",
        quote(type_import)
    ));

    for group in groups.iter().filter(|g| !g.entries.is_empty()) {
        out.push_str(&format!("\n// {}\n", group.heading));
        for entry in &group.entries {
            out.push_str(&format!(
                "import {{ {} }} from {}\n",
                entry.symbol,
                quote(&entry.module)
            ));
        }
    }

    let symbols = groups
        .iter()
        .flat_map(|g| g.entries.iter())
        .map(|e| e.symbol.as_str())
        .join(",\n  ");
    out.push_str("\n// 所有模板\n");
    if symbols.is_empty() {
        out.push_str(&format!("export const allTemplates: {type_name}[] = []\n"));
    } else {
        out.push_str(&format!(
            "export const allTemplates: {type_name}[] = [\n  {symbols}\n]\n"
        ));
    }

    let by_category = labels
        .iter()
        .map(|label| {
            let q = quote(label);
            format!("{q}: allTemplates.filter(t => t.category === {q})")
        })
        .join(",\n  ");
    out.push_str("\n// 按分类索引\n");
    if by_category.is_empty() {
        out.push_str("export const templatesByCategory = {}\n");
    } else {
        out.push_str(&format!(
            "export const templatesByCategory = {{\n  {by_category}\n}}\n"
        ));
    }

    out.push_str("\n// 按ID快速查找\n");
    out.push_str("export const templatesById = allTemplates.reduce((acc, t) => {\n");
    out.push_str("  acc[t.id] = t\n");
    out.push_str("  return acc\n");
    out.push_str(&format!("}}, {{}} as Record<string, {type_name}>)\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(symbol: &str, module: &str) -> IndexEntry {
        IndexEntry {
            symbol: symbol.into(),
            module: module.into(),
        }
    }

    #[test]
    fn record_file_wraps_body() {
        let text = render_record_file(
            "receiptTemplate",
            "TheatreTemplate",
            "../../theatreTemplates",
            "{\n    id: 'receipt'\n  }",
        );
        assert_eq!(
            text,
            "import { TheatreTemplate } from '../../theatreTemplates'\n\n\
             export const receiptTemplate: TheatreTemplate = {\n    id: 'receipt'\n  }\n"
        );
    }

    #[test]
    fn index_lists_groups_in_order() {
        let groups = vec![
            IndexGroup {
                heading: "社交通讯".into(),
                entries: vec![entry("groupChatTemplate", "./social/group_chat")],
            },
            IndexGroup {
                heading: "工作学习".into(),
                entries: vec![],
            },
            IndexGroup {
                heading: "生活消费".into(),
                entries: vec![
                    entry("receiptTemplate", "./life/receipt"),
                    entry("menuTemplate", "./life/menu"),
                ],
            },
        ];
        let text = render_index(
            &groups,
            &["社交通讯", "生活消费", "工作学习"],
            "TheatreTemplate",
            "../theatreTemplates",
            "2025/11/22 15:16:00",
        );
        assert!(text.contains(" * 生成时间: 2025/11/22 15:16:00\n"));
        assert!(text.contains(" * 模板总数: 3\n"));
        assert!(text.starts_with("/**\n * 自动生成 - 请勿手动编辑\n"));
        assert!(text.contains(
            "\n// 社交通讯\nimport { groupChatTemplate } from './social/group_chat'\n\n// 生活消费\n"
        ));
        assert!(!text.contains("// 工作学习"));
        assert!(text.contains(
            "export const allTemplates: TheatreTemplate[] = [\n  groupChatTemplate,\n  receiptTemplate,\n  menuTemplate\n]\n"
        ));
        assert!(text.contains("  '工作学习': allTemplates.filter(t => t.category === '工作学习')\n}"));
        assert!(text.ends_with("}, {} as Record<string, TheatreTemplate>)\n"));
    }

    #[test]
    fn empty_index_still_declares_everything() {
        let text = render_index(&[], &["生活消费"], "T", "../t", "now");
        assert!(text.contains("export const allTemplates: T[] = []\n"));
        assert!(text.contains("'生活消费': allTemplates.filter"));
        assert!(text.contains("\n// 按ID快速查找\nexport const templatesById"));
        assert!(text.contains(" * 模板总数: 0\n"));
    }
}
