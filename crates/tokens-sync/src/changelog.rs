//! Pull request title and body rendering

use crate::report::FileChange;

/// Entries listed per section before the rest are summarized
pub const MAX_LISTED: usize = 50;

/// `Update design tokens (+3 ~1 -0)`
pub fn render_title(files: &[FileChange]) -> String {
    let (added, modified, removed) = files.iter().fold((0, 0, 0), |(a, m, r), f| {
        (
            a + f.changes.added.len(),
            m + f.changes.modified.len(),
            r + f.changes.removed.len(),
        )
    });
    format!("Update design tokens (+{} ~{} -{})", added, modified, removed)
}

/// Markdown body with one section per changed file
pub fn render_body(files: &[FileChange]) -> String {
    let mut body = String::from("Design token changes exported from the variable store.\n");
    for file in files {
        body.push_str(&format!("\n### {}\n", file.path));
        render_list(&mut body, "Added", &file.changes.added);
        render_list(&mut body, "Modified", &file.changes.modified);
        render_list(&mut body, "Removed", &file.changes.removed);
    }
    body
}

fn render_list(body: &mut String, heading: &str, paths: &[String]) {
    if paths.is_empty() {
        return;
    }
    body.push_str(&format!("\n**{}** ({})\n\n", heading, paths.len()));
    for path in paths.iter().take(MAX_LISTED) {
        body.push_str(&format!("- `{}`\n", path));
    }
    if paths.len() > MAX_LISTED {
        body.push_str(&format!("- …and {} more\n", paths.len() - MAX_LISTED));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokens_core::ChangeSet;

    fn change(path: &str, added: &[&str], modified: &[&str], removed: &[&str]) -> FileChange {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect();
        FileChange {
            path: path.to_string(),
            changes: ChangeSet {
                added: owned(added),
                modified: owned(modified),
                removed: owned(removed),
            },
        }
    }

    #[test]
    fn test_title_totals_all_files() {
        let files = vec![
            change("tokens/tokens.json", &["a", "b"], &["c"], &[]),
            change("tokens/brands/acme/tokens.json", &["d"], &[], &["e"]),
        ];
        assert_eq!(render_title(&files), "Update design tokens (+3 ~1 -1)");
    }

    #[test]
    fn test_body_sections() {
        let body = render_body(&[change("tokens/tokens.json", &["color.brand"], &[], &["spacing.xl"])]);
        assert!(body.contains("### tokens/tokens.json"));
        assert!(body.contains("**Added** (1)\n\n- `color.brand`"));
        assert!(body.contains("**Removed** (1)\n\n- `spacing.xl`"));
        assert!(!body.contains("**Modified**"));
    }

    #[test]
    fn test_long_lists_are_capped() {
        let many: Vec<String> = (0..60).map(|i| format!("t{}", i)).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let body = render_body(&[change("x.json", &refs, &[], &[])]);
        assert!(body.contains("- `t49`"));
        assert!(!body.contains("- `t50`"));
        assert!(body.contains("…and 10 more"));
    }
}
