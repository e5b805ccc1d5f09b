//! Output formatting helpers shared by command modules.

use closet_core::models::CredentialGroup;

/// Escape a value for a CSV field
///
/// Fields containing commas, quotes or line breaks are quoted, with inner
/// quotes doubled.
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Shortens `value` to at most `max` characters, ending in "..."
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Renders a group forest as an indented tree, one group per line
///
/// Each line shows the credential count and marks inactive groups.
pub fn render_tree(forest: &[CredentialGroup]) -> String {
    let mut out = String::new();
    for group in forest {
        render_node(group, 0, &mut out);
    }
    out
}

fn render_node(group: &CredentialGroup, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let marker = if group.has_children() { "+" } else { "-" };
    out.push_str(&format!(
        "{indent}{marker} {} ({})",
        group.display_name(),
        group.total_credential_count.max(group.credential_count)
    ));
    if !group.is_active {
        out.push_str(" [inactive]");
    }
    out.push('\n');
    for child in &group.children {
        render_node(child, depth + 1, out);
    }
}
