//! Markdown rendering for the documentation model.

pub mod markdown;

use crate::model::Field;

/// Escape literal pipes inside a markdown table cell.
///
/// Applied to type expressions and free-text cells only; headings and code
/// fences keep their text untouched.
pub(crate) fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Render a field table. A `?` suffix on a field name marks it optional:
/// the marker is stripped and an explicit annotation takes its place.
pub(crate) fn push_field_table(out: &mut Vec<String>, fields: &[Field]) {
    out.push("| Name | Type | Description |".to_string());
    out.push("|------|------|-------------|".to_string());
    for field in fields {
        let (name, badge) = match field.name.strip_suffix('?') {
            Some(base) => (base, " *(optional)*"),
            None => (field.name.as_str(), ""),
        };
        out.push(format!(
            "| `{}`{} | `{}` | {} |",
            name,
            badge,
            escape_cell(&field.ty),
            escape_cell(&field.desc)
        ));
    }
}
