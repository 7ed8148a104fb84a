//! Field value rendering.

use vocadeck_core::SlotValue;

/// Separator between Anki fields in the `flds` column.
pub const FIELD_SEPARATOR: char = '\x1f';

/// Text stored in a note field for a resolved slot.
///
/// Embedded newlines become `<br>`. Media render as their reference;
/// failed and empty slots as an empty field.
pub fn field_value(value: &SlotValue) -> String {
    value
        .field_text()
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
        .replace(FIELD_SEPARATOR, " ")
}

/// Sort-field text: the field with HTML tags removed.
pub fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
