//! Encoding of a single raw field value into its JSON fragment.

use std::borrow::Cow;

use crate::field::{Cardinality, FieldDefinition};

/// Separator between the values of a list field.
pub const LIST_SEPARATOR: char = ';';

/// Returns `true` when a raw value counts as absent and must not be emitted.
///
/// Absence is decided on the whole raw string before any list splitting.
pub fn is_absent(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Escapes `"` and `\` for embedding in a JSON string. Nothing else is escaped.
pub fn escape(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['"', '\\']) {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Renders a present raw value as the JSON fragment for its field.
pub fn encode_value(raw: &str, definition: &FieldDefinition) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    encode_into(&mut out, raw, definition);
    out
}

pub(crate) fn encode_into(out: &mut String, raw: &str, definition: &FieldDefinition) {
    let escaped = escape(raw);
    match definition.cardinality {
        Cardinality::Many => {
            let quoted = !definition.datatype.is_numeric();
            out.push('[');
            for (i, part) in escaped.split(LIST_SEPARATOR).enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if quoted {
                    out.push('"');
                    out.push_str(part);
                    out.push('"');
                } else {
                    out.push_str(part);
                }
            }
            out.push(']');
        }
        Cardinality::Single => {
            out.push('"');
            out.push_str(&escaped);
            out.push('"');
        }
    }
}
