//! # CSV Line Parser
//!
//! Splits a single line of text into fields. This is deliberately not a full
//! CSV reader: quoted fields never span lines, and unbalanced quotes are not
//! an error. They just flip the parser into (or out of) quote mode for the
//! rest of the line.
//!
//! ```text
//! "Capital of France","Paris"   →  [Capital of France, Paris]
//! "say ""hi""",greeting        →  [say "hi", greeting]
//! a,"b,c",d                    →  [a, b,c, d]
//! ```

/// Split `line` into fields.
///
/// A comma outside quotes ends a field. A quote toggles quote mode, except
/// that two consecutive quotes inside quote mode produce one literal quote.
/// The trailing field is always flushed, so `""` yields one empty field.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Join fields back into one line, quoting any field that needs it.
///
/// Inverse of [`split_line`] for fields that contain no line breaks.
pub fn join_fields<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
