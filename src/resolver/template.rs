//! `${Label}` placeholder handling for text nodes.

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Labels referenced by `${Label}` placeholders, in order of appearance.
pub fn placeholders(raw: &str) -> Vec<&str> {
    let mut labels = Vec::new();
    let mut rest = raw;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        match after.find(CLOSE) {
            Some(end) => {
                labels.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    labels
}

/// Replaces each `${Label}` with `lookup(Label)`. Placeholders the lookup does
/// not know are copied verbatim. Single pass: text produced by a substitution
/// is never scanned again, so the result does not depend on how often it runs.
pub fn substitute<F>(raw: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        let label = &after[..end];
        match lookup(label) {
            Some(value) => out.push_str(&value),
            None => {
                out.push_str(OPEN);
                out.push_str(label);
                out.push(CLOSE);
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
