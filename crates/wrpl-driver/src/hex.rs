use std::fmt::Write;

/// Uppercase, space-separated hex of at most `limit` bytes, followed by
/// `...` when bytes were cut off.
pub(crate) fn preview(bytes: &[u8], limit: usize) -> String {
    let shown = &bytes[..bytes.len().min(limit)];
    let mut out = String::with_capacity(shown.len() * 3 + 3);
    for (i, b) in shown.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02X}");
    }
    if shown.len() < bytes.len() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str("...");
    }
    out
}
