/// Convert a `DD.MM.YYYY` display date to `YYYY-MM-DD`.
///
/// Only the three dot-separated parts are reordered; nothing is validated.
/// Missing parts come out empty, so `"05.03"` becomes `"-03-05"`.
pub fn format_date_to_iso(display: &str) -> String {
    let mut parts = display.split('.');
    let day = parts.next().unwrap_or("");
    let month = parts.next().unwrap_or("");
    let year = parts.next().unwrap_or("");
    format!("{}-{}-{}", year, month, day)
}
