// Locating the JSON document inside completion text

/// Slice from the first `{` to the last `}`. Surrounding prose and markdown
/// code fences are ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}
