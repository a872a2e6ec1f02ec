//! Rendering of tool replies
//!
//! Every successful tool call answers with one text block: a short prose
//! summary for the agent or human reading it, then the exact structured
//! payload in a fenced JSON block.

use crate::error::McpResult;
use serde::Serialize;

/// Prose summary followed by the payload as pretty JSON
pub fn dual_format<T: Serialize + ?Sized>(summary: &str, payload: &T) -> McpResult<String> {
    let json = serde_json::to_string_pretty(payload)?;
    Ok(format!("{}\n\n```json\n{json}\n```", summary.trim_end()))
}

/// Markdown bullet list, or `empty` when there are no lines
pub fn bullet_list<I, S>(lines: I, empty: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rendered: Vec<String> = lines.into_iter().map(|line| format!("- {}", line.as_ref())).collect();
    if rendered.is_empty() {
        empty.to_string()
    } else {
        rendered.join("\n")
    }
}

/// Comma-separated items, or "none recorded"
pub fn inline_list(items: &[String]) -> String {
    if items.is_empty() {
        "none recorded".to_string()
    } else {
        items.join(", ")
    }
}

/// "1 visit" / "3 visits"
pub fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dual_format_ends_with_json_fence() {
        let text = dual_format("Found 1 patient.\n", &json!({"id": "p1"})).unwrap();
        assert!(text.starts_with("Found 1 patient.\n\n```json\n"));
        assert!(text.ends_with("\n```"));

        let fenced = text
            .split("```json\n")
            .nth(1)
            .and_then(|rest| rest.strip_suffix("\n```"))
            .unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(fenced).unwrap(), json!({"id": "p1"}));
    }

    #[test]
    fn test_lists() {
        assert_eq!(bullet_list(["a", "b"], "nothing"), "- a\n- b");
        assert_eq!(bullet_list(Vec::<String>::new(), "nothing"), "nothing");
        assert_eq!(inline_list(&[]), "none recorded");
        assert_eq!(count_noun(1, "task", "tasks"), "1 task");
        assert_eq!(count_noun(0, "task", "tasks"), "0 tasks");
    }
}
