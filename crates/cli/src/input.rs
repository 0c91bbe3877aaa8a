use anyhow::{Context, Result};
use kassa_core::RawMessage;
use std::path::Path;

/// Reads messages exported from the mailbox: either one JSON array or one
/// JSON object per line.
pub fn read_messages(path: &Path) -> Result<Vec<RawMessage>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_messages(&text).with_context(|| format!("In {}", path.display()))
}

pub fn parse_messages(text: &str) -> Result<Vec<RawMessage>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Invalid JSON message array");
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid message on line {}", idx + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_array() {
        let msgs = parse_messages(
            r#"[
                {"timestamp": "2017-03-05T14:21:00Z", "body": "first"},
                {"timestamp": "Sun, 05 Mar 2017 14:22:00 +0300", "body": "second"}
            ]"#,
        )
        .unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].body, "second");
    }

    #[test]
    fn json_lines_skip_blank_lines() {
        let msgs = parse_messages(
            "{\"timestamp\": \"2017-03-05T14:21:00Z\", \"body\": \"a\"}\n\n{\"timestamp\": \"2017-03-05T14:22:00Z\", \"body\": \"b\"}\n",
        )
        .unwrap();
        assert_eq!(msgs.iter().map(|m| m.body.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn bad_line_reports_line_number() {
        let err = parse_messages("{\"timestamp\": \"2017-03-05T14:21:00Z\", \"body\": \"a\"}\nnot json\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_messages("").unwrap().is_empty());
    }
}
