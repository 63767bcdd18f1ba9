//! Output formatting utilities.

use register_log::{EntryVerdict, VerificationFailure, VerificationSummary};

/// Formats a verification summary as JSON.
pub fn format_json(summary: &VerificationSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a failed entry as a table row.
pub fn format_table_row(failure: &VerificationFailure) -> String {
    let (verdict, detail) = match &failure.verdict {
        EntryVerdict::Ok => ("ok", String::new()),
        EntryVerdict::HashMismatch { computed } => ("hash_mismatch", computed.to_string()),
        EntryVerdict::InvalidItem { reason } => ("invalid_item", truncate(reason, 60)),
    };
    format!(
        "{:<8} {:<72} {:<14} {}",
        failure.line,
        failure.claimed.to_string(),
        verdict,
        detail
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<8} {:<72} {:<14} {}", "LINE", "CLAIMED", "VERDICT", "DETAIL");
    println!("{}", "-".repeat(110));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use register_canonical::ContentHash;

    #[test]
    fn test_row_for_mismatch() {
        let failure = VerificationFailure {
            line: 3,
            claimed: ContentHash::of("{}"),
            verdict: EntryVerdict::HashMismatch {
                computed: ContentHash::of(r#"{"a":"1"}"#),
            },
        };
        let row = format_table_row(&failure);
        assert!(row.starts_with("3 "));
        assert!(row.contains("hash_mismatch"));
        assert!(row.contains(&ContentHash::of(r#"{"a":"1"}"#).to_string()));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("ééééé", 4), "é...");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
