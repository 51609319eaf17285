//! Console rendering for probe outcomes. Kept apart from the probe logic so
//! the narration can be tested without touching the network.

use probe_core::{find_named_item, Credentials, ProbeResult};

/// Credential shape summary printed before the probe. Never includes the
/// token itself, only its masked preview.
pub fn render_preflight(credentials: &Credentials) -> String {
    let diagnostics = credentials.diagnostics();
    let mut out = String::new();

    out.push_str("\n=== Credential Preflight ===\n");
    out.push_str(&format!(
        "Token provided:     {}\n",
        yes_no(diagnostics.token_present)
    ));
    if diagnostics.token_present {
        out.push_str(&format!("Token length:       {}\n", diagnostics.token_length));
        out.push_str(&format!(
            "Token 'pat' prefix: {}\n",
            yes_no(diagnostics.token_has_pat_prefix)
        ));
        out.push_str(&format!(
            "Token preview:      {}\n",
            credentials.masked_token()
        ));
    }
    out.push_str(&format!(
        "Base ID provided:   {}\n",
        yes_no(diagnostics.base_id_present)
    ));

    out
}

/// Full report for a probe outcome, including the named lookup on success
/// and the remediation checklist on failure
pub fn render_result(result: &ProbeResult, lookup_target: &str) -> String {
    match result {
        ProbeResult::Success { items } => {
            let mut out = String::new();
            out.push_str("\n✅ Probe succeeded\n");
            out.push_str(&format!("Items returned: {}\n", items.len()));
            for (index, item) in items.iter().enumerate() {
                out.push_str(&format!("  {}. {} ({})\n", index + 1, item.name, item.id));
            }

            out.push_str(&format!("\nLooking for '{}'...\n", lookup_target.trim()));
            match find_named_item(items, lookup_target) {
                Some(item) => {
                    out.push_str(&format!(
                        "✅ '{}' found (id: {})\n",
                        lookup_target.trim(),
                        item.id
                    ));
                }
                None => {
                    out.push_str(&format!("❓ '{}' not found\n", lookup_target.trim()));
                    out.push_str("Suggestions:\n");
                    out.push_str("  1. Verify the exact table name\n");
                    out.push_str("  2. Confirm the table exists in this base\n");
                }
            }
            out
        }
        ProbeResult::Failure {
            classification,
            http_status,
            raw_message,
        } => {
            let mut out = String::new();
            out.push_str(&format!("\n❌ Probe failed: {}\n", classification));
            if let Some(status) = http_status {
                out.push_str(&format!("HTTP status:    {}\n", status));
            }
            if let Some(message) = raw_message {
                out.push_str(&format!("Server message: {}\n", message));
            }

            out.push_str("\nTroubleshooting checklist:\n");
            for (index, hint) in classification.remediation_hints().iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", index + 1, hint));
            }
            out
        }
    }
}

/// Process exit code for an outcome: 0 on success, 1 on any failure
pub fn exit_code(result: &ProbeResult) -> i32 {
    if result.is_success() {
        0
    } else {
        1
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_core::{ErrorClassification, Item};

    fn success_with_tables() -> ProbeResult {
        ProbeResult::Success {
            items: vec![
                Item {
                    name: "Content Pipeline".to_string(),
                    id: "tbl1".to_string(),
                },
                Item {
                    name: "Notes".to_string(),
                    id: "tbl2".to_string(),
                },
            ],
        }
    }

    #[test]
    fn preflight_masks_the_token() {
        let credentials = Credentials::new("patABCDEF1234567890", "appTESTBASE");
        let rendered = render_preflight(&credentials);

        assert!(rendered.contains("Token provided:     yes"));
        assert!(rendered.contains("Token length:       19"));
        assert!(rendered.contains("patA...7890"));
        assert!(!rendered.contains("patABCDEF1234567890"));
    }

    #[test]
    fn preflight_reports_missing_credentials() {
        let rendered = render_preflight(&Credentials::new("", ""));
        assert!(rendered.contains("Token provided:     no"));
        assert!(rendered.contains("Base ID provided:   no"));
        assert!(!rendered.contains("Token length"));
    }

    #[test]
    fn success_report_lists_items_and_lookup_hit() {
        let rendered = render_result(&success_with_tables(), "Content Pipeline");

        assert!(rendered.contains("Items returned: 2"));
        assert!(rendered.contains("1. Content Pipeline (tbl1)"));
        assert!(rendered.contains("2. Notes (tbl2)"));
        assert!(rendered.contains("'Content Pipeline' found (id: tbl1)"));
    }

    #[test]
    fn success_report_suggests_on_lookup_miss() {
        let rendered = render_result(&success_with_tables(), "Editorial Calendar");

        assert!(rendered.contains("'Editorial Calendar' not found"));
        assert!(rendered.contains("Verify the exact table name"));
    }

    #[test]
    fn failure_report_carries_status_message_and_hints() {
        let result = ProbeResult::Failure {
            classification: ErrorClassification::Unauthorized,
            http_status: Some(401),
            raw_message: Some("Invalid authentication token".to_string()),
        };
        let rendered = render_result(&result, "Content Pipeline");

        assert!(rendered.contains("authentication failed"));
        assert!(rendered.contains("HTTP status:    401"));
        assert!(rendered.contains("Server message: Invalid authentication token"));
        assert!(rendered.contains("Token may be invalid"));
    }

    #[test]
    fn failure_report_without_status_omits_those_lines() {
        let result = ProbeResult::Failure {
            classification: ErrorClassification::MissingToken,
            http_status: None,
            raw_message: None,
        };
        let rendered = render_result(&result, "Content Pipeline");

        assert!(!rendered.contains("HTTP status"));
        assert!(!rendered.contains("Server message"));
        assert!(rendered.contains("AIRTABLE_PERSONAL_ACCESS_TOKEN"));
    }

    #[test]
    fn exit_codes_match_the_outcome() {
        assert_eq!(exit_code(&success_with_tables()), 0);
        let failure = ProbeResult::Failure {
            classification: ErrorClassification::NetworkUnreachable,
            http_status: None,
            raw_message: None,
        };
        assert_eq!(exit_code(&failure), 1);
    }
}
