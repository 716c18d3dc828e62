//! Hook protocol types.
//!
//! Defines the JSON exchanged with the agent's PreToolUse hook: the tool call
//! arrives on stdin as a [`HookInput`], and a block is answered with a
//! [`HookResponse`]. An allow produces no output at all.

use crate::gate::collect::Invocation;
use crate::policy::types::{Decision, Verdict};
use serde::{Deserialize, Serialize};

/// Exit code that tells the hook host to stop the tool call.
pub const EXIT_BLOCK: i32 = 2;

/// Appended to every block reason shown to the agent.
pub const NO_RETRY_NOTICE: &str = "Do not retry this request with a different encoding, host, \
     URL, or tool. Stop and ask the human operator to review this destination.";

/// Input from the agent's hook system.
///
/// ```json
/// {
///   "session_id": "...",
///   "cwd": "/project/path",
///   "hook_event_name": "PreToolUse",
///   "tool_name": "WebFetch",
///   "tool_input": { "url": "https://example.com" }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub hook_event_name: Option<String>,
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

impl HookInput {
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Map the tool call to an invocation. Returns None for tools that are not
    /// network actions (and for search queries when query scanning is off).
    ///
    /// A network tool whose expected field is missing maps to an empty
    /// invocation, which has no candidates.
    pub fn invocation(&self, scan_search_queries: bool) -> Option<Invocation> {
        match self.tool_name.as_str() {
            "WebFetch" => Some(Invocation::DirectUrl(self.field("url"))),
            "Bash" => Some(Invocation::FreeTextCommand(self.field("command"))),
            "WebSearch" if scan_search_queries => Some(Invocation::QueryText(self.field("query"))),
            _ => None,
        }
    }

    fn field(&self, name: &str) -> String {
        match self.tool_input.get(name).and_then(|v| v.as_str()) {
            Some(value) => value.to_string(),
            None => {
                tracing::warn!("{} call has no '{}' field", self.tool_name, name);
                String::new()
            }
        }
    }
}

/// The answer written to stdout when a call is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookResponse {
    pub decision: Verdict,
    pub reason: String,
}

impl HookResponse {
    /// None for an allow, which is silent.
    pub fn from_decision(decision: &Decision) -> Option<Self> {
        match decision.verdict {
            Verdict::Allow => None,
            Verdict::Block => Some(Self {
                decision: Verdict::Block,
                reason: format!(
                    "[hostgate] Network access blocked: {}. {}",
                    decision.reason, NO_RETRY_NOTICE
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::types::Cause;

    fn input(tool: &str, tool_input: serde_json::Value) -> HookInput {
        HookInput {
            session_id: None,
            cwd: None,
            hook_event_name: Some("PreToolUse".to_string()),
            tool_name: tool.to_string(),
            tool_input,
        }
    }

    #[test]
    fn test_parse_hook_input() {
        let parsed = HookInput::parse(
            r#"{"session_id":"abc","cwd":"/w","hook_event_name":"PreToolUse",
                "tool_name":"Bash","tool_input":{"command":"ls"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.session_id.as_deref(), Some("abc"));
        assert_eq!(
            parsed.invocation(true),
            Some(Invocation::FreeTextCommand("ls".to_string()))
        );
    }

    #[test]
    fn test_tool_mapping() {
        let web = input("WebFetch", serde_json::json!({"url": "https://x.io", "prompt": "p"}));
        assert_eq!(web.invocation(true), Some(Invocation::DirectUrl("https://x.io".into())));

        let search = input("WebSearch", serde_json::json!({"query": "rust"}));
        assert_eq!(search.invocation(true), Some(Invocation::QueryText("rust".into())));
        assert_eq!(search.invocation(false), None);

        let read = input("Read", serde_json::json!({"file_path": "/etc/hosts"}));
        assert_eq!(read.invocation(true), None);
    }

    #[test]
    fn test_missing_field_is_empty_invocation() {
        let web = input("WebFetch", serde_json::json!({}));
        assert_eq!(web.invocation(true), Some(Invocation::DirectUrl(String::new())));
    }

    #[test]
    fn test_block_response_carries_instruction() {
        let decision = Decision {
            verdict: Verdict::Block,
            host: Some("pastebin.com".into()),
            reason: "host 'pastebin.com' is not allowlisted".into(),
            cause: Cause::NotAllowlisted,
            matched_pattern: None,
        };
        let response = HookResponse::from_decision(&decision).unwrap();
        assert!(response.reason.contains("not allowlisted"));
        assert!(response.reason.contains("Do not retry"));
        assert!(response.reason.contains("human operator"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["decision"], "block");
    }

    #[test]
    fn test_allow_is_silent() {
        assert!(HookResponse::from_decision(&Decision::no_candidates()).is_none());
    }
}
