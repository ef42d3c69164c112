//! Tool-call actions embedded in `gpt` turns.
//!
//! A turn carries its action inside a `<tool_call>` ... `</tool_call>` block
//! whose body is a JSON object:
//!
//! ```text
//! <tool_call>
//! {"name": "computer_use", "arguments": {"action": "left_click", "coordinate": [500, 500]}}
//! </tool_call>
//! ```
//!
//! A missing block, a block without its closing tag, or a body that is not a
//! valid action yields `None`; parsing never fails loudly.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coords::Point;

/// Opening delimiter of an embedded action block
pub const TOOL_CALL_OPEN: &str = "<tool_call>";

/// Closing delimiter of an embedded action block
pub const TOOL_CALL_CLOSE: &str = "</tool_call>";

/// A decoded tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub arguments: ActionArguments,
}

/// Arguments of a tool call; only `action` is required
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionArguments {
    pub action: ActionKind,

    /// Target in RU space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Point>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,

    /// Signed scroll magnitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixels: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Closed set of action identifiers. Unknown identifiers are kept verbatim
/// in `Other` so they still round-trip and pick the fallback color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    LeftClick,
    RightClick,
    MiddleClick,
    DoubleClick,
    TripleClick,
    MouseMove,
    LeftClickDrag,
    Scroll,
    HScroll,
    Type,
    Key,
    Wait,
    Terminate,
    Answer,
    Ocr,
    Other(String),
}

impl ActionKind {
    /// Wire identifier
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::LeftClick => "left_click",
            ActionKind::RightClick => "right_click",
            ActionKind::MiddleClick => "middle_click",
            ActionKind::DoubleClick => "double_click",
            ActionKind::TripleClick => "triple_click",
            ActionKind::MouseMove => "mouse_move",
            ActionKind::LeftClickDrag => "left_click_drag",
            ActionKind::Scroll => "scroll",
            ActionKind::HScroll => "hscroll",
            ActionKind::Type => "type",
            ActionKind::Key => "key",
            ActionKind::Wait => "wait",
            ActionKind::Terminate => "terminate",
            ActionKind::Answer => "answer",
            ActionKind::Ocr => "ocr",
            ActionKind::Other(name) => name,
        }
    }
}

impl From<&str> for ActionKind {
    fn from(s: &str) -> Self {
        match s {
            "left_click" => ActionKind::LeftClick,
            "right_click" => ActionKind::RightClick,
            "middle_click" => ActionKind::MiddleClick,
            "double_click" => ActionKind::DoubleClick,
            "triple_click" => ActionKind::TripleClick,
            "mouse_move" => ActionKind::MouseMove,
            "left_click_drag" => ActionKind::LeftClickDrag,
            "scroll" => ActionKind::Scroll,
            "hscroll" => ActionKind::HScroll,
            "type" => ActionKind::Type,
            "key" => ActionKind::Key,
            "wait" => ActionKind::Wait,
            "terminate" => ActionKind::Terminate,
            "answer" => ActionKind::Answer,
            "ocr" => ActionKind::Ocr,
            other => ActionKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ActionKind {
    fn from(s: String) -> Self {
        ActionKind::from(s.as_str())
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the first embedded action block from a turn's text
pub fn parse_action(text: &str) -> Option<Action> {
    let start = text.find(TOOL_CALL_OPEN)? + TOOL_CALL_OPEN.len();
    let len = text[start..].find(TOOL_CALL_CLOSE)?;
    let body = text[start..start + len].trim();
    match serde_json::from_str(body) {
        Ok(action) => Some(action),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed tool_call block");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_left_click() {
        let text = r#"I will click the button.
<tool_call>
{"name":"computer_use","arguments":{"action":"left_click","coordinate":[500,500]}}
</tool_call>"#;
        let action = parse_action(text).unwrap();
        assert_eq!(action.name, "computer_use");
        assert_eq!(action.arguments.action, ActionKind::LeftClick);
        assert_eq!(action.arguments.coordinate, Some(Point::new(500.0, 500.0)));
    }

    #[test]
    fn test_text_without_block_is_none() {
        assert!(parse_action("Just an answer, no tool call.").is_none());
        assert!(parse_action("").is_none());
    }

    #[test]
    fn test_unterminated_block_is_none() {
        let text = r#"<tool_call>{"name":"computer_use","arguments":{"action":"wait"}}"#;
        assert!(parse_action(text).is_none());
    }

    #[test]
    fn test_malformed_body_is_none() {
        assert!(parse_action("<tool_call>{not json}</tool_call>").is_none());
        // valid JSON but missing the required `action`
        assert!(parse_action(r#"<tool_call>{"name":"x","arguments":{}}</tool_call>"#).is_none());
    }

    #[test]
    fn test_optional_arguments() {
        let text = r#"<tool_call>{"name":"computer_use","arguments":{"action":"scroll","coordinate":[10,20],"pixels":-300}}</tool_call>
<tool_call>{"name":"computer_use","arguments":{"action":"key","keys":["ctrl","c"]}}</tool_call>"#;
        let action = parse_action(text).unwrap();
        assert_eq!(action.arguments.action, ActionKind::Scroll);
        assert_eq!(action.arguments.pixels, Some(-300.0));
        assert!(action.arguments.keys.is_none());
    }

    #[test]
    fn test_unknown_action_kind_round_trips() {
        let kind: ActionKind = serde_json::from_str(r#""zoom_in""#).unwrap();
        assert_eq!(kind, ActionKind::Other("zoom_in".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""zoom_in""#);
        assert_eq!(ActionKind::from("hscroll"), ActionKind::HScroll);
        assert_eq!(ActionKind::LeftClickDrag.to_string(), "left_click_drag");
    }
}
