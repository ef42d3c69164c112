// Record shape as stored one-per-line in dataset JSONL files

use serde::{Deserialize, Serialize};

use super::action::{parse_action, Action};
use crate::coords::{Point, Size};

/// One training example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier
    pub id: String,

    /// Image path relative to the dataset directory
    pub image: String,

    /// Ordered conversation turns
    pub conversations: Vec<Turn>,

    /// Typed metadata with an open side-map
    pub metadata: Metadata,
}

impl Record {
    /// Category used for filtering
    pub fn task_type(&self) -> &str {
        &self.metadata.task_type
    }

    /// First action found in the record's `gpt` turns
    pub fn action(&self) -> Option<Action> {
        self.conversations
            .iter()
            .filter(|turn| turn.from == Speaker::Gpt)
            .find_map(|turn| parse_action(&turn.value))
    }

    /// Image size declared in metadata, if any
    pub fn image_size(&self) -> Option<Size> {
        self.metadata.image_size
    }
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub from: Speaker,
    pub value: String,
}

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Human,
    Gpt,
    System,
    #[serde(other)]
    Other,
}

/// Record metadata: required `task_type`, optional geometry hints, and
/// whatever else the dataset producer attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub task_type: String,

    /// Target point in source-image pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_coords: Option<Point>,

    /// Source image `[width, height]` in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<Size>,

    /// Accepted positional error `[x, y]` in RU
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Point>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"{"id":"r1","image":"images/r1.png","conversations":[{"from":"human","value":"<image>Click OK"},{"from":"gpt","value":"<tool_call>\n{\"name\":\"computer_use\",\"arguments\":{\"action\":\"left_click\",\"coordinate\":[250,750]}}\n</tool_call>"}],"metadata":{"task_type":"click","image_size":[1280,720],"tolerance":[20,30],"source":"synthetic","difficulty":3}}"#;

    #[test]
    fn test_record_deserializes_with_open_metadata() {
        let record: Record = serde_json::from_str(LINE).unwrap();
        assert_eq!(record.id, "r1");
        assert_eq!(record.task_type(), "click");
        assert_eq!(record.image_size(), Some(Size::new(1280.0, 720.0)));
        assert_eq!(record.metadata.tolerance, Some(Point::new(20.0, 30.0)));
        assert_eq!(record.metadata.extra["source"], "synthetic");
        assert_eq!(record.metadata.extra["difficulty"], 3);
        assert!(!record.metadata.extra.contains_key("task_type"));
    }

    #[test]
    fn test_record_action_comes_from_gpt_turn() {
        let record: Record = serde_json::from_str(LINE).unwrap();
        let action = record.action().unwrap();
        assert_eq!(action.arguments.coordinate, Some(Point::new(250.0, 750.0)));
    }

    #[test]
    fn test_missing_task_type_is_rejected() {
        let line = r#"{"id":"x","image":"a.png","conversations":[],"metadata":{"source":"s"}}"#;
        assert!(serde_json::from_str::<Record>(line).is_err());
    }

    #[test]
    fn test_unknown_speaker_is_tolerated() {
        let turn: Turn = serde_json::from_str(r#"{"from":"tool","value":"ok"}"#).unwrap();
        assert_eq!(turn.from, Speaker::Other);
    }
}
