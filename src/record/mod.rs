pub mod action;
pub mod reader;
pub mod types;

pub use action::{parse_action, Action, ActionArguments, ActionKind, TOOL_CALL_CLOSE, TOOL_CALL_OPEN};
pub use reader::{Entry, RecordStream};
pub use types::{Metadata, Record, Speaker, Turn};
