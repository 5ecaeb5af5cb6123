//! Ingress events for a progress center.

use std::path::Path;

use serde::{Deserialize, Serialize};

use progress_center_core::{ItemId, ProgressError, ProgressItem, ProgressResult};

/// One input to a [`ProgressCenter`](crate::ProgressCenter).
///
/// `Update` comes from the operation that is being tracked; the other
/// events come from the renderer or the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// New snapshot of an item.
    Update { item: ProgressItem },
    /// The renderer finished animating an item.
    ItemAnimationEnd { group: String, id: ItemId },
    /// The renderer finished animating a group's summary.
    SummaryAnimationEnd { group: String },
    /// The user dismissed the error display.
    DismissErrors,
}

impl ProgressEvent {
    /// Parse a JSON array of events.
    pub fn parse_script(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a JSON array of events from a file.
    pub fn load_script(path: impl AsRef<Path>) -> ProgressResult<Vec<Self>> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ProgressError::io(path, e))?;
        Self::parse_script(&content).map_err(|e| ProgressError::parse(path, e))
    }
}

#[cfg(test)]
mod tests {
    use progress_center_core::{ItemState, ItemType};

    use super::*;

    #[test]
    fn test_parse_script() {
        let events = ProgressEvent::parse_script(
            r#"[
                {"event": "update", "item": {"id": "1", "type": "copy", "progress_max": 4}},
                {"event": "item_animation_end", "group": "normal", "id": "1"},
                {"event": "summary_animation_end", "group": "normal"},
                {"event": "dismiss_errors"}
            ]"#,
        )
        .unwrap();

        assert_eq!(events.len(), 4);
        match &events[0] {
            ProgressEvent::Update { item } => {
                assert_eq!(item.id, Some(ItemId::from("1")));
                assert_eq!(item.item_type, Some(ItemType::Copy));
                assert_eq!(item.state, ItemState::Progressing);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(
            events[1],
            ProgressEvent::ItemAnimationEnd {
                group: "normal".to_string(),
                id: ItemId::from("1"),
            }
        );
        assert_eq!(events[3], ProgressEvent::DismissErrors);
    }

    #[test]
    fn test_parse_unknown_event() {
        assert!(ProgressEvent::parse_script(r#"[{"event": "explode"}]"#).is_err());
    }
}
