//! Panel-level coordination of several item groups.

use std::sync::Arc;

use serde::Serialize;

use progress_center_core::{
    CenterConfig, ItemId, ItemState, MessageCatalog, ProgressError, ProgressItem, ProgressResult,
};

use crate::errors::summarized_error_item;
use crate::event::ProgressEvent;
use crate::group::{GroupState, ItemGroup, RejectReason, UpdateOutcome};
use crate::summary::ProgressTotals;

/// Routes items into a normal and a quiet group and picks the single
/// item the panel shows.
#[derive(Debug, Clone)]
pub struct ProgressCenter {
    config: CenterConfig,
    normal: ItemGroup,
    quiet: ItemGroup,
}

impl ProgressCenter {
    /// Create a center using the templates from `config`.
    pub fn new(config: CenterConfig) -> Self {
        let messages: Arc<dyn MessageCatalog> = Arc::new(config.templates.clone());
        Self::with_messages(config, messages)
    }

    /// Create a center with a custom message catalog.
    pub fn with_messages(config: CenterConfig, messages: Arc<dyn MessageCatalog>) -> Self {
        Self {
            normal: ItemGroup::with_messages(config.normal_group.clone(), Arc::clone(&messages)),
            quiet: ItemGroup::with_messages(config.quiet_group.clone(), messages),
            config,
        }
    }

    pub fn config(&self) -> &CenterConfig {
        &self.config
    }

    /// Groups in display priority order.
    pub fn groups(&self) -> [&ItemGroup; 2] {
        [&self.normal, &self.quiet]
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&ItemGroup> {
        self.groups().into_iter().find(|group| group.name() == name)
    }

    fn group_mut(&mut self, name: &str) -> ProgressResult<&mut ItemGroup> {
        if self.normal.name() == name {
            Ok(&mut self.normal)
        } else if self.quiet.name() == name {
            Ok(&mut self.quiet)
        } else {
            Err(ProgressError::UnknownGroup {
                name: name.to_string(),
            })
        }
    }

    /// Feed an item into the group selected by its `quiet` flag.
    pub fn update(&mut self, item: &ProgressItem) -> UpdateOutcome {
        if item.quiet {
            self.quiet.update(item)
        } else {
            self.normal.update(item)
        }
    }

    /// Copy of the item with this id from whichever group holds it.
    pub fn item(&self, id: &str) -> Option<ProgressItem> {
        self.groups().into_iter().find_map(|group| group.item(id))
    }

    pub fn complete_item_animation(&mut self, group: &str, id: &str) -> ProgressResult<()> {
        self.group_mut(group)?.complete_item_animation(id);
        Ok(())
    }

    pub fn complete_summarized_item_animation(&mut self, group: &str) -> ProgressResult<()> {
        self.group_mut(group)?.complete_summarized_item_animation();
        Ok(())
    }

    /// Report every running animation as finished, as an instant renderer
    /// would.
    pub fn complete_all_animations(&mut self) {
        for group in [&mut self.normal, &mut self.quiet] {
            for id in group.animated_ids() {
                group.complete_item_animation(id.as_str());
            }
            if group.is_summarized_animated() {
                group.complete_summarized_item_animation();
            }
        }
    }

    /// Total error items across groups.
    pub fn num_errors(&self) -> usize {
        self.groups().iter().map(|group| group.num_errors()).sum()
    }

    /// The one item the panel shows.
    ///
    /// The first group with a summary wins, with errors held by the other
    /// groups counted into its message. When no group has a summary, all
    /// error items are merged instead.
    pub fn summarized_item(&self) -> Option<ProgressItem> {
        let total_errors = self.num_errors();
        self.groups()
            .into_iter()
            .find_map(|group| group.summarized_item(total_errors - group.num_errors()))
            .or_else(|| summarized_error_item(self.groups(), self.normal.messages()))
    }

    /// Clear error-only groups after the user dismissed them.
    pub fn dismiss_errors(&mut self) {
        self.normal.end_inactive();
        self.quiet.end_inactive();
    }

    /// Apply one event.
    ///
    /// Animation-end and dismiss events that find nothing to act on come
    /// back as `Rejected(RejectReason::NoEffect)`.
    pub fn apply(&mut self, event: &ProgressEvent) -> ProgressResult<UpdateOutcome> {
        let acted = match event {
            ProgressEvent::Update { item } => return Ok(self.update(item)),
            ProgressEvent::ItemAnimationEnd { group, id } => {
                let target = self.group_mut(group)?;
                let acted = target.state() == GroupState::Active
                    && (target.is_animated(id.as_str())
                        || target
                            .item(id.as_str())
                            .is_some_and(|item| item.state == ItemState::Completed));
                target.complete_item_animation(id.as_str());
                acted
            }
            ProgressEvent::SummaryAnimationEnd { group } => {
                let target = self.group_mut(group)?;
                let acted = target.is_summarized_animated();
                target.complete_summarized_item_animation();
                acted
            }
            ProgressEvent::DismissErrors => {
                let acted = self
                    .groups()
                    .iter()
                    .any(|group| group.state() == GroupState::Inactive);
                self.dismiss_errors();
                acted
            }
        };
        Ok(if acted {
            UpdateOutcome::Applied
        } else {
            UpdateOutcome::Rejected(RejectReason::NoEffect)
        })
    }

    /// Serializable view of the whole center.
    pub fn snapshot(&self) -> CenterSnapshot {
        CenterSnapshot {
            groups: self.groups().into_iter().map(GroupSnapshot::of).collect(),
            summary: self.summarized_item(),
        }
    }
}

impl Default for ProgressCenter {
    fn default() -> Self {
        Self::new(CenterConfig::default())
    }
}

/// Point-in-time view of one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub state: GroupState,
    pub num_errors: usize,
    pub items: Vec<ProgressItem>,
    pub animated: Vec<ItemId>,
    pub summarized_animated: bool,
    pub totals: ProgressTotals,
}

impl GroupSnapshot {
    pub fn of(group: &ItemGroup) -> Self {
        Self {
            name: group.name().to_string(),
            state: group.state(),
            num_errors: group.num_errors(),
            items: group.items().cloned().collect(),
            animated: group.animated_ids(),
            summarized_animated: group.is_summarized_animated(),
            totals: group.totals(),
        }
    }
}

/// Point-in-time view of a center.
#[derive(Debug, Clone, Serialize)]
pub struct CenterSnapshot {
    pub groups: Vec<GroupSnapshot>,
    pub summary: Option<ProgressItem>,
}

#[cfg(test)]
mod tests {
    use progress_center_core::{ItemState, ItemType};

    use super::*;

    fn item(id: &str, state: ItemState, value: f64) -> ProgressItem {
        ProgressItem::new(id, ItemType::Copy, state)
            .with_message(format!("copy {id}"))
            .with_progress(value, 10.0)
    }

    #[test]
    fn test_quiet_items_routed_to_quiet_group() {
        let mut center = ProgressCenter::default();
        center.update(&item("a", ItemState::Progressing, 1.0));
        center.update(&item("b", ItemState::Progressing, 1.0).with_quiet(true));

        assert!(center.group("normal").unwrap().item("a").is_some());
        assert!(center.group("quiet").unwrap().item("b").is_some());
        assert!(center.group("normal").unwrap().item("b").is_none());
        assert_eq!(center.item("b").unwrap().id, Some(ItemId::from("b")));
    }

    #[test]
    fn test_normal_summary_wins() {
        let mut center = ProgressCenter::default();
        center.update(&item("a", ItemState::Progressing, 1.0));
        center.update(&item("b", ItemState::Progressing, 1.0).with_quiet(true));

        let summary = center.summarized_item().unwrap();
        assert_eq!(summary.id, Some(ItemId::from("a")));
    }

    #[test]
    fn test_other_group_errors_counted() {
        let mut center = ProgressCenter::default();
        center.update(&item("e", ItemState::Error, 0.0).with_quiet(true));
        center.update(&item("a", ItemState::Progressing, 1.0));

        let summary = center.summarized_item().unwrap();
        assert!(summary.summarized);
        assert_eq!(summary.message, "Copying... 1 error.");
    }

    #[test]
    fn test_falls_back_to_error_item() {
        let mut center = ProgressCenter::default();
        center.update(&item("e1", ItemState::Error, 0.0));
        center.update(&item("e2", ItemState::Error, 0.0).with_quiet(true));

        let summary = center.summarized_item().unwrap();
        assert_eq!(summary.state, ItemState::Error);
        assert_eq!(summary.message, "2 errors.");
        assert_eq!(center.num_errors(), 2);
    }

    #[test]
    fn test_dismiss_errors() {
        let mut center = ProgressCenter::default();
        center.update(&item("e", ItemState::Error, 0.0));
        center.dismiss_errors();

        assert_eq!(center.num_errors(), 0);
        assert!(center.summarized_item().is_none());
        assert_eq!(center.group("normal").unwrap().state(), GroupState::Empty);
    }

    #[test]
    fn test_unknown_group() {
        let mut center = ProgressCenter::default();
        let err = center.complete_summarized_item_animation("drive").unwrap_err();
        assert!(matches!(err, ProgressError::UnknownGroup { .. }));
    }

    #[test]
    fn test_complete_all_animations_retires_groups() {
        let mut center = ProgressCenter::default();
        center.update(&item("a", ItemState::Progressing, 0.0));
        center.update(&item("a", ItemState::Completed, 10.0));
        assert!(center.group("normal").unwrap().is_animated("a"));

        center.complete_all_animations();
        assert_eq!(center.group("normal").unwrap().state(), GroupState::Empty);
        assert!(center.summarized_item().is_none());
    }

    #[test]
    fn test_apply_events() {
        let mut center = ProgressCenter::default();
        let outcome = center
            .apply(&ProgressEvent::Update {
                item: item("a", ItemState::Progressing, 0.0),
            })
            .unwrap();
        assert!(outcome.is_applied());

        center
            .apply(&ProgressEvent::Update {
                item: item("a", ItemState::Completed, 10.0),
            })
            .unwrap();
        let outcome = center
            .apply(&ProgressEvent::ItemAnimationEnd {
                group: "normal".to_string(),
                id: ItemId::from("a"),
            })
            .unwrap();
        assert!(outcome.is_applied());
        let outcome = center
            .apply(&ProgressEvent::SummaryAnimationEnd {
                group: "normal".to_string(),
            })
            .unwrap();
        assert!(outcome.is_applied());

        assert_eq!(center.group("normal").unwrap().state(), GroupState::Empty);
    }

    #[test]
    fn test_apply_events_without_effect() {
        let mut center = ProgressCenter::default();
        let no_effect = UpdateOutcome::Rejected(RejectReason::NoEffect);

        let outcome = center
            .apply(&ProgressEvent::SummaryAnimationEnd {
                group: "normal".to_string(),
            })
            .unwrap();
        assert_eq!(outcome, no_effect);
        assert_eq!(center.apply(&ProgressEvent::DismissErrors).unwrap(), no_effect);

        center.update(&item("a", ItemState::Progressing, 0.0));
        let outcome = center
            .apply(&ProgressEvent::ItemAnimationEnd {
                group: "normal".to_string(),
                id: ItemId::from("missing"),
            })
            .unwrap();
        assert_eq!(outcome, no_effect);
        assert_eq!(center.group("normal").unwrap().state(), GroupState::Active);

        center.update(&item("e", ItemState::Error, 0.0).with_quiet(true));
        assert!(center.apply(&ProgressEvent::DismissErrors).unwrap().is_applied());
        assert_eq!(center.group("quiet").unwrap().state(), GroupState::Empty);
    }

    #[test]
    fn test_config_names_groups() {
        let config = CenterConfig::builder()
            .normal_group("files")
            .quiet_group("sync")
            .build()
            .unwrap();
        let center = ProgressCenter::new(config);
        assert_eq!(center.config().normal_group, "files");
        assert_eq!(center.config().quiet_group, "sync");
        assert!(center.group("files").is_some());
        assert!(center.group("normal").is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut center = ProgressCenter::default();
        center.update(&item("a", ItemState::Progressing, 2.0));

        let json = serde_json::to_value(center.snapshot()).unwrap();
        assert_eq!(json["groups"][0]["state"], "active");
        assert_eq!(json["summary"]["id"], "a");
        assert_eq!(json["groups"][1]["state"], "empty");
    }
}
