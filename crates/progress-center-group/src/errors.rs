//! Merging error items from several groups.

use progress_center_core::{ItemState, MessageCatalog, ProgressItem};

use crate::ItemGroup;

/// Single display item for all error items across `groups`.
///
/// Used when no group has a summary of its own. One error is returned as
/// is; several become a synthetic error item with a count message and no
/// id or cancel handle.
pub fn summarized_error_item<'a>(
    groups: impl IntoIterator<Item = &'a ItemGroup>,
    messages: &dyn MessageCatalog,
) -> Option<ProgressItem> {
    let errors: Vec<&ProgressItem> = groups
        .into_iter()
        .flat_map(|group| group.error_items())
        .collect();

    match errors.as_slice() {
        [] => None,
        [single] => Some((*single).clone()),
        _ => Some(ProgressItem {
            state: ItemState::Error,
            message: messages.error_summary(errors.len()),
            ..ProgressItem::default()
        }),
    }
}
