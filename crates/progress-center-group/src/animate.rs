//! Decides whether a transition is shown with an animation.

use progress_center_core::ProgressItem;

/// Whether the move from `previous` to `item` should be animated.
///
/// A rising percentage animates. An unchanged percentage keeps animating
/// only if an animation was already running. Anything else, including a
/// missing item on either side, snaps.
pub fn should_animate(
    previous_animated: bool,
    previous: Option<&ProgressItem>,
    item: Option<&ProgressItem>,
) -> bool {
    let (Some(previous), Some(item)) = (previous, item) else {
        return false;
    };

    let before = previous.progress_rate_in_percent();
    let after = item.progress_rate_in_percent();
    before < after || (previous_animated && before == after)
}
