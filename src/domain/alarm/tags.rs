use crate::config::TagFilter;

use super::dto::Tag;

/// Whether the alarm's tags opt it in to repeated notification
///
/// Exact, case-sensitive match on both key and value.
pub fn repeated_notification_enabled(tags: &[Tag], filter: &TagFilter) -> bool {
    tags.iter()
        .any(|tag| tag.key == filter.key && tag.value == filter.value)
}
