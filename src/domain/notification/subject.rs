/// SNS rejects subjects of 100 characters or more
pub const SNS_SUBJECT_LIMIT: usize = 100;

/// Room left for the `...` marker when the alarm name is cut
const TRUNCATION_MARKER_ALLOWANCE: usize = 4;

/// Subject line for a repeated ALARM notification
///
/// When the full subject reaches the limit, `len(subject) - 100 + 4` characters are cut from
/// the end of the alarm name and `...` is appended to it. The count comes from the whole
/// subject but is applied to the alarm name alone. Lengths are in characters.
pub fn compose_subject(alarm_name: &str, region: &str) -> String {
    let subject = render_subject(alarm_name, region);
    let subject_len = subject.chars().count();

    if subject_len < SNS_SUBJECT_LIMIT {
        return subject;
    }

    let excess = subject_len - SNS_SUBJECT_LIMIT + TRUNCATION_MARKER_ALLOWANCE;
    let keep = alarm_name.chars().count().saturating_sub(excess);
    let truncated: String = alarm_name.chars().take(keep).collect();

    render_subject(&format!("{}...", truncated), region)
}

fn render_subject(alarm_name: &str, region: &str) -> String {
    format!("ALARM: \"{}\" remains in ALARM state in {}", alarm_name, region)
}
