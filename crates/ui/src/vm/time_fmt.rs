/// Running-timer display, `MM:SS` (minutes keep growing past 99).
#[must_use]
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Long form used on the results screen, e.g. `6 min 00 s`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    format!("{} min {:02} s", seconds / 60, seconds % 60)
}

/// Ideal time in minutes with one decimal, e.g. `7.5 minutes`.
#[must_use]
pub fn format_ideal_minutes(seconds: u64) -> String {
    // Tenths of a minute, rounded half up.
    let tenths = (seconds * 10 + 30) / 60;
    format!("{}.{} minutes", tenths / 10, tenths % 10)
}
