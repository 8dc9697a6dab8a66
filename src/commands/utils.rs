use crate::defaults::UNKNOWN_INITIALS;

/// Avatar initials: first letter of each whitespace-separated name token,
/// uppercased. "UO" when the name yields nothing.
pub(crate) fn officer_initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect();

    if initials.is_empty() {
        UNKNOWN_INITIALS.to_string()
    } else {
        initials
    }
}

/// Rounded percentage of `part` in `total`. Yields 0 for an empty total.
pub(crate) fn percent(part: i64, total: i64) -> u8 {
    if total > 0 {
        ((part as f64 / total as f64) * 100.0).round() as u8
    } else {
        0
    }
}

/// Rounded completion percentage against a target, capped at 100 so
/// overshooting officers still render as fully complete.
pub(crate) fn target_percent(completed: i64, target: i32) -> u8 {
    if target > 0 {
        ((completed as f64 / target as f64) * 100.0)
            .round()
            .clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

pub(crate) fn coordinate_label(lat: f64, lng: f64) -> String {
    format!("{:.4}, {:.4}", lat, lng)
}
