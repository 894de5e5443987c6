use crate::models::Measurement;

/// Window of a chronologically ordered series covering `start_year..=end_year`.
///
/// The window starts at the first record of `start_year` and ends after the
/// last record of `end_year`. If either boundary year is missing from the
/// series the window is empty, even when years between them are present.
pub fn extract_year_range(
    series: &[Measurement],
    start_year: i32,
    end_year: i32,
) -> &[Measurement] {
    let start = match series.iter().position(|m| m.year() == start_year) {
        Some(index) => index,
        None => return &[],
    };
    let last = match series.iter().rposition(|m| m.year() == end_year) {
        Some(index) => index,
        None => return &[],
    };

    if last < start {
        return &[];
    }
    &series[start..=last]
}
