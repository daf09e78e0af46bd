/// Share of completed lessons as a whole percentage, rounded half up.
///
/// Returns `0` when there are no lessons at all.
#[must_use]
pub fn progress_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    let rounded = (completed * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}
