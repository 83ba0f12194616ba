use anyhow::Result;
use chrono::Duration;

use crate::LocationUpdate;

/// Keeps the updates no older than `window` before the latest one, inclusive, preserving the input
/// order. The window is anchored at the latest sample in `updates`, not the current time, so every
/// vehicle gets its own.
///
/// Every timestamp is parsed, so a single malformed update fails the whole call.
pub fn recent_updates(
    updates: &[LocationUpdate],
    window: Duration,
) -> Result<Vec<&LocationUpdate>> {
    let mut timestamped = Vec::with_capacity(updates.len());
    for update in updates {
        timestamped.push((update.timestamp()?, update));
    }
    // Not necessarily the last one; don't trust the feed's order for this
    let latest = match timestamped.iter().map(|(t, _)| *t).max() {
        Some(t) => t,
        None => bail!("Can't find recent updates without any updates"),
    };
    let cutoff = match latest.checked_sub_signed(window) {
        Some(t) => t,
        None => bail!("A window of {} reaches back before any representable time", window),
    };

    Ok(timestamped
        .into_iter()
        .filter(|(t, _)| *t >= cutoff)
        .map(|(_, update)| update)
        .collect())
}

/// The longest window accepted from the command line: one year.
const MAX_WINDOW_MINUTES: i64 = 60 * 24 * 365;

/// Checks a user-supplied window length before turning it into a `Duration`, which would panic on
/// huge values.
pub fn window_from_minutes(minutes: i64) -> Result<Duration> {
    if minutes <= 0 || minutes > MAX_WINDOW_MINUTES {
        bail!(
            "The window must be between 1 and {} minutes, not {}",
            MAX_WINDOW_MINUTES,
            minutes
        );
    }
    Ok(Duration::minutes(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_window;
    use crate::tests::update;

    fn times(updates: &[&LocationUpdate]) -> Vec<String> {
        updates.iter().map(|u| u.time.clone()).collect()
    }

    #[test]
    fn single_update() {
        let updates = vec![update("01/10/2024", "3:00 PM", 24.8, 67.0)];
        let recent = recent_updates(&updates, default_window()).unwrap();
        assert_eq!(recent, vec![&updates[0]]);
    }

    #[test]
    fn drops_old_updates() {
        let updates = vec![
            update("01/10/2024", "2:00 PM", 24.80, 67.00),
            update("01/10/2024", "2:29 PM", 24.81, 67.01),
            update("01/10/2024", "2:30 PM", 24.82, 67.02),
            update("01/10/2024", "2:45 PM", 24.83, 67.03),
            update("01/10/2024", "3:00 PM", 24.84, 67.04),
        ];
        let recent = recent_updates(&updates, default_window()).unwrap();
        // The cutoff itself is included
        assert_eq!(times(&recent), vec!["2:30 PM", "2:45 PM", "3:00 PM"]);
    }

    #[test]
    fn anchored_at_latest_even_if_out_of_order() {
        let updates = vec![
            update("01/10/2024", "3:00 PM", 24.84, 67.04),
            update("01/10/2024", "1:00 PM", 24.80, 67.00),
            update("01/10/2024", "2:50 PM", 24.83, 67.03),
        ];
        let recent = recent_updates(&updates, default_window()).unwrap();
        assert_eq!(times(&recent), vec!["3:00 PM", "2:50 PM"]);
    }

    #[test]
    fn crosses_midnight() {
        let updates = vec![
            update("31/12/2024", "11:20 PM", 24.80, 67.00),
            update("31/12/2024", "11:45 PM", 24.81, 67.01),
            update("01/01/2025", "12:10 AM", 24.82, 67.02),
        ];
        let recent = recent_updates(&updates, default_window()).unwrap();
        assert_eq!(times(&recent), vec!["11:45 PM", "12:10 AM"]);
    }

    #[test]
    fn custom_window() {
        let updates = vec![
            update("01/10/2024", "1:00 PM", 24.80, 67.00),
            update("01/10/2024", "2:00 PM", 24.81, 67.01),
            update("01/10/2024", "3:00 PM", 24.82, 67.02),
        ];
        let recent = recent_updates(&updates, Duration::hours(1)).unwrap();
        assert_eq!(times(&recent), vec!["2:00 PM", "3:00 PM"]);
    }

    #[test]
    fn huge_window_is_an_error() {
        let updates = vec![update("01/10/2024", "3:00 PM", 24.8, 67.0)];
        assert!(recent_updates(&updates, Duration::days(1_000_000_000)).is_err());
    }

    #[test]
    fn window_from_minutes_is_bounded() {
        assert_eq!(window_from_minutes(30).unwrap(), default_window());
        assert_eq!(window_from_minutes(60 * 24 * 365).unwrap(), Duration::days(365));
        for bad in [0, -5, 60 * 24 * 365 + 1, i64::MAX] {
            assert!(window_from_minutes(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(recent_updates(&[], default_window()).is_err());
    }

    #[test]
    fn malformed_time_is_an_error() {
        let updates = vec![
            update("01/10/2024", "3:00 PM", 24.84, 67.04),
            update("01/10/2024", "25:00", 24.80, 67.00),
        ];
        assert!(recent_updates(&updates, default_window()).is_err());
    }
}
