use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::model::store::Store;

/// Minutes since local midnight
pub fn local_minutes(now: DateTime<Utc>, offset: FixedOffset) -> u32 {
    let local = now.with_timezone(&offset);
    local.hour() * 60 + local.minute()
}

/// `"HH:MM"` in 24-hour form
pub fn parse_hh_mm(value: &str) -> Option<u32> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// One side of `"9:00 AM - 9:00 PM"`; the period is optional
fn parse_clock(value: &str) -> Option<u32> {
    let value = value.trim().to_ascii_uppercase();
    let (time, period) = if let Some(t) = value.strip_suffix("AM") {
        (t.trim(), Some(false))
    } else if let Some(t) = value.strip_suffix("PM") {
        (t.trim(), Some(true))
    } else {
        (value.as_str(), None)
    };
    let (hours, minutes) = time.split_once(':')?;
    let mut hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if minutes > 59 {
        return None;
    }
    match period {
        Some(true) if hours != 12 => hours += 12,
        Some(false) if hours == 12 => hours = 0,
        _ => {}
    }
    if hours > 23 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Opening and closing minutes from the free-text `timing` field
pub fn parse_timing(timing: &str) -> Option<(u32, u32)> {
    let (open, close) = timing.split_once('-')?;
    Some((parse_clock(open)?, parse_clock(close)?))
}

fn within(now: u32, opening: u32, closing: u32) -> bool {
    if closing < opening {
        // window wraps past midnight
        now >= opening || now < closing
    } else {
        now >= opening && now < closing
    }
}

/// Whether `store` takes orders at `now` (minutes since local midnight).
///
/// Uses `openingTime`/`closingTime`, then the `timing` text; a store whose
/// hours cannot be read at all counts as open. Inactive stores are closed.
pub fn is_store_open(store: &Store, now: u32) -> bool {
    if !store.is_active {
        return false;
    }
    if let (Some(opening), Some(closing)) = (parse_hh_mm(&store.opening_time), parse_hh_mm(&store.closing_time)) {
        return within(now, opening, closing);
    }
    match parse_timing(&store.timing) {
        Some((opening, closing)) => within(now, opening, closing),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(opening: &str, closing: &str, timing: &str) -> Store {
        let mut store = Store::new("Test".into());
        store.opening_time = opening.into();
        store.closing_time = closing.into();
        store.timing = timing.into();
        store
    }

    fn at(h: u32, m: u32) -> u32 {
        h * 60 + m
    }

    #[test]
    fn test_regular_window() {
        let s = store("09:00", "21:00", "");
        assert!(is_store_open(&s, at(9, 0)));
        assert!(is_store_open(&s, at(20, 59)));
        assert!(!is_store_open(&s, at(21, 0)));
        assert!(!is_store_open(&s, at(8, 59)));
    }

    #[test]
    fn test_window_wrapping_midnight() {
        let s = store("22:00", "02:00", "");
        assert!(is_store_open(&s, at(23, 30)));
        assert!(is_store_open(&s, at(1, 0)));
        assert!(!is_store_open(&s, at(3, 0)));
        assert!(!is_store_open(&s, at(21, 59)));
    }

    #[test]
    fn test_timing_fallback() {
        let s = store("", "bad", "9:00 AM - 9:00 PM");
        assert!(is_store_open(&s, at(12, 0)));
        assert!(!is_store_open(&s, at(21, 30)));

        let late = store("", "", "6:30 PM - 1:00 AM");
        assert!(is_store_open(&late, at(0, 30)));
        assert!(!is_store_open(&late, at(12, 0)));
    }

    #[test]
    fn test_noon_and_midnight_periods() {
        assert_eq!(parse_timing("12:00 AM - 12:00 PM"), Some((0, 720)));
    }

    #[test]
    fn test_unreadable_hours_mean_open() {
        let s = store("soon", "later", "whenever");
        assert!(is_store_open(&s, at(4, 0)));
    }

    #[test]
    fn test_inactive_store_is_closed() {
        let mut s = store("00:00", "23:59", "");
        s.is_active = false;
        assert!(!is_store_open(&s, at(12, 0)));
    }

    #[test]
    fn test_local_minutes_applies_offset() {
        let now = DateTime::parse_from_rfc3339("2026-01-01T20:00:00Z").unwrap().with_timezone(&Utc);
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        assert_eq!(local_minutes(now, ist), at(1, 30));
    }
}
