//! Pure helpers for the dashboard aggregates.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::models::ReasonCount;

/// Month-over-month growth in percent.
///
/// Zero months use a scaled approximation instead of a true percentage:
/// both zero gives 0, a zero prior month gives `current * 100`, and a
/// zero current month gives `-prior * 100`.
pub fn growth_percent(prior: u64, current: u64) -> f64 {
    match (prior, current) {
        (0, 0) => 0.0,
        (0, current) => current as f64 * 100.0,
        (prior, 0) => -(prior as f64 * 100.0),
        (prior, current) => (current as f64 - prior as f64) / prior as f64 * 100.0,
    }
}

/// First instant of the calendar month `months_back` months before `now`.
pub fn month_start(now: DateTime<Utc>, months_back: u32) -> DateTime<Utc> {
    let total = now.year() * 12 + now.month0() as i32 - months_back as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12));
    Utc.with_ymd_and_hms(year, month0 as u32 + 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// `YYYY-MM` label for the month containing `at`.
pub fn month_label(at: DateTime<Utc>) -> String {
    format!("{:04}-{:02}", at.year(), at.month())
}

/// Start of the UTC day containing `now`.
pub fn day_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), now.day(), 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Orders deletion reasons with "sold" first (any casing), the rest
/// alphabetically.
pub fn order_reasons(mut reasons: Vec<ReasonCount>) -> Vec<ReasonCount> {
    reasons.sort_by(|a, b| {
        let a_sold = a.reason.eq_ignore_ascii_case("sold");
        let b_sold = b.reason.eq_ignore_ascii_case("sold");
        b_sold.cmp(&a_sold).then_with(|| a.reason.cmp(&b.reason))
    });
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_zero_handling() {
        assert_eq!(growth_percent(0, 0), 0.0);
        assert_eq!(growth_percent(0, 7), 700.0);
        assert_eq!(growth_percent(4, 0), -400.0);
        assert_eq!(growth_percent(10, 15), 50.0);
    }

    #[test]
    fn test_month_start_crosses_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 2, 15, 12, 30, 0).unwrap();
        assert_eq!(
            month_start(now, 0),
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            month_start(now, 3),
            Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(month_label(month_start(now, 5)), "2025-09");
    }

    #[test]
    fn test_sold_sorts_first() {
        let ordered = order_reasons(vec![
            ReasonCount { reason: "wrong category".into(), count: 1 },
            ReasonCount { reason: "sold".into(), count: 3 },
            ReasonCount { reason: "duplicate".into(), count: 2 },
        ]);
        let names: Vec<&str> = ordered.iter().map(|r| r.reason.as_str()).collect();
        assert_eq!(names, ["sold", "duplicate", "wrong category"]);
    }

    #[test]
    fn test_sold_sorts_first_regardless_of_casing() {
        let ordered = order_reasons(vec![
            ReasonCount { reason: "duplicate".into(), count: 2 },
            ReasonCount { reason: "Sold".into(), count: 3 },
        ]);
        assert_eq!(ordered[0].reason, "Sold");
    }
}
