use chrono::NaiveDate;
use tracing::warn;

use crate::pipeline::accumulate::cumulate;
use crate::pipeline::group::group_by;
use crate::pipeline::types::Point;
use crate::records::{DoseEvent, DoseStatus};

/// Daily dose counts for one dose status, before accumulation.
///
/// Events are restricted to `region_code` when given, otherwise every
/// prefecture counts towards a nationwide total. One point is emitted per
/// date in first-seen order, even when no event on that date has the
/// requested status. Dates that do not parse as `yyyy-mm-dd` are skipped.
pub fn dose_series(
    events: &[DoseEvent],
    region_code: Option<&str>,
    status: DoseStatus,
) -> Vec<Point> {
    let matching = events
        .iter()
        .filter(|e| region_code.is_none_or(|code| e.region_code == code));

    group_by(matching, |e| e.date.clone())
        .into_iter()
        .filter_map(|(date, group)| {
            let Some(x) = date_millis(&date) else {
                warn!(date = %date, "Skipping dose events with unparsable date");
                return None;
            };
            let total: i64 = group
                .iter()
                .filter(|e| e.dose_status == status)
                .map(|e| e.count)
                .sum();
            Some(Point::new(x, total as f64))
        })
        .collect()
}

/// Running total of doses given, one point per reporting date.
pub fn cumulative_doses(
    events: &[DoseEvent],
    region_code: Option<&str>,
    status: DoseStatus,
) -> Vec<Point> {
    cumulate(&dose_series(events, region_code, status))
}

/// UTC midnight of a `yyyy-mm-dd` date, in epoch milliseconds.
pub fn date_millis(date: &str) -> Option<i64> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AgeBand, Gender};

    const JAN1: i64 = 1_609_459_200_000;
    const JAN2: i64 = JAN1 + 86_400_000;

    fn event(date: &str, code: &str, status: DoseStatus, count: i64) -> DoseEvent {
        DoseEvent {
            date: date.to_string(),
            region_code: code.to_string(),
            gender: Gender::Unknown,
            age_band: AgeBand::Unknown,
            is_medical_worker: false,
            dose_status: status,
            count,
        }
    }

    fn sample() -> Vec<DoseEvent> {
        vec![
            event("2021-01-01", "13", DoseStatus::First, 5),
            event("2021-01-01", "13", DoseStatus::First, 3),
            event("2021-01-01", "27", DoseStatus::First, 100),
            event("2021-01-01", "13", DoseStatus::Second, 1),
            event("2021-01-02", "13", DoseStatus::First, 2),
        ]
    }

    #[test]
    fn test_date_millis() {
        assert_eq!(date_millis("2021-01-01"), Some(JAN1));
        assert_eq!(date_millis("2021-01-02"), Some(JAN2));
        assert_eq!(date_millis("2021/01/01"), None);
    }

    #[test]
    fn test_dose_series_for_region() {
        let points = dose_series(&sample(), Some("13"), DoseStatus::First);
        assert_eq!(points, vec![Point::new(JAN1, 8.0), Point::new(JAN2, 2.0)]);

        let cumulative = cumulative_doses(&sample(), Some("13"), DoseStatus::First);
        assert_eq!(
            cumulative,
            vec![Point::new(JAN1, 8.0), Point::new(JAN2, 10.0)]
        );
    }

    #[test]
    fn test_dose_series_nationwide_sums_all_regions() {
        let points = dose_series(&sample(), None, DoseStatus::First);
        assert_eq!(points, vec![Point::new(JAN1, 108.0), Point::new(JAN2, 2.0)]);
    }

    #[test]
    fn test_dose_series_partitions_by_status() {
        let points = dose_series(&sample(), Some("13"), DoseStatus::Second);
        assert_eq!(points, vec![Point::new(JAN1, 1.0), Point::new(JAN2, 0.0)]);
    }

    #[test]
    fn test_dose_series_unknown_region_is_empty() {
        assert!(dose_series(&sample(), Some("99"), DoseStatus::First).is_empty());
    }

    #[test]
    fn test_dose_series_skips_bad_dates() {
        let events = vec![
            event("not-a-date", "13", DoseStatus::First, 4),
            event("2021-01-02", "13", DoseStatus::First, 2),
        ];
        let points = dose_series(&events, None, DoseStatus::First);
        assert_eq!(points, vec![Point::new(JAN2, 2.0)]);
    }
}
