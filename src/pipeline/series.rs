use crate::pipeline::group::group_by;
use crate::pipeline::types::Point;
use crate::records::{Count, DailyRecord, InpatientEtc};

/// Builds one point per reporting day for `region`.
///
/// Records are filtered by region, grouped by date in first-seen order, and
/// each group is reduced to a single value by `value_of`. Returns an empty
/// series when no record matches the region.
pub fn build_series<V, F>(records: &[DailyRecord<V>], region: &str, value_of: F) -> Vec<Point>
where
    F: Fn(&[&DailyRecord<V>]) -> f64,
{
    let matching = records.iter().filter(|r| r.region == region);

    group_by(matching, |r| r.date)
        .into_iter()
        .map(|(date, group)| Point::new(date, value_of(group.as_slice())))
        .collect()
}

/// Numeric value of a counter cell; missing cells become NaN.
pub fn count_value(count: Count) -> f64 {
    count.map_or(f64::NAN, |c| c as f64)
}

/// Value of the first record in a group. Later duplicates are ignored.
pub fn first_count(group: &[&DailyRecord<Count>]) -> f64 {
    group.first().map_or(f64::NAN, |r| count_value(r.value))
}

/// Patients currently in care, including those whose status is still to be confirmed.
pub fn first_inpatients(group: &[&DailyRecord<InpatientEtc>]) -> f64 {
    group.first().map_or(f64::NAN, |r| {
        count_value(r.value.requiring_care) + count_value(r.value.to_be_confirmed)
    })
}

/// Cumulative number of discharged patients.
pub fn first_discharged(group: &[&DailyRecord<InpatientEtc>]) -> f64 {
    group.first().map_or(f64::NAN, |r| count_value(r.value.discharged))
}

/// Removes points without a usable value.
pub fn drop_missing(points: Vec<Point>) -> Vec<Point> {
    points.into_iter().filter(|p| !p.y.is_nan()).collect()
}
