//! Raw records decoded from the source feeds.

use serde::{Deserialize, Serialize};

/// Region value used by the case feeds for the nationwide aggregate.
pub const NATIONWIDE: &str = "ALL";

/// One row-cell of a daily, region-tagged feed.
///
/// `date` is UTC epoch milliseconds of the reporting day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord<V> {
    pub date: i64,
    pub region: String,
    pub value: V,
}

impl<V> DailyRecord<V> {
    pub fn new(date: i64, region: impl Into<String>, value: V) -> Self {
        Self {
            date,
            region: region.into(),
            value,
        }
    }
}

/// A single counter cell. `None` when the source cell was blank or not a number.
pub type Count = Option<i64>;

/// Newly confirmed cases on a day.
pub type NewCase = DailyRecord<Count>;

/// Patients in severe condition on a day.
pub type SevereCase = DailyRecord<Count>;

/// Deaths since the start of reporting (cumulative).
pub type CumulativeDeath = DailyRecord<Count>;

/// Inpatient figures reported together for one region and day.
///
/// `discharged` is cumulative, the other two are point-in-time counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InpatientEtc {
    pub requiring_care: Count,
    pub discharged: Count,
    pub to_be_confirmed: Count,
}

pub type InpatientRecord = DailyRecord<InpatientEtc>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "U")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "-64")]
    Under65,
    #[serde(rename = "65-")]
    Over65,
    #[serde(rename = "UNK")]
    Unknown,
}

/// Which vaccine dose an event counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DoseStatus {
    First,
    Second,
}

impl TryFrom<u8> for DoseStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DoseStatus::First),
            2 => Ok(DoseStatus::Second),
            other => Err(format!("unknown dose status {other}")),
        }
    }
}

impl From<DoseStatus> for u8 {
    fn from(status: DoseStatus) -> Self {
        match status {
            DoseStatus::First => 1,
            DoseStatus::Second => 2,
        }
    }
}

/// A vaccination count for one day, prefecture and demographic bucket.
///
/// Several events share the same `(date, region_code)`; they are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseEvent {
    /// Reporting day as `yyyy-mm-dd`.
    pub date: String,
    #[serde(rename = "prefecture")]
    pub region_code: String,
    pub gender: Gender,
    #[serde(rename = "age")]
    pub age_band: AgeBand,
    #[serde(rename = "medical_worker")]
    pub is_medical_worker: bool,
    #[serde(rename = "status")]
    pub dose_status: DoseStatus,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dose_event_from_feed_line() {
        let line = r#"{"date":"2021-04-12","prefecture":"13","gender":"F","age":"65-","medical_worker":false,"status":2,"count":7}"#;
        let event: DoseEvent = serde_json::from_str(line).unwrap();

        assert_eq!(event.date, "2021-04-12");
        assert_eq!(event.region_code, "13");
        assert_eq!(event.gender, Gender::Female);
        assert_eq!(event.age_band, AgeBand::Over65);
        assert!(!event.is_medical_worker);
        assert_eq!(event.dose_status, DoseStatus::Second);
        assert_eq!(event.count, 7);
    }

    #[test]
    fn test_dose_status_rejects_unknown_value() {
        let line = r#"{"date":"2021-04-12","prefecture":"13","gender":"U","age":"UNK","medical_worker":true,"status":3,"count":1}"#;
        assert!(serde_json::from_str::<DoseEvent>(line).is_err());
    }

    #[test]
    fn test_dose_status_serializes_as_number() {
        assert_eq!(serde_json::to_string(&DoseStatus::First).unwrap(), "1");
        assert_eq!(serde_json::to_string(&DoseStatus::Second).unwrap(), "2");
    }
}
