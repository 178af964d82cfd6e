use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use super::{IngestError, strip_bom};
use crate::records::{Count, DailyRecord, InpatientEtc};

/// Parses a wide table (`Date,ALL,Hokkaido,..`) into one record per cell.
///
/// Cells that are blank or not integers become `None`.
pub fn parse_daily_counts(bytes: &[u8]) -> Result<Vec<DailyRecord<Count>>, IngestError> {
    let mut reader = reader(bytes);
    let headers = read_headers(&mut reader)?;
    let regions: Vec<&str> = headers.iter().skip(1).collect();

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let date = row_date(&row, index)?;
        for (region, cell) in regions.iter().zip(row.iter().skip(1)) {
            records.push(DailyRecord::new(date, *region, parse_count(cell)));
        }
    }

    debug!(records = records.len(), regions = regions.len(), "Parsed daily counts");
    Ok(records)
}

/// Columns of the inpatient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InpatientField {
    RequiringCare,
    Discharged,
    ToBeConfirmed,
}

impl InpatientField {
    fn from_header(name: &str) -> Option<Self> {
        match name {
            "Requiring inpatient care" => Some(Self::RequiringCare),
            "Discharged from hospital or released from treatment" => Some(Self::Discharged),
            "To be confirmed" => Some(Self::ToBeConfirmed),
            _ => None,
        }
    }

    fn set(&self, value: &mut InpatientEtc, count: Count) {
        match self {
            Self::RequiringCare => value.requiring_care = count,
            Self::Discharged => value.discharged = count,
            Self::ToBeConfirmed => value.to_be_confirmed = count,
        }
    }
}

/// Parses the inpatient table whose headers read `(<region>) <field>`.
///
/// Each row yields one record per region, in header order. A field with no
/// column for a region is reported as zero.
pub fn parse_inpatients(bytes: &[u8]) -> Result<Vec<DailyRecord<InpatientEtc>>, IngestError> {
    let mut reader = reader(bytes);
    let headers = read_headers(&mut reader)?;

    let mut regions: Vec<&str> = Vec::new();
    // (column, region slot, field)
    let mut columns: Vec<(usize, usize, InpatientField)> = Vec::new();

    for (column, header) in headers.iter().enumerate() {
        let Some((region, field)) = split_grouped_header(header) else {
            continue;
        };
        let Some(field) = InpatientField::from_header(field) else {
            debug!(header, "Ignoring unknown inpatient column");
            continue;
        };
        let slot = match regions.iter().position(|r| *r == region) {
            Some(slot) => slot,
            None => {
                regions.push(region);
                regions.len() - 1
            }
        };
        columns.push((column, slot, field));
    }

    let zeroed = InpatientEtc {
        requiring_care: Some(0),
        discharged: Some(0),
        to_be_confirmed: Some(0),
    };

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let date = row_date(&row, index)?;

        let mut values = vec![zeroed; regions.len()];
        for &(column, slot, field) in &columns {
            let cell = row.get(column).unwrap_or("");
            field.set(&mut values[slot], parse_count(cell));
        }

        records.extend(
            regions
                .iter()
                .zip(values)
                .map(|(region, value)| DailyRecord::new(date, *region, value)),
        );
    }

    debug!(records = records.len(), regions = regions.len(), "Parsed inpatient table");
    Ok(records)
}

fn reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .flexible(true)
        .from_reader(until_blank_line(strip_bom(bytes)))
}

/// Everything before the first empty line. Text after it is not part of the
/// table.
fn until_blank_line(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    for line in bytes.split(|b| *b == b'\n') {
        if line.is_empty() || line == b"\r" {
            return &bytes[..start];
        }
        start += line.len() + 1;
    }
    bytes
}

fn read_headers(reader: &mut csv::Reader<&[u8]>) -> Result<StringRecord, IngestError> {
    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(IngestError::MissingHeader);
    }
    Ok(headers)
}

/// Splits `(Tokyo) Severe cases` into `("Tokyo", "Severe cases")`.
fn split_grouped_header(header: &str) -> Option<(&str, &str)> {
    header.strip_prefix('(')?.split_once(") ")
}

/// Date of the `index`-th data row. Tables end at the first blank line, so
/// that row sits on line `index + 2` below the header.
fn row_date(row: &StringRecord, index: usize) -> Result<i64, IngestError> {
    let value = row.get(0).unwrap_or("").trim();
    parse_date(value).ok_or_else(|| IngestError::InvalidDate {
        line: index + 2,
        value: value.to_string(),
    })
}

/// UTC midnight of a `yyyy/M/d` date, in epoch milliseconds.
fn parse_date(value: &str) -> Option<i64> {
    let day = NaiveDate::parse_from_str(value, "%Y/%m/%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn parse_count(cell: &str) -> Count {
    cell.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN16: i64 = 1_579_132_800_000;
    const JAN17: i64 = JAN16 + 86_400_000;

    #[test]
    fn test_parse_date_without_padding() {
        assert_eq!(parse_date("2020/1/16"), Some(JAN16));
        assert_eq!(parse_date("2020/01/17"), Some(JAN17));
        assert_eq!(parse_date("16/1/2020x"), None);
    }

    #[test]
    fn test_parse_daily_counts() {
        let csv = "\u{feff}Date,ALL,Hokkaido,Tokyo\r\n2020/1/16,1,0,1\r\n2020/1/17,2,,x\r\n";
        let records = parse_daily_counts(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 6);
        assert_eq!(records[0], DailyRecord::new(JAN16, "ALL", Some(1)));
        assert_eq!(records[2], DailyRecord::new(JAN16, "Tokyo", Some(1)));
        assert_eq!(records[3], DailyRecord::new(JAN17, "ALL", Some(2)));
        assert_eq!(records[4].value, None);
        assert_eq!(records[5].value, None);
    }

    #[test]
    fn test_parse_daily_counts_ignores_blank_lines() {
        let csv = "Date,ALL\r\n2020/1/16,1\r\n\r\n";
        let records = parse_daily_counts(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_daily_counts_stops_at_blank_line() {
        let csv = "Date,ALL\r\n2020/1/16,1\r\n\r\nNote: provisional figures\r\n";
        let records = parse_daily_counts(csv.as_bytes()).unwrap();
        assert_eq!(records, vec![DailyRecord::new(JAN16, "ALL", Some(1))]);

        let csv = "Date,ALL\n2020/1/16,1\n\n2020/1/17,2\n";
        assert_eq!(parse_daily_counts(csv.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_inpatients_stops_at_blank_line() {
        let csv = "Date,(ALL) To be confirmed\r\n2020/1/16,3\r\n\r\n(footnote)\r\n";
        let records = parse_inpatients(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value.to_be_confirmed, Some(3));
    }

    #[test]
    fn test_until_blank_line() {
        assert_eq!(until_blank_line(b"a\nb\n"), b"a\nb\n");
        assert_eq!(until_blank_line(b"a\r\n\r\nb"), b"a\r\n");
        assert_eq!(until_blank_line(b"a\n\nb\n"), b"a\n");
        assert_eq!(until_blank_line(b""), b"");
    }

    #[test]
    fn test_parse_daily_counts_bad_date() {
        for csv in [
            "Date,ALL\n2020/1/16,1\nyesterday,2\n",
            "Date,ALL\r\n2020/1/16,1\r\nyesterday,2\r\n",
        ] {
            let err = parse_daily_counts(csv.as_bytes()).unwrap_err();

            match err {
                IngestError::InvalidDate { line, value } => {
                    assert_eq!(line, 3);
                    assert_eq!(value, "yesterday");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_parse_daily_counts_empty_input() {
        assert!(matches!(
            parse_daily_counts(b""),
            Err(IngestError::MissingHeader)
        ));
    }

    #[test]
    fn test_split_grouped_header() {
        assert_eq!(
            split_grouped_header("(ALL) To be confirmed"),
            Some(("ALL", "To be confirmed"))
        );
        assert_eq!(split_grouped_header("Date"), None);
        assert_eq!(split_grouped_header("(broken"), None);
    }

    #[test]
    fn test_parse_inpatients() {
        let csv = concat!(
            "Date,(ALL) Requiring inpatient care,(ALL) Discharged from hospital or released from treatment,",
            "(ALL) To be confirmed,(Tokyo) Requiring inpatient care,(Tokyo) Unrelated\r\n",
            "2020/1/16,10,100,3,4,9\r\n",
            "2020/1/17,11,,3,5,9\r\n",
        );
        let records = parse_inpatients(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(
            records[0],
            DailyRecord::new(
                JAN16,
                "ALL",
                InpatientEtc {
                    requiring_care: Some(10),
                    discharged: Some(100),
                    to_be_confirmed: Some(3),
                }
            )
        );
        // fields without a column default to zero
        assert_eq!(
            records[1],
            DailyRecord::new(
                JAN16,
                "Tokyo",
                InpatientEtc {
                    requiring_care: Some(4),
                    discharged: Some(0),
                    to_be_confirmed: Some(0),
                }
            )
        );
        assert_eq!(records[2].value.discharged, None);
        assert_eq!(records[3].region, "Tokyo");
    }
}
