//! The source feeds the charts are built from.

/// One of the five published feeds.
///
/// The case, severity and death feeds are wide tables (`Date,ALL,Hokkaido,..`)
/// with one counter per region column. The inpatient feed groups several
/// fields per region under `(<region>) <field>` headers. Vaccine doses are
/// newline-delimited JSON events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    NewCases,
    SevereCases,
    Deaths,
    Inpatients,
    VaccineDoses,
}

impl Feed {
    pub const ALL: [Feed; 5] = [
        Feed::NewCases,
        Feed::SevereCases,
        Feed::Deaths,
        Feed::Inpatients,
        Feed::VaccineDoses,
    ];

    pub fn url(&self) -> &'static str {
        match self {
            Feed::NewCases => {
                "https://covid19.mhlw.go.jp/public/opendata/newly_confirmed_cases_daily.csv"
            }
            Feed::SevereCases => "https://covid19.mhlw.go.jp/public/opendata/severe_cases_daily.csv",
            Feed::Deaths => "https://covid19.mhlw.go.jp/public/opendata/deaths_cumulative_daily.csv",
            Feed::Inpatients => {
                "https://covid19.mhlw.go.jp/public/opendata/requiring_inpatient_care_etc_daily.csv"
            }
            Feed::VaccineDoses => {
                "https://data.vrs.digital.go.jp/vaccination/opendata/latest/prefecture.ndjson"
            }
        }
    }

    /// Name of the raw file inside the data directory (last URL segment).
    pub fn file_name(&self) -> &'static str {
        let url = self.url();
        url.rsplit('/').next().unwrap_or(url)
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Feed::NewCases => "new-cases",
            Feed::SevereCases => "severe-cases",
            Feed::Deaths => "deaths",
            Feed::Inpatients => "inpatients",
            Feed::VaccineDoses => "vaccine-doses",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(Feed::NewCases.file_name(), "newly_confirmed_cases_daily.csv");
        assert_eq!(
            Feed::Inpatients.file_name(),
            "requiring_inpatient_care_etc_daily.csv"
        );
        assert_eq!(Feed::VaccineDoses.file_name(), "prefecture.ndjson");
    }
}
