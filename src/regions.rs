//! Static registry of prefectures and the region selector used by the pipeline.

use serde::Serialize;
use thiserror::Error;

use crate::records::NATIONWIDE;

/// A prefecture as named by the case feeds (`name`) and the dose feed (`id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prefecture {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
}

/// A geographic area grouping several prefectures.
#[derive(Debug)]
pub struct Area {
    pub name: &'static str,
    pub prefectures: &'static [Prefecture],
}

macro_rules! pref {
    ($id:literal, $name:literal, $title:literal) => {
        Prefecture {
            id: $id,
            name: $name,
            title: $title,
        }
    };
}

pub static AREAS: &[Area] = &[
    Area {
        name: "北海道地方",
        prefectures: &[pref!("01", "Hokkaido", "北海道")],
    },
    Area {
        name: "東北地方",
        prefectures: &[
            pref!("02", "Aomori", "青森県"),
            pref!("03", "Iwate", "岩手県"),
            pref!("04", "Miyagi", "宮城県"),
            pref!("05", "Akita", "秋田県"),
            pref!("06", "Yamagata", "山形県"),
            pref!("07", "Fukushima", "福島県"),
        ],
    },
    Area {
        name: "関東地方",
        prefectures: &[
            pref!("08", "Ibaraki", "茨城県"),
            pref!("09", "Tochigi", "栃木県"),
            pref!("10", "Gunma", "群馬県"),
            pref!("11", "Saitama", "埼玉県"),
            pref!("12", "Chiba", "千葉県"),
            pref!("13", "Tokyo", "東京都"),
            pref!("14", "Kanagawa", "神奈川県"),
        ],
    },
    Area {
        name: "中部地方",
        prefectures: &[
            pref!("15", "Niigata", "新潟県"),
            pref!("16", "Toyama", "富山県"),
            pref!("17", "Ishikawa", "石川県"),
            pref!("18", "Fukui", "福井県"),
            pref!("19", "Yamanashi", "山梨県"),
            pref!("20", "Nagano", "長野県"),
            pref!("21", "Gifu", "岐阜県"),
            pref!("22", "Shizuoka", "静岡県"),
            pref!("23", "Aichi", "愛知県"),
        ],
    },
    Area {
        name: "関西地方",
        prefectures: &[
            pref!("24", "Mie", "三重県"),
            pref!("25", "Shiga", "滋賀県"),
            pref!("26", "Kyoto", "京都府"),
            pref!("27", "Osaka", "大阪府"),
            pref!("28", "Hyogo", "兵庫県"),
            pref!("29", "Nara", "奈良県"),
            pref!("30", "Wakayama", "和歌山県"),
        ],
    },
    Area {
        name: "中国地方",
        prefectures: &[
            pref!("31", "Tottori", "鳥取県"),
            pref!("32", "Shimane", "島根県"),
            pref!("33", "Okayama", "岡山県"),
            pref!("34", "Hiroshima", "広島県"),
            pref!("35", "Yamaguchi", "山口県"),
        ],
    },
    Area {
        name: "四国地方",
        prefectures: &[
            pref!("36", "Tokushima", "徳島県"),
            pref!("37", "Kagawa", "香川県"),
            pref!("38", "Ehime", "愛媛県"),
            pref!("39", "Kochi", "高知県"),
        ],
    },
    Area {
        name: "九州・沖縄地方",
        prefectures: &[
            pref!("40", "Fukuoka", "福岡県"),
            pref!("41", "Saga", "佐賀県"),
            pref!("42", "Nagasaki", "長崎県"),
            pref!("43", "Kumamoto", "熊本県"),
            pref!("44", "Oita", "大分県"),
            pref!("45", "Miyazaki", "宮崎県"),
            pref!("46", "Kagoshima", "鹿児島県"),
            pref!("47", "Okinawa", "沖縄県"),
        ],
    },
];

/// Iterates over every prefecture in registry order.
pub fn prefectures() -> impl Iterator<Item = &'static Prefecture> {
    AREAS.iter().flat_map(|area| area.prefectures.iter())
}

/// Looks up a prefecture by its case-feed name.
pub fn find_prefecture(name: &str) -> Option<&'static Prefecture> {
    prefectures().find(|p| p.name == name)
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown region '{0}'")]
pub struct UnknownRegion(pub String);

/// Which partition of the data a chart is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Nationwide,
    Prefecture(&'static Prefecture),
}

impl Region {
    /// Resolves a name given by a caller. An empty name or `ALL` selects the
    /// nationwide aggregate.
    pub fn resolve(name: &str) -> Result<Self, UnknownRegion> {
        if name.is_empty() || name == NATIONWIDE {
            return Ok(Region::Nationwide);
        }
        find_prefecture(name)
            .map(Region::Prefecture)
            .ok_or_else(|| UnknownRegion(name.to_string()))
    }

    /// Nationwide followed by every prefecture.
    pub fn all() -> impl Iterator<Item = Region> {
        std::iter::once(Region::Nationwide).chain(prefectures().map(Region::Prefecture))
    }

    /// Region value used by the case, severity, death and inpatient feeds.
    pub fn case_key(&self) -> &'static str {
        match self {
            Region::Nationwide => NATIONWIDE,
            Region::Prefecture(p) => p.name,
        }
    }

    /// Region code used by the dose feed; `None` means all prefectures.
    pub fn dose_code(&self) -> Option<&'static str> {
        match self {
            Region::Nationwide => None,
            Region::Prefecture(p) => Some(p.id),
        }
    }

    pub fn prefecture(&self) -> Option<&'static Prefecture> {
        match self {
            Region::Nationwide => None,
            Region::Prefecture(p) => Some(*p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_all_prefectures_in_code_order() {
        let ids: Vec<&str> = prefectures().map(|p| p.id).collect();
        assert_eq!(ids.len(), 47);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(*id, format!("{:02}", i + 1));
        }
    }

    #[test]
    fn test_resolve_nationwide() {
        assert_eq!(Region::resolve(""), Ok(Region::Nationwide));
        assert_eq!(Region::resolve("ALL"), Ok(Region::Nationwide));
        assert_eq!(Region::Nationwide.case_key(), "ALL");
        assert_eq!(Region::Nationwide.dose_code(), None);
    }

    #[test]
    fn test_resolve_prefecture() {
        let region = Region::resolve("Tokyo").unwrap();
        assert_eq!(region.case_key(), "Tokyo");
        assert_eq!(region.dose_code(), Some("13"));
        assert_eq!(region.prefecture().map(|p| p.title), Some("東京都"));
    }

    #[test]
    fn test_resolve_unknown() {
        let err = Region::resolve("Atlantis").unwrap_err();
        assert_eq!(err, UnknownRegion("Atlantis".to_string()));
        assert_eq!(err.to_string(), "unknown region 'Atlantis'");
    }

    #[test]
    fn test_all_starts_with_nationwide() {
        let regions: Vec<Region> = Region::all().collect();
        assert_eq!(regions.len(), 48);
        assert_eq!(regions[0], Region::Nationwide);
        assert_eq!(regions[1].case_key(), "Hokkaido");
    }
}
