use serde::Deserialize;

use crate::ingest::normalize::Field;

/// Province entry of a `getAreaStat` dump.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaStat {
    pub province_name: String,
    pub confirmed_count: i64,
    #[serde(default)]
    pub suspected_count: i64,
    pub cured_count: i64,
    pub dead_count: i64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub cities: Vec<CityStat>,
}

/// City entry nested under an [`AreaStat`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityStat {
    pub city_name: String,
    pub confirmed_count: i64,
    #[serde(default)]
    pub suspected_count: i64,
    pub cured_count: i64,
    pub dead_count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseCounts {
    pub confirmed: i64,
    pub suspected: i64,
    pub cured: i64,
    pub dead: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvinceSnapshot {
    /// `YYYYMMDDHHMMSS` taken from the file name.
    pub timestamp: i64,
    pub province_zh: String,
    pub province_en: Option<String>,
    pub counts: CaseCounts,
    pub comment: String,
}

impl ProvinceSnapshot {
    pub fn id(&self) -> String {
        format!("{}_{}", self.timestamp, self.province_zh)
    }

    /// Values in `3g_dxy_cn_province` insert order.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            Field::text(self.id()),
            Field::Integer(self.timestamp),
            Field::text(&self.province_zh),
            Field::optional_text(self.province_en.as_deref()),
            Field::Integer(self.counts.confirmed),
            Field::Integer(self.counts.suspected),
            Field::Integer(self.counts.cured),
            Field::Integer(self.counts.dead),
            Field::text(&self.comment),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySnapshot {
    pub timestamp: i64,
    pub province_zh: String,
    pub province_en: Option<String>,
    pub city_zh: String,
    pub city_en: Option<String>,
    pub counts: CaseCounts,
}

impl CitySnapshot {
    pub fn id(&self) -> String {
        format!("{}_{}_{}", self.timestamp, self.province_zh, self.city_zh)
    }

    /// Values in `3g_dxy_cn_city` insert order.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            Field::text(self.id()),
            Field::Integer(self.timestamp),
            Field::text(&self.province_zh),
            Field::optional_text(self.province_en.as_deref()),
            Field::text(&self.city_zh),
            Field::optional_text(self.city_en.as_deref()),
            Field::Integer(self.counts.confirmed),
            Field::Integer(self.counts.suspected),
            Field::Integer(self.counts.cured),
            Field::Integer(self.counts.dead),
        ]
    }
}

/// Everything loaded from one snapshot file.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub timestamp: i64,
    pub provinces: Vec<ProvinceSnapshot>,
    pub cities: Vec<CitySnapshot>,
}
