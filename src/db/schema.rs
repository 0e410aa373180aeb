/// A table name and its column definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: &'static str,
    pub columns: &'static str,
}

pub const PRESS_RELEASE_TABLE: &str = "hksarg_pr";
pub const PROVINCE_TABLE: &str = "3g_dxy_cn_province";
pub const CITY_TABLE: &str = "3g_dxy_cn_city";
pub const JHU_TABLE: &str = "jhu";
pub const PLACES_TABLE: &str = "china_places";

/// Every table rebuilt on a full load, in creation order.
pub const TABLE_DEFINITIONS: &[TableDefinition] = &[
    TableDefinition {
        name: PRESS_RELEASE_TABLE,
        columns: "Timestamp Text Unique Primary Key, New Int, Total Int, Cured Int, Remain Int, \
                  Stable Int, Serious Int, Critical Int, Confirmed Int, Dead Int",
    },
    TableDefinition {
        name: PROVINCE_TABLE,
        columns: "UUID Text Unique Primary Key, Timestamp Int, Province_ZH Text, Province_EN Text, \
                  Confirmed Int, Suspected Int, Dead Int, Cured Int, Comment Text",
    },
    TableDefinition {
        name: CITY_TABLE,
        columns: "UUID Text Unique Primary Key, Timestamp Int, Province_ZH Text, Province_EN Text, \
                  City_ZH Text, City_EN Text, Confirmed Int, Suspected Int, Dead Int, Cured Int",
    },
    TableDefinition {
        name: JHU_TABLE,
        columns: "UUID Text Unique Primary Key, Timestamp Int, Country Text, Province Text, \
                  Confirmed Int, Dead Int, Cured Int",
    },
    TableDefinition {
        name: PLACES_TABLE,
        columns: "OBJECTID Int Unique Primary Key, ADMIN_TYPE Text, ADM2_CAP Text, ADM2_EN Text, \
                  ADM2_ZH Text, ADM2_PCODE Text, ADM1_EN Text, ADM1_ZH Text, ADM1_PCODE Text, \
                  ADM0_EN Text, ADM0_ZH Text, ADM0_PCODE Text",
    },
];

pub const INSERT_PRESS_RELEASE: &str = r#"INSERT OR IGNORE INTO [hksarg_pr]
    (Timestamp, New, Total, Cured, Remain, Stable, Serious, Critical, Confirmed, Dead)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#;

pub const INSERT_PLACE: &str = r#"INSERT INTO [china_places]
    (OBJECTID, ADMIN_TYPE, ADM2_CAP, ADM2_EN, ADM2_ZH, ADM2_PCODE, ADM1_EN, ADM1_ZH, ADM1_PCODE, ADM0_EN, ADM0_ZH, ADM0_PCODE)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"#;

pub const INSERT_PROVINCE: &str = r#"INSERT OR IGNORE INTO [3g_dxy_cn_province]
    (UUID, Timestamp, Province_ZH, Province_EN, Confirmed, Suspected, Cured, Dead, Comment)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#;

pub const INSERT_CITY: &str = r#"INSERT OR IGNORE INTO [3g_dxy_cn_city]
    (UUID, Timestamp, Province_ZH, Province_EN, City_ZH, City_EN, Confirmed, Suspected, Cured, Dead)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#;

pub const SELECT_PLACE_NAMES: &str =
    "SELECT ADM1_ZH, ADM1_EN, ADM2_ZH, ADM2_EN FROM [china_places] ORDER BY OBJECTID";

pub const SELECT_TABLE_NAMES: &str =
    "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'";
