use crate::ingest::normalize::Field;

/// A row of the OCHA administrative-boundary table (prefecture level).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub object_id: i64,
    pub admin_type: String,
    pub adm2_cap: String,
    pub adm2_en: String,
    pub adm2_zh: String,
    pub adm2_pcode: String,
    pub adm1_en: String,
    pub adm1_zh: String,
    pub adm1_pcode: String,
    pub adm0_en: String,
    pub adm0_zh: String,
    pub adm0_pcode: String,
}

impl Place {
    pub const COLUMN_COUNT: usize = 12;

    /// Build a place from the text columns that follow `OBJECTID`.
    /// Returns `None` unless exactly eleven columns are given.
    pub fn from_columns(object_id: i64, columns: &[&str]) -> Option<Self> {
        let [admin_type, adm2_cap, adm2_en, adm2_zh, adm2_pcode, adm1_en, adm1_zh, adm1_pcode, adm0_en, adm0_zh, adm0_pcode] =
            columns
        else {
            return None;
        };

        Some(Self {
            object_id,
            admin_type: admin_type.to_string(),
            adm2_cap: adm2_cap.to_string(),
            adm2_en: adm2_en.to_string(),
            adm2_zh: adm2_zh.to_string(),
            adm2_pcode: adm2_pcode.to_string(),
            adm1_en: adm1_en.to_string(),
            adm1_zh: adm1_zh.to_string(),
            adm1_pcode: adm1_pcode.to_string(),
            adm0_en: adm0_en.to_string(),
            adm0_zh: adm0_zh.to_string(),
            adm0_pcode: adm0_pcode.to_string(),
        })
    }

    /// Values in `china_places` column order. Text is stored verbatim.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            Field::Integer(self.object_id),
            Field::text(&self.admin_type),
            Field::text(&self.adm2_cap),
            Field::text(&self.adm2_en),
            Field::text(&self.adm2_zh),
            Field::text(&self.adm2_pcode),
            Field::text(&self.adm1_en),
            Field::text(&self.adm1_zh),
            Field::text(&self.adm1_pcode),
            Field::text(&self.adm0_en),
            Field::text(&self.adm0_zh),
            Field::text(&self.adm0_pcode),
        ]
    }
}
