use chrono::NaiveDateTime;

use crate::ingest::normalize::Field;

/// Timestamp format of the `hksarg_pr` key column.
pub const PRESS_RELEASE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One daily figure set from a press release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressRelease {
    pub timestamp: NaiveDateTime,
    pub new: i64,
    pub total: i64,
    pub cured: i64,
    pub remain: i64,
    pub stable: i64,
    pub serious: i64,
    pub critical: i64,
    pub confirmed: i64,
    pub dead: i64,
}

impl PressRelease {
    pub fn timestamp_key(&self) -> String {
        self.timestamp
            .format(PRESS_RELEASE_TIMESTAMP_FORMAT)
            .to_string()
    }

    /// Values in `hksarg_pr` column order.
    pub fn fields(&self) -> Vec<Field> {
        vec![
            Field::DateTime(self.timestamp_key()),
            Field::Integer(self.new),
            Field::Integer(self.total),
            Field::Integer(self.cured),
            Field::Integer(self.remain),
            Field::Integer(self.stable),
            Field::Integer(self.serious),
            Field::Integer(self.critical),
            Field::Integer(self.confirmed),
            Field::Integer(self.dead),
        ]
    }
}
