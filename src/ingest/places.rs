use rusqlite::types::Value;

use crate::db::schema::SELECT_PLACE_NAMES;
use crate::db::Repository;
use crate::error::Result;

/// Local-name to English-name lookup over the boundary table.
///
/// Snapshot sources use short names ("广东") while the reference table
/// carries the full administrative name ("广东省"), so a name resolves to the
/// first reference entry that starts with it. An exact match always wins.
#[derive(Debug, Clone, Default)]
pub struct PlaceIndex {
    provinces: Vec<(String, String)>,
    cities: Vec<(String, String)>,
}

impl PlaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from the `china_places` table, in `OBJECTID` order.
    pub async fn load(repository: &Repository) -> Result<Self> {
        let mut index = Self::new();
        for row in repository.rows_from_query(SELECT_PLACE_NAMES).await? {
            let text = |i: usize| match row.get(i) {
                Some(Value::Text(s)) => s.as_str(),
                _ => "",
            };
            index.add_province(text(0), text(1));
            index.add_city(text(2), text(3));
        }
        tracing::debug!(
            "Place index: {} provinces, {} cities",
            index.provinces.len(),
            index.cities.len()
        );
        Ok(index)
    }

    pub fn add_province(&mut self, local: &str, english: &str) {
        add_unique(&mut self.provinces, local, english);
    }

    pub fn add_city(&mut self, local: &str, english: &str) {
        add_unique(&mut self.cities, local, english);
    }

    pub fn province_en(&self, local: &str) -> Option<&str> {
        resolve(&self.provinces, local)
    }

    pub fn city_en(&self, local: &str) -> Option<&str> {
        resolve(&self.cities, local)
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty() && self.cities.is_empty()
    }
}

fn add_unique(names: &mut Vec<(String, String)>, local: &str, english: &str) {
    let (local, english) = (local.trim(), english.trim());
    if local.is_empty() || english.is_empty() {
        return;
    }
    if names.iter().any(|(existing, _)| existing == local) {
        return;
    }
    names.push((local.to_string(), english.to_string()));
}

fn resolve<'a>(names: &'a [(String, String)], local: &str) -> Option<&'a str> {
    let local = local.trim();
    if local.is_empty() {
        return None;
    }

    names
        .iter()
        .find(|(name, _)| name == local)
        .or_else(|| names.iter().find(|(name, _)| name.starts_with(local)))
        .map(|(_, english)| english.as_str())
}
