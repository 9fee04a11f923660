//! Imported song metadata
//!
//! A song is whatever a mod's `customsongs.json` says about its bank: the
//! `Bank` name plus any number of tuning fields (BPM, volume, beat offsets,
//! ...). Only `Bank` is interpreted here; every other field is carried along
//! untouched so the game sees exactly what the mod author wrote.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One custom song, as stored in the catalog and in level associations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Bank name (the `.bank` file stem)
    #[serde(rename = "Bank")]
    pub bank: String,

    /// Every other field, in original order
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Song {
    pub fn new(bank: impl Into<String>) -> Self {
        Self {
            bank: bank.into(),
            extra: Map::new(),
        }
    }

    /// Builder-style helper for attaching a metadata field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Interpret a JSON node as a song; `None` if it has no string `Bank`
    pub fn from_value(value: &Value) -> Option<Self> {
        value.get("Bank")?.as_str()?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Case-insensitive bank comparison
    pub fn has_bank(&self, bank: &str) -> bool {
        same_name(&self.bank, bank)
    }

    /// All fields in display order, `Bank` first
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("Bank".to_string(), self.bank.clone())];
        fields.extend(self.extra.iter().map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        }));
        fields
    }
}

/// Case-insensitive name comparison used for banks and levels alike
pub fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
