use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A stocked drink as served by the inventory API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    #[serde(rename = "Barcode", deserialize_with = "string_or_number")]
    pub barcode: String,
    #[serde(rename = "Brand", default)]
    pub brand: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Abv", default)]
    pub abv: f32,
    #[serde(rename = "Ibu", default)]
    pub ibu: f32,
    #[serde(rename = "Type", default)]
    pub style: String,
    #[serde(rename = "Logo", default)]
    pub logo: String,
    #[serde(rename = "Date", default)]
    pub date: i64,
    #[serde(rename = "Quantity", default)]
    pub quantity: i64,
}

impl Drink {
    /// File name of the cached logo image, e.g. `label-123.jpeg`.
    pub fn image_name(&self) -> String {
        let trimmed = self.logo.split(['?', '#']).next().unwrap_or_default();
        match trimmed.rsplit('/').next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}.png", self.barcode),
        }
    }

    /// Short brewery name when one is known.
    pub fn brand_display<'a>(&'a self, nicknames: &'a HashMap<String, String>) -> &'a str {
        nicknames
            .get(&self.brand)
            .map(String::as_str)
            .unwrap_or(&self.brand)
    }
}

// Older API builds send barcodes as integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}
