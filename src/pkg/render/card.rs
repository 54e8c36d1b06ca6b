use std::collections::HashMap;

use crate::pkg::inventory::drink::Drink;

/// Display-ready fields for one drink card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub brand: String,
    pub name: String,
    pub style: String,
    pub abv: Option<String>,
    pub ibu: Option<String>,
    pub quantity: i64,
    pub image_url: String,
}

impl CardView {
    pub fn from_drink(drink: &Drink, nicknames: &HashMap<String, String>, image_base_url: &str) -> Self {
        Self {
            brand: drink.brand_display(nicknames).to_string(),
            name: drink.name.clone(),
            style: drink.style.clone(),
            abv: (drink.abv > 0.0).then(|| format!("{:.1}% ABV", drink.abv)),
            ibu: (drink.ibu > 0.0).then(|| format!("{:.0} IBU", drink.ibu)),
            quantity: drink.quantity,
            image_url: format!(
                "{}/{}",
                image_base_url.trim_end_matches('/'),
                drink.image_name()
            ),
        }
    }

    /// Style, ABV and IBU joined for a single detail line.
    pub fn details(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if !self.style.is_empty() {
            parts.push(&self.style);
        }
        if let Some(abv) = &self.abv {
            parts.push(abv);
        }
        if let Some(ibu) = &self.ibu {
            parts.push(ibu);
        }
        parts.join(" · ")
    }

    pub fn stock_line(&self) -> String {
        format!("{} left", self.quantity)
    }
}
