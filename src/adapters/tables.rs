//! Built-in reference tables.
//!
//! Keys match exactly first, then case-insensitively.

use std::collections::HashMap;

use crate::domain::models::{CropEconomics, DEFAULT_MARKET_PRICE};
use crate::domain::ports::LookupTable;

/// Default record policy of a [`StaticTable`].
#[derive(Clone)]
pub enum TableDefault<V> {
    None,
    Value(V),
    /// Built from the missing key.
    FromKey(fn(&str) -> V),
}

/// In-memory immutable table.
#[derive(Clone)]
pub struct StaticTable<V> {
    entries: HashMap<String, V>,
    default: TableDefault<V>,
}

impl<V: Clone> StaticTable<V> {
    pub fn new<K: Into<String>>(entries: impl IntoIterator<Item = (K, V)>, default: TableDefault<V>) -> Self {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            default,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone + Send + Sync> LookupTable<V> for StaticTable<V> {
    fn lookup(&self, key: &str) -> Option<V> {
        if let Some(value) = self.entries.get(key) {
            return Some(value.clone());
        }
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.clone())
    }

    fn default_for(&self, key: &str) -> Option<V> {
        match &self.default {
            TableDefault::None => None,
            TableDefault::Value(v) => Some(v.clone()),
            TableDefault::FromKey(f) => Some(f(key)),
        }
    }
}

const fn economics(base_yield: f64, sustainability_factor: f64, cost_per_kg: f64) -> CropEconomics {
    CropEconomics {
        base_yield,
        sustainability_factor,
        cost_per_kg,
    }
}

/// Yield, sustainability and cost figures for every crop the classifier knows.
pub fn crop_economics() -> StaticTable<CropEconomics> {
    StaticTable::new(
        [
            ("Rice", economics(1500.0, 0.7, 25.0)),
            ("Maize", economics(1000.0, 0.85, 15.0)),
            ("Chickpea", economics(800.0, 0.9, 30.0)),
            ("Kidneybeans", economics(700.0, 0.88, 35.0)),
            ("Pigeonpeas", economics(750.0, 0.87, 32.0)),
            ("Mothbeans", economics(600.0, 0.86, 28.0)),
            ("Mungbean", economics(650.0, 0.89, 30.0)),
            ("Blackgram", economics(700.0, 0.88, 33.0)),
            ("Lentil", economics(600.0, 0.9, 34.0)),
            ("Pomegranate", economics(900.0, 0.85, 40.0)),
            ("Banana", economics(1200.0, 0.75, 20.0)),
            ("Mango", economics(800.0, 0.8, 45.0)),
            ("Grapes", economics(850.0, 0.82, 50.0)),
            ("Watermelon", economics(1100.0, 0.78, 18.0)),
            ("Muskmelon", economics(1000.0, 0.79, 20.0)),
            ("Apple", economics(900.0, 0.83, 60.0)),
            ("Orange", economics(950.0, 0.84, 55.0)),
            ("Papaya", economics(1100.0, 0.76, 25.0)),
            ("Coconut", economics(500.0, 0.9, 35.0)),
            ("Cotton", economics(700.0, 0.7, 30.0)),
            ("Jute", economics(800.0, 0.72, 28.0)),
            ("Coffee", economics(600.0, 0.85, 50.0)),
        ],
        TableDefault::None,
    )
}

/// Price per kg by crop.
pub fn market_prices() -> StaticTable<f64> {
    StaticTable::new(
        [
            ("Rice", 60.0),
            ("Maize", 45.0),
            ("Chickpea", 70.0),
            ("Kidneybeans", 80.0),
            ("Pigeonpeas", 75.0),
            ("Mothbeans", 65.0),
            ("Mungbean", 70.0),
            ("Blackgram", 75.0),
            ("Lentil", 80.0),
            ("Pomegranate", 90.0),
            ("Banana", 50.0),
            ("Mango", 100.0),
            ("Grapes", 120.0),
            ("Watermelon", 40.0),
            ("Muskmelon", 45.0),
            ("Apple", 150.0),
            ("Orange", 130.0),
            ("Papaya", 60.0),
            ("Coconut", 80.0),
            ("Cotton", 70.0),
            ("Jute", 65.0),
            ("Coffee", 110.0),
        ],
        TableDefault::Value(DEFAULT_MARKET_PRICE),
    )
}

fn consult_extension_services(disease: &str) -> String {
    format!("Consult local agricultural extension services for {disease}.")
}

/// Treatment advice by disease label.
pub fn pesticide_advice() -> StaticTable<String> {
    let healthy = "No treatment needed; maintain regular care.";
    let early_blight = "Apply chlorothalonil or mancozeb; rotate crops.";
    StaticTable::new(
        [
            ("Tomato___healthy", healthy),
            ("Tomato___Bacterial_spot", "Apply copper-based bactericides like Kocide 3000."),
            ("Tomato___Early_blight", early_blight),
            ("Tomato___Late_blight", "Apply fungicides like Ridomil Gold; remove affected leaves."),
            ("Corn___healthy", healthy),
            ("Corn___Common_rust", "Use fungicides like azoxystrobin; improve air circulation."),
            ("Corn___Northern_Leaf_Blight", "Apply propiconazole; ensure crop rotation."),
            ("Potato___healthy", healthy),
            ("Potato___Early_blight", early_blight),
            ("Potato___Late_blight", "Use metalaxyl-based fungicides; avoid overhead irrigation."),
        ]
        .map(|(k, v)| (k, v.to_string())),
        TableDefault::FromKey(consult_extension_services),
    )
}

/// Government support schemes by crop.
pub fn government_schemes() -> StaticTable<Vec<String>> {
    let schemes = |names: &[&str]| names.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
    StaticTable::new(
        [
            ("Wheat", schemes(&["PM-KISAN", "Crop Insurance Scheme"])),
            ("Rice", schemes(&["PM-KISAN", "National Mission for Sustainable Agriculture"])),
            ("Maize", schemes(&["PM-KISAN", "Soil Health Card Scheme"])),
            ("Barley", schemes(&["PM-KISAN", "Crop Insurance Scheme"])),
        ],
        TableDefault::Value(schemes(&["PM-KISAN"])),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let prices = market_prices();
        assert_eq!(prices.lookup("Rice"), Some(60.0));
        assert_eq!(prices.lookup("rice"), Some(60.0));
        assert_eq!(prices.lookup("Quinoa"), None);
        assert_eq!(prices.lookup_or_default("Quinoa"), Some(DEFAULT_MARKET_PRICE));
    }

    #[test]
    fn test_economics_has_no_default() {
        let table = crop_economics();
        assert_eq!(table.len(), 22);
        assert!(table.lookup_or_default("Quinoa").is_none());
        let rice = table.lookup("Rice").unwrap();
        assert!((rice.base_yield - 1500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pesticide_default_names_disease() {
        let table = pesticide_advice();
        assert_eq!(
            table.lookup_or_default("Apple___scab").unwrap(),
            "Consult local agricultural extension services for Apple___scab."
        );
        assert_eq!(
            table.lookup_or_default("Corn___healthy").unwrap(),
            "No treatment needed; maintain regular care."
        );
    }

    #[test]
    fn test_scheme_default() {
        let table = government_schemes();
        assert_eq!(table.lookup_or_default("Cotton").unwrap(), vec!["PM-KISAN".to_string()]);
        assert_eq!(table.lookup_or_default("wheat").unwrap().len(), 2);
    }
}
