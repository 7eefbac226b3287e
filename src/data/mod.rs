//! Catalog items: raw attribute values plus their encoded feature vector.
//!
//! An [`Item`] keeps both representations side by side. Raw values are the
//! source of truth and are never discarded; the dense vector is derived
//! from them by the encoder and recomputed whenever the schema's vocabulary
//! or numeric bounds shift.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A raw, human-entered attribute value before encoding.
///
/// Multi-valued categories ride in the [`Text`](RawValue::Text) variant as
/// comma-separated tokens, mirroring how catalog data is entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    /// A measurement, e.g. a height in meters.
    Numeric(f32),
    /// A yes/no property.
    Flag(bool),
    /// A color name or comma-separated category tokens.
    Text(String),
}

impl RawValue {
    /// Short name for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Numeric(_) => "numeric",
            RawValue::Flag(_) => "flag",
            RawValue::Text(_) => "text",
        }
    }

    /// The numeric payload, if this is a [`Numeric`](RawValue::Numeric) value.
    #[must_use]
    pub fn as_numeric(&self) -> Option<f32> {
        match self {
            RawValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// The flag payload, if this is a [`Flag`](RawValue::Flag) value.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            RawValue::Flag(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is a [`Text`](RawValue::Text) value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Numeric(v) => write!(f, "{v}"),
            RawValue::Flag(v) => write!(f, "{v}"),
            RawValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f32> for RawValue {
    fn from(v: f32) -> Self {
        RawValue::Numeric(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Numeric(v as f32)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Flag(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// One catalog entry: a display name, raw values keyed by attribute name,
/// and the dense feature vector derived from them.
///
/// Items start unencoded (`features` empty); an encoding pass sizes the
/// vector to the schema width and fills it in.
///
/// # Examples
///
/// ```
/// use vivero::data::Item;
///
/// let rose = Item::new("Rosa canina")
///     .with("blooms", true)
///     .with("height", 2.5)
///     .with("family", "Rosaceae");
///
/// assert_eq!(rose.name(), "Rosa canina");
/// assert!(!rose.is_encoded());
/// assert_eq!(rose.value("blooms").and_then(|v| v.as_flag()), Some(true));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    name: String,
    values: HashMap<String, RawValue>,
    features: Vec<f32>,
}

impl Item {
    /// Create an item with no attribute values yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
            features: Vec::new(),
        }
    }

    /// Attach a raw attribute value, consuming and returning the item.
    #[must_use]
    pub fn with(mut self, attribute: &str, value: impl Into<RawValue>) -> Self {
        self.set(attribute, value);
        self
    }

    /// Attach or overwrite a raw attribute value in place.
    ///
    /// If the item was already encoded, the caller must run it through the
    /// encoder again before the change shows up in `features`.
    pub fn set(&mut self, attribute: &str, value: impl Into<RawValue>) {
        self.values.insert(attribute.to_string(), value.into());
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value for an attribute, if present.
    #[must_use]
    pub fn value(&self, attribute: &str) -> Option<&RawValue> {
        self.values.get(attribute)
    }

    /// All raw values keyed by attribute name.
    #[must_use]
    pub fn values(&self) -> &HashMap<String, RawValue> {
        &self.values
    }

    /// The encoded feature vector; empty until an encoding pass runs.
    #[must_use]
    pub fn features(&self) -> &[f32] {
        &self.features
    }

    /// Returns `true` once an encoding pass has filled in the vector.
    #[must_use]
    pub fn is_encoded(&self) -> bool {
        !self.features.is_empty()
    }

    pub(crate) fn features_mut(&mut self) -> &mut [f32] {
        &mut self.features
    }

    /// Zero the vector at the given schema width.
    pub(crate) fn reset_features(&mut self, width: usize) {
        self.features.clear();
        self.features.resize(width, 0.0);
    }
}

/// Find an item by name, returning its index into the slice.
///
/// Names are compared exactly. Returns the first match.
#[must_use]
pub fn find_item(items: &[Item], name: &str) -> Option<usize> {
    items.iter().position(|item| item.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_kind_names() {
        assert_eq!(RawValue::Numeric(1.0).kind_name(), "numeric");
        assert_eq!(RawValue::Flag(true).kind_name(), "flag");
        assert_eq!(RawValue::Text("x".to_string()).kind_name(), "text");
    }

    #[test]
    fn test_raw_value_accessors() {
        assert_eq!(RawValue::Numeric(2.5).as_numeric(), Some(2.5));
        assert_eq!(RawValue::Numeric(2.5).as_flag(), None);
        assert_eq!(RawValue::Flag(false).as_flag(), Some(false));
        assert_eq!(RawValue::Text("Rosaceae".to_string()).as_text(), Some("Rosaceae"));
        assert_eq!(RawValue::Text("x".to_string()).as_numeric(), None);
    }

    #[test]
    fn test_raw_value_from_impls() {
        assert_eq!(RawValue::from(1.5_f32), RawValue::Numeric(1.5));
        assert_eq!(RawValue::from(1.5_f64), RawValue::Numeric(1.5));
        assert_eq!(RawValue::from(true), RawValue::Flag(true));
        assert_eq!(RawValue::from("Green"), RawValue::Text("Green".to_string()));
        assert_eq!(
            RawValue::from("Green".to_string()),
            RawValue::Text("Green".to_string())
        );
    }

    #[test]
    fn test_raw_value_display() {
        assert_eq!(RawValue::Numeric(2.5).to_string(), "2.5");
        assert_eq!(RawValue::Flag(true).to_string(), "true");
        assert_eq!(RawValue::Text("Green".to_string()).to_string(), "Green");
    }

    #[test]
    fn test_item_builder_and_lookup() {
        let item = Item::new("Phyllostachys aurea")
            .with("blooms", false)
            .with("height", 6.0)
            .with("family", "Poaceae");

        assert_eq!(item.name(), "Phyllostachys aurea");
        assert_eq!(item.value("height").and_then(RawValue::as_numeric), Some(6.0));
        assert_eq!(item.value("unknown"), None);
        assert_eq!(item.values().len(), 3);
    }

    #[test]
    fn test_item_set_overwrites() {
        let mut item = Item::new("Ficus").with("height", 1.0);
        item.set("height", 2.0);
        assert_eq!(item.value("height").and_then(RawValue::as_numeric), Some(2.0));
    }

    #[test]
    fn test_item_starts_unencoded() {
        let item = Item::new("Ficus");
        assert!(!item.is_encoded());
        assert!(item.features().is_empty());
    }

    #[test]
    fn test_reset_features_zeroes_at_width() {
        let mut item = Item::new("Ficus");
        item.reset_features(4);
        assert!(item.is_encoded());
        assert_eq!(item.features(), &[0.0, 0.0, 0.0, 0.0]);

        item.features_mut()[2] = 1.0;
        item.reset_features(6);
        assert_eq!(item.features().len(), 6);
        assert!(item.features().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_find_item() {
        let items = vec![
            Item::new("Rosa canina"),
            Item::new("Phyllostachys aurea"),
            Item::new("Ficus elastica"),
        ];
        assert_eq!(find_item(&items, "Phyllostachys aurea"), Some(1));
        assert_eq!(find_item(&items, "Quercus robur"), None);
    }

    #[test]
    fn test_item_serde_round_trip() {
        let mut item = Item::new("Rosa canina")
            .with("blooms", true)
            .with("height", 2.5);
        item.reset_features(2);
        item.features_mut()[0] = 1.0;

        let json = serde_json::to_string(&item).expect("serialize");
        let restored: Item = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.name(), "Rosa canina");
        assert_eq!(restored.value("blooms"), Some(&RawValue::Flag(true)));
        assert_eq!(restored.features(), &[1.0, 0.0]);
    }
}
