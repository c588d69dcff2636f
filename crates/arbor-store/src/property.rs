use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use arbor_types::{PropertyValue, TypeTag};

/// The persisted state of one resource: a type tag plus named properties.
///
/// The tag makes storage polymorphic — it is saved with the record and
/// resolved through the type registry when the resource is loaded back, so
/// the store itself never knows about concrete resource types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySet {
    format: TypeTag,
    properties: BTreeMap<String, PropertyValue>,
}

impl PropertySet {
    /// Create an empty property set for the given type tag.
    pub fn new(format: TypeTag) -> Self {
        Self {
            format,
            properties: BTreeMap::new(),
        }
    }

    /// The persisted type tag.
    pub fn format(&self) -> &TypeTag {
        &self.format
    }

    /// Get a property value by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Get a property's string content, if present and string-valued.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(PropertyValue::as_str)
    }

    /// Get localized text for a property, with language fallback.
    pub fn get_localized(&self, name: &str, language: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(|value| value.localized(language))
    }

    /// Set a property value, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> &mut Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Remove a property. Returns the previous value if there was one.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    /// Returns `true` if the property is present.
    pub fn has(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Iterate over all properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn set_and_get() {
        let mut props = PropertySet::new(TypeTag::from("webpage"));
        props.set("title", "Hello");
        assert_eq!(props.get_str("title"), Some("Hello"));
        assert_eq!(props.format().as_str(), "webpage");
        assert!(props.has("title"));
        assert!(!props.has("missing"));
    }

    #[test]
    fn set_replaces_previous_value() {
        let mut props = PropertySet::new(TypeTag::from("file"));
        props.set("title", "old");
        props.set("title", "new");
        assert_eq!(props.get_str("title"), Some("new"));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn remove_returns_previous() {
        let mut props = PropertySet::new(TypeTag::from("file"));
        props.set("count", 3i64);
        assert_eq!(props.remove("count"), Some(PropertyValue::Int(3)));
        assert_eq!(props.remove("count"), None);
        assert!(props.is_empty());
    }

    #[test]
    fn localized_lookup() {
        let mut map = BTreeMap::new();
        map.insert("en".to_string(), "Home".to_string());
        map.insert("es".to_string(), "Inicio".to_string());
        let mut props = PropertySet::new(TypeTag::from("webpage"));
        props.set("title", PropertyValue::Localized(map));
        assert_eq!(props.get_localized("title", "es"), Some("Inicio"));
        assert_eq!(props.get_localized("title", "de"), Some("Home"));
    }
}
