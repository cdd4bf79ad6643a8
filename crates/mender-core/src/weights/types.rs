use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Learned selectors for a single field-type, in the order they were first seen
///
/// Insertion order is kept because ranking breaks score ties by it: a
/// selector learned earlier outranks an equally scored later one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorScores {
    entries: Vec<(String, u64)>,
}

impl SelectorScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score for a selector, if it has ever been learned
    pub fn get(&self, selector: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(known, _)| known == selector)
            .map(|(_, score)| *score)
    }

    /// Iterate selectors with their scores in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|(selector, score)| (selector.as_str(), *score))
    }

    /// Add one to the selector's score, appending it with score 1 if new.
    /// Saturates at `u64::MAX`. Returns the updated score.
    pub fn increment(&mut self, selector: &str) -> u64 {
        if let Some((_, score)) = self.entries.iter_mut().find(|(known, _)| known == selector) {
            *score = score.saturating_add(1);
            return *score;
        }

        self.entries.push((selector.to_string(), 1));
        1
    }
}

impl Serialize for SelectorScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (selector, score) in &self.entries {
            map.serialize_entry(selector, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SelectorScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = SelectorScores;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of selector to non-negative integer score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, u64)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((selector, score)) = access.next_entry::<String, u64>()? {
                    if entries.iter().any(|(known, _)| *known == selector) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate selector '{}'",
                            selector
                        )));
                    }
                    entries.push((selector, score));
                }

                Ok(SelectorScores { entries })
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// Field-type to learned selector scores
///
/// Field-types are kept sorted so the persisted file diffs cleanly between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    fields: BTreeMap<String, SelectorScores>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of field-types with at least one learned selector
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn field_types(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn scores(&self, field_type: &str) -> Option<&SelectorScores> {
        self.fields.get(field_type)
    }

    pub fn score(&self, field_type: &str, selector: &str) -> Option<u64> {
        self.scores(field_type)?.get(selector)
    }

    /// Total number of learned selectors across all field-types
    pub fn selector_count(&self) -> usize {
        self.fields.values().map(SelectorScores::len).sum()
    }

    /// Record a successful match of `selector` for `field_type`.
    /// Scores only ever grow; returns the new score.
    pub fn reinforce(&mut self, field_type: &str, selector: &str) -> u64 {
        self.fields
            .entry(field_type.to_string())
            .or_default()
            .increment(selector)
    }
}
