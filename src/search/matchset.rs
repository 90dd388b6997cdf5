//! Accepted detections grouped by label.

use crate::geometry::Rect;
use crate::label::{Label, Rgb};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Color and accepted rectangles of one label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMatches {
    pub color: Rgb,
    pub rects: Vec<Rect>,
}

/// Label to detections map in first-acceptance order.
///
/// Persists as `{"<label>": {"color": [r, g, b], "rects": [[x, y, w, h], ...]}}`
/// with keys in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    entries: Vec<(Label, LabelMatches)>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rect` to `label`, creating the entry with `color` if needed.
    pub fn push(&mut self, label: &Label, color: Rgb, rect: Rect) {
        match self.entries.iter_mut().find(|(name, _)| name == label) {
            Some((_, matches)) => matches.rects.push(rect),
            None => self.entries.push((
                label.clone(),
                LabelMatches {
                    color,
                    rects: vec![rect],
                },
            )),
        }
    }

    pub fn get(&self, label: &Label) -> Option<&LabelMatches> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, matches)| matches)
    }

    /// Number of labels with at least one detection.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of rectangles across all labels.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, m)| m.rects.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &LabelMatches)> + '_ {
        self.entries.iter().map(|(label, matches)| (label, matches))
    }

    /// Every rectangle with its label, label by label.
    pub fn detections(&self) -> impl Iterator<Item = (&Label, Rgb, Rect)> + '_ {
        self.entries.iter().flat_map(|(label, matches)| {
            matches
                .rects
                .iter()
                .map(move |rect| (label, matches.color, *rect))
        })
    }
}

impl Serialize for MatchSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, matches) in &self.entries {
            map.serialize_entry(label, matches)?;
        }
        map.end()
    }
}

struct MatchSetVisitor;

impl<'de> Visitor<'de> for MatchSetVisitor {
    type Value = MatchSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of label to {color, rects}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<MatchSet, A::Error> {
        let mut set = MatchSet::new();
        while let Some((label, matches)) = access.next_entry::<Label, LabelMatches>()? {
            if set.get(&label).is_some() {
                return Err(de::Error::custom(format!("duplicate label {label}")));
            }
            set.entries.push((label, matches));
        }
        Ok(set)
    }
}

impl<'de> Deserialize<'de> for MatchSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MatchSetVisitor)
    }
}
