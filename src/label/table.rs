use crate::label::{Label, Rgb};

/// Insertion-ordered label to color map.
///
/// Iteration follows first-insertion order; inserting an existing label
/// keeps its original color and position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelColorTable {
    entries: Vec<(Label, Rgb)>,
}

impl LabelColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `label` unless present; returns the color now stored for it.
    pub fn insert(&mut self, label: Label, color: Rgb) -> Rgb {
        if let Some(existing) = self.get(&label) {
            return existing;
        }
        self.entries.push((label, color));
        color
    }

    pub fn get(&self, label: &Label) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, color)| *color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> + '_ {
        self.entries.iter().map(|(label, _)| label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, Rgb)> + '_ {
        self.entries.iter().map(|(label, color)| (label, *color))
    }
}

#[cfg(test)]
mod tests {
    use super::LabelColorTable;
    use crate::label::{Label, Rgb};

    #[test]
    fn keeps_first_seen_order_and_color() {
        let a = Label::new("a").unwrap();
        let b = Label::new("b").unwrap();
        let mut table = LabelColorTable::new();
        table.insert(b.clone(), Rgb([1, 2, 3]));
        table.insert(a.clone(), Rgb([4, 5, 6]));
        assert_eq!(table.insert(b.clone(), Rgb([9, 9, 9])), Rgb([1, 2, 3]));

        let order: Vec<&str> = table.labels().map(Label::as_str).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(table.len(), 2);
    }
}
