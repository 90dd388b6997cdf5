//! First-accepted-wins deduplication across every label of a run.

use crate::geometry::{overlaps, Rect};

/// Rectangles accepted so far in a run, regardless of label.
///
/// A candidate is rejected when it overlaps any accepted rectangle by more
/// than the threshold (intersection over the smaller area).
#[derive(Clone, Debug)]
pub struct AcceptedSet {
    threshold: f64,
    rects: Vec<Rect>,
}

impl AcceptedSet {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            rects: Vec::new(),
        }
    }

    /// Accepts `rect` unless it collides with an earlier acceptance.
    pub fn try_accept(&mut self, rect: Rect) -> bool {
        if self
            .rects
            .iter()
            .any(|accepted| overlaps(accepted, &rect, self.threshold))
        {
            return false;
        }
        self.rects.push(rect);
        true
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }
}

#[cfg(test)]
mod tests {
    use super::AcceptedSet;
    use crate::geometry::Rect;

    #[test]
    fn first_accepted_wins() {
        let mut set = AcceptedSet::new(0.2);
        assert!(set.try_accept(Rect::new(0, 0, 10, 10)));
        assert!(!set.try_accept(Rect::new(1, 1, 10, 10)));
        assert!(set.try_accept(Rect::new(9, 0, 10, 10)));
        assert!(set.try_accept(Rect::new(10, 10, 4, 4)));
        assert_eq!(set.len(), 3);
    }
}
