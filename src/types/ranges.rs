//! Maximally merged sets of width ranges.
//!
//! ## Invariant
//!
//! The intervals held by [`Ranges`] are sorted by `min`, pairwise
//! non-overlapping and non-adjacent: for consecutive intervals `a`, `b`,
//! `a.max + 1 < b.min`. Every mutation restores this before returning, so two
//! `Ranges` covering the same widths compare equal regardless of the order
//! their intervals were added in.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::range::Range;

/// A set of viewport widths stored as merged closed intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Range>", into = "Vec<Range>")]
pub struct Ranges {
    ranges: Vec<Range>,
}

impl Ranges {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding a single interval.
    pub fn from_range(range: Range) -> Self {
        Self { ranges: vec![range] }
    }

    /// Add a single width.
    pub fn add_value(&mut self, width: u32) {
        self.add_range(Range::point(width));
    }

    /// Add an interval, merging it with every interval it touches.
    ///
    /// Absorbing one neighbour can make the merged interval reach the next
    /// one, so the scan repeats until nothing else merges.
    pub fn add_range(&mut self, range: Range) {
        let mut merged = range;
        while let Some(pos) = self.ranges.iter().position(|r| r.can_merge(&merged)) {
            let absorbed = self.ranges.remove(pos);
            merged = merged.merge(&absorbed);
        }
        let insert_at = self
            .ranges
            .binary_search_by(|r| r.start().cmp(&merged.start()))
            .unwrap_or_else(|pos| pos);
        self.ranges.insert(insert_at, merged);
    }

    /// Add every interval of another set.
    pub fn extend(&mut self, other: &Ranges) {
        for range in &other.ranges {
            self.add_range(*range);
        }
    }

    /// Union of two sets.
    pub fn union(&self, other: &Ranges) -> Ranges {
        let mut result = self.clone();
        result.extend(other);
        result
    }

    /// Check if a width is covered.
    pub fn contains(&self, width: u32) -> bool {
        self.covering(width).is_some()
    }

    /// The maximal interval covering a width.
    pub fn covering(&self, width: u32) -> Option<Range> {
        self.ranges.iter().copied().find(|r| r.contains(width))
    }

    /// Widths present here but not in `other`.
    ///
    /// Walks every width of every interval; widths are small bounded
    /// integers so the cost is acceptable.
    pub fn but_not_in(&self, other: &Ranges) -> Ranges {
        let mut result = Ranges::new();
        for range in &self.ranges {
            for width in range.start()..=range.end() {
                if !other.contains(width) {
                    result.add_value(width);
                }
            }
        }
        result
    }

    /// Intervals in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Range> {
        self.ranges.iter()
    }

    /// Intervals ordered by decreasing maximum, widest viewport first.
    pub fn iter_by_decreasing_max(&self) -> impl Iterator<Item = &Range> {
        self.ranges.iter().rev()
    }

    /// Number of disjoint intervals.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if no width is covered.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of widths covered.
    pub fn total_span(&self) -> u64 {
        self.ranges.iter().map(|r| r.span()).sum()
    }

    /// Widest width covered.
    pub fn max(&self) -> Option<u32> {
        self.ranges.last().map(|r| r.end())
    }

    /// Narrowest width covered.
    pub fn min(&self) -> Option<u32> {
        self.ranges.first().map(|r| r.start())
    }
}

impl From<Range> for Ranges {
    fn from(range: Range) -> Self {
        Self::from_range(range)
    }
}

impl From<Vec<Range>> for Ranges {
    fn from(ranges: Vec<Range>) -> Self {
        ranges.into_iter().collect()
    }
}

impl From<Ranges> for Vec<Range> {
    fn from(ranges: Ranges) -> Self {
        ranges.ranges
    }
}

impl FromIterator<Range> for Ranges {
    fn from_iter<T: IntoIterator<Item = Range>>(iter: T) -> Self {
        let mut ranges = Ranges::new();
        for range in iter {
            ranges.add_range(range);
        }
        ranges
    }
}

impl fmt::Display for Ranges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", range)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(min: u32, max: u32) -> Range {
        Range::new(min, max).unwrap()
    }

    fn intervals(ranges: &Ranges) -> Vec<(u32, u32)> {
        ranges.iter().map(|r| (r.start(), r.end())).collect()
    }

    #[test]
    fn test_add_value_merges_adjacent() {
        let mut ranges = Ranges::new();
        ranges.add_value(10);
        ranges.add_value(12);
        assert_eq!(intervals(&ranges), vec![(10, 10), (12, 12)]);

        ranges.add_value(11);
        assert_eq!(intervals(&ranges), vec![(10, 12)]);
    }

    #[test]
    fn test_add_range_cascades() {
        // [20,30] bridges [10,19] and [31,40]; both must be absorbed.
        let mut ranges = Ranges::new();
        ranges.add_range(r(31, 40));
        ranges.add_range(r(10, 19));
        ranges.add_range(r(50, 60));
        ranges.add_range(r(20, 30));
        assert_eq!(intervals(&ranges), vec![(10, 40), (50, 60)]);
    }

    #[test]
    fn test_add_range_swallows_many() {
        let mut ranges: Ranges = [r(1, 2), r(5, 6), r(9, 10), r(13, 14)].into_iter().collect();
        ranges.add_range(r(0, 12));
        assert_eq!(intervals(&ranges), vec![(0, 14)]);
    }

    #[test]
    fn test_but_not_in() {
        let exists: Ranges = r(320, 1920).into();
        let contained: Ranges = r(600, 1920).into();
        assert_eq!(intervals(&exists.but_not_in(&contained)), vec![(320, 599)]);

        let holes: Ranges = [r(400, 410), r(500, 500)].into_iter().collect();
        let diff = Ranges::from(r(390, 520)).but_not_in(&holes);
        assert_eq!(intervals(&diff), vec![(390, 399), (411, 499), (501, 520)]);
    }

    #[test]
    fn test_equality_is_order_insensitive() {
        let a: Ranges = [r(1, 5), r(10, 15), r(6, 7)].into_iter().collect();
        let b: Ranges = [r(6, 7), r(10, 15), r(1, 5)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(intervals(&a), vec![(1, 7), (10, 15)]);
    }

    #[test]
    fn test_covering_and_extremes() {
        let ranges: Ranges = [r(10, 20), r(30, 40)].into_iter().collect();
        assert_eq!(ranges.covering(35), Some(r(30, 40)));
        assert_eq!(ranges.covering(25), None);
        assert_eq!(ranges.min(), Some(10));
        assert_eq!(ranges.max(), Some(40));
        assert_eq!(ranges.total_span(), 22);
        let widest_first: Vec<_> = ranges.iter_by_decreasing_max().copied().collect();
        assert_eq!(widest_first, vec![r(30, 40), r(10, 20)]);
    }

    #[test]
    fn test_display() {
        let ranges: Ranges = [r(1, 2), r(5, 9)].into_iter().collect();
        assert_eq!(ranges.to_string(), "{[1, 2], [5, 9]}");
    }
}
