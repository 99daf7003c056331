//! Hand sides, filters and per-hand storage

use core::fmt;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

/// Which tracked hand
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    /// Both sides, left first
    pub const ALL: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    /// Get the hand name as used by WebXR-style runtimes
    pub fn as_str(&self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }

    /// The opposite hand
    #[inline]
    pub fn other(self) -> Self {
        match self {
            HandSide::Left => HandSide::Right,
            HandSide::Right => HandSide::Left,
        }
    }

    #[inline]
    const fn slot(self) -> usize {
        match self {
            HandSide::Left => 0,
            HandSide::Right => 1,
        }
    }
}

impl fmt::Display for HandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restricts a detector to one hand, or lets both through
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandFilter {
    #[default]
    Any,
    Left,
    Right,
}

impl HandFilter {
    /// Does this filter let `side` through?
    #[inline]
    pub fn matches(self, side: HandSide) -> bool {
        match self {
            HandFilter::Any => true,
            HandFilter::Left => side == HandSide::Left,
            HandFilter::Right => side == HandSide::Right,
        }
    }

    /// Sides accepted by this filter, left first
    pub fn sides(self) -> impl Iterator<Item = HandSide> {
        HandSide::ALL.into_iter().filter(move |side| self.matches(*side))
    }
}

/// Fixed two-slot map keyed by hand side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerHand<T> {
    pub left: T,
    pub right: T,
}

impl<T> PerHand<T> {
    pub const fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Build both slots from a function of the side
    pub fn from_fn(mut f: impl FnMut(HandSide) -> T) -> Self {
        Self {
            left: f(HandSide::Left),
            right: f(HandSide::Right),
        }
    }

    #[inline]
    pub fn get(&self, side: HandSide) -> &T {
        &self[side]
    }

    #[inline]
    pub fn get_mut(&mut self, side: HandSide) -> &mut T {
        &mut self[side]
    }

    /// Replace the value for `side`, returning the previous one
    #[inline]
    pub fn replace(&mut self, side: HandSide, value: T) -> T {
        core::mem::replace(&mut self[side], value)
    }

    /// Iterate `(side, &value)` pairs, left first
    pub fn iter(&self) -> impl Iterator<Item = (HandSide, &T)> {
        [(HandSide::Left, &self.left), (HandSide::Right, &self.right)].into_iter()
    }

    pub fn map<U>(self, mut f: impl FnMut(HandSide, T) -> U) -> PerHand<U> {
        PerHand {
            left: f(HandSide::Left, self.left),
            right: f(HandSide::Right, self.right),
        }
    }
}

impl PerHand<bool> {
    /// Sides whose flag is set, left first
    pub fn sides(&self) -> impl Iterator<Item = HandSide> + '_ {
        self.iter().filter(|(_, set)| **set).map(|(side, _)| side)
    }

    /// Number of sides whose flag is set
    pub fn count(&self) -> usize {
        self.left as usize + self.right as usize
    }
}

impl<T> Index<HandSide> for PerHand<T> {
    type Output = T;

    #[inline]
    fn index(&self, side: HandSide) -> &T {
        match side.slot() {
            0 => &self.left,
            _ => &self.right,
        }
    }
}

impl<T> IndexMut<HandSide> for PerHand<T> {
    #[inline]
    fn index_mut(&mut self, side: HandSide) -> &mut T {
        match side.slot() {
            0 => &mut self.left,
            _ => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_names() {
        assert_eq!(HandSide::Left.as_str(), "left");
        assert_eq!(HandSide::Right.to_string(), "right");
        assert_eq!(HandSide::Left.other(), HandSide::Right);
    }

    #[test]
    fn test_filter_sides() {
        assert_eq!(HandFilter::Any.sides().count(), 2);
        let only: Vec<_> = HandFilter::Right.sides().collect();
        assert_eq!(only, vec![HandSide::Right]);
        assert!(!HandFilter::Left.matches(HandSide::Right));
    }

    #[test]
    fn test_filter_deserializes_lowercase() {
        let filter: HandFilter = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(filter, HandFilter::Left);
    }

    #[test]
    fn test_per_hand_indexing() {
        let mut flags = PerHand::<bool>::default();
        flags[HandSide::Right] = true;
        assert_eq!(flags.count(), 1);
        assert_eq!(flags.sides().collect::<Vec<_>>(), vec![HandSide::Right]);
        assert!(!flags.replace(HandSide::Left, true));
        assert_eq!(flags.count(), 2);
    }
}
