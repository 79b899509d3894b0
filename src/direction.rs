//! Hex compass directions.
//!
//! Directions are ordered clockwise starting at north-east. The derived `Ord`
//! follows that order, so `direction <= HexDirection::SE` selects the three
//! edges a cell owns when stitching itself to its neighbors.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HexDirection {
    NE,
    E,
    SE,
    SW,
    W,
    NW,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::NE,
        HexDirection::E,
        HexDirection::SE,
        HexDirection::SW,
        HexDirection::W,
        HexDirection::NW,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index, wrapping modulo 6.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 6]
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    pub fn previous(self) -> Self {
        Self::from_index(self.index() + 5)
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn previous2(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    pub fn next2(self) -> Self {
        Self::from_index(self.index() + 2)
    }
}

impl std::fmt::Display for HexDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_three_steps() {
        assert_eq!(HexDirection::NE.opposite(), HexDirection::SW);
        assert_eq!(HexDirection::E.opposite(), HexDirection::W);
        assert_eq!(HexDirection::NW.opposite(), HexDirection::SE);
        for d in HexDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn test_next_and_previous_wrap() {
        assert_eq!(HexDirection::NW.next(), HexDirection::NE);
        assert_eq!(HexDirection::NE.previous(), HexDirection::NW);
        assert_eq!(HexDirection::SE.next2(), HexDirection::W);
        assert_eq!(HexDirection::E.previous2(), HexDirection::NW);
        assert_eq!(HexDirection::NE.previous2(), HexDirection::W);
        for d in HexDirection::ALL {
            assert_eq!(d.next().previous(), d);
        }
    }

    #[test]
    fn test_ordering_selects_owned_edges() {
        let owned: Vec<_> = HexDirection::ALL
            .iter()
            .filter(|d| **d <= HexDirection::SE)
            .collect();
        assert_eq!(owned.len(), 3);
        assert!(HexDirection::E <= HexDirection::E);
        assert!(HexDirection::SW > HexDirection::SE);
    }
}
