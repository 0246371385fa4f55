//! Square grid coordinate system.
//!
//! This module provides the foundational coordinate types for the tile board:
//! - `Coordinate`: Identifies an individual grid cell
//! - `Direction`: The four tile edges (N, E, S, W)
//! - `Corner`: The four tile corners (NW, NE, SE, SW)
//! - `Orientation`: Clockwise tile rotation in 90 degree steps
//!
//! North is `y + 1` and east is `x + 1`. Edges and corners each form a fixed
//! clockwise 4-cycle, and rotating by `steps` moves every slot `steps`
//! positions forward in its cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four edges of a square tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
}

impl Direction {
    /// All directions in clockwise order starting from North
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Position of this direction in the N-E-S-W cycle
    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Direction at a cycle position (wraps modulo 4)
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// The edge facing this one on the neighboring tile
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Rotate clockwise by `steps` quarter turns
    pub const fn rotate(self, steps: usize) -> Self {
        Self::from_index(self.index() + steps)
    }

    /// Grid offset of the neighbor across this edge
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// The two corners at the ends of this edge
    pub const fn corners(self) -> [Corner; 2] {
        match self {
            Direction::North => [Corner::NorthWest, Corner::NorthEast],
            Direction::East => [Corner::NorthEast, Corner::SouthEast],
            Direction::South => [Corner::SouthWest, Corner::SouthEast],
            Direction::West => [Corner::NorthWest, Corner::SouthWest],
        }
    }

    /// Single-letter label used in keys and event details
    pub const fn label(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        }
    }
}

/// One of the four corners of a square tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Corner {
    #[serde(rename = "NW")]
    NorthWest,
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "SW")]
    SouthWest,
}

impl Corner {
    /// All corners in clockwise order starting from NorthWest
    pub const ALL: [Corner; 4] = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthEast,
        Corner::SouthWest,
    ];

    /// Position of this corner in the NW-NE-SE-SW cycle
    pub const fn index(self) -> usize {
        match self {
            Corner::NorthWest => 0,
            Corner::NorthEast => 1,
            Corner::SouthEast => 2,
            Corner::SouthWest => 3,
        }
    }

    /// Corner at a cycle position (wraps modulo 4)
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Rotate clockwise by `steps` quarter turns
    pub const fn rotate(self, steps: usize) -> Self {
        Self::from_index(self.index() + steps)
    }

    /// The corner this one touches on the neighbor across `edge`.
    ///
    /// Returns `None` when the corner is not an end of that edge.
    pub const fn across(self, edge: Direction) -> Option<Corner> {
        match (edge, self) {
            (Direction::North, Corner::NorthWest) => Some(Corner::SouthWest),
            (Direction::North, Corner::NorthEast) => Some(Corner::SouthEast),
            (Direction::East, Corner::NorthEast) => Some(Corner::NorthWest),
            (Direction::East, Corner::SouthEast) => Some(Corner::SouthWest),
            (Direction::South, Corner::SouthWest) => Some(Corner::NorthWest),
            (Direction::South, Corner::SouthEast) => Some(Corner::NorthEast),
            (Direction::West, Corner::NorthWest) => Some(Corner::NorthEast),
            (Direction::West, Corner::SouthWest) => Some(Corner::SouthEast),
            _ => None,
        }
    }

    /// The two edges meeting at this corner
    pub const fn edges(self) -> [Direction; 2] {
        match self {
            Corner::NorthWest => [Direction::North, Direction::West],
            Corner::NorthEast => [Direction::North, Direction::East],
            Corner::SouthEast => [Direction::East, Direction::South],
            Corner::SouthWest => [Direction::South, Direction::West],
        }
    }
}

/// Clockwise rotation of a placed tile.
///
/// Serialized as the plain degree value (`0`, `90`, `180`, `270`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    /// All orientations in ascending order
    pub const ALL: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270,
    ];

    /// Number of clockwise quarter turns
    pub const fn steps(self) -> usize {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 1,
            Orientation::Deg180 => 2,
            Orientation::Deg270 => 3,
        }
    }

    /// Rotation in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// Parse a degree value, rejecting anything but multiples of 90 below 360
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Orientation::Deg0),
            90 => Some(Orientation::Deg90),
            180 => Some(Orientation::Deg180),
            270 => Some(Orientation::Deg270),
            _ => None,
        }
    }
}

impl TryFrom<u16> for Orientation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Orientation::from_degrees(degrees)
            .ok_or_else(|| format!("invalid orientation {degrees}, expected 0, 90, 180 or 270"))
    }
}

impl From<Orientation> for u16 {
    fn from(orientation: Orientation) -> Self {
        orientation.degrees()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Integer grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    /// Create a new coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring cell across an edge
    pub const fn neighbor(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbors in N, E, S, W order
    pub fn neighbors(self) -> [Coordinate; 4] {
        Direction::ALL.map(|direction| self.neighbor(direction))
    }

    /// All 8 surrounding cells (orthogonal and diagonal)
    pub fn surrounding(self) -> [Coordinate; 8] {
        [
            Self::new(self.x - 1, self.y + 1),
            Self::new(self.x, self.y + 1),
            Self::new(self.x + 1, self.y + 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x + 1, self.y - 1),
            Self::new(self.x, self.y - 1),
            Self::new(self.x - 1, self.y - 1),
            Self::new(self.x - 1, self.y),
        ]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_direction_rotation_is_clockwise() {
        assert_eq!(Direction::North.rotate(1), Direction::East);
        assert_eq!(Direction::West.rotate(1), Direction::North);
        assert_eq!(Direction::South.rotate(3), Direction::East);
    }

    #[test]
    fn test_opposite_directions() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn test_neighbor_offsets() {
        let origin = Coordinate::new(0, 0);
        assert_eq!(origin.neighbor(Direction::North), Coordinate::new(0, 1));
        assert_eq!(origin.neighbor(Direction::East), Coordinate::new(1, 0));
        assert_eq!(origin.neighbor(Direction::South), Coordinate::new(0, -1));
        assert_eq!(origin.neighbor(Direction::West), Coordinate::new(-1, 0));
    }

    #[test]
    fn test_surrounding_cells_are_distinct() {
        let cells = Coordinate::new(3, -2).surrounding();
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), 8);
        assert!(!cells.contains(&Coordinate::new(3, -2)));
    }

    #[test]
    fn test_corner_across_is_symmetric() {
        for edge in Direction::ALL {
            for corner in edge.corners() {
                let other = corner.across(edge).expect("corner lies on edge");
                assert_eq!(other.across(edge.opposite()), Some(corner));
            }
        }
    }

    #[test]
    fn test_corner_not_on_edge() {
        assert_eq!(Corner::SouthEast.across(Direction::North), None);
        assert_eq!(Corner::NorthWest.across(Direction::East), None);
    }

    #[test]
    fn test_orientation_serializes_as_degrees() {
        let json = serde_json::to_string(&Orientation::Deg270).unwrap();
        assert_eq!(json, "270");
        let parsed: Orientation = serde_json::from_str("90").unwrap();
        assert_eq!(parsed, Orientation::Deg90);
        assert!(serde_json::from_str::<Orientation>("45").is_err());
    }

    #[test]
    fn test_coordinate_display() {
        assert_eq!(Coordinate::new(-1, 4).to_string(), "-1,4");
    }
}
