//! Point addressing for Hex boards
//!
//! Every addressable point lives in one process-wide table that is built
//! once and never mutated. A [`HexPoint`] is a copyable handle (the table
//! index), so two points with the same coordinates are always equal and
//! comparing them is a single integer comparison.
//!
//! Table layout:
//! - 0..10: invalid, resign, forfeit, swap-sides, swap-pieces, pass,
//!   north, east, south, west
//! - 10..: cells in row-major order (`y` outer, `x` inner)

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::alphabet::alphabet_number;

/// Widest addressable board
pub const MAX_WIDTH: usize = 64;

/// Tallest addressable board
pub const MAX_HEIGHT: usize = 64;

/// Table index of the first cell
pub const FIRST_CELL: usize = 10;

/// Total number of table entries
pub const MAX_POINTS: usize = MAX_WIDTH * MAX_HEIGHT + FIRST_CELL;

/// Board size used when nothing else is known
pub const DEFAULT_SIZE: usize = 11;

/// Names of the non-cell entries, in table order
const SPECIAL_NAMES: [&str; FIRST_CELL] = [
    "invalid",
    "resign",
    "forfeit",
    "swap-sides",
    "swap-pieces",
    "pass",
    "north",
    "east",
    "south",
    "west",
];

/// Errors from point lookups by index or coordinates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointError {
    #[error("point index {0} is outside the point table")]
    OutOfRange(usize),

    #[error("coordinates ({x}, {y}) are outside the addressable grid")]
    CoordinateOutOfRange { x: i32, y: i32 },
}

// ============================================================================
// POINT TABLE
// ============================================================================

struct PointEntry {
    x: i32,
    y: i32,
    name: String,
}

struct PointTable {
    entries: Vec<PointEntry>,
    by_name: FxHashMap<String, HexPoint>,
}

impl PointTable {
    fn build() -> Self {
        let mut entries = Vec::with_capacity(MAX_POINTS);

        // Specials and edges share x = -1; y keeps them ordered among themselves
        for (i, name) in SPECIAL_NAMES.iter().enumerate() {
            entries.push(PointEntry {
                x: -1,
                y: i as i32 - FIRST_CELL as i32,
                name: (*name).to_string(),
            });
        }

        for y in 0..MAX_HEIGHT {
            for x in 0..MAX_WIDTH {
                entries.push(PointEntry {
                    x: x as i32,
                    y: y as i32,
                    name: format!("{}{}", alphabet_number(x as i32 + 1), y + 1),
                });
            }
        }

        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name.clone(), HexPoint(i as u16)))
            .collect();

        Self { entries, by_name }
    }

    fn entry(&self, point: HexPoint) -> &PointEntry {
        &self.entries[point.0 as usize]
    }
}

fn table() -> &'static PointTable {
    static TABLE: OnceLock<PointTable> = OnceLock::new();
    TABLE.get_or_init(PointTable::build)
}

// ============================================================================
// HEX POINT
// ============================================================================

/// A cell, board edge, or special move
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexPoint(u16);

impl HexPoint {
    pub const INVALID: HexPoint = HexPoint(0);
    pub const RESIGN: HexPoint = HexPoint(1);
    pub const FORFEIT: HexPoint = HexPoint(2);
    pub const SWAP_SIDES: HexPoint = HexPoint(3);
    pub const SWAP_PIECES: HexPoint = HexPoint(4);
    pub const PASS: HexPoint = HexPoint(5);
    pub const NORTH: HexPoint = HexPoint(6);
    pub const EAST: HexPoint = HexPoint(7);
    pub const SOUTH: HexPoint = HexPoint(8);
    pub const WEST: HexPoint = HexPoint(9);

    /// Point at table position `index`
    pub fn by_index(index: usize) -> Result<HexPoint, PointError> {
        if index < MAX_POINTS {
            Ok(HexPoint(index as u16))
        } else {
            Err(PointError::OutOfRange(index))
        }
    }

    /// Cell at column `x`, row `y` (both 0-indexed)
    ///
    /// Edges and special moves are only reachable through [`HexPoint::by_name`]
    /// or the associated constants.
    pub fn by_coords(x: i32, y: i32) -> Result<HexPoint, PointError> {
        if x < 0 || y < 0 || x as usize >= MAX_WIDTH || y as usize >= MAX_HEIGHT {
            return Err(PointError::CoordinateOutOfRange { x, y });
        }
        Ok(HexPoint((FIRST_CELL + y as usize * MAX_WIDTH + x as usize) as u16))
    }

    /// Case-insensitive lookup over the whole table
    ///
    /// "swap" is accepted as an alias for swap-sides.
    pub fn by_name(name: &str) -> Option<HexPoint> {
        if name.eq_ignore_ascii_case("swap") {
            return Some(HexPoint::SWAP_SIDES);
        }
        table().by_name.get(&name.to_ascii_lowercase()).copied()
    }

    /// Position in the point table
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Column for cells, -1 for edges and special moves
    pub fn x(self) -> i32 {
        table().entry(self).x
    }

    pub fn y(self) -> i32 {
        table().entry(self).y
    }

    /// Canonical name ("a1", "north", "swap-sides", ...)
    pub fn name(self) -> &'static str {
        &table().entry(self).name
    }

    /// True for ordinary board cells
    pub fn is_cell(self) -> bool {
        self.0 as usize >= FIRST_CELL
    }

    pub fn is_edge(self) -> bool {
        matches!(
            self,
            HexPoint::NORTH | HexPoint::EAST | HexPoint::SOUTH | HexPoint::WEST
        )
    }

    /// Mirror across the long diagonal
    ///
    /// Only meaningful for cells; any other point is returned unchanged.
    pub fn reflect(self) -> HexPoint {
        if !self.is_cell() {
            return self;
        }
        let offset = self.0 as usize - FIRST_CELL;
        let (x, y) = (offset % MAX_WIDTH, offset / MAX_WIDTH);
        HexPoint((FIRST_CELL + x * MAX_WIDTH + y) as u16)
    }
}

/// Names separated by single spaces
pub fn points_to_string(points: &[HexPoint]) -> String {
    points
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Ord for HexPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = table().entry(*self);
        let b = table().entry(*other);
        a.x.cmp(&b.x).then(a.y.cmp(&b.y))
    }
}

impl PartialOrd for HexPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HexPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for HexPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HexPoint({})", self.name())
    }
}

impl Serialize for HexPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for HexPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        HexPoint::by_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown point '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_order() {
        let names: Vec<_> = (0..FIRST_CELL)
            .map(|i| HexPoint::by_index(i).unwrap().name())
            .collect();
        assert_eq!(names, SPECIAL_NAMES.to_vec());
        assert_eq!(HexPoint::SWAP_SIDES.name(), "swap-sides");
        assert_eq!(HexPoint::WEST.index(), 9);
    }

    #[test]
    fn test_cell_names() {
        assert_eq!(HexPoint::by_coords(0, 0).unwrap().name(), "a1");
        assert_eq!(HexPoint::by_coords(1, 1).unwrap().name(), "b2");
        assert_eq!(HexPoint::by_coords(26, 4).unwrap().name(), "aa5");
        assert_eq!(HexPoint::by_coords(63, 63).unwrap().name(), "bl64");
        assert_eq!(HexPoint::by_coords(0, 0).unwrap().index(), FIRST_CELL);
        assert_eq!(HexPoint::by_coords(1, 0).unwrap().index(), FIRST_CELL + 1);
        assert_eq!(HexPoint::by_coords(0, 1).unwrap().index(), FIRST_CELL + MAX_WIDTH);
    }

    #[test]
    fn test_bijection() {
        for y in 0..MAX_HEIGHT as i32 {
            for x in 0..MAX_WIDTH as i32 {
                let p = HexPoint::by_coords(x, y).unwrap();
                assert_eq!(HexPoint::by_name(p.name()), Some(p));
                assert_eq!((p.x(), p.y()), (x, y));
                assert_eq!(p.reflect().reflect(), p);
            }
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(HexPoint::by_name("NORTH"), Some(HexPoint::NORTH));
        assert_eq!(HexPoint::by_name("Swap-Pieces"), Some(HexPoint::SWAP_PIECES));
        assert_eq!(HexPoint::by_name("swap"), Some(HexPoint::SWAP_SIDES));
        assert_eq!(HexPoint::by_name("SWAP"), Some(HexPoint::SWAP_SIDES));
        assert_eq!(HexPoint::by_name("C3"), HexPoint::by_coords(2, 2).ok());
        assert_eq!(HexPoint::by_name("nowhere"), None);
        assert_eq!(HexPoint::by_name("a0"), None);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            HexPoint::by_index(MAX_POINTS),
            Err(PointError::OutOfRange(MAX_POINTS))
        );
        assert!(HexPoint::by_index(MAX_POINTS - 1).is_ok());
        assert!(HexPoint::by_coords(-1, 0).is_err());
        assert!(HexPoint::by_coords(0, MAX_HEIGHT as i32).is_err());
    }

    #[test]
    fn test_reflect() {
        let c2 = HexPoint::by_name("c2").unwrap();
        assert_eq!(c2.reflect(), HexPoint::by_name("b3").unwrap());
        assert_eq!(HexPoint::PASS.reflect(), HexPoint::PASS);
    }

    #[test]
    fn test_ordering() {
        let a1 = HexPoint::by_name("a1").unwrap();
        let a2 = HexPoint::by_name("a2").unwrap();
        let b1 = HexPoint::by_name("b1").unwrap();
        assert!(a1 < a2);
        assert!(a2 < b1);
        assert!(HexPoint::WEST < a1);
        assert!(HexPoint::INVALID < HexPoint::RESIGN);
    }

    #[test]
    fn test_is_cell() {
        assert!(!HexPoint::NORTH.is_cell());
        assert!(HexPoint::NORTH.is_edge());
        assert!(!HexPoint::SWAP_SIDES.is_cell());
        assert!(!HexPoint::SWAP_SIDES.is_edge());
        assert!(HexPoint::by_name("k11").unwrap().is_cell());
        assert_eq!(HexPoint::NORTH.x(), -1);
    }

    #[test]
    fn test_points_to_string() {
        let points = [
            HexPoint::by_name("a1").unwrap(),
            HexPoint::SWAP_SIDES,
            HexPoint::by_name("k11").unwrap(),
        ];
        assert_eq!(points_to_string(&points), "a1 swap-sides k11");
        assert_eq!(points_to_string(&[]), "");
    }
}
