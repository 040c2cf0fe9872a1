//! Canonical constraint model.
//!
//! Every format converts to and from [`Constraints`]. Field names serialize in
//! camelCase, which is also the canonical JSON wire format.

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::util::geometry::default_regions;

/// A cell on the grid, zero-based.
///
/// Ordering is by row, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell.
    pub fn distance(&self, other: &CellPosition) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// A set of cells. Order inside a region carries no meaning.
pub type Region = Vec<CellPosition>;

/// Cells from bulb to tip.
pub type Thermo = Vec<CellPosition>;

pub type Renban = Vec<CellPosition>;

pub type Palindrome = Vec<CellPosition>;

/// A given digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedNumber {
    pub position: CellPosition,
    pub value: u32,
}

impl FixedNumber {
    pub fn new(row: usize, col: usize, value: u32) -> Self {
        Self {
            position: CellPosition::new(row, col),
            value,
        }
    }
}

/// Circle cells sum to the digits along the arrow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub circle_cells: Vec<CellPosition>,
    pub arrow_cells: Vec<CellPosition>,
}

/// A killer cage. `sum` is `None` when no total is given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KillerCage {
    #[serde(default)]
    pub sum: Option<u32>,
    pub region: Region,
}

/// Relationship a kropki dot marks between its two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KropkiDotType {
    Consecutive,
    Double,
}

/// A dot between two edge-adjacent cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KropkiDot {
    pub dot_type: KropkiDotType,
    pub cell1: CellPosition,
    pub cell2: CellPosition,
}

impl KropkiDot {
    pub fn new(dot_type: KropkiDotType, cell1: CellPosition, cell2: CellPosition) -> Self {
        Self {
            dot_type,
            cell1,
            cell2,
        }
    }

    /// The two cells in (row, col) order.
    pub fn ordered_cells(&self) -> (CellPosition, CellPosition) {
        if self.cell1 <= self.cell2 {
            (self.cell1, self.cell2)
        } else {
            (self.cell2, self.cell1)
        }
    }
}

/// The canonical constraint set.
///
/// Absent fields mean "not present". An empty collection, a `false` flag and
/// a `regions` value equal to the default tiling all normalize away, see
/// [`Constraints::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub grid_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_numbers: Option<Vec<FixedNumber>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<Region>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_regions: Option<Vec<Region>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermos: Option<Vec<Thermo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrows: Option<Vec<Arrow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub killer_cages: Option<Vec<KillerCage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kropki_dots: Option<Vec<KropkiDot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odd_cells: Option<Vec<CellPosition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub even_cells: Option<Vec<CellPosition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renbans: Option<Vec<Renban>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palindromes: Option<Vec<Palindrome>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_diagonal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_diagonal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_knight: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_king: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kropki_negative: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_bottom: Option<bool>,
}

impl Constraints {
    /// Creates an empty constraint set for a grid size.
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Creates a constraint set with the default regions filled in.
    pub fn with_default_regions(grid_size: usize) -> Result<Self, GridError> {
        Ok(Self {
            grid_size,
            regions: Some(default_regions(grid_size)?),
            ..Default::default()
        })
    }

    /// Regions in effect, falling back to the default tiling.
    pub fn effective_regions(&self) -> Result<Vec<Region>, GridError> {
        match &self.regions {
            Some(regions) => Ok(regions.clone()),
            None => default_regions(self.grid_size),
        }
    }

    /// Returns whether custom regions differ from the default tiling.
    pub fn has_irregular_regions(&self) -> bool {
        let Some(regions) = &self.regions else {
            return false;
        };
        match default_regions(self.grid_size) {
            Ok(defaults) => !same_regions(regions, &defaults),
            Err(_) => true,
        }
    }
}

pub(crate) fn flag(value: Option<bool>) -> bool {
    value.unwrap_or(false)
}

pub(crate) fn non_empty<T>(value: &Option<Vec<T>>) -> bool {
    value.as_ref().is_some_and(|items| !items.is_empty())
}

/// Compares two region lists as sets of sets.
pub fn same_regions(a: &[Region], b: &[Region]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let canonical = |regions: &[Region]| {
        let mut sorted: Vec<Region> = regions
            .iter()
            .map(|region| {
                let mut cells = region.clone();
                cells.sort();
                cells
            })
            .collect();
        sorted.sort();
        sorted
    };
    canonical(a) == canonical(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let constraints = Constraints {
            fixed_numbers: Some(vec![FixedNumber::new(1, 7, 7)]),
            primary_diagonal: Some(true),
            killer_cages: Some(vec![KillerCage {
                sum: None,
                region: vec![CellPosition::new(0, 0), CellPosition::new(0, 1)],
            }]),
            ..Constraints::new(9)
        };
        let json = serde_json::to_value(&constraints).unwrap();
        assert_eq!(json["gridSize"], 9);
        assert_eq!(json["primaryDiagonal"], true);
        assert_eq!(json["fixedNumbers"][0]["position"]["col"], 7);
        assert!(json["killerCages"][0]["sum"].is_null());
        assert!(json.get("regions").is_none());
    }

    #[test]
    fn test_deserializes_partial_json() {
        let constraints: Constraints = serde_json::from_str(
            r#"{"gridSize":4,"kropkiDots":[{"dotType":"Double","cell1":{"row":0,"col":0},"cell2":{"row":0,"col":1}}]}"#,
        )
        .unwrap();
        assert_eq!(constraints.grid_size, 4);
        let dots = constraints.kropki_dots.unwrap();
        assert_eq!(dots[0].dot_type, KropkiDotType::Double);
        assert!(constraints.regions.is_none());
    }

    #[test]
    fn test_missing_cage_sum_is_none() {
        let cage: KillerCage = serde_json::from_str(r#"{"region":[{"row":0,"col":0}]}"#).unwrap();
        assert_eq!(cage.sum, None);
    }

    #[test]
    fn test_irregular_regions() {
        let mut constraints = Constraints::with_default_regions(4).unwrap();
        assert!(!constraints.has_irregular_regions());

        let regions = constraints.regions.as_mut().unwrap();
        regions[0].reverse();
        regions.swap(1, 2);
        assert!(!constraints.has_irregular_regions());

        let regions = constraints.regions.as_mut().unwrap();
        let moved = regions[0].pop().unwrap();
        regions[1].push(moved);
        assert!(constraints.has_irregular_regions());
    }

    #[test]
    fn test_ordered_cells() {
        let dot = KropkiDot::new(
            KropkiDotType::Consecutive,
            CellPosition::new(8, 5),
            CellPosition::new(8, 4),
        );
        assert_eq!(
            dot.ordered_cells(),
            (CellPosition::new(8, 4), CellPosition::new(8, 5))
        );
    }
}
