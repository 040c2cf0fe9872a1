//! Native f-puzzles constraint shape.
//!
//! Cells are named `R{row}C{col}`, 1-based. Keys this crate doesn't model are
//! kept in `other` so they survive a decode/encode cycle and can be reported.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named cell, e.g. `R1C1`.
pub type CellName = String;

/// One cell of the dense grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridCell {
    /// 0-based region override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<bool>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CellGroup {
    pub cells: Vec<CellName>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineGroup {
    pub lines: Vec<Vec<CellName>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParityCell {
    pub cell: CellName,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FpuzzlesArrow {
    pub cells: Vec<CellName>,
    pub lines: Vec<Vec<CellName>>,
}

/// A difference or ratio dot. A `value` marks a non-standard ratio.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FpuzzlesDot {
    pub cells: Vec<CellName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A killer cage. The sum is stored as a string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FpuzzlesCage {
    pub cells: Vec<CellName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A purely visual line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosmeticLine {
    pub lines: Vec<Vec<CellName>>,
    #[serde(rename = "outlineC")]
    pub outline_c: String,
    pub width: f64,
    pub is_new_constraint: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FpuzzlesConstraints {
    pub size: usize,
    #[serde(default)]
    pub grid: Vec<Vec<GridCell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraregion: Option<Vec<CellGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermometer: Option<Vec<LineGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<Vec<FpuzzlesArrow>>,
    /// Anti-diagonal, bottom-left to top-right.
    #[serde(rename = "diagonal+", default, skip_serializing_if = "Option::is_none")]
    pub diagonal_positive: Option<bool>,
    /// Main diagonal, top-left to bottom-right.
    #[serde(rename = "diagonal-", default, skip_serializing_if = "Option::is_none")]
    pub diagonal_negative: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antiknight: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antiking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difference: Option<Vec<FpuzzlesDot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<Vec<FpuzzlesDot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odd: Option<Vec<ParityCell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub even: Option<Vec<ParityCell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub killercage: Option<Vec<FpuzzlesCage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonconsecutive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disjointgroups: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renban: Option<Vec<LineGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palindrome: Option<Vec<LineGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Vec<CosmeticLine>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl FpuzzlesConstraints {
    /// Creates an empty puzzle with a `size` x `size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            grid: vec![vec![GridCell::default(); size]; size],
            ..Default::default()
        }
    }

    /// Returns the grid cell at a 0-based position, if present.
    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        self.grid.get(row)?.get(col)
    }

    /// Returns whether a top-level key is present, modeled or not.
    pub fn has_key(&self, key: &str) -> bool {
        match key {
            "disjointgroups" => self.disjointgroups.is_some(),
            _ => self.other.contains_key(key),
        }
    }
}
