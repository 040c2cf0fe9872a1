//! Native penpa-edit constraint shape.
//!
//! Positions are integers in penpa's index space, see
//! [`crate::codec::penpa::IndexSpace`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::codec::penpa::IndexSpace;

/// A cell number: `[value, color, submode]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberEntry(
    #[serde(deserialize_with = "text_or_number")] pub String,
    pub i64,
    pub String,
);

/// A small corner number, used for cage sums: `[text, color]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerNumber(#[serde(deserialize_with = "text_or_number")] pub String, pub i64);

/// Penpa writes numbers as text, but older documents carry bare JSON numbers.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

/// A symbol: `[code, shape, layer]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry(pub i64, pub String, pub i64);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenpaConstraints {
    pub row_count: i64,
    pub col_count: i64,
    pub cell_size: i64,
    pub canvas_width: i64,
    pub canvas_height: i64,
    pub center_cell_index: i64,
    /// Margin rows/columns: top, bottom, left, right.
    pub space: [i64; 4],
    /// Rule flags; index 0 is the main diagonal, index 3 the anti-diagonal.
    pub sudoku: [i64; 4],
    pub thermo: Vec<Vec<i64>>,
    pub killercages: Vec<Vec<i64>>,
    /// Each arrow is `[circle, ...path]`.
    pub arrows: Vec<Vec<i64>>,
    pub number: BTreeMap<i64, NumberEntry>,
    #[serde(rename = "numberS")]
    pub number_s: BTreeMap<i64, CornerNumber>,
    pub symbol: BTreeMap<i64, SymbolEntry>,
    /// Cage outline segments keyed by `"corner,corner"`.
    pub cage: BTreeMap<String, i64>,
    /// Edge lines keyed by `"vertex,vertex"`.
    #[serde(rename = "lineE")]
    pub line_e: BTreeMap<String, i64>,
    pub centerlist: Vec<i64>,
    /// Non-empty data fields with no canonical counterpart, by penpa name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unsupported: BTreeMap<String, Value>,
}

impl PenpaConstraints {
    /// Side length of the playable grid, as `(rows, cols)`.
    ///
    /// `None` when the board geometry is out of bounds or the margins are
    /// wider than the board.
    pub fn grid_dimensions(&self) -> Option<(i64, i64)> {
        let space = IndexSpace::of(self)?;
        let rows = self.row_count.checked_sub(space.margin_rows())?;
        let cols = self.col_count.checked_sub(space.margin_cols())?;
        (rows >= 0 && cols >= 0).then_some((rows, cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_serialize_as_arrays() {
        let mut puzzle = PenpaConstraints::default();
        puzzle
            .number
            .insert(43, NumberEntry("1".to_string(), 1, "1".to_string()));
        puzzle
            .symbol
            .insert(106, SymbolEntry(3, "circle_L".to_string(), 2));
        let json = serde_json::to_value(&puzzle).unwrap();
        assert_eq!(json["number"]["43"], serde_json::json!(["1", 1, "1"]));
        assert_eq!(json["symbol"]["106"], serde_json::json!([3, "circle_L", 2]));
        assert!(json.get("unsupported").is_none());
    }

    #[test]
    fn test_numeric_entries_read_as_text() {
        let entry: NumberEntry = serde_json::from_value(serde_json::json!([7, 1, "1"])).unwrap();
        assert_eq!(entry, NumberEntry("7".to_string(), 1, "1".to_string()));
        let entry: NumberEntry = serde_json::from_value(serde_json::json!(["7", 1, "1"])).unwrap();
        assert_eq!(entry.0, "7");

        let label: CornerNumber = serde_json::from_value(serde_json::json!([22, 1])).unwrap();
        assert_eq!(label, CornerNumber("22".to_string(), 1));
        assert!(serde_json::from_value::<NumberEntry>(serde_json::json!([null, 1, "1"])).is_err());
    }

    #[test]
    fn test_grid_dimensions_subtract_space() {
        let puzzle = PenpaConstraints {
            row_count: 11,
            col_count: 10,
            space: [1, 1, 0, 1],
            ..Default::default()
        };
        assert_eq!(puzzle.grid_dimensions(), Some((9, 9)));
    }

    #[test]
    fn test_grid_dimensions_reject_bad_space() {
        for space in [[i64::MIN, 1, 0, 0], [0, -1, 0, 0], [5, 5, 0, 0]] {
            let puzzle = PenpaConstraints {
                row_count: 9,
                col_count: 9,
                space,
                ..Default::default()
            };
            assert_eq!(puzzle.grid_dimensions(), None, "space {space:?}");
        }
        let huge = PenpaConstraints {
            row_count: i64::MAX,
            col_count: i64::MAX,
            ..Default::default()
        };
        assert_eq!(huge.grid_dimensions(), None);
    }
}
