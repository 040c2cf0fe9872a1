//! penpa-edit codec.
//!
//! A penpa link carries a raw-deflated, base64 encoded text document of at
//! least 19 lines. Line 0 is a comma separated header, line 1 the margin
//! vector, line 3 the board contents and line 5 the list of cell centers.
//! The board line is JSON with its common keys swapped for two-character
//! tokens, see [`PENPA_KEY_SUBSTITUTIONS`].

pub mod index;
pub mod lines;

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::codec::{detect_inline, Codec};
use crate::error::{DecodeError, EncodeError};
use crate::limits::{PENPA_MIN_LINES, PENPA_SOLVE_URL};
use crate::model::{EncodeResult, MatchResult, NativeConstraints, PenpaConstraints, PuzzleFormat};
use crate::util::compress::{Compressor, DeflateBase64};

pub use index::{Corner, IndexSpace};

lazy_static! {
    static ref INLINE_DATA: Regex = Regex::new(r"^.+://.+/penpa-edit/.+&p=([^&]+)$").unwrap();
}

/// Board-line tokens and their obfuscated spelling.
///
/// Applied in this order when obfuscating and when restoring.
pub const PENPA_KEY_SUBSTITUTIONS: [(&str, &str); 30] = [
    ("\"qa\"", "z9"),
    ("\"pu_q\"", "zQ"),
    ("\"pu_a\"", "zA"),
    ("\"grid\"", "zG"),
    ("\"edit_mode\"", "zM"),
    ("\"surface\"", "zS"),
    ("\"line\"", "zL"),
    ("\"lineE\"", "zE"),
    ("\"wall\"", "zW"),
    ("\"cage\"", "zC"),
    ("\"number\"", "zN"),
    ("\"symbol\"", "zY"),
    ("\"special\"", "zP"),
    ("\"board\"", "zB"),
    ("\"command_redo\"", "zR"),
    ("\"command_undo\"", "zU"),
    ("\"command_replay\"", "z8"),
    ("\"numberS\"", "z1"),
    ("\"freeline\"", "zF"),
    ("\"freelineE\"", "z2"),
    ("\"thermo\"", "zT"),
    ("\"arrows\"", "z3"),
    ("\"direction\"", "zD"),
    ("\"squareframe\"", "z0"),
    ("\"polygon\"", "z5"),
    ("\"deletelineE\"", "z4"),
    ("\"killercages\"", "z6"),
    ("\"nobulbthermo\"", "z7"),
    ("\"__a\"", "z_"),
    ("null", "zO"),
];

/// Undo history; never carries puzzle content.
const HISTORY_FIELDS: [&str; 3] = ["command_redo", "command_undo", "command_replay"];

/// Board fields holding objects keyed by index or segment.
const MAP_FIELDS: [&str; 11] = [
    "surface",
    "number",
    "numberS",
    "symbol",
    "freeline",
    "freelineE",
    "line",
    "lineE",
    "wall",
    "cage",
    "deletelineE",
];

/// Board fields holding lists of index paths.
const LIST_FIELDS: [&str; 7] = [
    "thermo",
    "arrows",
    "direction",
    "squareframe",
    "polygon",
    "killercages",
    "nobulbthermo",
];

const GRID_LINE: &str = r#"["1","2","1"]~"sudoku"~["1",9]"#;

const MODE_LINE: &str = r#"{z9:zQ,zG:["1","2","1"],zQ:{zM:zS,zS:["",1],zL:["1",2],zE:["1",2],zW:["",2],zC:["1",10],zN:["1",1],zY:["circle_L",1],zP:[zT,""],zB:["",""],"move":["1",""],"combi":["battleship",""],"sudoku":["1",1]},zA:{zM:zS,zS:["",1],zL:["1",3],zE:["1",3],zW:["",3],zC:["1",10],zN:["1",2],zY:["circle_L",1],zP:[zT,""],zB:["",""],"move":["1",""],"combi":["battleship",""],"sudoku":["1",9]}}"#;

const SOLUTION_LINE: &str = "{zR:{z_:[]},zU:{z_:[]},z8:{z_:[]},zS:{},zN:{},z1:{},zY:{},zF:{},z2:{},zT:[],z3:[],zD:[],z0:[],z5:[],zL:{},zE:{},zW:{},zC:{},z4:{},z6:[],z7:[]}";

#[derive(Debug, Clone, Copy, Default)]
pub struct PenpaCodec;

impl Codec for PenpaCodec {
    fn format(&self) -> PuzzleFormat {
        PuzzleFormat::Penpa
    }

    fn url_patterns(&self) -> Vec<String> {
        vec![INLINE_DATA.as_str().to_string()]
    }

    fn detect(&self, input: &str) -> MatchResult {
        detect_inline(self, &[&*INLINE_DATA], input)
    }

    fn decode(&self, data: &str) -> Result<NativeConstraints, DecodeError> {
        let document = DeflateBase64.decompress(data)?;
        parse_document(&document).map(NativeConstraints::Penpa)
    }
}

/// Writes a puzzle as a penpa document and packs it.
pub fn encode(puzzle: &PenpaConstraints) -> Result<EncodeResult, EncodeError> {
    let document = build_document(puzzle)?;
    let data_string = DeflateBase64.compress(&document)?;
    Ok(EncodeResult {
        url: format!("{PENPA_SOLVE_URL}{data_string}"),
        data_string,
    })
}

// =============================================================================
// Decoding
// =============================================================================

fn restore_keys(line: &str) -> String {
    PENPA_KEY_SUBSTITUTIONS
        .iter()
        .fold(line.to_string(), |line, (plain, token)| line.replace(token, plain))
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    serde_json::from_str(text).map_err(|e| DecodeError::JsonParse {
        message: e.to_string(),
    })
}

/// Reads an unpacked penpa document.
pub fn parse_document(document: &str) -> Result<PenpaConstraints, DecodeError> {
    let lines: Vec<&str> = document.split('\n').collect();
    if lines.len() < PENPA_MIN_LINES {
        return Err(DecodeError::NotEnoughLines {
            found: lines.len(),
            min: PENPA_MIN_LINES,
        });
    }

    let header: Vec<&str> = lines[0].split(',').collect();
    let grid_type = header[0];
    if grid_type != "sudoku" && grid_type != "square" {
        return Err(DecodeError::InvalidGridType {
            found: grid_type.to_string(),
        });
    }
    let header_field = |index: usize, field: &'static str| -> Result<i64, DecodeError> {
        let raw = header.get(index).copied().unwrap_or_default();
        parse_number(raw).ok_or_else(|| DecodeError::MalformedHeader {
            field,
            value: raw.to_string(),
        })
    };
    // Missing rule flags just mean the rule is off.
    let rule = |index: usize| header.get(index).and_then(|raw| parse_number(raw)).unwrap_or(0);

    let mut data: Map<String, Value> = parse_json(&restore_keys(lines[3]))?;
    let mut puzzle = PenpaConstraints {
        col_count: header_field(1, "colCount")?,
        row_count: header_field(2, "rowCount")?,
        cell_size: header_field(3, "cellSize")?,
        canvas_width: header_field(7, "canvasWidth")?,
        canvas_height: header_field(8, "canvasHeight")?,
        center_cell_index: header_field(9, "centerCellIndex")?,
        space: parse_json(lines[1])?,
        sudoku: [rule(11), rule(12), rule(13), rule(14)],
        thermo: take_paths(&mut data, "thermo"),
        killercages: take_paths(&mut data, "killercages"),
        arrows: take_paths(&mut data, "arrows"),
        number: take_indexed(&mut data, "number"),
        number_s: take_indexed(&mut data, "numberS"),
        symbol: take_indexed(&mut data, "symbol"),
        cage: take_segments(&mut data, "cage"),
        line_e: take_segments(&mut data, "lineE"),
        centerlist: parse_json(lines[5])?,
        unsupported: BTreeMap::new(),
    };
    if puzzle.grid_dimensions().is_none() {
        return Err(DecodeError::MalformedHeader {
            field: "space",
            value: format!(
                "{} on a {}x{} board",
                lines[1].trim(),
                puzzle.row_count,
                puzzle.col_count
            ),
        });
    }
    // Whatever is left has no canonical meaning.
    puzzle.unsupported = data
        .into_iter()
        .filter(|(name, value)| !HISTORY_FIELDS.contains(&name.as_str()) && !is_blank(value))
        .collect();
    tracing::debug!(
        rows = puzzle.row_count,
        cols = puzzle.col_count,
        unsupported = puzzle.unsupported.len(),
        "parsed penpa document"
    );
    Ok(puzzle)
}

fn parse_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Removes an index-keyed field, skipping entries of the wrong shape.
fn take_indexed<T: DeserializeOwned>(data: &mut Map<String, Value>, field: &str) -> BTreeMap<i64, T> {
    let Some(Value::Object(entries)) = data.remove(field) else {
        return BTreeMap::new();
    };
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            let index = key.parse::<i64>().ok()?;
            match serde_json::from_value(value) {
                Ok(entry) => Some((index, entry)),
                Err(e) => {
                    tracing::debug!(field, %key, error = %e, "skipping penpa entry");
                    None
                }
            }
        })
        .collect()
}

fn take_paths(data: &mut Map<String, Value>, field: &str) -> Vec<Vec<i64>> {
    let Some(Value::Array(items)) = data.remove(field) else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

/// Removes a segment-keyed field. Erased segments are stored as `null`.
fn take_segments(data: &mut Map<String, Value>, field: &str) -> BTreeMap<String, i64> {
    let Some(Value::Object(entries)) = data.remove(field) else {
        return BTreeMap::new();
    };
    entries
        .into_iter()
        .filter_map(|(key, value)| Some((key, value.as_i64()?)))
        .collect()
}

// =============================================================================
// Encoding
// =============================================================================

fn hide_keys(line: &str) -> String {
    PENPA_KEY_SUBSTITUTIONS
        .iter()
        .fold(line.to_string(), |line, (plain, token)| line.replace(plain, token))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, EncodeError> {
    serde_json::to_value(value).map_err(|e| EncodeError::Json {
        message: e.to_string(),
    })
}

fn board_line(puzzle: &PenpaConstraints) -> Result<String, EncodeError> {
    let mut data = Map::new();
    for field in HISTORY_FIELDS {
        data.insert(field.to_string(), serde_json::json!({ "__a": [] }));
    }
    for field in MAP_FIELDS {
        data.insert(field.to_string(), Value::Object(Map::new()));
    }
    for field in LIST_FIELDS {
        data.insert(field.to_string(), Value::Array(Vec::new()));
    }

    for (field, value) in &puzzle.unsupported {
        data.insert(field.clone(), value.clone());
    }
    data.insert("number".to_string(), to_json(&puzzle.number)?);
    data.insert("numberS".to_string(), to_json(&puzzle.number_s)?);
    data.insert("symbol".to_string(), to_json(&puzzle.symbol)?);
    data.insert("thermo".to_string(), to_json(&puzzle.thermo)?);
    data.insert("arrows".to_string(), to_json(&puzzle.arrows)?);
    data.insert("killercages".to_string(), to_json(&puzzle.killercages)?);
    data.insert("cage".to_string(), to_json(&puzzle.cage)?);
    data.insert("lineE".to_string(), to_json(&puzzle.line_e)?);

    let line = serde_json::to_string(&Value::Object(data)).map_err(|e| EncodeError::Json {
        message: e.to_string(),
    })?;
    Ok(hide_keys(&line))
}

/// Writes the unpacked penpa document for a puzzle.
pub fn build_document(puzzle: &PenpaConstraints) -> Result<String, EncodeError> {
    let sudoku = puzzle
        .sudoku
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let header = format!(
        "sudoku,{cols},{rows},{size},0,1,1,{width},{height},{center},{center},{sudoku},Title: ,Author: ,,,OFF,false",
        cols = puzzle.col_count,
        rows = puzzle.row_count,
        size = puzzle.cell_size,
        width = puzzle.canvas_width,
        height = puzzle.canvas_height,
        center = puzzle.center_cell_index,
    );

    let lines = [
        header,
        to_json(&puzzle.space)?.to_string(),
        GRID_LINE.to_string(),
        board_line(puzzle)?,
        String::new(),
        to_json(&puzzle.centerlist)?.to_string(),
        "[]".to_string(),
        "{}".to_string(),
        "\"x\"".to_string(),
        "\"x\"".to_string(),
        "[3,1,4]".to_string(),
        MODE_LINE.to_string(),
        "\"x\"".to_string(),
        "0".to_string(),
        SOLUTION_LINE.to_string(),
        "x".to_string(),
        "{}".to_string(),
        "[]".to_string(),
        "false".to_string(),
    ];
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::penpa::{CornerNumber, NumberEntry, SymbolEntry};

    fn fixture() -> &'static str {
        include_str!("../../../tests/fixtures/penpa.txt").trim()
    }

    fn decoded(result: MatchResult) -> (String, PenpaConstraints) {
        let MatchResult::Matched { data_string, result } = result else {
            panic!("expected a match");
        };
        match result.unwrap() {
            NativeConstraints::Penpa(puzzle) => (data_string, puzzle),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_detects_url() {
        let url = format!("https://swaroopg92.github.io/penpa-edit/#m=solve&p={}", fixture());
        let (data_string, puzzle) = decoded(PenpaCodec.detect(&url));
        assert_eq!(data_string, fixture());

        assert_eq!((puzzle.row_count, puzzle.col_count), (9, 9));
        assert_eq!(puzzle.cell_size, 38);
        assert_eq!((puzzle.canvas_width, puzzle.canvas_height), (380, 380));
        assert_eq!(puzzle.center_cell_index, 84);
        assert_eq!(puzzle.space, [0, 0, 0, 0]);
        assert_eq!(puzzle.sudoku, [1, 0, 0, 1]);
        assert_eq!(puzzle.thermo, vec![vec![33, 34, 35, 49, 62]]);
        assert_eq!(puzzle.arrows, vec![vec![72, 73, 74, 87, 100, 113]]);
        assert_eq!(puzzle.killercages, vec![vec![54, 55, 67, 68, 80, 81]]);
        assert_eq!(
            puzzle.number[&43],
            NumberEntry("1".to_string(), 1, "1".to_string())
        );
        assert_eq!(puzzle.number.len(), 3);
        assert_eq!(puzzle.number_s[&892], CornerNumber(" 22".to_string(), 1));
        assert_eq!(puzzle.symbol[&106], SymbolEntry(3, "circle_L".to_string(), 2));
        assert_eq!(puzzle.symbol[&645], SymbolEntry(2, "circle_SS".to_string(), 2));
        assert_eq!(puzzle.symbol.len(), 6);
        assert_eq!(puzzle.cage.len(), 16);
        assert_eq!(puzzle.cage["892,894"], 10);
        assert_eq!(puzzle.line_e.len(), 54);
        assert_eq!(puzzle.centerlist.len(), 81);
        assert_eq!(&puzzle.centerlist[..3], &[28, 1, 3]);
        assert!(puzzle.unsupported.is_empty());
    }

    #[test]
    fn test_detects_bare_data_string() {
        let (data_string, puzzle) = decoded(PenpaCodec.detect(fixture()));
        assert_eq!(data_string, fixture());
        assert_eq!(puzzle.thermo.len(), 1);
    }

    #[test]
    fn test_broken_url_is_matched_error() {
        let result = PenpaCodec.detect("https://swaroopg92.github.io/penpa-edit/#m=solve&p=1234");
        let MatchResult::Matched { data_string, result } = result else {
            panic!("expected a match");
        };
        assert_eq!(data_string, "1234");
        assert!(result.is_err());
        assert_eq!(PenpaCodec.detect("1234"), MatchResult::NoMatch);
    }

    #[test]
    fn test_document_errors() {
        let err = parse_document("sudoku,9,9\n[0,0,0,0]").unwrap_err();
        assert_eq!(err, DecodeError::NotEnoughLines { found: 2, min: 19 });

        let puzzle = PenpaConstraints {
            row_count: 4,
            col_count: 4,
            ..Default::default()
        };
        let document = build_document(&puzzle).unwrap();
        let hex = document.replacen("sudoku", "hex", 1);
        assert_eq!(
            parse_document(&hex).unwrap_err(),
            DecodeError::InvalidGridType {
                found: "hex".to_string()
            }
        );
        let broken = document.replacen(",4,4,", ",4,four,", 1);
        assert!(matches!(
            parse_document(&broken),
            Err(DecodeError::MalformedHeader { field: "rowCount", .. })
        ));
    }

    #[test]
    fn test_rejects_unbounded_geometry() {
        let puzzle = PenpaConstraints {
            row_count: 9,
            col_count: 9,
            ..Default::default()
        };
        let document = build_document(&puzzle).unwrap();
        for space in ["[-9223372036854775808,1,0,0]", "[0,-1,0,0]", "[5,5,0,0]"] {
            let broken = document.replacen("[0,0,0,0]", space, 1);
            assert!(
                matches!(
                    parse_document(&broken),
                    Err(DecodeError::MalformedHeader { field: "space", .. })
                ),
                "space {space}"
            );
        }

        let huge = document.replacen(",9,9,", ",9223372036854775807,9,", 1);
        assert!(matches!(
            parse_document(&huge),
            Err(DecodeError::MalformedHeader { field: "space", .. })
        ));
    }

    #[test]
    fn test_keys_are_hidden_and_restored() {
        let line = r#"{"command_redo":{"__a":[]},"lineE":{"1,2":null},"line":{}}"#;
        let hidden = hide_keys(line);
        assert_eq!(hidden, r#"{zR:{z_:[]},zE:{"1,2":zO},zL:{}}"#);
        assert_eq!(restore_keys(&hidden), line);
    }

    #[test]
    fn test_encode_roundtrip() {
        let (_, puzzle) = decoded(PenpaCodec.detect(fixture()));
        let encoded = encode(&puzzle).unwrap();
        assert!(encoded.url.starts_with("https://swaroopg92.github.io/penpa-edit/#m=solve&p="));
        assert!(encoded.url.ends_with(&encoded.data_string));

        let (_, again) = decoded(PenpaCodec.detect(&encoded.url));
        assert_eq!(again, puzzle);
    }

    #[test]
    fn test_unsupported_fields_survive() {
        let mut puzzle = PenpaConstraints {
            row_count: 9,
            col_count: 9,
            ..Default::default()
        };
        puzzle
            .unsupported
            .insert("surface".to_string(), serde_json::json!({ "28": 1 }));
        let document = build_document(&puzzle).unwrap();
        assert_eq!(document.split('\n').count(), 19);
        let parsed = parse_document(&document).unwrap();
        assert_eq!(parsed.unsupported, puzzle.unsupported);
    }
}
