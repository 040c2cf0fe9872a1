//! Fixed tables and constants shared across formats.

/// Grid sizes every format can represent.
pub const GRID_SIZES: [usize; 3] = [4, 6, 9];

/// Base URL for canonical puzzles opened in the solver.
pub const LISUDOKU_SOLVER_URL: &str = "https://lisudoku.xyz/solver?import=";

/// Base URL of the puzzle lookup API.
pub const LISUDOKU_API_BASE_URL: &str = "https://api.lisudoku.xyz/api";

/// Base URL for f-puzzles links.
pub const FPUZZLES_LOAD_URL: &str = "https://f-puzzles.com/?load=";

/// Base URL for penpa-edit links in solve mode.
pub const PENPA_SOLVE_URL: &str = "https://swaroopg92.github.io/penpa-edit/#m=solve&p=";

/// Minimum number of lines in a penpa document.
pub const PENPA_MIN_LINES: usize = 19;

/// Largest board side or margin accepted from a penpa header.
pub const PENPA_MAX_SIDE: i64 = 100;

/// Pixel size of a cell in encoded penpa documents.
pub const PENPA_CELL_SIZE: i64 = 38;

/// Line style of a killer cage outline.
pub const PENPA_CAGE_STYLE: i64 = 10;

/// Line style of a diagonal.
pub const PENPA_DIAGONAL_STYLE: i64 = 12;

/// Line style of a box border.
pub const PENPA_BOX_STYLE: i64 = 2;

/// Symbol layer used for odd/even markers and kropki dots.
pub const PENPA_SYMBOL_LAYER: i64 = 2;

/// Symbol code of odd/even markers.
pub const PENPA_PARITY_CODE: i64 = 3;

/// Symbol code of a white (consecutive) kropki dot when encoding.
pub const PENPA_CONSECUTIVE_CODE: i64 = 8;

/// Symbol code of a black (double) kropki dot when encoding.
pub const PENPA_DOUBLE_CODE: i64 = 2;
