//! Shared helpers: compression, key casing and grid geometry.

pub mod case;
pub mod compress;
pub mod geometry;

pub use compress::{decode_uri_component, encode_uri_component, Compressor, DeflateBase64, LzBase64};
pub use geometry::{
    block_dimensions, default_regions, ensure_grid_size, grid_to_regions, is_grid_string,
    regions_to_grid,
};
