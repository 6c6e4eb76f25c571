//! pcgfont: programmable character generator toolkit.
//! 256 redefinable 8x8 glyphs in 8 colors, stored as three bitplanes, with
//! region transforms, color reduction and BIN / BASIC / PNG codecs.

pub mod bitfont;
mod error;
pub mod format;
pub mod geometry;
pub mod palette;
pub mod program;
pub mod quantize;
pub mod raster;
pub mod raw;
pub mod region;
mod store;

pub use error::{ErrorKind, PcgError, Result};
pub use format::{FileFormat, ImportOptions};
pub use geometry::Transform;
pub use program::{LoadMode, ProgramOptions};
pub use quantize::{IndexedImage, ReduceMode};
pub use raster::RasterOptions;
pub use region::{EditMode, EditRegion};
pub use store::{
    CharChange, CharacterStore, Plane, CHAR_COUNT, CHAR_HEIGHT, CHAR_SIZE, CHAR_WIDTH, PLANE_SIZE,
    STORE_SIZE,
};

// Test utilities
pub mod test_support;
