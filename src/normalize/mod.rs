mod preprocess;
pub mod types;

pub use preprocess::{grid_from_dynamic, Normalizer};
pub use types::PixelGrid;
