mod extract;
pub mod types;

pub use extract::{trace_regions, RegionExtractor};
pub use types::{Bounds, Region};
