mod ssim;
mod threshold;
pub mod types;

pub use ssim::DifferenceEngine;
pub use threshold::change_mask;
pub use types::{ChangeMask, Difference};
