mod sources;

pub use sources::{Base64Source, FileSource};

use crate::error::Result;

/// Trait for places a photo's encoded bytes come from
pub trait ImageSource {
    /// Read the complete encoded image
    fn read_bytes(&self) -> Result<Vec<u8>>;

    /// Human-readable origin, used in logs and errors
    fn label(&self) -> String;
}
