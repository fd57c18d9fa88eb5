pub mod decoding;
pub mod preprocessing;
pub mod extraction;
pub mod simplification;
pub mod filtering;
pub mod recognition;

pub use decoding::*;
pub use preprocessing::*;
pub use extraction::*;
pub use simplification::*;
pub use filtering::*;
pub use recognition::*;
