pub mod data;
pub mod errors;
pub mod options;

pub use data::*; // Re-export common data types
pub use errors::*;
pub use options::*;
