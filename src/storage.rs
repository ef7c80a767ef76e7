//! Storage abstraction layer for Simword.
//!
//! An index lives in a [`Storage`]: a flat namespace of named files. The file
//! system backend is used by the command line tool, the memory backend by
//! tests and in-process callers.

pub mod file;
pub mod memory;
pub mod structured;
pub mod traits;

// Re-export commonly used types
pub use file::*;
pub use memory::*;
pub use structured::*;
pub use traits::*;
