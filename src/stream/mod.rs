//! Async helpers for moving one encoded value through a byte stream.
//!
//! The compressed payload carries no outer length, so a reader consumes its
//! source to EOF. One stream holds one value.

pub mod reader;
pub mod writer;

pub use reader::ValueReader;
pub use writer::ValueWriter;
