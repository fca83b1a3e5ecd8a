//! Value types carried by the format.

mod value;

pub use value::{Value, ValueMap};
