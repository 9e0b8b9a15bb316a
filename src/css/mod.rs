//! CSS model: selector decomposition, stylesheet parsing, group cascade, serialization.

pub mod tokenizer;
pub mod model;
pub mod selector;
pub mod parser;
pub mod stylesheet;
pub mod cascade;
pub mod render;
