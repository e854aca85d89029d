//! Search engine module
//!
//! Engine descriptors, the rule language that recognises an engine's result pages,
//! and the three operations built on it: matching, query extraction and link
//! formatting.

pub mod builtin;
mod descriptor;
mod extractor;
mod formatter;
mod matcher;
mod registry;
mod rules;

pub use descriptor::{EngineDescriptor, MobileOverrides};
pub use extractor::extract;
pub use formatter::{encode_query, format_link};
pub use matcher::match_engine;
pub use registry::{validate_engines, EngineRegistry};
pub use rules::*;
