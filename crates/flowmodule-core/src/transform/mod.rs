//! Document transformer passes
//!
//! Each pass mutates an [`OrderedDocument`](crate::document::OrderedDocument)
//! in place and fails fast on the first structural violation.

mod output_variables;
mod resources;
mod ssml;

pub use output_variables::inject_output_variable_attributes;
pub use resources::{rewrite_resource_references, ResourceRewriteReport};
pub use ssml::{apply_ssml_rules, inject_ssml_conversions, SpeakActionConvention};
