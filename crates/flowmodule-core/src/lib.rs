// flowmodule-core - Contact-flow-module rewriting engine
//
// Pure, synchronous logic: parse a flow module template, bind provisioned
// prompt/Lambda ARNs, relocate embedded ARNs, inject output-variable
// attributes and SSML conversions, serialise. No I/O, no runtime.

pub mod arn;
pub mod document;
pub mod error;
pub mod field_names;
pub mod pipeline;
pub mod tables;
pub mod transform;

// Re-export commonly used types
pub use arn::{Arn, ConnectInstance};
pub use document::{parse_document, to_pretty_json, OrderedDocument};
pub use error::{ArnError, ErrorCode, TransformError};
pub use pipeline::{
    render_flow_module, rewrite_flow_module, Phase, PipelineError, RewritePlan, RewriteSummary,
};
pub use tables::{
    ArnRewriteTable, AttributeMapping, ResourceManifest, ResourceTables, SsmlConversionRule,
};
pub use transform::SpeakActionConvention;
