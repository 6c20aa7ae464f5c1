//! Field name constants for Amazon Connect flow language documents.
//!
//! Only the handful of keys the rewriting passes recognise are listed here;
//! everything else in a flow module is carried through untouched.

/// Top-level array of flow actions
pub const ACTIONS: &str = "Actions";
/// Action identifier, also used as the symbolic resource name
pub const IDENTIFIER: &str = "Identifier";
/// Action type (e.g. `MessageParticipant`)
pub const TYPE: &str = "Type";
/// Per-action parameter object
pub const PARAMETERS: &str = "Parameters";

/// Prompt ARN parameter of play-prompt actions
pub const PROMPT_ID: &str = "PromptId";
/// Function ARN parameter of Lambda invocation actions
pub const LAMBDA_FUNCTION_ARN: &str = "LambdaFunctionARN";
/// Contact attributes written by an `UpdateContactAttributes` action
pub const ATTRIBUTES: &str = "Attributes";

/// Identifier of the action that persists external output variables
pub const EXTRACT_OUTPUT_VARIABLES: &str = "ExtractOutputVariables";
/// JSONPath prefix of values returned by the external engine
pub const EXTERNAL_OUTPUT_VARIABLES_PREFIX: &str = "$.External.outputVariables.";
/// Prefix of runtime references in flow parameters
pub const RUNTIME_REFERENCE_PREFIX: &str = "$.";
