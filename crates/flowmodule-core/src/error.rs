//! Error types for the flow-module rewriting engine

use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// F001: A string looks like an ARN but fails strict parsing
    F001MalformedArn,
    /// F002: An expected field is absent from the document
    F002MissingField,
    /// F003: A field holds a value of the wrong JSON type
    F003UnexpectedType,
    /// F004: A symbolic identifier appears in more than one lookup table
    F004ConflictingIdentifier,
    /// F005: The template is not a JSON object
    F005InvalidDocument,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::F001MalformedArn => "F001",
            Self::F002MissingField => "F002",
            Self::F003UnexpectedType => "F003",
            Self::F004ConflictingIdentifier => "F004",
            Self::F005InvalidDocument => "F005",
        }
    }
}

/// Why a candidate string was rejected by the ARN parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArnError {
    #[error("arn: invalid prefix")]
    InvalidPrefix,
    #[error("arn: not enough sections")]
    InvalidSections,
    #[error("arn: invalid partition")]
    InvalidPartition,
    #[error("arn: invalid service")]
    InvalidService,
    #[error("arn: invalid resource")]
    InvalidResource,
}

/// Errors raised while rewriting a contact-flow-module document
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("[{code}] Malformed ARN '{value}' at {path}: {source}")]
    MalformedArn {
        code: &'static str,
        path: String,
        value: String,
        #[source]
        source: ArnError,
    },

    #[error("[{code}] Missing field '{field}' at {path}")]
    MissingField {
        code: &'static str,
        path: String,
        field: String,
    },

    #[error("[{code}] Field '{field}' at {path} must be {expected}, found {found}")]
    UnexpectedType {
        code: &'static str,
        path: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("[{code}] Identifier '{identifier}' is present in both the prompt and the Lambda table")]
    ConflictingIdentifier {
        code: &'static str,
        identifier: String,
    },

    #[error("[{code}] Invalid flow module document: {message}")]
    InvalidDocument { code: &'static str, message: String },
}

impl TransformError {
    pub fn malformed_arn(
        path: impl Into<String>,
        value: impl Into<String>,
        source: ArnError,
    ) -> Self {
        Self::MalformedArn {
            code: ErrorCode::F001MalformedArn.as_str(),
            path: pointer(path.into()),
            value: value.into(),
            source,
        }
    }

    pub fn missing_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            code: ErrorCode::F002MissingField.as_str(),
            path: pointer(path.into()),
            field: field.into(),
        }
    }

    pub fn unexpected_type(
        path: impl Into<String>,
        field: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::UnexpectedType {
            code: ErrorCode::F003UnexpectedType.as_str(),
            path: pointer(path.into()),
            field: field.into(),
            expected,
            found,
        }
    }

    pub fn conflicting_identifier(identifier: impl Into<String>) -> Self {
        Self::ConflictingIdentifier {
            code: ErrorCode::F004ConflictingIdentifier.as_str(),
            identifier: identifier.into(),
        }
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            code: ErrorCode::F005InvalidDocument.as_str(),
            message: message.into(),
        }
    }

    /// The stable error code carried by this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedArn { code, .. }
            | Self::MissingField { code, .. }
            | Self::UnexpectedType { code, .. }
            | Self::ConflictingIdentifier { code, .. }
            | Self::InvalidDocument { code, .. } => code,
        }
    }
}

/// Paths are JSON pointers; the document root is rendered as `/`
fn pointer(path: String) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}

/// Result type alias for TransformError
pub type Result<T> = std::result::Result<T, TransformError>;
