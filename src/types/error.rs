use thiserror::Error;

/// A data-type tag outside the four-member enum.
///
/// Never downgraded to a string default: an unrecognized tag means the
/// caller built the IR wrong and must hear about it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown data type tag '{tag}'")]
pub struct UnknownDataTypeError {
    pub tag: String,
}

/// Structural validation failures, surfaced before any artifact text is
/// produced.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("rule name is missing or empty")]
    MissingRuleName,

    #[error("table name is missing or empty")]
    MissingTableName,

    #[error("rule '{name}' has no conditions")]
    NoConditions { name: String },

    #[error(
        "action column '{header}' binds variable '{expected}' but its definition references '{found}'"
    )]
    ActionPlaceholderMismatch {
        header: String,
        expected: String,
        found: String,
    },

    #[error("action column '{header}' contains {count} placeholders; exactly one is allowed")]
    MultiplePlaceholders { header: String, count: usize },

    #[error("action column '{header}' must be a single method invocation")]
    ActionNotInvocation { header: String },

    #[error(
        "condition column '{header}' binds variable '{expected}' but its eval references '{found}'"
    )]
    ConditionPlaceholderMismatch {
        header: String,
        expected: String,
        found: String,
    },

    #[error("row number {row} is not positive")]
    NonPositiveRowNumber { row: u32 },

    #[error("duplicate row number {row}")]
    DuplicateRowNumber { row: u32 },

    #[error("a {requested} artifact cannot be produced from a {document} document")]
    ArtifactMismatch {
        requested: &'static str,
        document: &'static str,
    },
}
