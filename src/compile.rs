use crate::emit;
use crate::types::{RuleDoc, SchemaError};
use crate::RulesmithError;

/// The two artifact formats a rule document can compile to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Drl,
    Gdst,
}

impl ArtifactKind {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Drl => "drl",
            ArtifactKind::Gdst => "gdst",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Pick the artifact format for a document.
///
/// Purely a function of document shape: table documents compile to the
/// decision-table format, flat documents to rule text. The rule-text
/// emitter handles any number of conditions, so condition count never
/// changes the format. Callers can override with an explicit kind.
#[must_use]
pub fn select_kind(doc: &RuleDoc) -> ArtifactKind {
    match doc {
        RuleDoc::Table(_) => ArtifactKind::Gdst,
        RuleDoc::Simple(_) => ArtifactKind::Drl,
    }
}

/// Compile a document into artifact text, choosing the format from the
/// document shape unless `kind` is given.
///
/// # Errors
///
/// Returns [`SchemaError`] on validation failure or when the requested
/// kind cannot be produced from the document's shape (the decision-table
/// format needs a table document, the rule-text format a flat one).
pub fn compile(
    doc: &RuleDoc,
    kind: Option<ArtifactKind>,
) -> Result<(ArtifactKind, String), RulesmithError> {
    let kind = kind.unwrap_or_else(|| select_kind(doc));
    match (kind, doc) {
        (ArtifactKind::Gdst, RuleDoc::Table(ir)) => Ok((kind, emit::emit_gdst(ir)?)),
        (ArtifactKind::Drl, RuleDoc::Simple(ir)) => Ok((kind, emit::emit_drl(ir)?)),
        (ArtifactKind::Gdst, RuleDoc::Simple(_)) => Err(SchemaError::ArtifactMismatch {
            requested: "gdst",
            document: "simple rule",
        }
        .into()),
        (ArtifactKind::Drl, RuleDoc::Table(_)) => Err(SchemaError::ArtifactMismatch {
            requested: "drl",
            document: "decision table",
        }
        .into()),
    }
}

/// The artifact file name for a document: the rule or table name with
/// spaces replaced by underscores, plus the format extension.
#[must_use]
pub fn artifact_file_name(doc: &RuleDoc, kind: ArtifactKind) -> String {
    format!("{}.{}", doc.name().replace(' ', "_"), kind.extension())
}
