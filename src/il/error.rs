use thiserror::Error;

/// An internal diagnostic recorded during code generation.
///
/// These never abort generation; the generator produces best-effort code for
/// the affected subtree and keeps going. Each occurrence points at a defect
/// in an upstream pass, so callers are expected to inspect the collected
/// diagnostics after the pass completes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("identifier '{0}' reached code generation without a resolved address")]
    UnresolvedIdentifier(String),
    #[error("{0} node is missing a resolved operand")]
    MissingOperand(&'static str),
}
