use osier_ast::ValidationError;

pub type PassResult<T> = Result<T, PassError>;

/// Failure surfaced by a pass entry point. Passes validate their input
/// before transforming, so a malformed program aborts the run without any
/// partial mutation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PassError {
    #[display("malformed input program: {_0}")]
    MalformedInput(ValidationError),
}
