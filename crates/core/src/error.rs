//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A single structured validation failure.
///
/// `code` is a stable, machine-readable identifier with dot-separated
/// namespacing (e.g. `"product.status.already-in-status"`); `message` is the
/// human-readable counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic business/domain failures. Expected
/// rule violations are returned, never panicked; `Critical` is reserved for
/// programmer errors and unrecoverable infrastructure failures that the
/// pipeline rolls back and rethrows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,

    /// One or more values failed validation.
    #[error("validation failed: {}", fmt_validation_errors(.0))]
    Invalid(Vec<ValidationError>),

    /// A conflict occurred (e.g. duplicate registration).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Programmer error or unrecoverable infrastructure failure.
    #[error("critical: {0}")]
    Critical(String),
}

fn fmt_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    /// Single-error `Invalid` smart constructor.
    pub fn invalid(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid(vec![ValidationError::new(code, message)])
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn critical(msg: impl Into<String>) -> Self {
        Self::Critical(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Validation error codes carried by an `Invalid` error (empty otherwise).
    pub fn codes(&self) -> Vec<&str> {
        match self {
            Self::Invalid(errors) => errors.iter().map(|e| e.code.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether this is an `Invalid` error carrying the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.codes().iter().any(|c| *c == code)
    }
}

/// Combine two independently-validated results.
///
/// Both `Invalid` failures are merged into a single `Invalid` carrying every
/// validation error; any other failure kind short-circuits (first wins).
pub fn zip<A, B>(a: DomainResult<A>, b: DomainResult<B>) -> DomainResult<(A, B)> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(DomainError::Invalid(mut ea)), Err(DomainError::Invalid(eb))) => {
            ea.extend(eb);
            Err(DomainError::Invalid(ea))
        }
        (Err(e), _) => Err(e),
        (_, Err(e)) => Err(e),
    }
}

/// Three-way variant of [`zip`].
pub fn zip3<A, B, C>(
    a: DomainResult<A>,
    b: DomainResult<B>,
    c: DomainResult<C>,
) -> DomainResult<(A, B, C)> {
    let ((a, b), c) = zip(zip(a, b), c)?;
    Ok((a, b, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_constructor_carries_code_and_message() {
        let err = DomainError::invalid("agent.username.too-short", "username too short");
        assert!(err.has_code("agent.username.too-short"));
        assert!(err.to_string().contains("username too short"));
    }

    #[test]
    fn zip_merges_invalid_sets() {
        let a: DomainResult<()> = Err(DomainError::invalid("a.one", "first"));
        let b: DomainResult<()> = Err(DomainError::invalid("b.two", "second"));

        let err = zip(a, b).unwrap_err();
        assert_eq!(err.codes(), vec!["a.one", "b.two"]);
    }

    #[test]
    fn zip_short_circuits_on_non_validation_failure() {
        let a: DomainResult<()> = Err(DomainError::NotFound);
        let b: DomainResult<()> = Err(DomainError::invalid("b.two", "second"));

        assert_eq!(zip(a, b).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn zip_passes_both_successes_through() {
        let pair = zip(Ok(1u32), Ok("x")).unwrap();
        assert_eq!(pair, (1, "x"));
    }

    #[test]
    fn zip3_merges_all_three_invalid_sets() {
        let a: DomainResult<()> = Err(DomainError::invalid("a", "a"));
        let b: DomainResult<()> = Err(DomainError::invalid("b", "b"));
        let c: DomainResult<()> = Err(DomainError::invalid("c", "c"));

        let err = zip3(a, b, c).unwrap_err();
        assert_eq!(err.codes().len(), 3);
    }

    #[test]
    fn codes_is_empty_for_non_validation_errors() {
        assert!(DomainError::Unauthorized.codes().is_empty());
        assert!(DomainError::conflict("dup").codes().is_empty());
    }
}
