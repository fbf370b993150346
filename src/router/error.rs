use std::fmt;

/// Route registration error
///
/// Returned by `Router::register()` and friends when a registration cannot
/// be accepted. Registrations are startup-time configuration, so callers
/// normally treat any of these as fatal and abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The (method, host, path) key is already registered
    ///
    /// Routes are never silently replaced; a second registration for the
    /// same key is a configuration bug.
    DuplicatePattern {
        /// String form of the colliding pattern (`host/path` or `/path`)
        pattern: String,
    },
    /// The pattern string is empty
    EmptyPattern,
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::DuplicatePattern { pattern } => {
                write!(f, "multiple registrations for pattern '{}'", pattern)
            }
            RegisterError::EmptyPattern => {
                write!(f, "cannot register an empty pattern")
            }
        }
    }
}

impl std::error::Error for RegisterError {}
