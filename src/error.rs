use thiserror::Error;

/// Result type alias for component operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by components and drivers.
///
/// The first group are configuration errors: they are returned before any page
/// query happens and indicate a mistake in how a component was declared or
/// called. The rest come from the driver and are passed through untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// The component has neither a resolver, a selector nor a text lookup.
    #[error("Component '{0}' has no lookup strategy: set a selector, text or resolver")]
    NoLookupStrategy(String),

    /// Resolution by resolver was requested but none is configured.
    #[error("Component '{0}' has no resolver defined")]
    NoResolver(String),

    /// `should()` was called with an empty condition.
    #[error("Assertion must be provided to should() on component '{0}'")]
    MissingCondition(String),

    /// The condition is not a chainer this crate understands.
    #[error("Unknown assertion '{0}'")]
    UnknownAssertion(String),

    /// The chainer was recognised but got the wrong number of arguments.
    #[error("Assertion '{chainer}' expects {expected} argument(s), got {got}")]
    InvalidAssertionArgs {
        chainer: String,
        expected: &'static str,
        got: usize,
    },

    /// The page did not satisfy an assertion.
    #[error("{0}")]
    AssertionFailed(String),

    /// Any other failure reported by the driver.
    #[error(transparent)]
    Driver(#[from] anyhow::Error),
}

impl Error {
    /// True for the errors raised before touching the page.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NoLookupStrategy(_)
                | Self::NoResolver(_)
                | Self::MissingCondition(_)
                | Self::UnknownAssertion(_)
                | Self::InvalidAssertionArgs { .. }
        )
    }
}
