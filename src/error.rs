/// Errors that may be encountered while setting up or restoring a simulation.
///
/// Only configuration and loading a persisted state can fail. Once a [`SimulationConfig`] exists, every advance is
/// total: exponential draws are always defined for positive, finite rates, and advancing a finished simulation is a
/// no-op rather than an error.
///
/// The [`InvalidConfiguration`] variant names the rejected parameter and why it was rejected, so an input surface can
/// point the user at the right field. The [`InvalidState`] variant comes from deserializing a [`SimulationState`]
/// whose counters, clocks, and records disagree with each other.
///
/// [`SimulationConfig`]: crate::SimulationConfig
/// [`SimulationState`]: crate::SimulationState
/// [`InvalidConfiguration`]: Error::InvalidConfiguration
/// [`InvalidState`]: Error::InvalidState
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A configuration value was outside its valid domain.
    #[error("invalid configuration: {parameter} {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter, e.g. `"arrival_rate"`.
        parameter: &'static str,
        /// Human-readable description of the violated constraint.
        reason: &'static str,
    },
    /// A restored simulation state was internally inconsistent.
    #[error("invalid simulation state: {reason}")]
    InvalidState {
        /// Human-readable description of the broken invariant.
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn invalid(parameter: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfiguration { parameter, reason }
    }

    #[cfg_attr(not(feature = "serde"), allow(dead_code))]
    pub(crate) fn inconsistent(reason: &'static str) -> Self {
        Self::InvalidState { reason }
    }
}

/// [`std::result::Result`]`<T, `[`ssq::Error`]`>`
///
/// A type alias that simplifies the signatures of fallible functions in ssq.
///
/// [`ssq::Error`]: Error
pub type Result<T> = std::result::Result<T, Error>;
