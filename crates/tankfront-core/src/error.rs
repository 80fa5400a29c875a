//! Error types for the simulation core.
//!
//! Almost nothing in the core can fail: rejected ability use is a `bool`,
//! projectiles leaving the world are retired silently, and every numeric
//! formula is clamped over its full domain. The errors below cover the
//! remaining configuration-time failures.

use thiserror::Error;

/// Errors reported by fallible simulation setup calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A mission id was requested that the mission table does not contain.
    ///
    /// Unlike level lookup there is no sensible default mission, so this is
    /// a hard failure.
    #[error("mission {0} not found")]
    MissionNotFound(u32),

    /// A level catalog with no entries was supplied.
    #[error("level catalog is empty")]
    EmptyCatalog,

    /// The simulation configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results carrying a [`SimError`].
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(SimError::MissionNotFound(7).to_string(), "mission 7 not found");
        assert_eq!(SimError::EmptyCatalog.to_string(), "level catalog is empty");
        assert_eq!(
            SimError::InvalidConfig("tick_ms must be positive".into()).to_string(),
            "invalid configuration: tick_ms must be positive"
        );
    }
}
