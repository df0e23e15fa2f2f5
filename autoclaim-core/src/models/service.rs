//! Supported reward services.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default claim interval when neither the account nor the service overrides it.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(8 * 60 * 60);

// ============================================================================
// Service Kind
// ============================================================================

/// Supported reward service kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// HOT (herewallet) storage claim
    Hot,
    /// Matchain points farming and games
    Matchain,
    /// Vooi auto-trade farming
    Vooi,
    /// SuperMeow claim
    SuperMeow,
}

impl ServiceKind {
    /// Returns the display name for this service.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hot => "HOT",
            Self::Matchain => "Matchain",
            Self::Vooi => "Vooi",
            Self::SuperMeow => "SuperMeow",
        }
    }

    /// Returns the CLI/config name for this service (lowercase, no spaces).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Matchain => "matchain",
            Self::Vooi => "vooi",
            Self::SuperMeow => "supermeow",
        }
    }

    /// Short uppercase tag used as a log prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Hot => "HOT",
            Self::Matchain => "MATCHCHAIN",
            Self::Vooi => "VOOI",
            Self::SuperMeow => "SUPERMEOW",
        }
    }

    /// Interval used when an account does not configure one.
    pub fn default_interval(&self) -> Duration {
        match self {
            // 3.5 hours
            Self::SuperMeow => Duration::from_secs(3 * 60 * 60 + 30 * 60),
            _ => DEFAULT_INTERVAL,
        }
    }

    /// Returns all available service kinds.
    pub fn all() -> &'static [ServiceKind] {
        &[Self::Hot, Self::Matchain, Self::Vooi, Self::SuperMeow]
    }

    /// Looks a service up by its CLI name (case-insensitive).
    pub fn from_cli_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::all().iter().copied().find(|k| k.cli_name() == name)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ServiceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cli_name(s).ok_or_else(|| CoreError::UnknownService(s.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_name_roundtrip() {
        for kind in ServiceKind::all() {
            assert_eq!(ServiceKind::from_cli_name(kind.cli_name()), Some(*kind));
        }
        assert_eq!(ServiceKind::from_cli_name(" MATCHAIN "), Some(ServiceKind::Matchain));
        assert!("nope".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn test_default_intervals() {
        assert_eq!(ServiceKind::Hot.default_interval(), DEFAULT_INTERVAL);
        assert_eq!(
            ServiceKind::SuperMeow.default_interval(),
            Duration::from_secs(12_600)
        );
    }

    #[test]
    fn test_serde_names_match_cli_names() {
        let json = serde_json::to_string(&ServiceKind::SuperMeow).unwrap();
        assert_eq!(json, "\"supermeow\"");
    }
}
