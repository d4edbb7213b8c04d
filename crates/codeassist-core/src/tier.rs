//! Service tiers and default-tier selection.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named service plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierId {
    /// Free plan. Never carries a companion project in the onboarding payload.
    Free,
    /// Paid plan.
    Pro,
    /// Highest paid plan.
    Ultra,
}

impl TierId {
    /// Wire name of the tier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Pro => "PRO",
            Self::Ultra => "ULTRA",
        }
    }

    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown tier name.
#[derive(Debug, Error)]
#[error("Unknown tier: {0}")]
pub struct UnknownTier(pub String);

impl FromStr for TierId {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FREE" => Ok(Self::Free),
            "PRO" => Ok(Self::Pro),
            "ULTRA" => Ok(Self::Ultra),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

/// Tier entry as advertised by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDescriptor {
    /// Tier identifier. Kept as a string since the backend may list tiers
    /// this crate does not model.
    pub id: String,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

impl TierDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, is_default: bool) -> Self {
        Self {
            id: id.into(),
            is_default,
        }
    }
}

/// Pick the default tier from a backend-supplied list.
///
/// Returns the first descriptor flagged `isDefault`, else the first entry.
/// An empty or absent list yields `None`.
#[must_use]
pub fn default_tier(tiers: Option<&[TierDescriptor]>) -> Option<&TierDescriptor> {
    let tiers = tiers?;
    tiers.iter().find(|t| t.is_default).or_else(|| tiers.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tier_prefers_flagged_entry() {
        let tiers = vec![
            TierDescriptor::new("FREE", false),
            TierDescriptor::new("PRO", true),
            TierDescriptor::new("ULTRA", true),
        ];
        assert_eq!(default_tier(Some(&tiers)).unwrap().id, "PRO");
    }

    #[test]
    fn test_default_tier_falls_back_to_first() {
        let tiers = vec![
            TierDescriptor::new("ULTRA", false),
            TierDescriptor::new("FREE", false),
        ];
        assert_eq!(default_tier(Some(&tiers)).unwrap().id, "ULTRA");
    }

    #[test]
    fn test_default_tier_empty_or_absent() {
        assert!(default_tier(Some(&[])).is_none());
        assert!(default_tier(None).is_none());
    }

    #[test]
    fn test_descriptor_deserialization() {
        let tiers: Vec<TierDescriptor> =
            serde_json::from_str(r#"[{"id":"FREE"},{"id":"PRO","isDefault":true}]"#).unwrap();
        assert!(!tiers[0].is_default);
        assert!(tiers[1].is_default);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("free".parse::<TierId>().unwrap(), TierId::Free);
        assert_eq!(" Ultra ".parse::<TierId>().unwrap(), TierId::Ultra);
        assert!("enterprise".parse::<TierId>().is_err());
        assert_eq!(serde_json::to_string(&TierId::Pro).unwrap(), r#""PRO""#);
    }
}
