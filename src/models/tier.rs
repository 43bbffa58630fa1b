//! Subscription tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Subscription level controlling numeric limits and premium features.
///
/// Ordered from the free entry level up to the unlimited tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Free entry level
    #[default]
    #[serde(alias = "free")]
    Scouter,

    /// Creator tier with raised limits
    #[serde(alias = "mid")]
    Producer,

    /// Unlimited tier with every premium feature
    #[serde(alias = "unlimited")]
    Icon,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 3] = [Tier::Scouter, Tier::Producer, Tier::Icon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Scouter => "scouter",
            Tier::Producer => "producer",
            Tier::Icon => "icon",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scouter" | "free" => Ok(Tier::Scouter),
            "producer" | "mid" => Ok(Tier::Producer),
            "icon" | "unlimited" => Ok(Tier::Icon),
            other => Err(AppError::validation(format!("Unknown tier '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Scouter < Tier::Producer);
        assert!(Tier::Producer < Tier::Icon);
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("ICON".parse::<Tier>().unwrap(), Tier::Icon);
        assert_eq!(" free ".parse::<Tier>().unwrap(), Tier::Scouter);
        assert_eq!("mid".parse::<Tier>().unwrap(), Tier::Producer);
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn test_tier_serde_alias() {
        #[derive(Deserialize)]
        struct Wrapper {
            tier: Tier,
        }

        let w: Wrapper = toml::from_str("tier = \"unlimited\"").unwrap();
        assert_eq!(w.tier, Tier::Icon);
        assert_eq!(serde_json::to_string(&Tier::Producer).unwrap(), "\"producer\"");
    }
}
