//! User profile domain types.
//!
//! A profile captures a user's investing preferences. Every field except
//! the id is optional: "caller never supplied this" is modeled as `None`,
//! never as an empty string. Display fallbacks ("not set") belong to the
//! context assembler, not to this data model.

use serde::{Deserialize, Serialize};

/// Risk tolerance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for RiskProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown risk profile: {other}")),
        }
    }
}

/// Investment time horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    Short,
    Medium,
    Long,
}

impl std::fmt::Display for TimeHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TimeHorizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(format!("unknown time horizon: {other}")),
        }
    }
}

/// A user's stored investing profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique profile ID, assigned on creation, immutable.
    pub id: String,

    /// Opaque external account address. Not validated by this core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_address: Option<String>,

    /// Risk tolerance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_profile: Option<RiskProfile>,

    /// Time horizon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_horizon: Option<TimeHorizon>,

    /// Free-text stylistic preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Fields supplied when creating a profile. Any subset may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProfile {
    #[serde(default)]
    pub external_address: Option<String>,

    #[serde(default)]
    pub risk_profile: Option<RiskProfile>,

    #[serde(default)]
    pub time_horizon: Option<TimeHorizon>,

    #[serde(default)]
    pub style: Option<String>,
}
