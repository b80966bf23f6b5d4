use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which networks the SSID list refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnDemandPolicy {
    /// Activate on any network.
    Any,
    /// Activate only on the listed networks.
    Including,
    /// Activate everywhere except on the listed networks.
    #[default]
    Excluding,
}

impl OnDemandPolicy {
    /// Raw value as persisted.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Including => "including",
            Self::Excluding => "excluding",
        }
    }
}

impl FromStr for OnDemandPolicy {
    type Err = String;

    /// Exact raw values only; anything else is unknown.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "including" => Ok(Self::Including),
            "excluding" => Ok(Self::Excluding),
            other => Err(format!("unknown on-demand policy: {other}")),
        }
    }
}

/// Rules for activating the VPN automatically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnDemand {
    /// Whether on-demand activation is on.
    pub is_enabled: bool,
    /// How `with_ssids` is interpreted.
    pub policy: OnDemandPolicy,
    /// Cellular networks are part of the rule.
    pub with_mobile_network: bool,
    /// Wired networks are part of the rule.
    pub with_ethernet_network: bool,
    /// Wi-Fi SSIDs and whether each one is part of the rule.
    pub with_ssids: BTreeMap<String, bool>,
}
