//! Road classification

use serde::{Deserialize, Serialize};

use crate::core::config::RoutingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighwayClass {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    Residential,
    Unclassified,
    Service,
}

impl HighwayClass {
    /// Roads that can be damaged by impacts
    pub fn is_major(&self) -> bool {
        matches!(
            self,
            Self::Motorway
                | Self::MotorwayLink
                | Self::Trunk
                | Self::TrunkLink
                | Self::Primary
                | Self::PrimaryLink
                | Self::Secondary
                | Self::SecondaryLink
        )
    }

    /// Travel speed in km/h
    ///
    /// Only motorway, trunk and primary get the fast speed; their link roads
    /// do not.
    pub fn speed_kmh(&self, routing: &RoutingConfig) -> f64 {
        match self {
            Self::Motorway | Self::Trunk | Self::Primary => routing.major_speed_kmh,
            _ => routing.minor_speed_kmh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Motorway => "motorway",
            Self::MotorwayLink => "motorway_link",
            Self::Trunk => "trunk",
            Self::TrunkLink => "trunk_link",
            Self::Primary => "primary",
            Self::PrimaryLink => "primary_link",
            Self::Secondary => "secondary",
            Self::SecondaryLink => "secondary_link",
            Self::Tertiary => "tertiary",
            Self::Residential => "residential",
            Self::Unclassified => "unclassified",
            Self::Service => "service",
        }
    }
}

impl std::fmt::Display for HighwayClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_classes() {
        assert!(HighwayClass::Motorway.is_major());
        assert!(HighwayClass::SecondaryLink.is_major());
        assert!(!HighwayClass::Tertiary.is_major());
        assert!(!HighwayClass::Residential.is_major());
        assert!(!HighwayClass::Service.is_major());
    }

    #[test]
    fn test_speeds() {
        let routing = RoutingConfig::default();
        assert_eq!(HighwayClass::Motorway.speed_kmh(&routing), 80.0);
        assert_eq!(HighwayClass::Primary.speed_kmh(&routing), 80.0);
        assert_eq!(HighwayClass::PrimaryLink.speed_kmh(&routing), 60.0);
        assert_eq!(HighwayClass::Secondary.speed_kmh(&routing), 60.0);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&HighwayClass::MotorwayLink).unwrap();
        assert_eq!(json, "\"motorway_link\"");
        let parsed: HighwayClass = serde_json::from_str("\"trunk\"").unwrap();
        assert_eq!(parsed, HighwayClass::Trunk);
    }
}
