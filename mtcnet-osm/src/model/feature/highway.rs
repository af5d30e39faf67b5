use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// the closed taxonomy of road classes written to the model network.
///
/// variants are declared in priority order, from the highest road class to the
/// lowest, followed by the non-motorized classes. the derived [`Ord`] follows
/// this declaration, so `a < b` means `a` outranks `b` when two tags compete
/// for the same link. never compare the string forms of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highway {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Busway,
    Unclassified,
    Residential,
    LivingStreet,
    Service,
    Track,
    Path,
    Footway,
    Cycleway,
}

impl Highway {
    /// class assigned to tags that are not part of the taxonomy
    pub const DEFAULT: Highway = Highway::Unclassified;

    pub const ALL: [Highway; 19] = [
        Highway::Motorway,
        Highway::MotorwayLink,
        Highway::Trunk,
        Highway::TrunkLink,
        Highway::Primary,
        Highway::PrimaryLink,
        Highway::Secondary,
        Highway::SecondaryLink,
        Highway::Tertiary,
        Highway::TertiaryLink,
        Highway::Busway,
        Highway::Unclassified,
        Highway::Residential,
        Highway::LivingStreet,
        Highway::Service,
        Highway::Track,
        Highway::Path,
        Highway::Footway,
        Highway::Cycleway,
    ];

    /// rank of this class, where 0 is the highest priority.
    pub fn priority(&self) -> usize {
        *self as usize
    }

    /// true for classes that carry general motorized traffic lanes.
    pub fn is_motorized(&self) -> bool {
        !matches!(self, Highway::Path | Highway::Footway | Highway::Cycleway)
    }

    /// picks the highest-priority class from a collection, if any.
    pub fn top<'a>(highways: impl IntoIterator<Item = &'a Highway>) -> Option<Highway> {
        highways.into_iter().min().copied()
    }
}

impl Display for Highway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Highway::Motorway => "motorway",
            Highway::MotorwayLink => "motorway_link",
            Highway::Trunk => "trunk",
            Highway::TrunkLink => "trunk_link",
            Highway::Primary => "primary",
            Highway::PrimaryLink => "primary_link",
            Highway::Secondary => "secondary",
            Highway::SecondaryLink => "secondary_link",
            Highway::Tertiary => "tertiary",
            Highway::TertiaryLink => "tertiary_link",
            Highway::Busway => "busway",
            Highway::Unclassified => "unclassified",
            Highway::Residential => "residential",
            Highway::LivingStreet => "living_street",
            Highway::Service => "service",
            Highway::Track => "track",
            Highway::Path => "path",
            Highway::Footway => "footway",
            Highway::Cycleway => "cycleway",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Highway {
    type Err = String;

    /// parses a canonical class name. raw OSM aliases such as `steps` or
    /// `pedestrian` are handled by the standardizer, not here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "motorway" => Ok(Highway::Motorway),
            "motorway_link" => Ok(Highway::MotorwayLink),
            "trunk" => Ok(Highway::Trunk),
            "trunk_link" => Ok(Highway::TrunkLink),
            "primary" => Ok(Highway::Primary),
            "primary_link" => Ok(Highway::PrimaryLink),
            "secondary" => Ok(Highway::Secondary),
            "secondary_link" => Ok(Highway::SecondaryLink),
            "tertiary" => Ok(Highway::Tertiary),
            "tertiary_link" => Ok(Highway::TertiaryLink),
            "busway" => Ok(Highway::Busway),
            "unclassified" => Ok(Highway::Unclassified),
            "residential" => Ok(Highway::Residential),
            "living_street" => Ok(Highway::LivingStreet),
            "service" => Ok(Highway::Service),
            "track" => Ok(Highway::Track),
            "path" => Ok(Highway::Path),
            "footway" => Ok(Highway::Footway),
            "cycleway" => Ok(Highway::Cycleway),
            other => Err(format!("unknown highway class '{other}'")),
        }
    }
}
