use super::Highway;
use serde::{Deserialize, Serialize};

/// per-mode access permissions for a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModeAccess {
    pub drive: bool,
    pub walk: bool,
    pub bike: bool,
    pub bus: bool,
    pub truck: bool,
}

impl Default for ModeAccess {
    fn default() -> Self {
        Self {
            drive: true,
            walk: true,
            bike: true,
            bus: true,
            truck: true,
        }
    }
}

impl ModeAccess {
    /// access granted by a road class before any explicit OSM mode tags are applied.
    pub fn for_highway(highway: &Highway) -> ModeAccess {
        let mut access = ModeAccess::default();
        match highway {
            Highway::Motorway | Highway::MotorwayLink => {
                access.walk = false;
                access.bike = false;
            }
            Highway::Busway => {
                access.drive = false;
                access.truck = false;
                access.bike = false;
                access.walk = false;
            }
            Highway::Service => {
                access.truck = false;
            }
            Highway::Path => {
                access.drive = false;
                access.truck = false;
                access.bus = false;
            }
            Highway::Footway => {
                access.drive = false;
                access.truck = false;
                access.bus = false;
                access.bike = false;
            }
            Highway::Cycleway => {
                access.drive = false;
                access.truck = false;
                access.bus = false;
                access.walk = false;
            }
            _ => {}
        }
        access
    }

    /// walk-only access, used for stop access and egress links
    pub fn walk_only() -> ModeAccess {
        ModeAccess {
            drive: false,
            walk: true,
            bike: false,
            bus: false,
            truck: false,
        }
    }

    pub fn any(&self) -> bool {
        self.drive || self.walk || self.bike || self.bus || self.truck
    }
}

/// interprets an OSM mode access value such as `foot=yes` or `hgv=no`.
/// returns None when the value neither grants nor denies access.
///
/// see https://wiki.openstreetmap.org/wiki/Key:access
pub fn parse_access_value(value: &str) -> Option<bool> {
    match value.trim() {
        "yes" | "designated" | "permissive" | "destination" | "delivery" | "official" => {
            Some(true)
        }
        "no" | "private" => Some(false),
        _ => None,
    }
}
