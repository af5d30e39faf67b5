use super::model_id::{EntityKind, IdSpace, ModelIdRange};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// the nine Bay Area counties plus the sentinel for anything outside of them.
/// declaration order is the model numbering order (San Francisco = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum County {
    #[serde(rename = "San Francisco")]
    SanFrancisco,
    #[serde(rename = "San Mateo")]
    SanMateo,
    #[serde(rename = "Santa Clara")]
    SantaClara,
    Alameda,
    #[serde(rename = "Contra Costa")]
    ContraCosta,
    Solano,
    Napa,
    Sonoma,
    Marin,
    External,
}

pub const NODE_RANGE_WIDTH: i64 = 500_000;
pub const LINK_RANGE_WIDTH: i64 = 1_000_000;
pub const EXTERNAL_NODE_FLOOR: i64 = 900_001;

impl County {
    pub const BAY_AREA: [County; 9] = [
        County::SanFrancisco,
        County::SanMateo,
        County::SantaClara,
        County::Alameda,
        County::ContraCosta,
        County::Solano,
        County::Napa,
        County::Sonoma,
        County::Marin,
    ];

    /// county number used by the model, 1 through 9, with 0 for External.
    pub fn number(&self) -> i64 {
        match self {
            County::External => 0,
            other => *other as i64 + 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            County::SanFrancisco => "San Francisco",
            County::SanMateo => "San Mateo",
            County::SantaClara => "Santa Clara",
            County::Alameda => "Alameda",
            County::ContraCosta => "Contra Costa",
            County::Solano => "Solano",
            County::Napa => "Napa",
            County::Sonoma => "Sonoma",
            County::Marin => "Marin",
            County::External => "External",
        }
    }

    /// the first id of this county's node range
    pub fn node_floor(&self) -> i64 {
        match self {
            County::External => EXTERNAL_NODE_FLOOR,
            other => 1_000_000 + (other.number() - 1) * NODE_RANGE_WIDTH,
        }
    }

    /// the first id of this county's link range
    pub fn link_floor(&self) -> i64 {
        self.number() * LINK_RANGE_WIDTH
    }

    /// full id range owned by this county for an entity kind. the External node
    /// range ends where San Francisco's begins.
    pub fn id_range(&self, kind: EntityKind) -> ModelIdRange {
        match (kind, self) {
            (EntityKind::Node, County::External) => {
                ModelIdRange::new(EXTERNAL_NODE_FLOOR, County::SanFrancisco.node_floor())
            }
            (EntityKind::Node, c) => {
                ModelIdRange::new(c.node_floor(), c.node_floor() + NODE_RANGE_WIDTH)
            }
            (EntityKind::Link, c) => {
                ModelIdRange::new(c.link_floor(), c.link_floor() + LINK_RANGE_WIDTH)
            }
        }
    }

    pub fn id_subrange(&self, kind: EntityKind, space: IdSpace) -> ModelIdRange {
        self.id_range(kind).subrange(space)
    }

    /// all counties, External last
    pub fn all() -> impl Iterator<Item = County> + Clone {
        County::BAY_AREA
            .into_iter()
            .chain(std::iter::once(County::External))
    }
}

impl Display for County {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for County {
    type Err = String;

    /// accepts "San Francisco", "san_francisco" or "SanFrancisco".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_name(s);
        County::all()
            .find(|c| normalize_name(c.name()) == key)
            .ok_or_else(|| format!("unknown county '{s}'"))
    }
}

/// the area covered by one run of the network builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Geography {
    BayArea,
    County(County),
}

impl Geography {
    pub fn counties(&self) -> Vec<County> {
        match self {
            Geography::BayArea => County::BAY_AREA.to_vec(),
            Geography::County(c) => vec![*c],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Geography::BayArea => "Bay Area",
            Geography::County(c) => c.name(),
        }
    }

    /// name used in output and cache file names
    pub fn name_no_spaces(&self) -> String {
        self.name().replace(' ', "")
    }
}

impl Display for Geography {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Geography {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize_name(s) == "bayarea" {
            return Ok(Geography::BayArea);
        }
        match County::from_str(s)? {
            County::External => Err(String::from(
                "'External' is a county sentinel, not a geography that can be built",
            )),
            county => Ok(Geography::County(county)),
        }
    }
}

fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
