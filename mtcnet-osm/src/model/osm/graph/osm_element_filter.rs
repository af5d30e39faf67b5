use osmpbf::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// highway values of roads that are not open to traffic
const CLOSED_HIGHWAYS: [&str; 8] = [
    "abandoned",
    "construction",
    "no",
    "planned",
    "platform",
    "proposed",
    "raceway",
    "razed",
];

/// decides which OSM elements are read from a .pbf file. nodes always pass,
/// relations never do, and ways are judged by their tags.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ElementFilter {
    NoFilter,
    /// the OSMnx `all_public` network type
    #[default]
    OsmnxAllPublic,
    /// all_public, further restricted to ways with one of these raw highway values
    HighwayTags { tags: BTreeSet<String> },
}

impl ElementFilter {
    pub fn accept(&self, element: &Element) -> bool {
        match element {
            Element::Node(_) | Element::DenseNode(_) => true,
            Element::Relation(_) => false,
            Element::Way(way) => {
                let tags = way.tags().collect::<Vec<_>>();
                self.accept_way_tags(&tags)
            }
        }
    }

    /// applies the filter to the key/value tags of a way
    pub fn accept_way_tags(&self, tags: &[(&str, &str)]) -> bool {
        let get = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);
        match self {
            ElementFilter::NoFilter => true,
            ElementFilter::OsmnxAllPublic => all_public(get),
            ElementFilter::HighwayTags { tags: allowed } => {
                all_public(get)
                    && get("highway").is_some_and(|h| {
                        highway_values(h).any(|value| allowed.contains(value))
                    })
            }
        }
    }
}

/// `["highway"]["area"!~"yes"]["access"!~"private"]
/// ["highway"!~"abandoned|construction|no|planned|platform|proposed|raceway|razed"]
/// ["service"!~"private"]`
fn all_public<'a>(get: impl Fn(&str) -> Option<&'a str>) -> bool {
    let Some(highway) = get("highway") else {
        return false;
    };
    let rejection = if get("area") == Some("yes") {
        Some("area=yes")
    } else if get("access") == Some("private") {
        Some("access=private")
    } else if get("service") == Some("private") {
        Some("service=private")
    } else if highway_values(highway).any(|h| CLOSED_HIGHWAYS.contains(&h)) {
        Some("closed highway")
    } else {
        None
    };
    match rejection {
        Some(reason) => {
            log::debug!("rejecting way with highway={highway}: {reason}");
            false
        }
        None => true,
    }
}

/// the entries of a possibly semicolon-separated highway tag
fn highway_values(highway: &str) -> impl Iterator<Item = &str> {
    highway.split(';').map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::ElementFilter;
    use std::collections::BTreeSet;

    #[test]
    fn test_all_public() {
        let f = ElementFilter::OsmnxAllPublic;
        assert!(f.accept_way_tags(&[("highway", "residential")]));
        assert!(!f.accept_way_tags(&[("name", "Market Street")]));
        assert!(!f.accept_way_tags(&[("highway", "pedestrian"), ("area", "yes")]));
        assert!(!f.accept_way_tags(&[("highway", "service"), ("service", "private")]));
        assert!(!f.accept_way_tags(&[("highway", "primary"), ("access", "private")]));
        assert!(!f.accept_way_tags(&[("highway", "secondary;construction")]));
        assert!(f.accept_way_tags(&[("highway", "service"), ("service", "driveway")]));
    }

    #[test]
    fn test_highway_tags() {
        let f = ElementFilter::HighwayTags {
            tags: BTreeSet::from([String::from("motorway"), String::from("motorway_link")]),
        };
        assert!(f.accept_way_tags(&[("highway", "motorway_link")]));
        assert!(f.accept_way_tags(&[("highway", "trunk; motorway")]));
        assert!(!f.accept_way_tags(&[("highway", "residential")]));
        assert!(ElementFilter::NoFilter.accept_way_tags(&[("building", "yes")]));
    }
}
