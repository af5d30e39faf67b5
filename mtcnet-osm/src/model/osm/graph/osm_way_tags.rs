use serde::{Deserialize, Serialize};

/// the subset of OSM way tags used to standardize roadway links.
///
/// `highway` is a list because OSM tagging may carry more than one class,
/// either as a `;` separated value or after parallel ways are combined.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsmWayTags {
    pub highway: Vec<String>,
    pub name: Option<String>,
    pub _ref: Option<String>,
    pub oneway: Option<String>,
    pub junction: Option<String>,
    pub service: Option<String>,
    pub area: Option<String>,
    pub access: Option<String>,
    pub foot: Option<String>,
    pub bicycle: Option<String>,
    pub hgv: Option<String>,
    pub bus: Option<String>,
    pub psv: Option<String>,
    pub motor_vehicle: Option<String>,
    pub lanes: Option<String>,
    pub lanes_forward: Option<String>,
    pub lanes_backward: Option<String>,
    pub lanes_both_ways: Option<String>,
    pub lanes_bus: Option<String>,
    pub lanes_bus_forward: Option<String>,
    pub lanes_bus_backward: Option<String>,
}

impl OsmWayTags {
    /// separator used by OSM for multi-valued tags
    pub const OSM_VALUE_SEPARATOR: char = ';';

    pub fn new<'a>(tags: impl Iterator<Item = (&'a str, &'a str)>) -> OsmWayTags {
        let mut out = OsmWayTags::default();
        for (k, v) in tags {
            let value = Some(String::from(v.trim()));
            match k {
                "highway" => {
                    out.highway = v
                        .split(Self::OSM_VALUE_SEPARATOR)
                        .map(|h| h.trim())
                        .filter(|h| !h.is_empty())
                        .map(String::from)
                        .collect()
                }
                "name" => out.name = value,
                "ref" => out._ref = value,
                "oneway" => out.oneway = value,
                "junction" => out.junction = value,
                "service" => out.service = value,
                "area" => out.area = value,
                "access" => out.access = value,
                "foot" => out.foot = value,
                "bicycle" => out.bicycle = value,
                "hgv" => out.hgv = value,
                "bus" => out.bus = value,
                "psv" => out.psv = value,
                "motor_vehicle" => out.motor_vehicle = value,
                "lanes" => out.lanes = value,
                "lanes:forward" => out.lanes_forward = value,
                "lanes:backward" => out.lanes_backward = value,
                "lanes:both_ways" => out.lanes_both_ways = value,
                "lanes:bus" => out.lanes_bus = value,
                "lanes:bus:forward" => out.lanes_bus_forward = value,
                "lanes:bus:backward" => out.lanes_bus_backward = value,
                _ => {}
            }
        }
        out
    }

    /// builds tags from OSM key/value pairs, used when edges are assembled by hand.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> OsmWayTags {
        OsmWayTags::new(pairs.iter().copied())
    }

    pub fn get_string_at_field(&self, fieldname: &str) -> Result<Option<String>, String> {
        match fieldname {
            "highway" if self.highway.is_empty() => Ok(None),
            "highway" => Ok(Some(self.highway_text())),
            "name" => Ok(self.name.clone()),
            "ref" => Ok(self._ref.clone()),
            "oneway" => Ok(self.oneway.clone()),
            "junction" => Ok(self.junction.clone()),
            "service" => Ok(self.service.clone()),
            "area" => Ok(self.area.clone()),
            "access" => Ok(self.access.clone()),
            "foot" => Ok(self.foot.clone()),
            "bicycle" => Ok(self.bicycle.clone()),
            "hgv" => Ok(self.hgv.clone()),
            "bus" => Ok(self.bus.clone()),
            "psv" => Ok(self.psv.clone()),
            "motor_vehicle" => Ok(self.motor_vehicle.clone()),
            "lanes" => Ok(self.lanes.clone()),
            "lanes:forward" => Ok(self.lanes_forward.clone()),
            "lanes:backward" => Ok(self.lanes_backward.clone()),
            "lanes:both_ways" => Ok(self.lanes_both_ways.clone()),
            "lanes:bus" => Ok(self.lanes_bus.clone()),
            "lanes:bus:forward" => Ok(self.lanes_bus_forward.clone()),
            "lanes:bus:backward" => Ok(self.lanes_bus_backward.clone()),
            _ => Err(format!("unknown way tag {fieldname}")),
        }
    }

    /// the highway values as written in OSM
    pub fn highway_text(&self) -> String {
        self.highway.join(";")
    }

    /// true when the way has a non-empty name
    pub fn is_named(&self) -> bool {
        self.name.as_ref().is_some_and(|n| !n.trim().is_empty())
    }

    /// osmnx.graph._is_path_one_way
    ///   the values OSM uses in its 'oneway' tag to denote True, and to denote
    ///   travel can only occur in the opposite direction of the node order. see:
    ///   https://wiki.openstreetmap.org/wiki/Key:oneway
    ///     ```python
    ///     oneway_values = {"yes", "true", "1", "-1", "reverse", "T", "F"}
    ///     reversed_values = {"-1", "reverse", "T"}
    ///     ```
    pub fn is_one_way(&self) -> bool {
        if let Some(oneway) = &self.oneway {
            matches!(
                oneway.as_str().trim(),
                "yes" | "true" | "1" | "-1" | "reverse" | "T" | "F"
            )
        } else if let Some(junction) = &self.junction {
            // roundabouts are one-way but are not explicitly tagged as such
            junction.as_str().trim() == "roundabout"
        } else {
            false
        }
    }

    /// osmnx.graph._is_path_reversed
    pub fn is_reverse(&self) -> bool {
        match &self.oneway {
            Some(oneway) => matches!(oneway.as_str().trim(), "-1" | "reverse" | "T"),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OsmWayTags;

    #[test]
    fn test_multi_valued_highway() {
        let tags = OsmWayTags::from_pairs(&[("highway", "motorway; motorway_link")]);
        assert_eq!(tags.highway, vec!["motorway", "motorway_link"]);
        assert_eq!(tags.highway_text(), "motorway;motorway_link");
    }

    #[test]
    fn test_oneway_rules() {
        let yes = OsmWayTags::from_pairs(&[("oneway", "yes")]);
        assert!(yes.is_one_way() && !yes.is_reverse());
        let rev = OsmWayTags::from_pairs(&[("oneway", "-1")]);
        assert!(rev.is_one_way() && rev.is_reverse());
        let roundabout = OsmWayTags::from_pairs(&[("junction", "roundabout")]);
        assert!(roundabout.is_one_way());
        let two_way = OsmWayTags::from_pairs(&[("oneway", "no")]);
        assert!(!two_way.is_one_way());
    }

    #[test]
    fn test_lane_keys() {
        let tags = OsmWayTags::from_pairs(&[("lanes:bus:forward", "1"), ("lanes", " 3 ")]);
        assert_eq!(tags.lanes_bus_forward.as_deref(), Some("1"));
        match tags.get_string_at_field("lanes") {
            Ok(Some(v)) => assert_eq!(v, "3"),
            Ok(None) => panic!("lanes should be present"),
            Err(e) => panic!("{e}"),
        }
        assert!(tags.get_string_at_field("maxspeed").is_err());
    }
}
