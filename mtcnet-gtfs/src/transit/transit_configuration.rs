use super::{FrequencyMethod, MissingStopLocationPolicy, TimePeriods};
use chrono::NaiveDate;
use mtcnet_osm::model::feature::{County, Geography};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// defines behaviors for filtering a GTFS feed and stitching it onto the roadway network
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct TransitConfiguration {
    /// the day of service represented by the network
    pub service_date: NaiveDate,
    pub time_periods: TimePeriods,
    pub frequency_method: FrequencyMethod,
    /// headway for a route with one trip in a period
    pub default_onetime_headway_minutes: u32,
    /// agencies kept for a single-county run. counties not listed keep all
    /// agencies except `drop_agencies`.
    pub county_agencies: BTreeMap<County, Vec<String>>,
    /// agencies removed from runs without a county agency list
    pub drop_agencies: Vec<String>,
    pub search_radius_feet: f64,
    pub colocation_tolerance_feet: f64,
    pub max_access_links: usize,
    pub missing_stop_location_policy: MissingStopLocationPolicy,
}

impl Default for TransitConfiguration {
    fn default() -> Self {
        let agencies = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            service_date: NaiveDate::from_ymd_opt(2023, 9, 27).unwrap_or(NaiveDate::MIN),
            time_periods: TimePeriods::default(),
            frequency_method: FrequencyMethod::default(),
            default_onetime_headway_minutes: 180,
            county_agencies: BTreeMap::from([
                (County::SanFrancisco, agencies(&["SF", "BA", "CT"])),
                (County::SanMateo, agencies(&["SM", "BA", "CT"])),
            ]),
            drop_agencies: agencies(&["SI"]),
            search_radius_feet: 200.0,
            colocation_tolerance_feet: 5.0,
            max_access_links: 1,
            missing_stop_location_policy: MissingStopLocationPolicy::default(),
        }
    }
}

impl TransitConfiguration {
    /// whether trips of an agency belong in the feed of a geography
    pub fn agency_allowed(&self, geography: &Geography, agency_id: Option<&str>) -> bool {
        let keep_list = match geography {
            Geography::County(c) => self.county_agencies.get(c),
            Geography::BayArea => None,
        };
        match (keep_list, agency_id) {
            (Some(keep), Some(id)) => keep.iter().any(|a| a == id),
            (Some(_), None) => false,
            (None, Some(id)) => !self.drop_agencies.iter().any(|a| a == id),
            (None, None) => true,
        }
    }
}
