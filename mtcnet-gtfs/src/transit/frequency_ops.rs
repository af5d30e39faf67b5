use super::{FeedTrip, FrequencyMethod, TimePeriods};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// trips and headway of one route direction within one time period.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RouteFrequency {
    pub route_id: String,
    pub direction_id: Option<u8>,
    pub time_period: String,
    pub trips: usize,
    pub headway_secs: f64,
}

/// groups trips by route, direction and the time period of their first
/// departure and computes a headway for each group.
///
/// a group with a single trip receives the default one-time headway. otherwise
/// the median headway takes the median gap between consecutive departures and
/// the uniform headway divides the period duration by the trip count.
pub fn compute_frequencies(
    trips: &[FeedTrip],
    periods: &TimePeriods,
    method: &FrequencyMethod,
    default_onetime_minutes: u32,
) -> Vec<RouteFrequency> {
    let mut groups: BTreeMap<(String, Option<u8>, usize), Vec<u32>> = BTreeMap::new();
    for trip in trips {
        let Some(period) = periods.period_of(trip.first_departure) else {
            log::warn!(
                "trip {} departs at {}s which is in no time period",
                trip.trip_id,
                trip.first_departure
            );
            continue;
        };
        let position = periods.position(&period.name).unwrap_or_default();
        groups
            .entry((trip.route_id.clone(), trip.direction_id, position))
            .or_default()
            .push(period.offset_secs(trip.first_departure));
    }

    groups
        .into_iter()
        .filter_map(|((route_id, direction_id, position), mut departures)| {
            let period = periods.0.get(position)?;
            departures.sort_unstable();
            let headway_secs = match departures.len() {
                1 => f64::from(default_onetime_minutes) * 60.0,
                n => match method {
                    FrequencyMethod::MedianHeadway => median_gap(&departures),
                    FrequencyMethod::Uniform => f64::from(period.duration_secs()) / n as f64,
                },
            };
            Some(RouteFrequency {
                route_id,
                direction_id,
                time_period: period.name.clone(),
                trips: departures.len(),
                headway_secs,
            })
        })
        .collect()
}

/// median of the gaps between sorted departures. an even number of gaps
/// takes the mean of the middle two.
fn median_gap(sorted_departures: &[u32]) -> f64 {
    let mut gaps = sorted_departures
        .windows(2)
        .map(|w| f64::from(w[1] - w[0]))
        .collect::<Vec<_>>();
    gaps.sort_by(|a, b| a.total_cmp(b));
    let mid = gaps.len() / 2;
    match gaps.len() {
        0 => 0.0,
        n if n % 2 == 1 => gaps[mid],
        _ => (gaps[mid - 1] + gaps[mid]) / 2.0,
    }
}
