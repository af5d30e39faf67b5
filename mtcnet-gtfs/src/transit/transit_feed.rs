use chrono::NaiveDate;
use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedStop {
    pub stop_id: String,
    pub x: f64,
    pub y: f64,
}

impl FeedStop {
    pub fn get_point(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedRoute {
    pub route_id: String,
    pub agency_id: Option<String>,
    pub route_type: String,
}

/// a trip running on the service date, reduced to the stops kept by filtering.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FeedTrip {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
    pub direction_id: Option<u8>,
    /// seconds past midnight of the first kept stop time
    pub first_departure: u32,
    /// stop ids in stop_sequence order
    pub stop_ids: Vec<String>,
}

/// the filtered feed used for frequencies and stitching.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransitFeed {
    pub service_date: NaiveDate,
    pub stops: Vec<FeedStop>,
    pub routes: Vec<FeedRoute>,
    pub trips: Vec<FeedTrip>,
}
