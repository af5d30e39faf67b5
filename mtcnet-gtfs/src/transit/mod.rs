pub mod date_ops;
pub mod feed_filter;
mod frequency_method;
pub mod frequency_ops;
mod missing_stop_location_policy;
pub mod stop_matching;
mod time_period;
mod transit_configuration;
mod transit_error;
mod transit_feed;
pub mod transit_stitcher;
pub mod transit_writer;

pub use feed_filter::{filter_feed, read_feed};
pub use frequency_method::FrequencyMethod;
pub use frequency_ops::{compute_frequencies, RouteFrequency};
pub use missing_stop_location_policy::MissingStopLocationPolicy;
pub use time_period::{TimePeriod, TimePeriods, SECONDS_PER_DAY};
pub use transit_configuration::TransitConfiguration;
pub use transit_error::TransitError;
pub use transit_feed::{FeedRoute, FeedStop, FeedTrip, TransitFeed};
pub use transit_stitcher::{
    stitch, StitchResult, StopMatch, StopMatchKind, TransitLink, TransitNode, UnmatchedStop,
};
