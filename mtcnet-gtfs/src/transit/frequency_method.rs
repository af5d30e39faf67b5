use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// how a period headway is derived from the departures within it
#[derive(Serialize, Deserialize, Debug, ValueEnum, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyMethod {
    /// median gap between consecutive departures
    #[default]
    MedianHeadway,
    /// period duration divided by the number of trips
    Uniform,
}
