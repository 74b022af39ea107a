use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

/// Per-channel range summary used to build scales.
///
/// `positive_min` is the smallest strictly positive observed value. A
/// logarithmic axis cannot show zero or negative values, so it uses this as
/// its floor instead of `min`. It is `None` when the channel never goes above
/// zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub min: f64,
    pub max: f64,
    pub positive_min: Option<f64>,
}

impl ChannelStatistics {
    /// Statistics of a channel with no (finite) values
    pub const EMPTY: Self = Self {
        min: 0.0,
        max: 0.0,
        positive_min: None,
    };

    /// Summarize a channel's values. Non-finite values are ignored.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();

        let (min, max) = match finite.iter().copied().minmax() {
            MinMaxResult::NoElements => return Self::EMPTY,
            MinMaxResult::OneElement(value) => (value, value),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

        let positive_min = finite
            .iter()
            .copied()
            .filter(|&v| v > 0.0)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.min(v))));

        Self {
            min,
            max,
            positive_min,
        }
    }

    /// Whether the channel can be drawn on a logarithmic axis
    pub fn supports_log_scale(&self) -> bool {
        self.positive_min.is_some_and(|floor| floor < self.max)
    }
}
