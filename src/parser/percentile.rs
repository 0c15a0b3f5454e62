use serde::{
    self,
    de::{Error, Unexpected, Visitor},
    Deserialize, Deserializer,
};
use std::fmt;

/// A percentile, stored as a fraction of one.
/// Can only be built from a value in `[0, 100]`, so `fraction()` is always in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentile(f64);

impl Percentile {
    /// `percent` must be a finite number in `[0, 100]`
    pub fn from_percent(percent: f64) -> Option<Self> {
        if (0.0..=100.0).contains(&percent) {
            Some(Percentile(percent / 100.0))
        } else {
            None
        }
    }

    pub fn fraction(&self) -> f64 {
        self.0
    }

    /// Nearest-rank ordinal (1-indexed) for a sorted collection of `count` values.
    /// `ceil(count * fraction)`, never below 1 and never above `count`.
    pub fn ordinal_rank(&self, count: usize) -> usize {
        let rank = (count as f64 * self.0).ceil() as usize;
        rank.max(1).min(count.max(1))
    }
}

/// The single row of a percentile file.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PercentileRow {
    #[serde(deserialize_with = "deserialize_percentile")]
    pub percentile: Percentile,
}

pub fn deserialize_percentile<'de, D>(deserializer: D) -> Result<Percentile, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(PercentileVisitor)
}

struct PercentileVisitor;
impl<'de> Visitor<'de> for PercentileVisitor {
    type Value = Percentile;
    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number between 0 and 100")
    }
    fn visit_str<E>(self, value: &str) -> Result<Percentile, E>
    where
        E: Error,
    {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Percentile::from_percent)
            .ok_or_else(|| E::invalid_value(Unexpected::Str(value), &self))
    }
}
