//! Temporal coverage checks of the PWV time series

use chrono::{DateTime, Utc};

use crate::series::PwvTimeSeries;

/// Longest span of missing PWV data a query date may fall within: 3 days
///
/// PWV is assumed to vary slowly with respect to this span.
pub const MAX_GAP_SECONDS: i64 = 259_200;

#[derive(thiserror::Error, Debug)]
pub enum CoverageError {
    #[error("no PWV data for {requested}, the modeled PWV spans {earliest} to {latest}")]
    OutOfRange {
        requested: DateTime<Utc>,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    },
    #[error(
        "{requested} falls within an interval of missing PWV data larger than 3 days ({gap}s found)"
    )]
    GapTooLarge { requested: DateTime<Utc>, gap: i64 },
}

/// Checks that the PWV time series covers `date`
///
/// The date must lie within the series span and the distance to the nearest
/// sample at or before the date plus the distance to the nearest sample at or
/// after the date must not exceed [`MAX_GAP_SECONDS`]. The two one-sided
/// distances are summed so that a single nearby sample on one side only does
/// not pass the check.
pub fn validate(series: &PwvTimeSeries, date: DateTime<Utc>) -> Result<(), CoverageError> {
    match (series.at_or_before(date), series.at_or_after(date)) {
        (Some(before), Some(after)) => {
            let gap =
                (date - before.date).num_seconds() + (after.date - date).num_seconds();
            if gap > MAX_GAP_SECONDS {
                Err(CoverageError::GapTooLarge {
                    requested: date,
                    gap,
                })
            } else {
                Ok(())
            }
        }
        _ => Err(CoverageError::OutOfRange {
            requested: date,
            earliest: series.earliest().date,
            latest: series.latest().date,
        }),
    }
}
