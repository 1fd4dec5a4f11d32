//! Zenith PWV time series modeled from GPS meteorology measurements

use std::{
    fs::File,
    io::{BufReader, Read},
    ops::Deref,
    path::Path,
    time::Instant,
};

use chrono::{DateTime, Datelike, Timelike, Utc};
use flate2::read::GzDecoder;
use itertools::Itertools;
use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum SeriesError {
    #[error("Failed to open the PWV model table")]
    Io(#[from] std::io::Error),
    #[error("Failed to deserialize the CSV file")]
    Csv(#[from] csv::Error),
    #[error("Failed to parse a PWV reading")]
    Parse(#[from] std::num::ParseFloatError),
    #[error("Failed to parse a unix timestamp")]
    Date(#[from] std::num::ParseIntError),
    #[error("Missing the `date` column in the PWV table")]
    Header,
    #[error("Invalid unix timestamp: {0}s")]
    Timestamp(i64),
    #[error("Non-finite PWV reading at {0}")]
    Reading(DateTime<Utc>),
    #[error("The PWV model table is empty")]
    Empty,
    #[error("PWV samples out of ascending date order at {0}")]
    Unsorted(DateTime<Utc>),
    #[error("Invalid value for {name}: {value}")]
    Filter { name: &'static str, value: i64 },
}
type Result<T> = std::result::Result<T, SeriesError>;

/// A single modeled PWV value: the date of the measurement and the
/// millimeters of water vapor along a zenith pointing column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwvSample {
    pub date: DateTime<Utc>,
    pub pwv: f64,
}

/// Time series of zenith PWV samples, sorted by strictly ascending date
#[derive(Debug, Clone)]
pub struct PwvTimeSeries(Vec<PwvSample>);
impl Deref for PwvTimeSeries {
    type Target = Vec<PwvSample>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl PwvTimeSeries {
    /// Builds a time series, checking that the samples are finite and in
    /// strictly ascending date order
    pub fn new(samples: Vec<PwvSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(SeriesError::Empty);
        }
        if let Some(sample) = samples.iter().find(|s| !s.pwv.is_finite()) {
            return Err(SeriesError::Reading(sample.date));
        }
        if let Some((_, b)) = samples.iter().tuple_windows().find(|(a, b)| a.date >= b.date) {
            return Err(SeriesError::Unsorted(b.date));
        }
        Ok(Self(samples))
    }
    pub fn earliest(&self) -> &PwvSample {
        &self.0[0]
    }
    pub fn latest(&self) -> &PwvSample {
        &self.0[self.0.len() - 1]
    }
    /// Returns the last sample dated at or before `date`
    pub fn at_or_before(&self, date: DateTime<Utc>) -> Option<&PwvSample> {
        match self.0.partition_point(|s| s.date <= date) {
            0 => None,
            i => Some(&self.0[i - 1]),
        }
    }
    /// Returns the first sample dated at or after `date`
    pub fn at_or_after(&self, date: DateTime<Utc>) -> Option<&PwvSample> {
        self.0.get(self.0.partition_point(|s| s.date < date))
    }
    /// Returns the pair of consecutive samples bracketing `date`, `None` if
    /// `date` lies outside of the series span
    ///
    /// A date matching a sample exactly is bracketed by that sample alone.
    pub fn bracket(&self, date: DateTime<Utc>) -> Option<(&PwvSample, &PwvSample)> {
        match (self.at_or_before(date), self.at_or_after(date)) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }
    /// Returns the samples with dates matching `filter`
    pub fn filter(&self, filter: &DateFilter) -> Result<Vec<PwvSample>> {
        filter.validate()?;
        Ok(self
            .iter()
            .filter(|s| filter.matches(s.date))
            .cloned()
            .collect())
    }
    /// Returns the calendar years spanned by the series samples
    pub fn years(&self) -> Vec<i32> {
        self.iter().map(|s| s.date.year()).dedup().collect()
    }
}

/// Calendar predicate over sample dates
///
/// A `None` field matches any date.
#[derive(Debug, Default, Clone)]
pub struct DateFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
}
impl DateFilter {
    pub fn validate(&self) -> Result<()> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(SeriesError::Filter {
                    name: "month",
                    value: month as i64,
                });
            }
        }
        if let Some(day) = self.day {
            if !(1..=31).contains(&day) {
                return Err(SeriesError::Filter {
                    name: "day",
                    value: day as i64,
                });
            }
        }
        if let Some(hour) = self.hour {
            if hour > 23 {
                return Err(SeriesError::Filter {
                    name: "hour",
                    value: hour as i64,
                });
            }
        }
        Ok(())
    }
    pub fn matches(&self, date: DateTime<Utc>) -> bool {
        self.year.map_or(true, |year| date.year() == year)
            && self.month.map_or(true, |month| date.month() == month)
            && self.day.map_or(true, |day| date.day() == day)
            && self.hour.map_or(true, |hour| date.hour() == hour)
    }
}

#[derive(Deserialize)]
struct Record {
    date: i64,
    pwv: f64,
}

/// [`PwvTimeSeries`] loader
///
/// Reads the modeled PWV table `modeled_pwv.csv`, plain or gzip compressed,
/// with a unix seconds `date` column and a millimeters `pwv` column.
pub struct SeriesLoader {
    path: String,
    date_range: (Option<DateTime<Utc>>, Option<DateTime<Utc>>),
}
impl Default for SeriesLoader {
    fn default() -> Self {
        Self {
            path: String::from("modeled_pwv.csv"),
            date_range: (None, None),
        }
    }
}
impl SeriesLoader {
    pub fn data_path<S: AsRef<Path>>(self, data_path: S) -> Self {
        let path = data_path.as_ref().join("modeled_pwv.csv");
        Self {
            path: path.to_string_lossy().into_owned(),
            ..self
        }
    }
    pub fn start_date(self, date: DateTime<Utc>) -> Self {
        Self {
            date_range: (Some(date), self.date_range.1),
            ..self
        }
    }
    pub fn end_date(self, date: DateTime<Utc>) -> Self {
        Self {
            date_range: (self.date_range.0, Some(date)),
            ..self
        }
    }
    pub fn load(self) -> Result<PwvTimeSeries> {
        let path = Path::new(&self.path);
        log::info!("Loading {:?}...", path);
        let now = Instant::now();
        let contents = read_table(path)?;
        let series = self.parse(contents.as_bytes())?;
        log::info!("... loaded in {:}s", now.elapsed().as_secs());
        Ok(series)
    }
    fn parse<R: Read>(&self, rdr: R) -> Result<PwvTimeSeries> {
        let mut rdr = csv::Reader::from_reader(rdr);
        let mut samples = vec![];
        for result in rdr.deserialize() {
            let record: Record = result?;
            let date = DateTime::from_timestamp(record.date, 0)
                .ok_or(SeriesError::Timestamp(record.date))?;
            if self.date_range.0.map_or(false, |start| date < start)
                || self.date_range.1.map_or(false, |end| date > end)
            {
                continue;
            }
            samples.push(PwvSample {
                date,
                pwv: record.pwv,
            });
        }
        PwvTimeSeries::new(samples)
    }
}

// Reads a CSV table, falling back on a gzip compressed version of the file
pub(crate) fn read_table(path: &Path) -> std::io::Result<String> {
    let mut contents = String::new();
    if path.extension().map_or(false, |ext| ext == "gz") {
        let file = File::open(path)?;
        GzDecoder::new(BufReader::new(file)).read_to_string(&mut contents)?;
    } else if path.is_file() {
        File::open(path)?.read_to_string(&mut contents)?;
    } else {
        let gz_file = File::open(gz_path(path))?;
        GzDecoder::new(BufReader::new(gz_file)).read_to_string(&mut contents)?;
    }
    Ok(contents)
}
pub(crate) fn gz_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    name.into()
}
