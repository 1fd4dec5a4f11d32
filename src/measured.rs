//! PWV measurements taken by the GPS receivers of the observing network
//!
//! Unlike the modeled time series of [`crate::series`], the measured table
//! keeps one column per receiver and may have missing readings.

use std::{collections::BTreeMap, io::Read, path::Path, time::Instant};

use chrono::{DateTime, Datelike, Utc};
use itertools::Itertools;

use crate::series::{read_table, DateFilter, SeriesError};

type Result<T> = std::result::Result<T, SeriesError>;

/// Measured PWV readings, one column of millimeter values per receiver ID,
/// all sharing the date axis
#[derive(Debug, Default, Clone)]
pub struct MeasuredPwv {
    pub date: Vec<DateTime<Utc>>,
    pub receivers: BTreeMap<String, Vec<Option<f64>>>,
}
impl MeasuredPwv {
    pub fn len(&self) -> usize {
        self.date.len()
    }
    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
    }
    pub fn receiver_ids(&self) -> impl Iterator<Item = &str> {
        self.receivers.keys().map(|id| id.as_str())
    }
    /// Returns the calendar years spanned by the measurements
    pub fn years(&self) -> Vec<i32> {
        self.date.iter().map(|date| date.year()).dedup().collect()
    }
    /// Returns the readings with dates matching `filter`
    pub fn filter(&self, filter: &DateFilter) -> Result<MeasuredPwv> {
        filter.validate()?;
        let rows: Vec<usize> = self
            .date
            .iter()
            .enumerate()
            .filter(|(_, date)| filter.matches(**date))
            .map(|(row, _)| row)
            .collect();
        Ok(MeasuredPwv {
            date: rows.iter().map(|&row| self.date[row]).collect(),
            receivers: self
                .receivers
                .iter()
                .map(|(id, readings)| {
                    (
                        id.clone(),
                        rows.iter().map(|&row| readings[row]).collect(),
                    )
                })
                .collect(),
        })
    }
    pub fn summary(&self) {
        let stats = |x: &[f64]| {
            let n = x.len() as f64;
            let mean = x.iter().sum::<f64>() / n;
            let std = (x.iter().map(|x| x - mean).fold(0f64, |s, x| s + x * x) / n).sqrt();
            (mean, std)
        };
        println!("SUMMARY:");
        println!(" - # of records: {}", self.len());
        if let (Some(first), Some(last)) = (self.date.first(), self.date.last()) {
            println!(" - date range: [{} - {}]", first, last);
        }
        println!(" - # of receivers: {}", self.receivers.len());
        println!("    {:^8}: ({:^8}, {:^8})  {:^8}", "RECEIVER", "MEAN", "STD", "# MISSING");
        self.receivers.iter().for_each(|(id, readings)| {
            let values: Vec<f64> = readings.iter().flatten().copied().collect();
            let missing = readings.len() - values.len();
            println!(
                "  - {:8}: {:>8.3?}  {:>8}",
                id,
                stats(&values),
                missing
            );
        });
    }
}

/// [`MeasuredPwv`] loader
///
/// Reads the measured PWV table `measured_pwv.csv`, plain or gzip compressed,
/// with a unix seconds `date` column followed by one millimeter reading
/// column per receiver ID; empty fields are missing readings.
pub struct MeasuredLoader {
    path: String,
}
impl Default for MeasuredLoader {
    fn default() -> Self {
        Self {
            path: String::from("measured_pwv.csv"),
        }
    }
}
impl MeasuredLoader {
    pub fn data_path<S: AsRef<Path>>(self, data_path: S) -> Self {
        let path = data_path.as_ref().join("measured_pwv.csv");
        Self {
            path: path.to_string_lossy().into_owned(),
        }
    }
    pub fn load(self) -> Result<MeasuredPwv> {
        let path = Path::new(&self.path);
        log::info!("Loading {:?}...", path);
        let now = Instant::now();
        let contents = read_table(path)?;
        let measured = self.parse(contents.as_bytes())?;
        log::info!("... loaded in {:}s", now.elapsed().as_secs());
        Ok(measured)
    }
    fn parse<R: Read>(&self, rdr: R) -> Result<MeasuredPwv> {
        let mut rdr = csv::Reader::from_reader(rdr);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.first().map(|h| h.as_str()) != Some("date") {
            return Err(SeriesError::Header);
        }
        let mut measured = MeasuredPwv::default();
        for id in headers.iter().skip(1) {
            measured.receivers.insert(id.clone(), vec![]);
        }
        for result in rdr.records() {
            let record = result?;
            let timestamp: i64 = record.get(0).unwrap_or_default().parse()?;
            let date = DateTime::from_timestamp(timestamp, 0)
                .ok_or(SeriesError::Timestamp(timestamp))?;
            measured.date.push(date);
            for (field, id) in record.iter().skip(1).zip(headers.iter().skip(1)) {
                let reading = match field.trim() {
                    "" => None,
                    value => Some(value.parse::<f64>()?),
                };
                if let Some(readings) = measured.receivers.get_mut(id) {
                    readings.push(reading);
                }
            }
        }
        Ok(measured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
date,AZAM,KITT
1277424900,4.7,5.1
1277426700,,5.3
1277428500,4.9,
";

    #[test]
    fn table_parsing() {
        let measured = MeasuredLoader::default().parse(TABLE.as_bytes()).unwrap();
        assert_eq!(measured.len(), 3);
        assert_eq!(
            measured.receiver_ids().collect::<Vec<_>>(),
            vec!["AZAM", "KITT"]
        );
        assert_eq!(
            measured.receivers["AZAM"],
            vec![Some(4.7), None, Some(4.9)]
        );
        assert_eq!(
            measured.receivers["KITT"],
            vec![Some(5.1), Some(5.3), None]
        );
    }
    #[test]
    fn missing_date_column() {
        let table = "time,AZAM\n1277424900,4.7\n";
        assert!(matches!(
            MeasuredLoader::default().parse(table.as_bytes()),
            Err(SeriesError::Header)
        ));
    }
    #[test]
    fn date_filtering() {
        let measured = MeasuredLoader::default().parse(TABLE.as_bytes()).unwrap();
        // 2010-06-25T00:15:00Z, 00:45:00Z and 01:15:00Z
        let filtered = measured
            .filter(&DateFilter {
                hour: Some(0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.receivers["AZAM"], vec![Some(4.7), None]);
    }
    #[test]
    fn years() {
        let measured = MeasuredLoader::default().parse(TABLE.as_bytes()).unwrap();
        assert_eq!(measured.years(), vec![2010]);
    }
}
