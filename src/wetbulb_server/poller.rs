// wetbulb_server - Wet-bulb temperature logger and JSON API for Weather Underground
//
// Copyright 2026 The wetbulb_server Authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use crate::client::{ClientError, StationClient};
use crate::extract::{self, CurrentConditions};
use crate::metrics::StationMetrics;
use crate::store::{LogRecord, LogStore};
use crate::wetbulb;
use std::error;
use std::fmt;
use std::io;
use std::time::Duration;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug)]
pub enum PollError {
    Fetch(ClientError),
    Log(io::Error),
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "{}", e),
            Self::Log(e) => write!(f, "unable to append to log: {}", e),
        }
    }
}

impl error::Error for PollError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::Log(e) => Some(e),
        }
    }
}

/// Poll the station page at a fixed period forever, appending one log record
/// per fully parsed reading.
///
/// Iterations run sequentially: an iteration that overruns the period delays
/// the next tick, it never runs concurrently with it. Failures are counted
/// and logged, and the loop waits for its next tick; nothing here ends the
/// process.
pub async fn run(
    client: StationClient,
    station_url: String,
    store: LogStore,
    metrics: StationMetrics,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    tracing::info!(message = "station polling started", url = %station_url, period_secs = period.as_secs());

    loop {
        let _ = interval.tick().await;
        metrics.polls.inc();

        match poll_once(&client, &station_url, &store).await {
            Ok(Some(record)) => {
                metrics.records_appended.inc();
                metrics.temperature.set(record.temp);
                metrics.humidity.set(record.humidity);
                metrics.wet_bulb.set(record.wetbulb);
                tracing::info!(
                    message = "logged station reading",
                    time = %record.time,
                    temp = record.temp,
                    humidity = record.humidity,
                    wetbulb = record.wetbulb,
                );
            }
            Ok(None) => {
                tracing::warn!(message = "station page yielded an incomplete reading, nothing logged");
            }
            Err(e) => {
                metrics.poll_failures.inc();
                tracing::error!(message = "station poll failed", error = %e);
            }
        }
    }
}

/// One poll iteration: fetch, extract, derive, and append iff the reading
/// is complete.
async fn poll_once(
    client: &StationClient,
    station_url: &str,
    store: &LogStore,
) -> Result<Option<LogRecord>, PollError> {
    let html = client.fetch(station_url).await.map_err(PollError::Fetch)?;
    let conditions = extract::current(&html);
    let time = chrono::Local::now().format(TIME_FORMAT).to_string();

    let record = match complete_reading(&conditions, time) {
        Some(r) => r,
        None => return Ok(None),
    };

    store.append(&record).map_err(PollError::Log)?;
    Ok(Some(record))
}

/// Build a log record when, and only when, temperature, humidity, and the
/// wet-bulb derivation are all present.
fn complete_reading(conditions: &CurrentConditions, time: String) -> Option<LogRecord> {
    let temp = conditions.temperature?;
    let humidity = conditions.humidity?;
    let wetbulb = wetbulb::wet_bulb(temp, humidity)?;

    Some(LogRecord {
        time,
        temp,
        humidity,
        wetbulb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_reading() {
        let conditions = CurrentConditions {
            temperature: Some(25.0),
            humidity: Some(50.0),
        };
        let record = complete_reading(&conditions, "2026-08-07 10:00".to_string()).unwrap();
        assert_eq!(record.time, "2026-08-07 10:00");
        assert_eq!(record.temp, 25.0);
        assert_eq!(record.humidity, 50.0);
        assert!((record.wetbulb - 18.0).abs() < 0.05);
    }

    #[test]
    fn test_incomplete_readings_are_skipped() {
        let missing_humidity = CurrentConditions {
            temperature: Some(25.0),
            humidity: None,
        };
        assert!(complete_reading(&missing_humidity, String::new()).is_none());

        let missing_temperature = CurrentConditions {
            temperature: None,
            humidity: Some(50.0),
        };
        assert!(complete_reading(&missing_temperature, String::new()).is_none());

        // Wet-bulb out of domain, even with both fields present
        let out_of_domain = CurrentConditions {
            temperature: Some(25.0),
            humidity: Some(-20.0),
        };
        assert!(complete_reading(&out_of_domain, String::new()).is_none());
    }
}
