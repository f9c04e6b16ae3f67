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

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

const HEADER: &str = "time,temp,humidity,wetbulb";

/// One logged reading: local time truncated to the minute, temperature,
/// relative humidity, and the derived wet-bulb estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub time: String,
    pub temp: f64,
    pub humidity: f64,
    pub wetbulb: f64,
}

/// Append-only CSV log of poll readings.
///
/// Every operation opens the backing file and closes the handle again before
/// returning, on every exit path. Appends are written as a single buffered write
/// on an append-mode handle, so rows from the poller and request handlers
/// interleave without tearing and no lock is needed.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        LogStore { path: path.into() }
    }

    /// Create the log file with its header row iff it does not already exist.
    ///
    /// An existing file is left untouched, whatever its contents.
    pub fn init(&self) -> io::Result<()> {
        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(mut file) => {
                file.write_all(format!("{}\n", HEADER).as_bytes())?;
                file.flush()
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Append one record in fixed field order.
    pub fn append(&self, record: &LogRecord) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        let row = format!(
            "{},{},{},{}\n",
            record.time, record.temp, record.humidity, record.wetbulb
        );
        file.write_all(row.as_bytes())?;
        file.flush()
    }

    /// Read every valid record, in file order.
    ///
    /// The header row and any row with the wrong field count or a non-numeric
    /// numeric field are skipped without error.
    pub fn read_all(&self) -> io::Result<Vec<LogRecord>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 4 || fields[0] == "time" {
                continue;
            }
            let (Ok(temp), Ok(humidity), Ok(wetbulb)) = (
                fields[1].parse::<f64>(),
                fields[2].parse::<f64>(),
                fields[3].parse::<f64>(),
            ) else {
                continue;
            };
            records.push(LogRecord {
                time: fields[0].to_string(),
                temp,
                humidity,
                wetbulb,
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;

    fn store_in(dir: &tempfile::TempDir) -> LogStore {
        LogStore::new(dir.path().join("wetbulb.csv"))
    }

    fn record(time: &str) -> LogRecord {
        LogRecord {
            time: time.to_string(),
            temp: 71.3,
            humidity: 54.0,
            wetbulb: 17.23,
        }
    }

    #[test]
    fn test_init_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.init().unwrap();
        store.append(&record("2026-08-07 10:00")).unwrap();
        // Second init on an existing file must not truncate
        store.init().unwrap();

        let contents = fs::read_to_string(dir.path().join("wetbulb.csv")).unwrap();
        assert!(contents.starts_with("time,temp,humidity,wetbulb\n"));
        assert_eq!(store.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_append_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.init().unwrap();

        let rec = LogRecord {
            time: "2026-08-07 10:10".to_string(),
            temp: 71.3,
            humidity: 54.0,
            wetbulb: 17.23,
        };
        store.append(&rec).unwrap();

        assert_eq!(store.read_all().unwrap(), vec![rec]);
    }

    #[test]
    fn test_read_skips_header_and_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wetbulb.csv");
        fs::write(
            &path,
            "time,temp,humidity,wetbulb\n\
             2026-08-07 10:00,71.3,54,17.23\n\
             2026-08-07 10:10,seventy,54,17.23\n\
             2026-08-07 10:20,71.3,54\n\
             2026-08-07 10:30,70.9,55,17.31\n",
        )
        .unwrap();

        let records = LogStore::new(path).read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].time, "2026-08-07 10:00");
        assert_eq!(records[1].time, "2026-08-07 10:30");
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).read_all().is_err());
    }

    #[test]
    fn test_concurrent_appends_do_not_tear() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.init().unwrap();

        // Simulates a poll-time append racing request-time appends
        let writers: Vec<_> = (0..2)
            .map(|w| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        store.append(&record(&format!("2026-08-07 {}:{:02}", w, i))).unwrap();
                    }
                })
            })
            .collect();
        for handle in writers {
            handle.join().unwrap();
        }

        let records = store.read_all().unwrap();
        assert_eq!(records.len(), 100);
        for rec in records {
            assert_eq!(rec.temp, 71.3);
            assert_eq!(rec.humidity, 54.0);
            assert_eq!(rec.wetbulb, 17.23);
        }
    }
}
