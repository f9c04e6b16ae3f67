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

use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::atomic::AtomicU64;

/// Holder for metrics updated by the background poller.
///
/// All metrics are created and registered upon call to `StationMetrics::new()`
/// and share the registry's `wetbulb` prefix. Counters track poll outcomes and
/// appended records; gauges carry the most recent reading and are only set
/// after a fully parsed poll.
#[derive(Debug, Default, Clone)]
pub struct StationMetrics {
    pub polls: Counter,
    pub poll_failures: Counter,
    pub records_appended: Counter,
    pub temperature: Gauge<f64, AtomicU64>,
    pub humidity: Gauge<f64, AtomicU64>,
    pub wet_bulb: Gauge<f64, AtomicU64>,
}

impl StationMetrics {
    /// Create a new `StationMetrics` and register each metric with the provided `Registry`.
    pub fn new(registry: &mut Registry) -> Self {
        let metrics = StationMetrics::default();

        registry.register(
            "polls",
            "Station page polls attempted",
            metrics.polls.clone(),
        );
        registry.register(
            "poll_failures",
            "Station page polls that failed to fetch or log",
            metrics.poll_failures.clone(),
        );
        registry.register(
            "records_appended",
            "Readings appended to the CSV log",
            metrics.records_appended.clone(),
        );
        registry.register(
            "temperature_degrees",
            "Last scraped temperature",
            metrics.temperature.clone(),
        );
        registry.register(
            "relative_humidity",
            "Last scraped relative humidity (0-100)",
            metrics.humidity.clone(),
        );
        registry.register(
            "wet_bulb_degrees",
            "Last derived wet-bulb temperature",
            metrics.wet_bulb.clone(),
        );

        metrics
    }
}
