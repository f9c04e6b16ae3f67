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

//! Wet-bulb temperature logger and JSON API for Weather Underground PWS dashboards
//!
//! ## Features
//!
//! `wetbulb_server` polls a [Weather Underground] personal-weather-station dashboard
//! for the current temperature and relative humidity. Each complete reading gets a
//! wet-bulb estimate via Stull's 2011 empirical approximation and is appended to a
//! local CSV log, once per poll interval (600 seconds by default). The same data is
//! served over HTTP:
//!
//! * `GET /get_temperature_history?link=<url>` - Time-series of `{time, temperature}`
//!   pairs scraped from the history table of the given dashboard page.
//! * `GET /get_current_weather?link=<url>` - Current `{temperature, humidity, wet_bulb}`
//!   snapshot scraped from the given dashboard page. Fields the page doesn't expose
//!   are `null`.
//! * `GET /get_logged_data` - Every `{time, temp, humidity, wetbulb}` record appended
//!   to the CSV log so far, in file order.
//! * `GET /metrics` - Poll and append counters plus last-reading gauges in
//!   OpenMetrics text format.
//!
//! [Weather Underground]: https://www.wunderground.com/
//!
//! ## Build
//!
//! `wetbulb_server` is a Rust program and must be built from source using a
//! [Rust toolchain](https://rustup.rs/).
//!
//! ```text
//! git clone git@github.com:wetbulb/wetbulb_server.git && cd wetbulb_server
//! cargo build --release
//! ```
//!
//! ## Usage
//!
//! Point the server at the dashboard page of a station near you and let it run.
//!
//! ```text
//! ./wetbulb_server --station-url https://www.wunderground.com/dashboard/pws/KMALOWEL100
//! ```
//!
//! The JSON API is exposed on port `8080` on all interfaces by default. The CSV log
//! (`wetbulb.csv` by default, header `time,temp,humidity,wetbulb`) is created on first
//! start and only ever appended to afterwards; readings where the page didn't yield
//! both temperature and humidity are skipped, not logged partially.

pub mod client;
pub mod extract;
pub mod http;
pub mod metrics;
pub mod poller;
pub mod store;
pub mod wetbulb;
