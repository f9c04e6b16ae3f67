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

use clap::Parser;
use prometheus_client::registry::Registry;
use reqwest::Client;
use std::error::Error;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{self, SignalKind};
use tracing::Level;
use wetbulb_server::client::StationClient;
use wetbulb_server::http::RequestContext;
use wetbulb_server::metrics::StationMetrics;
use wetbulb_server::poller;
use wetbulb_server::store::LogStore;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_POLL_SECS: u64 = 600;
const DEFAULT_TIMEOUT_MILLIS: u64 = 5000;
const DEFAULT_STATION_URL: &str = "https://www.wunderground.com/dashboard/pws/KMALOWEL100";
const DEFAULT_LOG_FILE: &str = "wetbulb.csv";

#[derive(Debug, Parser)]
#[clap(name = "wetbulb_server", version = clap::crate_version!())]
struct WetbulbServerApplication {
    /// Weather Underground PWS dashboard page to poll for readings
    #[clap(long, default_value_t = DEFAULT_STATION_URL.into())]
    station_url: String,

    /// Path of the CSV file readings are appended to
    #[clap(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: Level,

    /// Poll the station page and append a reading at this interval, in seconds.
    #[clap(long, default_value_t = DEFAULT_POLL_SECS)]
    poll_secs: u64,

    /// Timeout for fetching station pages, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    timeout_millis: u64,

    /// Address to bind to. By default, wetbulb_server binds a public address
    /// so dashboards on other hosts can query the JSON API.
    #[clap(long, default_value_t = DEFAULT_BIND_ADDR.into())]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let opts = WetbulbServerApplication::parse();
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(opts.log_level)
            .finish(),
    )
    .expect("failed to set tracing subscriber");

    let timeout = Duration::from_millis(opts.timeout_millis);
    let http_client = Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        tracing::error!(message = "unable to initialize HTTP client", error = %e);
        process::exit(1)
    });
    let client = StationClient::new(http_client);

    let store = LogStore::new(&opts.log_file);
    if let Err(e) = store.init() {
        tracing::error!(message = "unable to create log file", path = %opts.log_file.display(), error = %e);
        process::exit(1)
    }

    // Make an initial request for the station page. The scrape tolerates any
    // page shape, so an unreachable or misconfigured URL only warns here; the
    // poller will keep retrying on its own schedule.
    match client.fetch(&opts.station_url).await {
        Err(e) => {
            tracing::warn!(message = "failed to fetch initial station page", error = %e);
        }
        Ok(_) => {
            tracing::debug!(message = "verified station page is reachable", url = %opts.station_url);
        }
    }

    let mut registry = Registry::with_prefix("wetbulb");
    let metrics = StationMetrics::new(&mut registry);

    tokio::spawn(poller::run(
        client.clone(),
        opts.station_url.clone(),
        store.clone(),
        metrics,
        Duration::from_secs(opts.poll_secs),
    ));

    let context = Arc::new(RequestContext::new(client, store, registry));
    let app = wetbulb_server::http::router(context);
    let server = axum::Server::try_bind(&opts.bind).unwrap_or_else(|e| {
        tracing::error!(message = "error binding to address", address = %opts.bind, error = %e);
        process::exit(1)
    });

    tracing::info!(message = "server started", address = %opts.bind);
    server
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            // Wait for either SIGTERM or SIGINT to shutdown
            tokio::select! {
                _ = sigterm() => {}
                _ = sigint() => {}
            }
        })
        .await?;

    tracing::info!("server shutdown");
    Ok(())
}

/// Return after the first SIGTERM signal received by this process
async fn sigterm() -> io::Result<()> {
    unix::signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

/// Return after the first SIGINT signal received by this process
async fn sigint() -> io::Result<()> {
    unix::signal(SignalKind::interrupt())?.recv().await;
    Ok(())
}
