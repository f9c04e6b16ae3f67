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

use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode, Url};
use std::error;
use std::fmt;

#[derive(Debug)]
pub enum ClientError {
    Internal(reqwest::Error),
    Unexpected(StatusCode, Url),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal(e) => write!(f, "{}", e),
            Self::Unexpected(status, url) => write!(f, "unexpected status {} for {}", status, url),
        }
    }
}

impl error::Error for ClientError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

/// HTTP client for fetching station dashboard pages.
///
/// The dashboard is rendered for browsers, so requests carry a browser-like
/// User-Agent. Used both by the poller (fixed station URL) and by the
/// `link`-parameterized API routes (caller-supplied URLs, fetched as given).
#[derive(Debug, Clone)]
pub struct StationClient {
    client: Client,
}

impl StationClient {
    const USER_AGENT: &'static str = "Mozilla/5.0";

    pub fn new(client: Client) -> Self {
        StationClient { client }
    }

    /// Fetch a page and return its raw HTML.
    pub async fn fetch(&self, url: &str) -> Result<String, ClientError> {
        tracing::debug!(message = "fetching station page", url = %url);

        let res = self
            .client
            .get(url)
            .header(USER_AGENT, Self::USER_AGENT)
            .send()
            .await
            .map_err(ClientError::Internal)?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(ClientError::Unexpected(status, res.url().clone()));
        }

        res.text().await.map_err(ClientError::Internal)
    }
}
