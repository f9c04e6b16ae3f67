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

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

// Markup details of the Weather Underground PWS dashboard. Everything that
// knows about the page structure lives in this module; a dashboard redesign
// should not require touching any other file.
const HISTORY_ROW: &str = "tr.ng-star-inserted";
const TIME_LABEL: &str = "strong";
const VALUE_SPAN: &str = "span.wu-value.wu-value-to";
const CURRENT_TEMP: &str = "div.current-temp";
const HUMIDITY_UNIT: &str = "span.wu-unit-humidity";

/// One row of the dashboard history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub time: String,
    pub temperature: f64,
}

/// The latest reading shown on the dashboard. Fields the page didn't
/// yield are `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

/// Extract the `{time, temperature}` time-series from a dashboard page.
///
/// Rows missing the bolded time label or the value span, or whose value is
/// not numeric, are skipped. Entries are returned in document order; a page
/// with no matching rows yields an empty vec, never an error.
pub fn history(html: &str) -> Vec<HistoryEntry> {
    let document = Html::parse_document(html);
    let row = selector(HISTORY_ROW);
    let time = selector(TIME_LABEL);
    let value = selector(VALUE_SPAN);

    document
        .select(&row)
        .filter_map(|tr| {
            let label = tr.select(&time).next()?;
            let temperature = tr.select(&value).next()?;
            Some(HistoryEntry {
                time: text_of(&label),
                temperature: text_of(&temperature).parse().ok()?,
            })
        })
        .collect()
}

/// Extract the current temperature and humidity from a dashboard page.
///
/// The temperature element carries a trailing degree symbol which is stripped
/// before parsing. Humidity sits in a unit container with a nested value span;
/// if either level is missing the field is `None`. Extraction itself cannot
/// fail: the worst case is both fields absent.
pub fn current(html: &str) -> CurrentConditions {
    let document = Html::parse_document(html);

    let temperature = document
        .select(&selector(CURRENT_TEMP))
        .next()
        .and_then(|el| text_of(&el).trim_end_matches('°').parse().ok());

    let humidity = document
        .select(&selector(HUMIDITY_UNIT))
        .next()
        .and_then(|container| container.select(&selector(VALUE_SPAN)).next())
        .and_then(|el| text_of(&el).parse().ok());

    CurrentConditions { temperature, humidity }
}

fn selector(css: &str) -> Selector {
    // All inputs are the static selectors above
    Selector::parse(css).expect("invalid dashboard selector")
}

fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
