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

/// Estimate the wet-bulb temperature from dry-bulb temperature and relative humidity.
///
/// Uses Stull's 2011 empirical approximation, valid for relative humidity between
/// 5% and 99% and temperatures between -20C and 50C. `temperature` is in degrees
/// celsius, `humidity` is a percentage (0-100). The result is rounded to two
/// decimal places.
///
/// Returns `None` when the expression has no defined value, such as a humidity
/// below -8.313659 putting the square root out of domain.
pub fn wet_bulb(temperature: f64, humidity: f64) -> Option<f64> {
    let tw = temperature * (0.151977 * (humidity + 8.313659).sqrt()).atan()
        + (temperature + humidity).atan()
        - (humidity - 1.676331).atan()
        + 0.00391838 * humidity.powf(1.5) * (0.023101 * humidity).atan()
        - 4.686035;

    if tw.is_finite() {
        Some((tw * 100.0).round() / 100.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_point() {
        // 25C at 50% RH is the commonly cited check value for Stull's formula
        let tw = wet_bulb(25.0, 50.0).unwrap();
        assert!((tw - 18.0).abs() < 0.05, "got {}", tw);
    }

    #[test]
    fn test_finite_and_two_decimals_across_grid() {
        let mut t = -40.0;
        while t <= 50.0 {
            let mut rh = 0.0;
            while rh <= 100.0 {
                let tw = wet_bulb(t, rh).unwrap();
                assert!(tw.is_finite());
                let rounded = (tw * 100.0).round() / 100.0;
                assert!((rounded - tw).abs() < 1e-9, "{} not 2-decimal at {} {}", tw, t, rh);
                rh += 12.5;
            }
            t += 7.5;
        }
    }

    #[test]
    fn test_wet_bulb_below_dry_bulb_when_unsaturated() {
        let tw = wet_bulb(30.0, 40.0).unwrap();
        assert!(tw < 30.0);
    }

    #[test]
    fn test_out_of_domain_humidity() {
        assert_eq!(wet_bulb(20.0, -20.0), None);
    }
}
