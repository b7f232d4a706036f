//! Normalized forecast summary with Celsius/Fahrenheit pairs

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ForecastPayload;

/// A temperature in both scales, each rounded to one decimal
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub celsius: f64,
    pub fahrenheit: f64,
}

impl Temperature {
    #[must_use]
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius: round_one(celsius),
            fahrenheit: round_one(Self::celsius_to_fahrenheit(celsius)),
        }
    }

    #[must_use]
    pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
        celsius * 9.0 / 5.0 + 32.0
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentSummary {
    pub temp: Temperature,
    pub humidity: Option<u8>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
    pub condition: String,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub high: Temperature,
    pub low: Temperature,
    pub condition: String,
    pub icon: Option<String>,
}

/// Current conditions plus the daily outlook, reshaped for display
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSummary {
    pub current: CurrentSummary,
    pub daily: Vec<DailySummary>,
}

impl ForecastSummary {
    /// Build a summary from a metric one-call payload
    pub fn from_payload(payload: &ForecastPayload) -> Result<Self, serde_json::Error> {
        let raw: onecall::OneCall = serde_json::from_value(payload.0.clone())?;

        let (condition, icon) = onecall::first_condition(&raw.current.weather);
        let current = CurrentSummary {
            temp: Temperature::from_celsius(raw.current.temp),
            humidity: raw.current.humidity,
            wind_speed: raw.current.wind_speed,
            condition,
            icon,
        };

        let daily = raw
            .daily
            .iter()
            .filter_map(|day| {
                let date = DateTime::from_timestamp(day.dt, 0)?.date_naive();
                let (condition, icon) = onecall::first_condition(&day.weather);
                Some(DailySummary {
                    date,
                    high: Temperature::from_celsius(day.temp.max),
                    low: Temperature::from_celsius(day.temp.min),
                    condition,
                    icon,
                })
            })
            .collect();

        Ok(Self { current, daily })
    }
}

/// The subset of the one-call response the summary reads
mod onecall {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct OneCall {
        pub current: Current,
        #[serde(default)]
        pub daily: Vec<Daily>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Current {
        pub temp: f64,
        pub humidity: Option<u8>,
        pub wind_speed: Option<f64>,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Daily {
        pub dt: i64,
        pub temp: DailyTemp,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyTemp {
        pub max: f64,
        pub min: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub main: String,
        pub icon: Option<String>,
    }

    pub fn first_condition(conditions: &[Condition]) -> (String, Option<String>) {
        conditions.first().map_or_else(
            || ("Unknown".to_string(), None),
            |c| (c.main.clone(), c.icon.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_temperature_conversion() {
        let freezing = Temperature::from_celsius(0.0);
        assert_eq!(freezing.fahrenheit, 32.0);

        let warm = Temperature::from_celsius(21.456);
        assert_eq!(warm.celsius, 21.5);
        assert_eq!(warm.fahrenheit, 70.6);
    }

    #[test]
    fn test_summary_from_payload() {
        let payload = ForecastPayload(json!({
            "lat": 42.6208,
            "lon": -70.6721,
            "current": {
                "temp": 10.0,
                "humidity": 81,
                "wind_speed": 4.12,
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]
            },
            "daily": [
                {"dt": 1_700_000_000, "temp": {"max": 12.34, "min": 3.21, "day": 9.0},
                 "weather": [{"main": "Clouds", "icon": "04d"}]},
                {"dt": 1_700_086_400, "temp": {"max": 8.0, "min": -1.0}, "weather": []}
            ]
        }));

        let summary = ForecastSummary::from_payload(&payload).unwrap();

        assert_eq!(summary.current.temp.fahrenheit, 50.0);
        assert_eq!(summary.current.humidity, Some(81));
        assert_eq!(summary.current.condition, "Rain");
        assert_eq!(summary.current.icon.as_deref(), Some("10d"));

        assert_eq!(summary.daily.len(), 2);
        assert_eq!(summary.daily[0].date, NaiveDate::from_ymd_opt(2023, 11, 14).unwrap());
        assert_eq!(summary.daily[0].high.celsius, 12.3);
        assert_eq!(summary.daily[0].low.celsius, 3.2);
        assert_eq!(summary.daily[1].condition, "Unknown");
        assert_eq!(summary.daily[1].low.fahrenheit, 30.2);
    }

    #[test]
    fn test_summary_rejects_payload_without_current() {
        let payload = ForecastPayload(json!({"daily": []}));
        assert!(ForecastSummary::from_payload(&payload).is_err());
    }
}
