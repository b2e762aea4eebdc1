//! Tile fragment: the latest sensor reading as three value cards.
//!
//! This is what the default refresh poller fetches and swaps into the
//! `load_data_tiles` region.

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use tiledash_app::ports::ReadingStore;
use tiledash_domain::reading::SensorReading;
use tiledash_domain::time::clock_label;

use super::DashboardError;
use crate::state::AppState;

/// Pre-formatted values of one reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    pub temperature: String,
    pub pressure: String,
    pub humidity: String,
    pub time: String,
}

impl From<&SensorReading> for TileView {
    fn from(reading: &SensorReading) -> Self {
        Self {
            temperature: format!("{:.2}", reading.temperature),
            pressure: format!("{:.2}", reading.pressure),
            humidity: format!("{:.2}", reading.humidity),
            time: clock_label(reading.recorded_at),
        }
    }
}

#[derive(Template)]
#[template(path = "tiles.html")]
pub struct TilesTemplate {
    reading: Option<TileView>,
}

impl IntoResponse for TilesTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// `GET /tiles`
pub async fn show<RS>(State(state): State<AppState<RS>>) -> Result<TilesTemplate, DashboardError>
where
    RS: ReadingStore + 'static,
{
    let latest = state.reading_service.latest_reading().await?;
    Ok(TilesTemplate {
        reading: latest.as_ref().map(TileView::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn should_format_reading_with_two_decimals() {
        let reading = SensorReading::builder()
            .temperature(20.5)
            .pressure(1013.25)
            .humidity(45.0)
            .recorded_at(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap())
            .build()
            .unwrap();

        let view = TileView::from(&reading);

        assert_eq!(view.temperature, "20.50");
        assert_eq!(view.pressure, "1013.25");
        assert_eq!(view.humidity, "45.00");
        assert_eq!(view.time, "14:05:09");
    }

    #[test]
    fn should_render_waiting_tile_without_reading() {
        let html = TilesTemplate { reading: None }.to_string();
        assert!(html.contains("Waiting for sensor data"));
        assert!(!html.contains("Temperature"));
    }

    #[test]
    fn should_render_three_tiles_with_reading() {
        let html = TilesTemplate {
            reading: Some(TileView {
                temperature: "20.50".to_string(),
                pressure: "1013.25".to_string(),
                humidity: "45.00".to_string(),
                time: "14:05:09".to_string(),
            }),
        }
        .to_string();

        assert_eq!(html.matches("class=\"tile\"").count(), 3);
        assert!(html.contains("20.50 &deg;C"));
        assert!(html.contains("1013.25 hPa"));
        assert!(html.contains("45.00 %"));
        assert!(html.contains("Last reading at 14:05:09 UTC"));
    }
}
