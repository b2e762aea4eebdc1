//! Sensor reading — one temperature / pressure / humidity sample from a
//! BME280-class environmental sensor.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// A single environmental sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Hectopascal (millibar).
    pub pressure: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub recorded_at: Timestamp,
}

impl SensorReading {
    /// Create a builder for constructing a [`SensorReading`].
    #[must_use]
    pub fn builder() -> SensorReadingBuilder {
        SensorReadingBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonFiniteReading`] for NaN or infinite
    /// values and [`ValidationError::ReadingOutOfRange`] when humidity is
    /// outside `0..=100` or pressure is not positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("temperature", self.temperature),
            ("pressure", self.pressure),
            ("humidity", self.humidity),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteReading { field });
            }
        }
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(ValidationError::ReadingOutOfRange {
                field: "humidity",
                value: self.humidity,
            });
        }
        if self.pressure <= 0.0 {
            return Err(ValidationError::ReadingOutOfRange {
                field: "pressure",
                value: self.pressure,
            });
        }
        Ok(())
    }
}

/// Round to two decimals, the precision readings are reported with.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Step-by-step builder for [`SensorReading`].
#[derive(Debug, Default)]
pub struct SensorReadingBuilder {
    temperature: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
    recorded_at: Option<Timestamp>,
}

impl SensorReadingBuilder {
    #[must_use]
    pub fn temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }

    #[must_use]
    pub fn pressure(mut self, hpa: f64) -> Self {
        self.pressure = Some(hpa);
        self
    }

    #[must_use]
    pub fn humidity(mut self, percent: f64) -> Self {
        self.humidity = Some(percent);
        self
    }

    #[must_use]
    pub fn recorded_at(mut self, recorded_at: Timestamp) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Consume the builder, rounding values to two decimals.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant, see [`SensorReading::validate`].
    pub fn build(self) -> Result<SensorReading, ValidationError> {
        let reading = SensorReading {
            temperature: round2(self.temperature.unwrap_or_default()),
            pressure: round2(self.pressure.unwrap_or_default()),
            humidity: round2(self.humidity.unwrap_or_default()),
            recorded_at: self.recorded_at.unwrap_or_else(crate::time::now),
        };
        reading.validate()?;
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_build_reading_with_all_fields() {
        let at = now();
        let reading = SensorReading::builder()
            .temperature(21.5)
            .pressure(1013.25)
            .humidity(45.0)
            .recorded_at(at)
            .build()
            .unwrap();

        assert!((reading.temperature - 21.5).abs() < f64::EPSILON);
        assert!((reading.pressure - 1013.25).abs() < f64::EPSILON);
        assert!((reading.humidity - 45.0).abs() < f64::EPSILON);
        assert_eq!(reading.recorded_at, at);
    }

    #[test]
    fn should_round_values_to_two_decimals() {
        let reading = SensorReading::builder()
            .temperature(20.456)
            .pressure(1000.001)
            .humidity(50.999)
            .build()
            .unwrap();

        assert!((reading.temperature - 20.46).abs() < 1e-9);
        assert!((reading.pressure - 1000.0).abs() < 1e-9);
        assert!((reading.humidity - 51.0).abs() < 1e-9);
    }

    #[test]
    fn should_reject_humidity_above_hundred() {
        let result = SensorReading::builder()
            .temperature(20.0)
            .pressure(1000.0)
            .humidity(101.0)
            .build();
        assert!(matches!(
            result,
            Err(ValidationError::ReadingOutOfRange {
                field: "humidity",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_missing_pressure() {
        let result = SensorReading::builder()
            .temperature(20.0)
            .humidity(40.0)
            .build();
        assert!(matches!(
            result,
            Err(ValidationError::ReadingOutOfRange {
                field: "pressure",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_non_finite_temperature() {
        let result = SensorReading::builder()
            .temperature(f64::NAN)
            .pressure(1000.0)
            .humidity(40.0)
            .build();
        assert_eq!(
            result,
            Err(ValidationError::NonFiniteReading {
                field: "temperature"
            })
        );
    }

    #[test]
    fn should_allow_negative_temperature() {
        let reading = SensorReading::builder()
            .temperature(-12.3)
            .pressure(990.0)
            .humidity(80.0)
            .build();
        assert!(reading.is_ok());
    }
}
