//! Feature vectors for the demand model.
//!
//! The model consumes a fixed-shape vector of 8 temporal and inventory
//! features. The order is part of the model contract: a trained artifact
//! records the schema fingerprint and refuses to score vectors from a
//! different schema.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ForecastError;

/// Number of input features the demand model consumes.
pub const FEATURE_DIM: usize = 8;

/// Feature names in design-matrix column order. This order is load-bearing:
/// it defines both [`FeatureVector::to_array`] and the schema fingerprint
/// persisted with every trained model.
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "day_of_year",
    "is_weekend",
    "is_holiday",
    "seasonal_index",
    "moving_average_7d",
    "moving_average_30d",
    "price_point",
    "current_stock",
];

/// Moving-average proxies used at inference time, when no historical demand
/// ledger is available: current stock scaled by fixed factors.
pub const INFERENCE_MA7_FACTOR: f64 = 0.1;
pub const INFERENCE_MA30_FACTOR: f64 = 0.05;

/// Fingerprint of the feature schema in effect at build time.
pub fn schema_fingerprint() -> String {
    format!("v1:{}", FEATURE_NAMES.join(","))
}

/// Cyclical multiplier approximating yearly demand seasonality,
/// `0.8 + 0.4·sin(2π·month/12)`, in [0.4, 1.2].
pub fn seasonal_index(date: NaiveDate) -> f64 {
    let month_fraction = f64::from(date.month()) / 12.0;
    0.8 + 0.4 * (std::f64::consts::TAU * month_fraction).sin()
}

/// Saturday/Sunday check shared by the generator and inference.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Fixed-shape input to the demand model.
///
/// Immutable by convention; every constructor validates, and the model
/// re-validates before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Calendar day within the year, 1–366.
    pub day_of_year: f64,
    /// 1.0 on Saturday/Sunday, else 0.0.
    pub is_weekend: f64,
    /// 1.0 on a holiday, else 0.0.
    pub is_holiday: f64,
    pub seasonal_index: f64,
    pub moving_average_7d: f64,
    pub moving_average_30d: f64,
    pub price_point: f64,
    pub current_stock: f64,
}

impl FeatureVector {
    pub fn new(
        day_of_year: f64,
        is_weekend: f64,
        is_holiday: f64,
        seasonal_index: f64,
        moving_average_7d: f64,
        moving_average_30d: f64,
        price_point: f64,
        current_stock: f64,
    ) -> Result<Self, ForecastError> {
        let vector = Self {
            day_of_year,
            is_weekend,
            is_holiday,
            seasonal_index,
            moving_average_7d,
            moving_average_30d,
            price_point,
            current_stock,
        };
        vector.validate()?;
        Ok(vector)
    }

    /// Build the inference-time vector for one item on the given date.
    ///
    /// Negative stock or price is rejected here, before any feature math.
    /// Holidays are not derivable from the calendar alone, so the flag is
    /// 0 at inference time; the moving averages are stock-scaled proxies
    /// (see [`INFERENCE_MA7_FACTOR`]).
    pub fn for_inference(
        today: NaiveDate,
        price_point: f64,
        current_stock: f64,
    ) -> Result<Self, ForecastError> {
        if !price_point.is_finite() || price_point < 0.0 {
            return Err(ForecastError::invalid_input(format!(
                "price point must be finite and non-negative, got {price_point}"
            )));
        }
        if !current_stock.is_finite() || current_stock < 0.0 {
            return Err(ForecastError::invalid_input(format!(
                "current stock must be finite and non-negative, got {current_stock}"
            )));
        }

        Self::new(
            f64::from(today.ordinal()),
            if is_weekend(today) { 1.0 } else { 0.0 },
            0.0,
            seasonal_index(today),
            current_stock * INFERENCE_MA7_FACTOR,
            current_stock * INFERENCE_MA30_FACTOR,
            price_point,
            current_stock,
        )
    }

    /// Check every field against the schema invariants: finite, flags in
    /// {0, 1}, day-of-year in range, non-negative magnitudes.
    pub fn validate(&self) -> Result<(), ForecastError> {
        for (name, value) in FEATURE_NAMES.iter().zip(self.to_array()) {
            if !value.is_finite() {
                return Err(ForecastError::invalid_input(format!(
                    "feature '{name}' must be finite, got {value}"
                )));
            }
        }
        if !(1.0..=366.0).contains(&self.day_of_year) {
            return Err(ForecastError::invalid_input(format!(
                "day_of_year must be in 1..=366, got {}",
                self.day_of_year
            )));
        }
        for (name, flag) in [("is_weekend", self.is_weekend), ("is_holiday", self.is_holiday)] {
            if flag != 0.0 && flag != 1.0 {
                return Err(ForecastError::invalid_input(format!(
                    "feature '{name}' must be 0 or 1, got {flag}"
                )));
            }
        }
        for (name, value) in [
            ("moving_average_7d", self.moving_average_7d),
            ("moving_average_30d", self.moving_average_30d),
            ("price_point", self.price_point),
            ("current_stock", self.current_stock),
        ] {
            if value < 0.0 {
                return Err(ForecastError::invalid_input(format!(
                    "feature '{name}' cannot be negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// The vector in design-matrix column order ([`FEATURE_NAMES`]).
    pub fn to_array(&self) -> [f64; FEATURE_DIM] {
        [
            self.day_of_year,
            self.is_weekend,
            self.is_holiday,
            self.seasonal_index,
            self.moving_average_7d,
            self.moving_average_30d,
            self.price_point,
            self.current_stock,
        ]
    }
}

/// A feature vector paired with its observed demand label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: FeatureVector,
    /// Units demanded on the example's date (non-negative).
    pub demand: f64,
}

/// Ordered training corpus. Order is irrelevant to the fit but must be
/// reproducible under a fixed seed.
pub type TrainingCorpus = Vec<TrainingExample>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seasonal_index_stays_in_band() {
        for month in 1..=12 {
            let idx = seasonal_index(date(2026, month, 15));
            assert!((0.4..=1.2).contains(&idx), "month {month} gave {idx}");
        }
    }

    #[test]
    fn weekend_detection_matches_the_calendar() {
        assert!(is_weekend(date(2026, 8, 1))); // Saturday
        assert!(is_weekend(date(2026, 8, 2))); // Sunday
        assert!(!is_weekend(date(2026, 8, 3))); // Monday
    }

    #[test]
    fn inference_vector_uses_stock_scaled_averages() {
        let v = FeatureVector::for_inference(date(2026, 8, 3), 20.0, 50.0).unwrap();
        assert_eq!(v.moving_average_7d, 5.0);
        assert_eq!(v.moving_average_30d, 2.5);
        assert_eq!(v.is_holiday, 0.0);
        assert_eq!(v.day_of_year, 215.0);
    }

    #[test]
    fn negative_inputs_are_rejected_before_construction() {
        assert!(FeatureVector::for_inference(date(2026, 8, 3), -1.0, 50.0).is_err());
        assert!(FeatureVector::for_inference(date(2026, 8, 3), 20.0, -5.0).is_err());
    }

    #[test]
    fn non_finite_and_out_of_range_fields_fail_validation() {
        let mut v = FeatureVector::for_inference(date(2026, 8, 3), 20.0, 50.0).unwrap();
        v.seasonal_index = f64::NAN;
        assert!(v.validate().is_err());

        let mut v = FeatureVector::for_inference(date(2026, 8, 3), 20.0, 50.0).unwrap();
        v.is_weekend = 0.5;
        assert!(v.validate().is_err());

        let mut v = FeatureVector::for_inference(date(2026, 8, 3), 20.0, 50.0).unwrap();
        v.day_of_year = 0.0;
        assert!(v.validate().is_err());
    }

    #[test]
    fn array_order_matches_the_declared_schema() {
        let v = FeatureVector::for_inference(date(2026, 8, 3), 20.0, 50.0).unwrap();
        let arr = v.to_array();
        assert_eq!(arr[0], v.day_of_year);
        assert_eq!(arr[6], v.price_point);
        assert_eq!(arr[7], v.current_stock);
        assert!(schema_fingerprint().starts_with("v1:day_of_year,"));
    }
}
