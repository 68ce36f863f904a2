//! BMI calculation
//!
//! Pure functions mapping weight and height to a Body Mass Index value and
//! weight-category label. No side effects and no dependency on stored state;
//! the profile service calls into here whenever it derives `currentBMI` or
//! appends a history entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight category derived from a rounded BMI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A derived BMI value with its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiReading {
    /// BMI rounded to one decimal place
    pub bmi: f64,
    pub category: BmiCategory,
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classify a (rounded) BMI value
///
/// Thresholds are strict upper bounds: <18.5 underweight, <25 normal,
/// <30 overweight, otherwise obese.
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Compute BMI from weight (kg) and height (cm)
///
/// Formula: weight / (height/100)^2, rounded to one decimal. The category is
/// evaluated on the rounded value, so 81kg at 180cm is exactly 25.0 and
/// classifies as overweight.
///
/// Fails when either input is missing or non-positive.
pub fn compute_bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Result<BmiReading, String> {
    let weight = weight_kg.ok_or_else(|| "Weight and height are required".to_string())?;
    let height = height_cm.ok_or_else(|| "Weight and height are required".to_string())?;

    if !weight.is_finite() || !height.is_finite() || weight <= 0.0 || height <= 0.0 {
        return Err("Weight and height must be positive numbers".to_string());
    }

    let height_m = height / 100.0;
    let bmi = round1(weight / (height_m * height_m));

    Ok(BmiReading {
        bmi,
        category: classify_bmi(bmi),
    })
}
