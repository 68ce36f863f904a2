//! Core domain model types
//!
//! Enums and value objects for user profiles and health tasks. All enums
//! serialize to the snake_case labels used on the wire and in the database,
//! and parse back via `FromStr` so the repositories can store them as text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares `as_str`, `Display`, and `FromStr` over a fixed label set.
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// All valid labels, for validation error messages
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(format!(
                        "invalid value '{}', expected one of: {}",
                        other,
                        Self::LABELS.join(", ")
                    )),
                }
            }
        }
    };
}

/// User gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

string_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

/// Activity level for profile and AI prompt context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    #[default]
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

string_enum!(ActivityLevel {
    Sedentary => "sedentary",
    LightlyActive => "lightly_active",
    ModeratelyActive => "moderately_active",
    VeryActive => "very_active",
    ExtraActive => "extra_active",
});

/// User health goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    WeightGain,
    MuscleGain,
    MaintainWeight,
    ImproveFitness,
    ImproveHealth,
}

string_enum!(Goal {
    WeightLoss => "weight_loss",
    WeightGain => "weight_gain",
    MuscleGain => "muscle_gain",
    MaintainWeight => "maintain_weight",
    ImproveFitness => "improve_fitness",
    ImproveHealth => "improve_health",
});

/// Dietary restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    NutFree,
    Halal,
    Kosher,
}

string_enum!(DietaryRestriction {
    Vegetarian => "vegetarian",
    Vegan => "vegan",
    GlutenFree => "gluten_free",
    DairyFree => "dairy_free",
    NutFree => "nut_free",
    Halal => "halal",
    Kosher => "kosher",
});

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Workout,
    Meal,
    Hydration,
    Sleep,
    Medication,
    #[default]
    Other,
}

string_enum!(TaskCategory {
    Workout => "workout",
    Meal => "meal",
    Hydration => "hydration",
    Sleep => "sleep",
    Medication => "medication",
    Other => "other",
});

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

string_enum!(TaskPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
});

/// Recurrence frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
}

string_enum!(RecurrenceFrequency {
    Daily => "daily",
    Weekly => "weekly",
    Monthly => "monthly",
});

/// Task recurrence descriptor
///
/// Descriptive only: no recurrence-expansion engine exists. `days_of_week`
/// entries are 0-6 where 0 is Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    #[serde(default)]
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<RecurrenceFrequency>,
    #[serde(default)]
    pub days_of_week: Vec<i16>,
}

/// Free-form per-task metrics
///
/// The category determines which fields are meaningful, but none are
/// required. Units: duration in minutes, distance in km, weight in kg,
/// water amount in ml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
}

impl TaskMetrics {
    pub fn is_empty(&self) -> bool {
        self.duration.is_none()
            && self.calories.is_none()
            && self.distance.is_none()
            && self.sets.is_none()
            && self.reps.is_none()
            && self.weight.is_none()
            && self.water_amount.is_none()
            && self.sleep_hours.is_none()
    }
}

/// One append-only BMI history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiHistoryEntry {
    pub bmi: f64,
    pub weight: f64,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip_via_labels() {
        for label in TaskCategory::LABELS {
            let parsed: TaskCategory = label.parse().unwrap();
            assert_eq!(parsed.as_str(), *label);
        }
        for label in ActivityLevel::LABELS {
            let parsed: ActivityLevel = label.parse().unwrap();
            assert_eq!(parsed.as_str(), *label);
        }
    }

    #[test]
    fn test_invalid_label_lists_alternatives() {
        let err = "running".parse::<TaskCategory>().unwrap_err();
        assert!(err.contains("workout"));
        assert!(err.contains("other"));
    }

    #[test]
    fn test_activity_level_default() {
        assert_eq!(ActivityLevel::default(), ActivityLevel::ModeratelyActive);
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_recurrence_serde_shape() {
        let json = r#"{"enabled":true,"frequency":"weekly","daysOfWeek":[1,3,5]}"#;
        let rec: Recurrence = serde_json::from_str(json).unwrap();
        assert!(rec.enabled);
        assert_eq!(rec.frequency, Some(RecurrenceFrequency::Weekly));
        assert_eq!(rec.days_of_week, vec![1, 3, 5]);
    }

    #[test]
    fn test_metrics_empty_detection() {
        assert!(TaskMetrics::default().is_empty());
        let m = TaskMetrics {
            water_amount: Some(500.0),
            ..Default::default()
        };
        assert!(!m.is_empty());
    }
}
