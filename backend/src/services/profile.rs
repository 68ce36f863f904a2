//! Profile and BMI service
//!
//! `currentBMI` is always derived from the stored weight and height at read
//! time. The only thing persisted about BMI is the append-only history,
//! which gains exactly one entry per biometrics update.

use crate::error::{ApiError, ApiResult};
use crate::repositories::{BmiHistoryRecord, UpdateProfile, UserRecord, UserRepository};
use health_hub_shared::bmi::compute_bmi;
use health_hub_shared::models::BmiHistoryEntry;
use health_hub_shared::types::{
    BmiUpdateResponse, CalculateBmiRequest, CalculateBmiResponse, ProfileResponse,
    UpdateBmiRequest, UpdateProfileRequest,
};
use health_hub_shared::validation::{
    validate_age, validate_height_cm, validate_weight_kg, Violations,
};
use sqlx::PgPool;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// How many history entries a biometrics update echoes back
const HISTORY_PREVIEW_LEN: i64 = 10;

/// Profile service
pub struct ProfileService;

impl ProfileService {
    /// Get the caller's profile with derived BMI
    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> ApiResult<ProfileResponse> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        record_to_profile(user)
    }

    /// Apply a partial profile update
    ///
    /// Email and password never travel through this path; the request type
    /// has no fields for them and unknown JSON keys are dropped on parse.
    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> ApiResult<ProfileResponse> {
        let mut violations = Violations::new();

        if let Some(age) = req.age {
            violations.check("age", validate_age(age).map(|_| age));
        }
        if let Some(height) = req.height {
            violations.check("height", validate_height_cm(height).map(|_| height));
        }
        if let Some(weight) = req.weight {
            violations.check("weight", validate_weight_kg(weight).map(|_| weight));
        }
        if let Some(ref name) = req.name {
            if name.trim().is_empty() {
                violations.push("name", "Name cannot be empty");
            }
        }
        violations.into_result().map_err(ApiError::Validation)?;

        // A saved weight change always leaves a history row behind, as long
        // as both biometrics are present after the update
        let existing = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let effective_weight = req.weight.or(existing.weight_kg);
        let effective_height = req.height.or(existing.height_cm);
        let weight_changed = matches!(req.weight, Some(w) if existing.weight_kg != Some(w));
        let append_bmi = if weight_changed {
            compute_bmi(effective_weight, effective_height)
                .ok()
                .map(|r| r.bmi)
        } else {
            None
        };

        let input = UpdateProfile {
            name: req.name.map(|n| n.trim().to_string()),
            age: req.age,
            gender: req.gender.map(|g| g.as_str().to_string()),
            height_cm: req.height,
            weight_kg: req.weight,
            activity_level: req.activity_level.map(|a| a.as_str().to_string()),
            goals: req
                .goals
                .map(|gs| gs.iter().map(|g| g.as_str().to_string()).collect()),
            dietary_restrictions: req
                .dietary_restrictions
                .map(|ds| ds.iter().map(|d| d.as_str().to_string()).collect()),
        };

        let user = UserRepository::update_profile(pool, user_id, input, append_bmi)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        record_to_profile(user)
    }

    /// Full BMI history, newest first
    pub async fn get_bmi_history(pool: &PgPool, user_id: Uuid) -> ApiResult<Vec<BmiHistoryEntry>> {
        let records = UserRepository::full_bmi_history(pool, user_id).await?;
        Ok(records.into_iter().map(history_entry).collect())
    }

    /// Update weight and height, appending the derived BMI to history
    pub async fn update_biometrics(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdateBmiRequest,
    ) -> ApiResult<BmiUpdateResponse> {
        let reading = compute_bmi(req.weight, req.height).map_err(ApiError::Validation)?;

        // compute_bmi guarantees both are present and positive here
        let (weight, height) = match (req.weight, req.height) {
            (Some(w), Some(h)) => (w, h),
            _ => return Err(ApiError::Validation("Weight and height are required".to_string())),
        };

        let mut violations = Violations::new();
        violations.check("weight", validate_weight_kg(weight).map(|_| weight));
        violations.check("height", validate_height_cm(height).map(|_| height));
        violations.into_result().map_err(ApiError::Validation)?;

        let user = UserRepository::update_biometrics(pool, user_id, weight, height, reading.bmi)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        info!(user_id = %user.id, bmi = reading.bmi, "Biometrics updated");

        let history = UserRepository::recent_bmi_history(pool, user_id, HISTORY_PREVIEW_LEN)
            .await?
            .into_iter()
            .map(history_entry)
            .collect();

        Ok(BmiUpdateResponse {
            message: "BMI updated successfully".to_string(),
            current_bmi: reading.bmi,
            bmi_history: history,
        })
    }

    /// Stateless BMI calculation; touches no stored state
    pub fn calculate_bmi(req: CalculateBmiRequest) -> ApiResult<CalculateBmiResponse> {
        let reading = compute_bmi(req.weight, req.height).map_err(ApiError::Validation)?;

        Ok(CalculateBmiResponse {
            bmi: reading.bmi,
            category: reading.category.label().to_string(),
            // Both present, or compute_bmi would have failed above
            weight: req.weight.unwrap_or_default(),
            height: req.height.unwrap_or_default(),
        })
    }
}

fn history_entry(record: BmiHistoryRecord) -> BmiHistoryEntry {
    BmiHistoryEntry {
        bmi: record.bmi,
        weight: record.weight_kg,
        date: record.recorded_at,
    }
}

/// Map a database record onto the wire profile, deriving `currentBMI`
pub(crate) fn record_to_profile(user: UserRecord) -> ApiResult<ProfileResponse> {
    let current_bmi = compute_bmi(user.weight_kg, user.height_cm).ok().map(|r| r.bmi);

    Ok(ProfileResponse {
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
        age: user.age,
        gender: user.gender.as_deref().map(parse_stored).transpose()?,
        height: user.height_cm,
        weight: user.weight_kg,
        activity_level: parse_stored(&user.activity_level)?,
        goals: user
            .goals
            .iter()
            .map(|g| parse_stored(g))
            .collect::<ApiResult<_>>()?,
        dietary_restrictions: user
            .dietary_restrictions
            .iter()
            .map(|d| parse_stored(d))
            .collect::<ApiResult<_>>()?,
        current_bmi,
        created_at: user.created_at,
        updated_at: user.updated_at,
    })
}

/// Parse an enum column; a failure means the row predates a label change
fn parse_stored<T: FromStr<Err = String>>(value: &str) -> ApiResult<T> {
    value
        .parse()
        .map_err(|e: String| ApiError::Internal(anyhow::anyhow!("Corrupt stored value: {}", e)))
}
