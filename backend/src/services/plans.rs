//! AI plan generation service
//!
//! Prompt-and-relay: build a prompt from the caller's profile, send it
//! through the [`TextGenerator`], and hand back whatever comes out. When the
//! reply parses as JSON the client gets the structured plan; when it does
//! not, the raw text is still returned under `rawResponse` so a flaky model
//! never turns into a 500.
//!
//! Configuration is checked first, before the profile is even fetched, so an
//! unconfigured deployment answers 503 without touching the database.

use crate::ai::{strip_code_fences, TextGenerator};
use crate::error::{ApiError, ApiResult};
use crate::repositories::{UserRecord, UserRepository};
use chrono::Utc;
use health_hub_shared::bmi::compute_bmi;
use health_hub_shared::types::{
    AiContentResponse, MealPlanRequest, RecommendationsRequest, WorkoutPlanRequest,
};
use serde_json::json;
use sqlx::PgPool;
use std::fmt::Write;
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_PLAN_DAYS: u32 = 7;

/// Plan generation service
pub struct PlanService;

impl PlanService {
    /// Generate a personalized meal plan
    pub async fn meal_plan(
        pool: &PgPool,
        ai: &dyn TextGenerator,
        user_id: Uuid,
        req: MealPlanRequest,
    ) -> ApiResult<AiContentResponse> {
        ensure_configured(ai)?;
        let user = fetch_user(pool, user_id).await?;

        let duration = req.duration.unwrap_or(DEFAULT_PLAN_DAYS);
        let prompt = meal_plan_prompt(&user, req.preferences.as_deref(), duration);

        relay(ai, &prompt, "Meal plan generated successfully").await
    }

    /// Generate a personalized workout plan
    pub async fn workout_plan(
        pool: &PgPool,
        ai: &dyn TextGenerator,
        user_id: Uuid,
        req: WorkoutPlanRequest,
    ) -> ApiResult<AiContentResponse> {
        ensure_configured(ai)?;
        let user = fetch_user(pool, user_id).await?;

        let duration = req.duration.unwrap_or(DEFAULT_PLAN_DAYS);
        let prompt =
            workout_plan_prompt(&user, req.preferences.as_deref(), duration, &req.equipment);

        relay(ai, &prompt, "Workout plan generated successfully").await
    }

    /// Generate general health recommendations
    pub async fn recommendations(
        pool: &PgPool,
        ai: &dyn TextGenerator,
        user_id: Uuid,
        req: RecommendationsRequest,
    ) -> ApiResult<AiContentResponse> {
        ensure_configured(ai)?;
        let user = fetch_user(pool, user_id).await?;

        let prompt = recommendations_prompt(&user, req.focus.as_deref().unwrap_or("general"));

        relay(ai, &prompt, "Recommendations generated successfully").await
    }
}

fn ensure_configured(ai: &dyn TextGenerator) -> ApiResult<()> {
    if !ai.is_configured() {
        return Err(ApiError::ServiceUnavailable(
            "AI service is not configured. Please contact the administrator.".to_string(),
        ));
    }
    Ok(())
}

async fn fetch_user(pool: &PgPool, user_id: Uuid) -> ApiResult<UserRecord> {
    UserRepository::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Send the prompt and wrap the reply
async fn relay(
    ai: &dyn TextGenerator,
    prompt: &str,
    message: &str,
) -> ApiResult<AiContentResponse> {
    let reply = ai.generate(prompt).await?;
    let data = parse_reply(&reply);

    info!(reply_len = reply.len(), "AI reply relayed");

    Ok(AiContentResponse {
        message: message.to_string(),
        data,
        generated_at: Utc::now(),
    })
}

/// Parse a model reply into plan data
///
/// Fences are stripped first since models wrap JSON in ```json blocks even
/// when told not to. An unparseable reply is demoted to a `rawResponse`
/// payload rather than an error.
pub(crate) fn parse_reply(reply: &str) -> serde_json::Value {
    let cleaned = strip_code_fences(reply);
    match serde_json::from_str::<serde_json::Value>(cleaned) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "AI reply was not valid JSON, returning raw text");
            json!({
                "rawResponse": reply,
                "note": "Response could not be parsed as structured data",
            })
        }
    }
}

/// Render the profile lines shared by all prompts
fn profile_context(user: &UserRecord) -> String {
    let mut ctx = String::new();
    let _ = writeln!(ctx, "- Name: {}", user.name);
    if let Some(age) = user.age {
        let _ = writeln!(ctx, "- Age: {}", age);
    }
    if let Some(gender) = &user.gender {
        let _ = writeln!(ctx, "- Gender: {}", gender);
    }
    if let Some(height) = user.height_cm {
        let _ = writeln!(ctx, "- Height: {} cm", height);
    }
    if let Some(weight) = user.weight_kg {
        let _ = writeln!(ctx, "- Weight: {} kg", weight);
    }
    if let Ok(reading) = compute_bmi(user.weight_kg, user.height_cm) {
        let _ = writeln!(ctx, "- BMI: {} ({})", reading.bmi, reading.category);
    }
    let _ = writeln!(ctx, "- Activity level: {}", user.activity_level);
    if !user.goals.is_empty() {
        let _ = writeln!(ctx, "- Goals: {}", user.goals.join(", "));
    }
    if !user.dietary_restrictions.is_empty() {
        let _ = writeln!(
            ctx,
            "- Dietary restrictions: {}",
            user.dietary_restrictions.join(", ")
        );
    }
    ctx
}

fn meal_plan_prompt(user: &UserRecord, preferences: Option<&str>, duration: u32) -> String {
    let mut prompt = format!(
        "Create a {}-day meal plan for a person with this profile:\n{}",
        duration,
        profile_context(user)
    );
    if let Some(preferences) = preferences {
        let _ = writeln!(prompt, "- Preferences: {}", preferences);
    }
    prompt.push_str(
        "\nRespond with JSON only, no prose, using this shape:\n\
         {\"days\": [{\"day\": 1, \"meals\": [{\"type\": \"breakfast\", \"name\": \"...\", \
         \"calories\": 0, \"ingredients\": [\"...\"]}]}], \"dailyCalories\": 0, \"tips\": [\"...\"]}",
    );
    prompt
}

fn workout_plan_prompt(
    user: &UserRecord,
    preferences: Option<&str>,
    duration: u32,
    equipment: &[String],
) -> String {
    let mut prompt = format!(
        "Create a {}-day workout plan for a person with this profile:\n{}",
        duration,
        profile_context(user)
    );
    if let Some(preferences) = preferences {
        let _ = writeln!(prompt, "- Preferences: {}", preferences);
    }
    if !equipment.is_empty() {
        let _ = writeln!(prompt, "- Available equipment: {}", equipment.join(", "));
    } else {
        let _ = writeln!(prompt, "- Available equipment: none (bodyweight only)");
    }
    prompt.push_str(
        "\nRespond with JSON only, no prose, using this shape:\n\
         {\"days\": [{\"day\": 1, \"focus\": \"...\", \"exercises\": [{\"name\": \"...\", \
         \"sets\": 0, \"reps\": 0, \"restSeconds\": 0}]}], \"notes\": [\"...\"]}",
    );
    prompt
}

fn recommendations_prompt(user: &UserRecord, focus: &str) -> String {
    let mut prompt = format!(
        "Provide personalized health recommendations for a person with this profile:\n{}",
        profile_context(user)
    );
    let _ = writeln!(prompt, "- Requested focus area: {}", focus);
    prompt.push_str(
        "\nRespond with JSON only, no prose, using this shape:\n\
         {\"recommendations\": [{\"area\": \"...\", \"suggestion\": \"...\", \
         \"reason\": \"...\"}]}",
    );
    prompt
}
