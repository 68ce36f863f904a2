//! User and BMI history repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
///
/// Enum-ish columns (gender, activity_level, goals, dietary_restrictions)
/// are stored as text and parsed at the service layer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: String,
    pub goals: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// BMI history record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BmiHistoryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bmi: f64,
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Input for updating profile fields
///
/// None means "leave unchanged". Email and password are deliberately absent;
/// they only change through the auth flows.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goals: Option<Vec<String>>,
    pub dietary_restrictions: Option<Vec<String>>,
}

const USER_COLUMNS: &str = "id, name, email, password_hash, age, gender, height_cm, weight_kg, \
     activity_level, goals, dietary_restrictions, created_at, updated_at";

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            "#,
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Update profile fields, leaving unset fields untouched
    ///
    /// When `append_bmi` is set the derived reading is appended to
    /// bmi_history in the same transaction, mirroring the rule that a saved
    /// weight change always leaves a history row behind.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        input: UpdateProfile,
        append_bmi: Option<f64>,
    ) -> Result<Option<UserRecord>> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                age = COALESCE($3, age),
                gender = COALESCE($4, gender),
                height_cm = COALESCE($5, height_cm),
                weight_kg = COALESCE($6, weight_kg),
                activity_level = COALESCE($7, activity_level),
                goals = COALESCE($8, goals),
                dietary_restrictions = COALESCE($9, dietary_restrictions),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(input.name)
        .bind(input.age)
        .bind(input.gender)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.activity_level)
        .bind(input.goals)
        .bind(input.dietary_restrictions)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let (Some(bmi), Some(weight)) = (append_bmi, user.weight_kg) {
            sqlx::query(
                r#"
                INSERT INTO bmi_history (user_id, bmi, weight_kg)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(id)
            .bind(bmi)
            .bind(weight)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(user))
    }

    /// Update biometrics and append the derived BMI to history
    ///
    /// Runs in one transaction so the profile never reflects a weight whose
    /// BMI reading is missing from history. History is append-only; nothing
    /// ever updates or deletes rows in bmi_history.
    pub async fn update_biometrics(
        pool: &PgPool,
        id: Uuid,
        weight_kg: f64,
        height_cm: f64,
        bmi: f64,
    ) -> Result<Option<UserRecord>> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                weight_kg = $2,
                height_cm = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(weight_kg)
        .bind(height_cm)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(user) = user else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            INSERT INTO bmi_history (user_id, bmi, weight_kg)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id)
        .bind(bmi)
        .bind(weight_kg)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(user))
    }

    /// Get the full BMI history, newest first
    pub async fn full_bmi_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<BmiHistoryRecord>> {
        let records = sqlx::query_as::<_, BmiHistoryRecord>(
            r#"
            SELECT id, user_id, bmi, weight_kg, recorded_at
            FROM bmi_history
            WHERE user_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get the N most recent BMI history entries, newest first
    pub async fn recent_bmi_history(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<BmiHistoryRecord>> {
        let records = sqlx::query_as::<_, BmiHistoryRecord>(
            r#"
            SELECT id, user_id, bmi, weight_kg, recorded_at
            FROM bmi_history
            WHERE user_id = $1
            ORDER BY recorded_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
