use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::{StoreError, SubmissionStore};
use crate::models::submission::{
    ExternalDetails, InternalDetails, NewSubmission, SocialEngineeringDetails, Submission,
    TestType, UnknownValue,
};

/// `submissions` table access.
#[derive(Debug, Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row; enum-like columns are stored as their wire strings.
#[derive(Debug, FromRow)]
struct SubmissionRow {
    id: i64,
    business_requirement: String,
    test_types: Vec<String>,
    scope_description: String,
    owner_awareness: String,
    in_scope_assets: String,
    target_type: String,
    target_other: Option<String>,
    is_production: bool,
    external_details: Option<Json<ExternalDetails>>,
    internal_details: Option<Json<InternalDetails>>,
    social_engineering_details: Option<Json<SocialEngineeringDetails>>,
    scheduling_preferences: String,
    scheduling_other: Option<String>,
    contact_name: String,
    contact_email: String,
    submitted_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn into_submission(self) -> Result<Submission, StoreError> {
        let id = self.id;
        self.decode()
            .map_err(|source| StoreError::Corrupt { id, source })
    }

    fn decode(self) -> Result<Submission, UnknownValue> {
        Ok(Submission {
            id: self.id,
            request: NewSubmission {
                business_requirement: self.business_requirement.parse()?,
                test_types: self
                    .test_types
                    .iter()
                    .map(|t| t.parse::<TestType>())
                    .collect::<Result<Vec<_>, _>>()?,
                scope_description: self.scope_description,
                owner_awareness: self.owner_awareness.parse()?,
                in_scope_assets: self.in_scope_assets,
                target_type: self.target_type.parse()?,
                target_other: self.target_other,
                is_production: self.is_production,
                external_details: self.external_details.map(|j| j.0),
                internal_details: self.internal_details.map(|j| j.0),
                social_engineering_details: self.social_engineering_details.map(|j| j.0),
                scheduling_preferences: self.scheduling_preferences.parse()?,
                scheduling_other: self.scheduling_other,
                contact_name: self.contact_name,
                contact_email: self.contact_email,
            },
            submitted_at: self.submitted_at,
        })
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, record: &NewSubmission) -> Result<Submission, StoreError> {
        let test_types: Vec<String> = record
            .test_types
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();

        // Single statement: the row is either fully visible or absent.
        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            INSERT INTO submissions (business_requirement, test_types, scope_description,
                owner_awareness, in_scope_assets, target_type, target_other, is_production,
                external_details, internal_details, social_engineering_details,
                scheduling_preferences, scheduling_other, contact_name, contact_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(record.business_requirement.as_str())
        .bind(&test_types)
        .bind(&record.scope_description)
        .bind(record.owner_awareness.as_str())
        .bind(&record.in_scope_assets)
        .bind(record.target_type.as_str())
        .bind(&record.target_other)
        .bind(record.is_production)
        .bind(record.external_details.as_ref().map(Json))
        .bind(record.internal_details.as_ref().map(Json))
        .bind(record.social_engineering_details.as_ref().map(Json))
        .bind(record.scheduling_preferences.as_str())
        .bind(&record.scheduling_other)
        .bind(&record.contact_name)
        .bind(&record.contact_email)
        .fetch_one(&self.pool)
        .await?;

        row.into_submission()
    }

    async fn list_all(&self) -> Result<Vec<Submission>, StoreError> {
        let rows = sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SubmissionRow::into_submission).collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
