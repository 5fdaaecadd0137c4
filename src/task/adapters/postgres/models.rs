//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning company.
    pub company_id: uuid::Uuid,
    /// Source template identifier.
    pub template_id: Option<String>,
    /// Display title.
    pub title: String,
    /// Stored kind string.
    pub kind: String,
    /// Stored status string.
    pub status: String,
    /// Dependency references JSON.
    pub dependencies: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning company.
    pub company_id: uuid::Uuid,
    /// Source template identifier.
    pub template_id: Option<String>,
    /// Display title.
    pub title: String,
    /// Canonical kind string.
    pub kind: String,
    /// Canonical status string.
    pub status: String,
    /// Dependency references JSON.
    pub dependencies: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status timestamp.
    pub updated_at: DateTime<Utc>,
}
