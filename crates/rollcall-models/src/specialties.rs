//! Reference data the scheduling pipeline joins against: specialties,
//! teaching modules and teachers.
//!
//! These rows are maintained outside this service (or by the CLI seeder);
//! only read models are defined here.

use crate::ids::{ModuleId, SpecialtyId, TeacherId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Training specialty. `code` prefixes every registration number issued for it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Specialty {
    pub id: SpecialtyId,
    pub name: String,
    /// Short unique code, e.g. "EB"
    pub code: String,
    pub description: Option<String>,
    /// Total length of the program in semesters
    pub duration_semesters: i32,
    pub current_semester: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Teaching module taught in one semester of a specialty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Module {
    pub id: ModuleId,
    pub specialty_id: SpecialtyId,
    pub code: String,
    pub name: String,
    pub semester: i32,
    pub hours_per_week: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: TeacherId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
