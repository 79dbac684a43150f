//! Student models and registration DTOs.

use crate::ids::{SpecialtyId, StudentId};
use crate::value_types::StudyMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Student entity.
///
/// `registration_number` holds the consumed number by value; it is unique
/// across students.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub specialty_id: SpecialtyId,
    pub registration_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub study_mode: StudyMode,
    pub current_semester: i32,
    #[sqlx(rename = "group_name")]
    pub group: Option<String>,
    /// New registrations wait for administration approval
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student with the specialty name, for the pending-registrations list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentWithSpecialty {
    pub id: StudentId,
    pub specialty_id: SpecialtyId,
    pub specialty_name: String,
    pub registration_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub study_mode: StudyMode,
    pub current_semester: i32,
    #[sqlx(rename = "group_name")]
    pub group: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Self-registration with an issued registration number.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterStudentDto {
    #[validate(length(min = 1, max = 40, message = "registration_number must be 1 to 40 characters"))]
    pub registration_number: String,
    pub specialty_id: SpecialtyId,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub study_mode: StudyMode,
    #[validate(length(min = 1, max = 20))]
    pub group: Option<String>,
}
