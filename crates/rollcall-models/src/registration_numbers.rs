//! Registration number models and the numbering rules shared by the API and
//! the CLI.
//!
//! A number is `{specialty code}{year}{sequence}`, where the sequence is at
//! least three zero-padded digits: `EB2025001`, `EB2025002`, ... The
//! academic year recorded alongside it is `"{year}-{year + 1}"`.

use crate::ids::{RegistrationNumberId, SpecialtyId, StudentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Upper bound for a single bulk issue.
pub const MAX_BULK_COUNT: i32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RegistrationNumber {
    pub id: RegistrationNumberId,
    /// Globally unique enrollment identifier
    pub number: String,
    pub specialty_id: SpecialtyId,
    /// Academic year label, e.g. "2025-2026"
    pub academic_year: String,
    pub is_used: bool,
    /// Set while the number is held by a student
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateRegistrationNumberDto {
    pub specialty_id: SpecialtyId,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkGenerateRegistrationNumbersDto {
    pub specialty_id: SpecialtyId,
    /// How many consecutive numbers to issue (1-500)
    #[validate(range(min = 1, max = 500, message = "count must be between 1 and 500"))]
    pub count: i32,
}

/// Result of issuing a single number.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedRegistrationNumber {
    pub id: RegistrationNumberId,
    pub number: String,
    pub specialty_name: String,
    pub academic_year: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkGeneratedRegistrationNumbers {
    pub specialty_name: String,
    pub academic_year: String,
    /// Issued numbers in ascending order
    pub numbers: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegistrationNumberFilterParams {
    /// Restrict to one specialty
    pub specialty_id: Option<SpecialtyId>,
}

/// An unused number, with its specialty for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AvailableRegistrationNumber {
    pub id: RegistrationNumberId,
    pub number: String,
    pub specialty_id: SpecialtyId,
    pub specialty_name: String,
    pub academic_year: String,
    pub created_at: DateTime<Utc>,
}

/// A consumed number joined (by value) to the student holding it.
///
/// The student columns are optional: the link is the number text, not a
/// foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UsedRegistrationNumber {
    pub id: RegistrationNumberId,
    pub number: String,
    pub specialty_id: SpecialtyId,
    pub specialty_name: String,
    pub academic_year: String,
    pub used_at: Option<DateTime<Utc>>,
    pub student_id: Option<StudentId>,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub student_is_approved: Option<bool>,
}

/// `"2025-2026"` for 2025.
pub fn academic_year_label(year: i32) -> String {
    format!("{}-{}", year, year + 1)
}

/// `"EB2025"` for specialty code `EB` in 2025.
pub fn number_prefix(code: &str, year: i32) -> String {
    format!("{}{}", code, year)
}

/// Extracts the numeric sequence from `number` when it is `prefix` followed
/// by three or more digits.
pub fn parse_sequence(number: &str, prefix: &str) -> Option<u32> {
    let suffix = number.strip_prefix(prefix)?;
    if suffix.len() < 3 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// One past the highest sequence among `existing` numbers for `prefix`,
/// or 1 when there are none.
///
/// Compares numerically, so `EB20251000` follows `EB2025999`.
pub fn next_sequence<'a, I>(existing: I, prefix: &str) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(|number| parse_sequence(number, prefix))
        .max()
        .map_or(1, |max| max + 1)
}

pub fn format_number(prefix: &str, sequence: u32) -> String {
    format!("{}{:03}", prefix, sequence)
}

/// Inserts the next `count` numbers for `code` in `year`, in ascending order.
///
/// Must run inside a transaction: the advisory lock on the prefix is held
/// until it ends, so concurrent issuers for the same prefix queue up and
/// each sees the numbers the previous one committed.
pub async fn insert_next_numbers(
    conn: &mut PgConnection,
    specialty_id: SpecialtyId,
    code: &str,
    year: i32,
    count: u32,
    now: DateTime<Utc>,
) -> Result<Vec<RegistrationNumber>, sqlx::Error> {
    let prefix = number_prefix(code, year);

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(&prefix)
        .execute(&mut *conn)
        .await?;

    let existing = sqlx::query_scalar::<_, String>(
        "SELECT number FROM registration_numbers WHERE specialty_id = $1 AND starts_with(number, $2)",
    )
    .bind(specialty_id)
    .bind(&prefix)
    .fetch_all(&mut *conn)
    .await?;

    let first = next_sequence(existing.iter().map(String::as_str), &prefix);
    let numbers: Vec<String> = (first..first + count)
        .map(|sequence| format_number(&prefix, sequence))
        .collect();

    let mut issued = sqlx::query_as::<_, RegistrationNumber>(
        r#"INSERT INTO registration_numbers (number, specialty_id, academic_year, created_at)
           SELECT number, $2, $3, $4 FROM UNNEST($1::text[]) AS number
           RETURNING id, number, specialty_id, academic_year, is_used, used_at, created_at"#,
    )
    .bind(&numbers)
    .bind(specialty_id)
    .bind(academic_year_label(year))
    .bind(now)
    .fetch_all(&mut *conn)
    .await?;

    issued.sort_by_key(|n| parse_sequence(&n.number, &prefix));
    Ok(issued)
}
