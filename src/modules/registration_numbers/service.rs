use anyhow::{Context, anyhow};
use chrono::{DateTime, Datelike, Utc};
use rollcall_core::AppError;
use rollcall_models::ids::{RegistrationNumberId, SpecialtyId};
use rollcall_models::specialties::Specialty;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument, warn};

use crate::modules::registration_numbers::model::{
    AvailableRegistrationNumber, BulkGeneratedRegistrationNumbers, GeneratedRegistrationNumber,
    RegistrationNumber, RegistrationNumberFilterParams, UsedRegistrationNumber,
    academic_year_label, insert_next_numbers, number_prefix,
};

const NUMBER_COLUMNS: &str =
    "id, number, specialty_id, academic_year, is_used, used_at, created_at";

pub struct RegistrationNumberService;

impl RegistrationNumberService {
    async fn find_specialty(
        conn: &mut PgConnection,
        specialty_id: SpecialtyId,
    ) -> Result<Specialty, AppError> {
        sqlx::query_as::<_, Specialty>(
            r#"SELECT id, name, code, description, duration_semesters, current_semester, is_active, created_at
               FROM specialties WHERE id = $1"#,
        )
        .bind(specialty_id)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch specialty")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Specialty not found")))
    }

    /// Issues `count` consecutive numbers for `specialty` in `year`.
    async fn issue(
        conn: &mut PgConnection,
        specialty: &Specialty,
        year: i32,
        count: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<RegistrationNumber>, AppError> {
        insert_next_numbers(conn, specialty.id, &specialty.code, year, count, now)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::bad_request(anyhow!(
                        "Registration number collision while issuing from {}",
                        number_prefix(&specialty.code, year)
                    ));
                }
                AppError::database(e)
            })
    }

    #[instrument(skip(db))]
    pub async fn generate(
        db: &PgPool,
        specialty_id: SpecialtyId,
        now: DateTime<Utc>,
    ) -> Result<GeneratedRegistrationNumber, AppError> {
        let mut tx = db.begin().await?;
        let specialty = Self::find_specialty(&mut tx, specialty_id).await?;
        let issued = Self::issue(&mut tx, &specialty, now.year(), 1, now).await?;
        tx.commit().await?;

        let number = issued
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal(anyhow!("No registration number was issued")))?;

        info!(number = %number.number, specialty = %specialty.code, "Registration number issued");
        rollcall_observability::track_registration_numbers_generated("single", 1);

        Ok(GeneratedRegistrationNumber {
            id: number.id,
            number: number.number,
            specialty_name: specialty.name,
            academic_year: number.academic_year,
        })
    }

    #[instrument(skip(db))]
    pub async fn generate_bulk(
        db: &PgPool,
        specialty_id: SpecialtyId,
        count: u32,
        now: DateTime<Utc>,
    ) -> Result<BulkGeneratedRegistrationNumbers, AppError> {
        let mut tx = db.begin().await?;
        let specialty = Self::find_specialty(&mut tx, specialty_id).await?;
        let issued = Self::issue(&mut tx, &specialty, now.year(), count, now).await?;
        tx.commit().await?;

        info!(count, specialty = %specialty.code, "Registration numbers issued in bulk");
        rollcall_observability::track_registration_numbers_generated("bulk", u64::from(count));

        Ok(BulkGeneratedRegistrationNumbers {
            specialty_name: specialty.name,
            academic_year: academic_year_label(now.year()),
            numbers: issued.into_iter().map(|n| n.number).collect(),
        })
    }

    /// Marks `number` used on behalf of a registration for `specialty_id`.
    ///
    /// Must run inside the registration transaction; the row is locked until
    /// it commits or rolls back.
    pub async fn consume(
        conn: &mut PgConnection,
        number: &str,
        specialty_id: SpecialtyId,
        now: DateTime<Utc>,
    ) -> Result<RegistrationNumber, AppError> {
        let current = sqlx::query_as::<_, RegistrationNumber>(&format!(
            "SELECT {} FROM registration_numbers WHERE number = $1 FOR UPDATE",
            NUMBER_COLUMNS
        ))
        .bind(number)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch registration number")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            AppError::field("registration_number", "Registration number does not exist")
        })?;

        if current.specialty_id != specialty_id {
            return Err(AppError::field(
                "registration_number",
                "Registration number does not belong to the selected specialty",
            ));
        }
        if current.is_used {
            return Err(AppError::field(
                "registration_number",
                format!("Registration number {} is already used", number),
            ));
        }

        let consumed = sqlx::query_as::<_, RegistrationNumber>(&format!(
            r#"UPDATE registration_numbers SET is_used = TRUE, used_at = $2
               WHERE id = $1 RETURNING {}"#,
            NUMBER_COLUMNS
        ))
        .bind(current.id)
        .bind(now)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to consume registration number")
        .map_err(AppError::database)?;

        rollcall_observability::track_registration_number_consumed();
        Ok(consumed)
    }

    /// Returns `number` to the pool. Must run inside the transaction that
    /// removes the student holding it.
    ///
    /// The student link is by value, so a number that no longer exists is
    /// logged and skipped.
    pub async fn release(
        conn: &mut PgConnection,
        number: &str,
        reason: &'static str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE registration_numbers SET is_used = FALSE, used_at = NULL WHERE number = $1",
        )
        .bind(number)
        .execute(conn)
        .await
        .context("Failed to release registration number")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            warn!(number, "Released registration number does not exist");
            return Ok(false);
        }

        rollcall_observability::track_registration_number_released(reason);
        Ok(true)
    }

    #[instrument(skip(db))]
    pub async fn list_available(
        db: &PgPool,
        filters: RegistrationNumberFilterParams,
    ) -> Result<Vec<AvailableRegistrationNumber>, AppError> {
        let numbers = sqlx::query_as::<_, AvailableRegistrationNumber>(
            r#"SELECT r.id, r.number, r.specialty_id, sp.name AS specialty_name, r.academic_year, r.created_at
               FROM registration_numbers r
               JOIN specialties sp ON sp.id = r.specialty_id
               WHERE r.is_used = FALSE AND ($1::uuid IS NULL OR r.specialty_id = $1)
               ORDER BY length(r.number), r.number"#,
        )
        .bind(filters.specialty_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch available registration numbers")
        .map_err(AppError::database)?;

        Ok(numbers)
    }

    #[instrument(skip(db))]
    pub async fn list_used(
        db: &PgPool,
        filters: RegistrationNumberFilterParams,
    ) -> Result<Vec<UsedRegistrationNumber>, AppError> {
        let numbers = sqlx::query_as::<_, UsedRegistrationNumber>(
            r#"SELECT r.id, r.number, r.specialty_id, sp.name AS specialty_name, r.academic_year, r.used_at,
                      st.id AS student_id,
                      st.first_name || ' ' || st.last_name AS student_name,
                      st.email AS student_email,
                      st.is_approved AS student_is_approved
               FROM registration_numbers r
               JOIN specialties sp ON sp.id = r.specialty_id
               LEFT JOIN students st ON st.registration_number = r.number
               WHERE r.is_used = TRUE AND ($1::uuid IS NULL OR r.specialty_id = $1)
               ORDER BY r.used_at DESC NULLS LAST, r.number"#,
        )
        .bind(filters.specialty_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch used registration numbers")
        .map_err(AppError::database)?;

        Ok(numbers)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: RegistrationNumberId) -> Result<(), AppError> {
        let is_used =
            sqlx::query_scalar::<_, bool>("SELECT is_used FROM registration_numbers WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow!("Registration number not found")))?;

        if is_used {
            return Err(AppError::bad_request(anyhow!(
                "Cannot delete a registration number that is already used"
            )));
        }

        // Guard against a registration consuming it in between.
        let result =
            sqlx::query("DELETE FROM registration_numbers WHERE id = $1 AND is_used = FALSE")
                .bind(id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::bad_request(anyhow!(
                "Cannot delete a registration number that is already used"
            )));
        }

        info!(%id, "Registration number deleted");
        Ok(())
    }
}
