use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use rollcall_core::AppError;
use rollcall_models::ids::StudentId;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::modules::registration_numbers::service::RegistrationNumberService;
use crate::modules::registrations::model::{RegisterStudentDto, Student, StudentWithSpecialty};

const STUDENT_COLUMNS: &str = "id, specialty_id, registration_number, first_name, last_name, email, \
     study_mode, current_semester, group_name, is_approved, created_at, updated_at";

pub struct RegistrationService;

impl RegistrationService {
    /// Consumes the registration number and creates the student, atomically.
    #[instrument(skip(db, dto), fields(registration_number = %dto.registration_number))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterStudentDto,
        now: DateTime<Utc>,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        RegistrationNumberService::consume(
            &mut tx,
            &dto.registration_number,
            dto.specialty_id,
            now,
        )
        .await?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (specialty_id, registration_number, first_name, last_name, email,
                                     study_mode, current_semester, group_name, is_approved, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, 1, $7, FALSE, $8, $8)
               RETURNING {}"#,
            STUDENT_COLUMNS
        ))
        .bind(dto.specialty_id)
        .bind(&dto.registration_number)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(dto.study_mode)
        .bind(&dto.group)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                if db_err.constraint() == Some("unique_student_email") {
                    return AppError::field("email", "email is already registered");
                }
                return AppError::field(
                    "registration_number",
                    "A student already holds this registration number",
                );
            }
            AppError::database(e)
        })?;

        tx.commit().await?;

        info!(student_id = %student.id, "Student registered, awaiting approval");
        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn pending(db: &PgPool) -> Result<Vec<StudentWithSpecialty>, AppError> {
        let students = sqlx::query_as::<_, StudentWithSpecialty>(
            r#"SELECT st.id, st.specialty_id, sp.name AS specialty_name, st.registration_number,
                      st.first_name, st.last_name, st.email, st.study_mode, st.current_semester,
                      st.group_name, st.is_approved, st.created_at
               FROM students st
               JOIN specialties sp ON sp.id = st.specialty_id
               WHERE st.is_approved = FALSE
               ORDER BY st.created_at, st.id"#,
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch pending registrations")
        .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn approve(db: &PgPool, student_id: StudentId) -> Result<Student, AppError> {
        let approved = sqlx::query_as::<_, Student>(&format!(
            r#"UPDATE students SET is_approved = TRUE, updated_at = NOW()
               WHERE id = $1 AND is_approved = FALSE
               RETURNING {}"#,
            STUDENT_COLUMNS
        ))
        .bind(student_id)
        .fetch_optional(db)
        .await?;

        match approved {
            Some(student) => {
                info!(%student_id, "Registration approved");
                Ok(student)
            }
            None => {
                let exists =
                    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                        .bind(student_id)
                        .fetch_one(db)
                        .await?;
                if exists {
                    Err(AppError::unprocessable(anyhow!(
                        "Registration is already approved"
                    )))
                } else {
                    Err(AppError::not_found(anyhow!("Student not found")))
                }
            }
        }
    }

    /// Rejects a pending registration: deletes the student and frees the number.
    #[instrument(skip(db))]
    pub async fn reject(db: &PgPool, student_id: StudentId) -> Result<(), AppError> {
        Self::remove(db, student_id, true).await
    }

    /// Deletes a student, approved or not, and frees the number.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, student_id: StudentId) -> Result<(), AppError> {
        Self::remove(db, student_id, false).await
    }

    async fn remove(db: &PgPool, student_id: StudentId, pending_only: bool) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let (registration_number, is_approved) = sqlx::query_as::<_, (String, bool)>(
            "SELECT registration_number, is_approved FROM students WHERE id = $1 FOR UPDATE",
        )
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        if pending_only && is_approved {
            return Err(AppError::unprocessable(anyhow!(
                "Only pending registrations can be rejected"
            )));
        }

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(student_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        let reason = if pending_only { "rejected" } else { "deleted" };
        RegistrationNumberService::release(&mut tx, &registration_number, reason).await?;

        tx.commit().await?;

        info!(
            %student_id,
            registration_number = %registration_number,
            reason,
            "Student removed, registration number released"
        );
        Ok(())
    }
}
