use anyhow::{Context, anyhow};
use rollcall_core::AppError;
use rollcall_models::DaySet;
use rollcall_models::ids::{ModuleId, ScheduleId, SpecialtyId, TeacherId};
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument, warn};

use crate::modules::schedules::conflict::{SCHEDULE_COLUMNS, find_conflict, lock_slots, slot_key};
use crate::modules::schedules::model::{
    CreateScheduleDto, GroupsResponse, Schedule, ScheduleFilterParams, ScheduleWithDetails,
    SlotCandidate, UpdateScheduleDto,
};

/// Templates joined with module, teacher and specialty names, aliased `s`.
pub(crate) const DETAILS_SELECT: &str = r#"SELECT s.id, s.module_id, m.code AS module_code, m.name AS module_name,
          s.teacher_id, t.first_name || ' ' || t.last_name AS teacher_name,
          s.specialty_id, sp.name AS specialty_name,
          s.day, s.start_time, s.end_time, s.classroom, s.semester, s.academic_year,
          s.group_name, s.study_mode
   FROM schedules s
   JOIN modules m ON m.id = s.module_id
   JOIN teachers t ON t.id = s.teacher_id
   JOIN specialties sp ON sp.id = s.specialty_id"#;

pub struct ScheduleService;

impl ScheduleService {
    async fn ensure_exists(
        conn: &mut PgConnection,
        table: &'static str,
        id: uuid::Uuid,
        label: &'static str,
    ) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            table
        ))
        .bind(id)
        .fetch_one(conn)
        .await
        .with_context(|| format!("Failed to look up {}", label))
        .map_err(AppError::database)?;

        if exists {
            Ok(())
        } else {
            Err(AppError::not_found(anyhow!("{} not found", label)))
        }
    }

    async fn ensure_references(
        conn: &mut PgConnection,
        module_id: ModuleId,
        teacher_id: TeacherId,
        specialty_id: SpecialtyId,
    ) -> Result<(), AppError> {
        Self::ensure_exists(conn, "modules", module_id.into_inner(), "Module").await?;
        Self::ensure_exists(conn, "teachers", teacher_id.into_inner(), "Teacher").await?;
        Self::ensure_exists(conn, "specialties", specialty_id.into_inner(), "Specialty").await
    }

    /// Day membership (when `check_day`), ordering of times, then conflicts.
    /// The candidate's slot must already be locked.
    async fn check_slot(
        conn: &mut PgConnection,
        days: &DaySet,
        candidate: &SlotCandidate,
        exclude: Option<ScheduleId>,
        check_day: bool,
    ) -> Result<(), AppError> {
        if check_day && !days.contains(candidate.day) {
            return Err(AppError::field(
                "day",
                format!(
                    "{} is not a teaching day; allowed days are {}",
                    candidate.day.display_name(),
                    days
                ),
            ));
        }
        if candidate.end_time <= candidate.start_time {
            return Err(AppError::field(
                "end_time",
                "end_time must be later than start_time",
            ));
        }

        if let Some(existing) = find_conflict(conn, candidate, exclude).await? {
            warn!(
                conflicting_id = %existing.id,
                day = %candidate.day,
                "Schedule conflict detected"
            );
            rollcall_observability::track_schedule_conflict();
            return Err(AppError::unprocessable(anyhow!(
                "Schedule conflict detected: overlaps template {} on {} from {} to {}",
                existing.id,
                existing.day.display_name(),
                existing.start_time.format("%H:%M"),
                existing.end_time.format("%H:%M")
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: ScheduleFilterParams,
    ) -> Result<Vec<ScheduleWithDetails>, AppError> {
        let schedules = sqlx::query_as::<_, ScheduleWithDetails>(&format!(
            r#"{}
               WHERE ($1::uuid IS NULL OR s.specialty_id = $1)
                 AND ($2::uuid IS NULL OR s.teacher_id = $2)
                 AND ($3::text IS NULL OR s.group_name = $3)
                 AND ($4::schedule_day IS NULL OR s.day = $4)
                 AND ($5::text IS NULL OR s.academic_year = $5)
                 AND ($6::int IS NULL OR s.semester = $6)
               ORDER BY s.day, s.start_time, s.id"#,
            DETAILS_SELECT
        ))
        .bind(filters.specialty_id)
        .bind(filters.teacher_id)
        .bind(&filters.group)
        .bind(filters.day)
        .bind(&filters.academic_year)
        .bind(filters.semester)
        .fetch_all(db)
        .await
        .context("Failed to fetch schedules")
        .map_err(AppError::database)?;

        Ok(schedules)
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: ScheduleId) -> Result<ScheduleWithDetails, AppError> {
        sqlx::query_as::<_, ScheduleWithDetails>(&format!("{} WHERE s.id = $1", DETAILS_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch schedule")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Schedule not found")))
    }

    #[instrument(skip(db, days))]
    pub async fn create(
        db: &PgPool,
        days: &DaySet,
        dto: CreateScheduleDto,
    ) -> Result<ScheduleWithDetails, AppError> {
        let mut tx = db.begin().await?;

        Self::ensure_references(&mut tx, dto.module_id, dto.teacher_id, dto.specialty_id).await?;

        let candidate = SlotCandidate {
            specialty_id: dto.specialty_id,
            academic_year: dto.academic_year.clone(),
            day: dto.day,
            start_time: dto.start_time,
            end_time: dto.end_time,
            group: dto.group.clone(),
        };
        lock_slots(
            &mut tx,
            vec![slot_key(candidate.specialty_id, &candidate.academic_year, candidate.day)],
        )
        .await?;
        Self::check_slot(&mut tx, days, &candidate, None, true).await?;

        let id = sqlx::query_scalar::<_, ScheduleId>(
            r#"INSERT INTO schedules (module_id, teacher_id, specialty_id, day, start_time, end_time,
                                      classroom, semester, academic_year, group_name, study_mode)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING id"#,
        )
        .bind(dto.module_id)
        .bind(dto.teacher_id)
        .bind(dto.specialty_id)
        .bind(dto.day)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(&dto.classroom)
        .bind(dto.semester)
        .bind(&dto.academic_year)
        .bind(&dto.group)
        .bind(dto.study_mode)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to create schedule")
        .map_err(AppError::database)?;

        tx.commit().await?;

        info!(schedule_id = %id, day = %dto.day, "Schedule template created");
        Self::get(db, id).await
    }

    /// Partial update; the merged template goes through the same checks as
    /// a new one, excluding itself from the conflict search. The day is only
    /// checked against the allowed set when the request changes it.
    #[instrument(skip(db, days))]
    pub async fn update(
        db: &PgPool,
        days: &DaySet,
        id: ScheduleId,
        dto: UpdateScheduleDto,
    ) -> Result<ScheduleWithDetails, AppError> {
        let mut tx = db.begin().await?;

        let current = sqlx::query_as::<_, Schedule>(&format!(
            "SELECT {} FROM schedules WHERE id = $1 FOR UPDATE",
            SCHEDULE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch schedule")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Schedule not found")))?;

        let merged = dto.apply_to(&current);

        Self::ensure_references(&mut tx, merged.module_id, merged.teacher_id, merged.specialty_id)
            .await?;
        lock_slots(
            &mut tx,
            vec![
                slot_key(current.specialty_id, &current.academic_year, current.day),
                slot_key(merged.specialty_id, &merged.academic_year, merged.day),
            ],
        )
        .await?;
        // Templates on a day later dropped from the allowed set stay editable.
        Self::check_slot(
            &mut tx,
            days,
            &SlotCandidate::from(&merged),
            Some(id),
            dto.day.is_some(),
        )
        .await?;

        sqlx::query(
            r#"UPDATE schedules
               SET module_id = $2, teacher_id = $3, specialty_id = $4, day = $5, start_time = $6,
                   end_time = $7, classroom = $8, semester = $9, academic_year = $10,
                   group_name = $11, study_mode = $12, updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(merged.module_id)
        .bind(merged.teacher_id)
        .bind(merged.specialty_id)
        .bind(merged.day)
        .bind(merged.start_time)
        .bind(merged.end_time)
        .bind(&merged.classroom)
        .bind(merged.semester)
        .bind(&merged.academic_year)
        .bind(&merged.group)
        .bind(merged.study_mode)
        .execute(&mut *tx)
        .await
        .context("Failed to update schedule")
        .map_err(AppError::database)?;

        tx.commit().await?;

        info!(schedule_id = %id, "Schedule template updated");
        Self::get(db, id).await
    }

    /// Deleting a template also deletes its recorded attendance.
    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: ScheduleId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete schedule")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Schedule not found")));
        }

        info!(schedule_id = %id, "Schedule template deleted");
        Ok(())
    }

    /// Distinct student groups of a specialty.
    #[instrument(skip(db))]
    pub async fn groups(db: &PgPool, specialty_id: SpecialtyId) -> Result<GroupsResponse, AppError> {
        let groups = sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT group_name FROM students
               WHERE specialty_id = $1 AND group_name IS NOT NULL
               ORDER BY group_name"#,
        )
        .bind(specialty_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch groups")
        .map_err(AppError::database)?;

        Ok(GroupsResponse { groups })
    }
}
