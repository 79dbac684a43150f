use std::collections::HashSet;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rollcall_core::{AppError, PaginationMeta};
use rollcall_models::ScheduleDay;
use rollcall_models::ids::{ScheduleId, StudentId, TeacherId};
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use crate::modules::attendance::model::{
    AttendanceHistoryEntry, AttendanceHistoryQuery, PaginatedAttendanceHistory,
    PaginatedStudentAttendance, RosterEntry, RosterResponse, SaveAttendanceDto,
    StudentAttendanceRecord,
};
use crate::modules::schedules::model::ScheduleWithDetails;
use crate::modules::schedules::service::DETAILS_SELECT;

const HISTORY_FILTERS: &str = r#"a.teacher_id = $1
       AND ($2::date IS NULL OR a.attendance_date >= $2)
       AND ($3::date IS NULL OR a.attendance_date <= $3)
       AND ($4::uuid IS NULL OR s.module_id = $4)"#;

const STUDENT_FILTERS: &str = r#"a.student_id = $1
       AND ($2::date IS NULL OR a.attendance_date >= $2)
       AND ($3::date IS NULL OR a.attendance_date <= $3)
       AND ($4::uuid IS NULL OR s.module_id = $4)"#;

fn check_history_range(query: &AttendanceHistoryQuery) -> Result<(), AppError> {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Err(AppError::field(
            "from",
            format!("from ({}) must not be after to ({})", from, to),
        ));
    }
    Ok(())
}

fn join_ids(ids: &[StudentId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct AttendanceService;

impl AttendanceService {
    /// The template, provided it is assigned to `teacher_id`.
    async fn owned_schedule(
        conn: &mut PgConnection,
        teacher_id: TeacherId,
        schedule_id: ScheduleId,
    ) -> Result<ScheduleWithDetails, AppError> {
        let schedule = sqlx::query_as::<_, ScheduleWithDetails>(&format!(
            "{} WHERE s.id = $1",
            DETAILS_SELECT
        ))
        .bind(schedule_id)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch schedule")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Schedule not found")))?;

        if schedule.teacher_id != teacher_id {
            return Err(AppError::forbidden(anyhow!(
                "This session is not assigned to you"
            )));
        }

        Ok(schedule)
    }

    async fn load_roster(
        conn: &mut PgConnection,
        schedule: ScheduleWithDetails,
        date: NaiveDate,
    ) -> Result<RosterResponse, AppError> {
        let students = sqlx::query_as::<_, RosterEntry>(
            r#"SELECT st.id AS student_id, st.registration_number, st.first_name, st.last_name,
                      st.group_name, a.id AS attendance_id, a.status, a.notes
               FROM students st
               LEFT JOIN attendances a
                 ON a.student_id = st.id AND a.schedule_id = $2 AND a.attendance_date = $3
               WHERE st.specialty_id = $1 AND st.current_semester = $4
               ORDER BY st.last_name, st.first_name, st.id"#,
        )
        .bind(schedule.specialty_id)
        .bind(schedule.id)
        .bind(date)
        .bind(schedule.semester)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to fetch roster")
        .map_err(AppError::database)?;

        let attendance_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendances WHERE schedule_id = $1 AND attendance_date = $2)",
        )
        .bind(schedule.id)
        .bind(date)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to check recorded attendance")
        .map_err(AppError::database)?;

        Ok(RosterResponse {
            schedule,
            date,
            attendance_taken,
            students,
        })
    }

    /// Students expected at the session, each with any attendance already
    /// recorded for `date`.
    #[instrument(skip(db))]
    pub async fn roster(
        db: &PgPool,
        teacher_id: TeacherId,
        schedule_id: ScheduleId,
        date: NaiveDate,
    ) -> Result<RosterResponse, AppError> {
        let mut conn = db.acquire().await?;
        let schedule = Self::owned_schedule(&mut conn, teacher_id, schedule_id).await?;
        Self::load_roster(&mut conn, schedule, date).await
    }

    /// Upserts one row per line in a single transaction and returns the
    /// refreshed roster.
    #[instrument(skip(db, dto), fields(date = %dto.date, lines = dto.attendances.len()))]
    pub async fn save(
        db: &PgPool,
        teacher_id: TeacherId,
        schedule_id: ScheduleId,
        dto: SaveAttendanceDto,
        now: DateTime<Utc>,
    ) -> Result<RosterResponse, AppError> {
        let duplicates = dto.duplicate_students();
        if !duplicates.is_empty() {
            return Err(AppError::field(
                "attendances",
                format!("Students listed more than once: {}", join_ids(&duplicates)),
            ));
        }

        let mut tx = db.begin().await?;
        let schedule = Self::owned_schedule(&mut tx, teacher_id, schedule_id).await?;

        let weekday = ScheduleDay::from_weekday(dto.date.weekday());
        if weekday != schedule.day {
            return Err(AppError::field(
                "date",
                format!(
                    "{} is a {}, but this session takes place on {}",
                    dto.date,
                    weekday.display_name(),
                    schedule.day.display_name()
                ),
            ));
        }

        let requested: Vec<StudentId> = dto.attendances.iter().map(|l| l.student_id).collect();
        let enrolled: HashSet<StudentId> = sqlx::query_scalar::<_, StudentId>(
            r#"SELECT id FROM students
               WHERE id = ANY($1) AND specialty_id = $2 AND current_semester = $3"#,
        )
        .bind(&requested)
        .bind(schedule.specialty_id)
        .bind(schedule.semester)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to check students")
        .map_err(AppError::database)?
        .into_iter()
        .collect();

        let unknown: Vec<StudentId> = requested
            .iter()
            .copied()
            .filter(|id| !enrolled.contains(id))
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::field(
                "attendances",
                format!("Students not enrolled in this session: {}", join_ids(&unknown)),
            ));
        }

        for line in &dto.attendances {
            sqlx::query(
                r#"INSERT INTO attendances (student_id, schedule_id, teacher_id, attendance_date,
                                            status, notes, created_at, updated_at)
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                   ON CONFLICT ON CONSTRAINT unique_attendance_per_session
                   DO UPDATE SET status = EXCLUDED.status, notes = EXCLUDED.notes,
                                 teacher_id = EXCLUDED.teacher_id, updated_at = EXCLUDED.updated_at"#,
            )
            .bind(line.student_id)
            .bind(schedule_id)
            .bind(teacher_id)
            .bind(dto.date)
            .bind(line.status)
            .bind(&line.notes)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("Failed to save attendance")
            .map_err(AppError::database)?;
        }

        let roster = Self::load_roster(&mut tx, schedule, dto.date).await?;
        tx.commit().await?;

        info!(
            %schedule_id,
            date = %dto.date,
            count = dto.attendances.len(),
            "Attendance saved"
        );
        rollcall_observability::track_attendance_saved(dto.attendances.len());

        Ok(roster)
    }

    /// Sessions the teacher recorded, newest first, with per-status counts.
    #[instrument(skip(db))]
    pub async fn history(
        db: &PgPool,
        teacher_id: TeacherId,
        query: AttendanceHistoryQuery,
    ) -> Result<PaginatedAttendanceHistory, AppError> {
        check_history_range(&query)?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"SELECT COUNT(*) FROM (
                   SELECT DISTINCT a.schedule_id, a.attendance_date
                   FROM attendances a
                   JOIN schedules s ON s.id = a.schedule_id
                   WHERE {}
               ) recorded"#,
            HISTORY_FILTERS
        ))
        .bind(teacher_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.module_id)
        .fetch_one(db)
        .await
        .context("Failed to count attendance history")
        .map_err(AppError::database)?;

        let data = sqlx::query_as::<_, AttendanceHistoryEntry>(&format!(
            r#"SELECT a.schedule_id, a.attendance_date, s.module_id, m.name AS module_name,
                      s.day, s.start_time, s.classroom, s.group_name,
                      COUNT(*) AS total,
                      COUNT(*) FILTER (WHERE a.status = 'present') AS present,
                      COUNT(*) FILTER (WHERE a.status = 'absent') AS absent,
                      COUNT(*) FILTER (WHERE a.status = 'late') AS late,
                      COUNT(*) FILTER (WHERE a.status = 'excused') AS excused
               FROM attendances a
               JOIN schedules s ON s.id = a.schedule_id
               JOIN modules m ON m.id = s.module_id
               WHERE {}
               GROUP BY a.schedule_id, a.attendance_date, s.module_id, m.name,
                        s.day, s.start_time, s.classroom, s.group_name
               ORDER BY a.attendance_date DESC, s.start_time DESC, a.schedule_id
               LIMIT $5 OFFSET $6"#,
            HISTORY_FILTERS
        ))
        .bind(teacher_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.module_id)
        .bind(query.pagination.per_page())
        .bind(query.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch attendance history")
        .map_err(AppError::database)?;

        Ok(PaginatedAttendanceHistory {
            data,
            meta: PaginationMeta::new(&query.pagination, total),
        })
    }

    #[instrument(skip(db))]
    pub async fn student_attendance(
        db: &PgPool,
        student_id: StudentId,
        query: AttendanceHistoryQuery,
    ) -> Result<PaginatedStudentAttendance, AppError> {
        check_history_range(&query)?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(db)
                .await?;
        if !exists {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        let total = sqlx::query_scalar::<_, i64>(&format!(
            r#"SELECT COUNT(*) FROM attendances a
               JOIN schedules s ON s.id = a.schedule_id
               WHERE {}"#,
            STUDENT_FILTERS
        ))
        .bind(student_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.module_id)
        .fetch_one(db)
        .await
        .context("Failed to count student attendance")
        .map_err(AppError::database)?;

        let data = sqlx::query_as::<_, StudentAttendanceRecord>(&format!(
            r#"SELECT a.id, a.schedule_id, a.attendance_date, a.status, a.notes,
                      s.module_id, m.code AS module_code, m.name AS module_name,
                      t.first_name || ' ' || t.last_name AS teacher_name,
                      s.day, s.start_time, s.classroom
               FROM attendances a
               JOIN schedules s ON s.id = a.schedule_id
               JOIN modules m ON m.id = s.module_id
               JOIN teachers t ON t.id = a.teacher_id
               WHERE {}
               ORDER BY a.attendance_date DESC, s.start_time DESC, a.id
               LIMIT $5 OFFSET $6"#,
            STUDENT_FILTERS
        ))
        .bind(student_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.module_id)
        .bind(query.pagination.per_page())
        .bind(query.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch student attendance")
        .map_err(AppError::database)?;

        Ok(PaginatedStudentAttendance {
            data,
            meta: PaginationMeta::new(&query.pagination, total),
        })
    }
}
