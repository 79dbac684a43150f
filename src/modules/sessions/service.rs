use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use rollcall_config::ScheduleConfig;
use rollcall_core::AppError;
use rollcall_models::ids::{ModuleId, ScheduleId, SpecialtyId, StudentId, TeacherId};
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::modules::schedules::model::ScheduleWithDetails;
use crate::modules::schedules::service::DETAILS_SELECT;
use crate::modules::sessions::expander::{RecordedSessions, expand_sessions, group_by_date};
use crate::modules::sessions::model::{
    DateRange, RangeError, Session, SessionRangeQuery, SessionsResponse, StudentWeekResponse,
    TeacherWeekResponse, WeekSelector,
};

/// Which templates to expand.
#[derive(Debug, Clone, Copy)]
pub enum TemplateFilter {
    Teacher {
        teacher_id: TeacherId,
        module_id: Option<ModuleId>,
    },
    Cohort {
        specialty_id: SpecialtyId,
        semester: i32,
    },
}

fn range_error(err: RangeError) -> AppError {
    AppError::field(err.field(), err.to_string())
}

pub struct SessionService;

impl SessionService {
    /// Templates ordered by start time then id, so expansion ties are stable.
    pub(crate) async fn load_templates(
        db: &PgPool,
        filter: TemplateFilter,
    ) -> Result<Vec<ScheduleWithDetails>, AppError> {
        let templates = match filter {
            TemplateFilter::Teacher {
                teacher_id,
                module_id,
            } => {
                let sql = format!(
                    "{} WHERE s.teacher_id = $1 AND ($2::uuid IS NULL OR s.module_id = $2) \
                     ORDER BY s.start_time, s.id",
                    DETAILS_SELECT
                );
                sqlx::query_as::<_, ScheduleWithDetails>(&sql)
                    .bind(teacher_id)
                    .bind(module_id)
                    .fetch_all(db)
                    .await
            }
            TemplateFilter::Cohort {
                specialty_id,
                semester,
            } => {
                let sql = format!(
                    "{} WHERE s.specialty_id = $1 AND s.semester = $2 ORDER BY s.start_time, s.id",
                    DETAILS_SELECT
                );
                sqlx::query_as::<_, ScheduleWithDetails>(&sql)
                    .bind(specialty_id)
                    .bind(semester)
                    .fetch_all(db)
                    .await
            }
        };

        templates
            .context("Failed to fetch schedule templates")
            .map_err(AppError::database)
    }

    async fn load_recorded(
        db: &PgPool,
        templates: &[ScheduleWithDetails],
        range: DateRange,
    ) -> Result<RecordedSessions, AppError> {
        if templates.is_empty() {
            return Ok(RecordedSessions::new());
        }
        let ids: Vec<ScheduleId> = templates.iter().map(|t| t.id).collect();

        let pairs = sqlx::query_as::<_, (ScheduleId, NaiveDate)>(
            r#"SELECT DISTINCT schedule_id, attendance_date FROM attendances
               WHERE schedule_id = ANY($1) AND attendance_date BETWEEN $2 AND $3"#,
        )
        .bind(&ids)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(db)
        .await
        .context("Failed to fetch recorded sessions")
        .map_err(AppError::database)?;

        Ok(pairs.into_iter().collect())
    }

    async fn expand(
        db: &PgPool,
        filter: TemplateFilter,
        range: DateRange,
        config: &ScheduleConfig,
        view: &'static str,
    ) -> Result<Vec<Session>, AppError> {
        let templates = Self::load_templates(db, filter).await?;
        let recorded = Self::load_recorded(db, &templates, range).await?;
        let sessions = expand_sessions(&templates, range, &recorded, config.session_duration);

        debug!(
            view,
            templates = templates.len(),
            sessions = sessions.len(),
            "Expanded sessions"
        );
        rollcall_observability::track_sessions_expanded(view, sessions.len());
        Ok(sessions)
    }

    async fn ensure_teacher(db: &PgPool, teacher_id: TeacherId) -> Result<(), AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
                .bind(teacher_id)
                .fetch_one(db)
                .await
                .context("Failed to look up teacher")
                .map_err(AppError::database)?;

        if exists {
            Ok(())
        } else {
            Err(AppError::not_found(anyhow!("Teacher not found")))
        }
    }

    /// A teacher's sessions over the requested range, by default the next
    /// `window_days` days from `today`.
    #[instrument(skip(db, config))]
    pub async fn teacher_upcoming(
        db: &PgPool,
        config: &ScheduleConfig,
        teacher_id: TeacherId,
        query: SessionRangeQuery,
        today: NaiveDate,
    ) -> Result<SessionsResponse, AppError> {
        Self::ensure_teacher(db, teacher_id).await?;
        let range = query
            .resolve(today, config.window_days)
            .map_err(range_error)?;

        let filter = TemplateFilter::Teacher {
            teacher_id,
            module_id: query.module_id,
        };
        let sessions = Self::expand(db, filter, range, config, "teacher_upcoming").await?;

        Ok(SessionsResponse {
            from: range.start,
            to: range.end,
            sessions,
        })
    }

    #[instrument(skip(db, config))]
    pub async fn teacher_week(
        db: &PgPool,
        config: &ScheduleConfig,
        teacher_id: TeacherId,
        week: WeekSelector,
        today: NaiveDate,
    ) -> Result<TeacherWeekResponse, AppError> {
        Self::ensure_teacher(db, teacher_id).await?;
        let range = week.range(today);

        let filter = TemplateFilter::Teacher {
            teacher_id,
            module_id: None,
        };
        let sessions = Self::expand(db, filter, range, config, "teacher_week").await?;

        Ok(TeacherWeekResponse {
            week_start: range.start,
            week_end: range.end,
            sessions,
        })
    }

    /// The week of the student's specialty and current semester, grouped by
    /// date.
    #[instrument(skip(db, config))]
    pub async fn student_week(
        db: &PgPool,
        config: &ScheduleConfig,
        student_id: StudentId,
        week: WeekSelector,
        today: NaiveDate,
    ) -> Result<StudentWeekResponse, AppError> {
        let (specialty_id, semester) = sqlx::query_as::<_, (SpecialtyId, i32)>(
            "SELECT specialty_id, current_semester FROM students WHERE id = $1",
        )
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        let range = week.range(today);
        let filter = TemplateFilter::Cohort {
            specialty_id,
            semester,
        };
        let sessions = Self::expand(db, filter, range, config, "student_week").await?;

        Ok(StudentWeekResponse {
            week_start: range.start,
            week_end: range.end,
            days: group_by_date(sessions),
        })
    }
}
