//! Schedule conflict detection.
//!
//! Two templates of the same specialty, academic year and day conflict when
//! their half-open time ranges overlap and their groups collide. A grouped
//! candidate collides with the same group and with whole-specialty
//! templates; a whole-specialty candidate collides only with other
//! whole-specialty templates.

use anyhow::Context;
use chrono::NaiveTime;
use rollcall_core::AppError;
use rollcall_models::ScheduleDay;
use rollcall_models::ids::{ScheduleId, SpecialtyId};
use sqlx::PgConnection;
use tracing::instrument;

use crate::modules::schedules::model::{Schedule, SlotCandidate};

pub(crate) const SCHEDULE_COLUMNS: &str = "id, module_id, teacher_id, specialty_id, day, start_time, \
     end_time, classroom, semester, academic_year, group_name, study_mode, created_at, updated_at";

/// Back-to-back ranges do not overlap.
pub fn overlaps(a_start: NaiveTime, a_end: NaiveTime, b_start: NaiveTime, b_end: NaiveTime) -> bool {
    a_start < b_end && a_end > b_start
}

pub fn groups_collide(candidate: Option<&str>, existing: Option<&str>) -> bool {
    match (candidate, existing) {
        (Some(c), Some(e)) => c == e,
        (Some(_), None) => true,
        (None, None) => true,
        (None, Some(_)) => false,
    }
}

pub fn conflicts_with(candidate: &SlotCandidate, existing: &Schedule) -> bool {
    candidate.specialty_id == existing.specialty_id
        && candidate.academic_year == existing.academic_year
        && candidate.day == existing.day
        && overlaps(
            candidate.start_time,
            candidate.end_time,
            existing.start_time,
            existing.end_time,
        )
        && groups_collide(candidate.group.as_deref(), existing.group.as_deref())
}

/// Advisory lock key for one (specialty, academic year, day) slot.
pub fn slot_key(specialty_id: SpecialtyId, academic_year: &str, day: ScheduleDay) -> String {
    format!("schedule:{}:{}:{}", specialty_id, academic_year, day)
}

/// Locks every slot in `keys` until the transaction ends.
///
/// Keys are taken in sorted order so two updates moving templates between
/// the same pair of slots cannot deadlock.
#[instrument(skip(conn))]
pub async fn lock_slots(conn: &mut PgConnection, mut keys: Vec<String>) -> Result<(), AppError> {
    keys.sort();
    keys.dedup();
    for key in &keys {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(key)
            .execute(&mut *conn)
            .await
            .context("Failed to lock schedule slot")
            .map_err(AppError::database)?;
    }
    Ok(())
}

/// First template, by start time, that `candidate` would conflict with.
///
/// Callers hold the slot lock from [`lock_slots`] so no overlapping template
/// can be committed between this read and their write.
#[instrument(skip(conn))]
pub async fn find_conflict(
    conn: &mut PgConnection,
    candidate: &SlotCandidate,
    exclude: Option<ScheduleId>,
) -> Result<Option<Schedule>, AppError> {
    let same_day = sqlx::query_as::<_, Schedule>(&format!(
        r#"SELECT {} FROM schedules
           WHERE specialty_id = $1 AND academic_year = $2 AND day = $3
             AND ($4::uuid IS NULL OR id <> $4)
           ORDER BY start_time, id"#,
        SCHEDULE_COLUMNS
    ))
    .bind(candidate.specialty_id)
    .bind(&candidate.academic_year)
    .bind(candidate.day)
    .bind(exclude)
    .fetch_all(conn)
    .await
    .context("Failed to load templates for conflict check")
    .map_err(AppError::database)?;

    Ok(same_day
        .into_iter()
        .find(|existing| conflicts_with(candidate, existing)))
}
