//! Weekly schedule template seeding.
//!
//! Each specialty's modules are laid out over the week's slots in order, so
//! no two templates of the same specialty share a day and time.

use chrono::NaiveTime;
use rollcall_models::DaySet;
use rollcall_models::ids::{ModuleId, SpecialtyId, TeacherId};
use rollcall_models::registration_numbers::academic_year_label;
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Instant;

use super::models::ScheduleSeed;
use super::values_placeholders;

const BATCH_SIZE: usize = 500;

/// Start and end of each teaching slot, as (hour, minute) pairs.
const SLOTS: [((u32, u32), (u32, u32)); 4] = [
    ((8, 0), (9, 30)),
    ((10, 0), (11, 30)),
    ((13, 0), (14, 30)),
    ((15, 0), (16, 30)),
];

fn slot_times(index: usize) -> Option<(NaiveTime, NaiveTime)> {
    let ((sh, sm), (eh, em)) = SLOTS[index % SLOTS.len()];
    Some((
        NaiveTime::from_hms_opt(sh, sm, 0)?,
        NaiveTime::from_hms_opt(eh, em, 0)?,
    ))
}

/// One template per module until the specialty's week is full. Teachers are
/// handed out round-robin across all specialties.
pub fn generate_schedules(
    modules: &[(ModuleId, SpecialtyId, i32)],
    teachers: &[TeacherId],
    days: &DaySet,
    year: i32,
) -> Vec<ScheduleSeed> {
    if teachers.is_empty() {
        return Vec::new();
    }

    let capacity = days.days().len() * SLOTS.len();
    let academic_year = academic_year_label(year);
    let mut used: HashMap<SpecialtyId, usize> = HashMap::new();
    let mut schedules = Vec::with_capacity(modules.len());

    for (module_id, specialty_id, semester) in modules {
        let position = used.entry(*specialty_id).or_insert(0);
        if *position >= capacity {
            continue;
        }

        let day = days.days()[*position / SLOTS.len()];
        let Some((start_time, end_time)) = slot_times(*position) else {
            continue;
        };
        let teacher_id = teachers[schedules.len() % teachers.len()];

        schedules.push(ScheduleSeed {
            module_id: *module_id,
            teacher_id,
            specialty_id: *specialty_id,
            day,
            start_time,
            end_time,
            classroom: format!("R{}", 101 + *position % SLOTS.len()),
            semester: *semester,
            academic_year: academic_year.clone(),
        });
        *position += 1;
    }

    schedules
}

pub async fn seed_schedules(
    db: &PgPool,
    modules: &[(ModuleId, SpecialtyId, i32)],
    teachers: &[TeacherId],
    year: i32,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📅 Seeding schedule templates...");

    let schedules = generate_schedules(modules, teachers, &DaySet::default(), year);
    let mut tx = db.begin().await?;

    for chunk in schedules.chunks(BATCH_SIZE) {
        let query = format!(
            "INSERT INTO schedules (module_id, teacher_id, specialty_id, day, start_time, end_time, \
             classroom, semester, academic_year) VALUES {}",
            values_placeholders(chunk.len(), 9)
        );
        let mut q = sqlx::query(&query);
        for schedule in chunk {
            q = q
                .bind(schedule.module_id)
                .bind(schedule.teacher_id)
                .bind(schedule.specialty_id)
                .bind(schedule.day)
                .bind(schedule.start_time)
                .bind(schedule.end_time)
                .bind(&schedule.classroom)
                .bind(schedule.semester)
                .bind(&schedule.academic_year);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} schedules in {:?}",
        schedules.len(),
        start_time.elapsed()
    );
    Ok(schedules.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn modules_for(specialty_id: SpecialtyId, count: usize) -> Vec<(ModuleId, SpecialtyId, i32)> {
        (0..count)
            .map(|idx| (ModuleId::new(), specialty_id, 1 + (idx % 2) as i32))
            .collect()
    }

    #[test]
    fn test_specialty_slots_never_repeat() {
        let specialty = SpecialtyId::new();
        let modules = modules_for(specialty, 10);
        let teachers = vec![TeacherId::new(), TeacherId::new()];

        let schedules = generate_schedules(&modules, &teachers, &DaySet::default(), 2025);
        assert_eq!(schedules.len(), 10);

        let slots: HashSet<_> = schedules.iter().map(|s| (s.day, s.start_time)).collect();
        assert_eq!(slots.len(), schedules.len());
        assert!(schedules.iter().all(|s| s.end_time > s.start_time));
    }

    #[test]
    fn test_full_week_drops_extra_modules() {
        let specialty = SpecialtyId::new();
        let days = DaySet::default();
        let capacity = days.days().len() * SLOTS.len();
        let modules = modules_for(specialty, capacity + 3);

        let schedules = generate_schedules(&modules, &[TeacherId::new()], &days, 2025);
        assert_eq!(schedules.len(), capacity);
    }

    #[test]
    fn test_teachers_assigned_round_robin() {
        let modules = modules_for(SpecialtyId::new(), 4);
        let teachers = vec![TeacherId::new(), TeacherId::new()];

        let schedules = generate_schedules(&modules, &teachers, &DaySet::default(), 2025);
        let assigned: Vec<_> = schedules.iter().map(|s| s.teacher_id).collect();
        assert_eq!(
            assigned,
            vec![teachers[0], teachers[1], teachers[0], teachers[1]]
        );
        assert_eq!(schedules[0].academic_year, "2025-2026");
    }

    #[test]
    fn test_no_teachers_means_no_schedules() {
        let modules = modules_for(SpecialtyId::new(), 3);
        assert!(generate_schedules(&modules, &[], &DaySet::default(), 2025).is_empty());
    }
}
