//! Template expansion.
//!
//! Pure functions: the service loads templates and the recorded
//! (template, date) pairs, these turn them into dated sessions.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, TimeDelta};
use rollcall_models::ScheduleDay;
use rollcall_models::ids::ScheduleId;

use crate::modules::schedules::model::ScheduleWithDetails;
use crate::modules::sessions::model::{DateRange, DaySessions, Session};

/// (template, date) pairs with at least one attendance row.
pub type RecordedSessions = HashSet<(ScheduleId, NaiveDate)>;

/// One session per template per matching date, ordered by date then start
/// time. Templates with equal start times keep their input order.
///
/// The session end is `start_time + duration`, wrapping past midnight.
pub fn expand_sessions(
    templates: &[ScheduleWithDetails],
    range: DateRange,
    recorded: &RecordedSessions,
    duration: TimeDelta,
) -> Vec<Session> {
    let mut sessions: Vec<Session> = range
        .days()
        .flat_map(move |date| {
            let day = ScheduleDay::from_weekday(date.weekday());
            templates
                .iter()
                .filter(move |template| template.day == day)
                .map(move |template| {
                    let (end_time, _) = template.start_time.overflowing_add_signed(duration);
                    Session {
                        schedule_id: template.id,
                        module_id: template.module_id,
                        module_code: template.module_code.clone(),
                        module_name: template.module_name.clone(),
                        teacher_id: template.teacher_id,
                        teacher_name: template.teacher_name.clone(),
                        specialty_id: template.specialty_id,
                        classroom: template.classroom.clone(),
                        group: template.group.clone(),
                        date,
                        day_name: day.display_name().to_string(),
                        start_time: template.start_time,
                        end_time,
                        attendance_taken: recorded.contains(&(template.id, date)),
                    }
                })
        })
        .collect();

    sessions.sort_by_key(|session| (session.date, session.start_time));
    sessions
}

/// Groups date-ordered sessions by date, keeping their order within a day.
pub fn group_by_date(sessions: Vec<Session>) -> Vec<DaySessions> {
    let mut days: Vec<DaySessions> = Vec::new();

    for session in sessions {
        match days.last_mut() {
            Some(current) if current.date == session.date => current.sessions.push(session),
            _ => days.push(DaySessions {
                date: session.date,
                day_name: session.day_name.clone(),
                sessions: vec![session],
            }),
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rollcall_models::StudyMode;
    use rollcall_models::ids::{ModuleId, SpecialtyId, TeacherId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn template(day: ScheduleDay, start: NaiveTime, code: &str) -> ScheduleWithDetails {
        ScheduleWithDetails {
            id: ScheduleId::new(),
            module_id: ModuleId::new(),
            module_code: code.to_string(),
            module_name: format!("Module {}", code),
            teacher_id: TeacherId::new(),
            teacher_name: "Amina Haddad".to_string(),
            specialty_id: SpecialtyId::new(),
            specialty_name: "Electronics".to_string(),
            day,
            start_time: start,
            end_time: start + TimeDelta::minutes(90),
            classroom: Some("B12".to_string()),
            semester: 1,
            academic_year: "2024-2025".to_string(),
            group: None,
            study_mode: StudyMode::Initial,
        }
    }

    fn hour() -> TimeDelta {
        TimeDelta::minutes(60)
    }

    #[test]
    fn test_expands_matching_days_only() {
        // 2025-03-10 is a Monday.
        let templates = vec![
            template(ScheduleDay::Monday, time(8, 0), "M1"),
            template(ScheduleDay::Wednesday, time(10, 0), "M2"),
        ];
        let range = DateRange::new(date(2025, 3, 10), date(2025, 3, 16)).unwrap();

        let sessions = expand_sessions(&templates, range, &RecordedSessions::new(), hour());

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].date, date(2025, 3, 10));
        assert_eq!(sessions[0].day_name, "Monday");
        assert_eq!(sessions[1].date, date(2025, 3, 12));
        assert_eq!(sessions[1].day_name, "Wednesday");
    }

    #[test]
    fn test_end_time_uses_configured_duration() {
        let templates = vec![template(ScheduleDay::Monday, time(8, 0), "M1")];
        let range = DateRange::single(date(2025, 3, 10));

        let sessions = expand_sessions(&templates, range, &RecordedSessions::new(), hour());
        assert_eq!(sessions[0].end_time, time(9, 0));

        let late = vec![template(ScheduleDay::Monday, time(23, 30), "M1")];
        let sessions = expand_sessions(&late, range, &RecordedSessions::new(), hour());
        assert_eq!(sessions[0].end_time, time(0, 30));
    }

    #[test]
    fn test_sorted_by_date_then_start_with_stable_ties() {
        let a = template(ScheduleDay::Monday, time(10, 0), "A");
        let b = template(ScheduleDay::Monday, time(8, 0), "B");
        let c = template(ScheduleDay::Monday, time(8, 0), "C");
        let templates = vec![a, b, c];
        let range = DateRange::new(date(2025, 3, 10), date(2025, 3, 17)).unwrap();

        let sessions = expand_sessions(&templates, range, &RecordedSessions::new(), hour());
        let codes: Vec<_> = sessions.iter().map(|s| s.module_code.as_str()).collect();

        assert_eq!(codes, vec!["B", "C", "A", "B", "C", "A"]);
        assert_eq!(
            expand_sessions(&templates, range, &RecordedSessions::new(), hour()),
            sessions
        );
    }

    #[test]
    fn test_attendance_taken_per_date() {
        let monday = template(ScheduleDay::Monday, time(8, 0), "M1");
        let mut recorded = RecordedSessions::new();
        recorded.insert((monday.id, date(2025, 3, 10)));
        let range = DateRange::new(date(2025, 3, 10), date(2025, 3, 17)).unwrap();

        let sessions = expand_sessions(&[monday], range, &recorded, hour());

        assert!(sessions[0].attendance_taken);
        assert!(!sessions[1].attendance_taken);
    }

    #[test]
    fn test_template_without_matching_day_yields_nothing() {
        let templates = vec![template(ScheduleDay::Friday, time(8, 0), "M1")];
        let range = DateRange::new(date(2025, 3, 10), date(2025, 3, 13)).unwrap();

        assert!(expand_sessions(&templates, range, &RecordedSessions::new(), hour()).is_empty());
    }

    #[test]
    fn test_group_by_date() {
        let templates = vec![
            template(ScheduleDay::Monday, time(10, 0), "A"),
            template(ScheduleDay::Monday, time(8, 0), "B"),
            template(ScheduleDay::Tuesday, time(9, 0), "C"),
        ];
        let range = DateRange::new(date(2025, 3, 10), date(2025, 3, 16)).unwrap();
        let sessions = expand_sessions(&templates, range, &RecordedSessions::new(), hour());

        let days = group_by_date(sessions);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_name, "Monday");
        assert_eq!(days[0].sessions.len(), 2);
        assert_eq!(days[0].sessions[0].module_code, "B");
        assert_eq!(days[1].date, date(2025, 3, 11));
        assert_eq!(days[1].sessions[0].module_code, "C");
    }

    #[test]
    fn test_group_by_date_empty() {
        assert!(group_by_date(Vec::new()).is_empty());
    }
}
