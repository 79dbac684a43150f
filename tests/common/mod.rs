#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, NaiveTime};
use http_body_util::BodyExt;
use rollcall::rollcall_config::ScheduleConfig;
use rollcall::rollcall_core::FixedClock;
use rollcall::router::init_router;
use rollcall::state::AppState;
use rollcall_models::ScheduleDay;
use rollcall_models::ids::{ModuleId, ScheduleId, SpecialtyId, StudentId, TeacherId};
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

pub const ACADEMIC_YEAR: &str = "2024-2025";

/// Monday 10 March 2025, the date every test app is pinned to.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    let mut state = AppState::from_env(pool).with_clock(FixedClock::on(today()));
    state.schedule_config = ScheduleConfig::default();
    init_router(state)
}

/// Sends a request and returns the status with the parsed JSON body, or
/// `Value::Null` when the body is empty.
pub async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

pub async fn create_specialty(tx: &mut Transaction<'_, Postgres>, code: &str) -> SpecialtyId {
    sqlx::query_scalar(
        "INSERT INTO specialties (name, code, duration_semesters) VALUES ($1, $2, 4) RETURNING id",
    )
    .bind(format!("Specialty {}", code))
    .bind(code)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub async fn create_module(
    tx: &mut Transaction<'_, Postgres>,
    specialty_id: SpecialtyId,
    code: &str,
    semester: i32,
) -> ModuleId {
    sqlx::query_scalar(
        r#"INSERT INTO modules (specialty_id, code, name, semester, hours_per_week)
           VALUES ($1, $2, $3, $4, 3) RETURNING id"#,
    )
    .bind(specialty_id)
    .bind(code)
    .bind(format!("Module {}", code))
    .bind(semester)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub async fn create_teacher(tx: &mut Transaction<'_, Postgres>, last_name: &str) -> TeacherId {
    sqlx::query_scalar(
        "INSERT INTO teachers (first_name, last_name, email) VALUES ('Test', $1, $2) RETURNING id",
    )
    .bind(last_name)
    .bind(format!("teacher-{}@test.com", Uuid::new_v4()))
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

/// An approved student in semester 1 holding `number`, which is recorded as
/// used.
pub async fn create_student(
    tx: &mut Transaction<'_, Postgres>,
    specialty_id: SpecialtyId,
    number: &str,
    last_name: &str,
    group: Option<&str>,
) -> StudentId {
    sqlx::query(
        r#"INSERT INTO registration_numbers (number, specialty_id, academic_year, is_used, used_at)
           VALUES ($1, $2, $3, TRUE, NOW())"#,
    )
    .bind(number)
    .bind(specialty_id)
    .bind(ACADEMIC_YEAR)
    .execute(&mut **tx)
    .await
    .unwrap();

    sqlx::query_scalar(
        r#"INSERT INTO students (specialty_id, registration_number, first_name, last_name, email,
                                 current_semester, group_name, is_approved)
           VALUES ($1, $2, 'Test', $3, $4, 1, $5, TRUE) RETURNING id"#,
    )
    .bind(specialty_id)
    .bind(number)
    .bind(last_name)
    .bind(format!("student-{}@test.com", Uuid::new_v4()))
    .bind(group)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub struct ScheduleFixture<'a> {
    pub module_id: ModuleId,
    pub teacher_id: TeacherId,
    pub specialty_id: SpecialtyId,
    pub day: ScheduleDay,
    pub start: &'a str,
    pub end: &'a str,
    pub group: Option<&'a str>,
}

pub async fn create_schedule(
    tx: &mut Transaction<'_, Postgres>,
    fixture: ScheduleFixture<'_>,
) -> ScheduleId {
    sqlx::query_scalar(
        r#"INSERT INTO schedules (module_id, teacher_id, specialty_id, day, start_time, end_time,
                                  classroom, semester, academic_year, group_name)
           VALUES ($1, $2, $3, $4, $5, $6, 'R101', 1, $7, $8) RETURNING id"#,
    )
    .bind(fixture.module_id)
    .bind(fixture.teacher_id)
    .bind(fixture.specialty_id)
    .bind(fixture.day)
    .bind(time(fixture.start))
    .bind(time(fixture.end))
    .bind(ACADEMIC_YEAR)
    .bind(fixture.group)
    .fetch_one(&mut **tx)
    .await
    .unwrap()
}

pub fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap()
}

/// A specialty with one semester-1 module and one teacher.
pub struct Cohort {
    pub specialty_id: SpecialtyId,
    pub module_id: ModuleId,
    pub teacher_id: TeacherId,
}

pub async fn create_cohort(tx: &mut Transaction<'_, Postgres>, code: &str) -> Cohort {
    let specialty_id = create_specialty(tx, code).await;
    let module_id = create_module(tx, specialty_id, &format!("{}-M01", code), 1).await;
    let teacher_id = create_teacher(tx, "Haddad").await;
    Cohort {
        specialty_id,
        module_id,
        teacher_id,
    }
}
