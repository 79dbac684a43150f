mod common;

use axum::http::StatusCode;
use common::{
    Cohort, ScheduleFixture, create_cohort, create_schedule, create_student, create_teacher, send,
    setup_test_app,
};
use rollcall_models::ScheduleDay;
use rollcall_models::ids::{ScheduleId, StudentId};
use serde_json::{Value, json};
use sqlx::PgPool;

struct Class {
    cohort: Cohort,
    schedule_id: ScheduleId,
    students: Vec<StudentId>,
}

/// A Monday 08:00 template with three students, created out of
/// alphabetical order.
async fn setup_class(pool: &PgPool) -> Class {
    let mut tx = pool.begin().await.unwrap();
    let cohort = create_cohort(&mut tx, "EB").await;
    let schedule_id = create_schedule(
        &mut tx,
        ScheduleFixture {
            module_id: cohort.module_id,
            teacher_id: cohort.teacher_id,
            specialty_id: cohort.specialty_id,
            day: ScheduleDay::Monday,
            start: "08:00",
            end: "10:00",
            group: None,
        },
    )
    .await;
    let mut students = Vec::new();
    for (number, last_name) in [
        ("EB2025001", "Chraibi"),
        ("EB2025002", "Alaoui"),
        ("EB2025003", "Benali"),
    ] {
        students.push(create_student(&mut tx, cohort.specialty_id, number, last_name, None).await);
    }
    tx.commit().await.unwrap();

    Class {
        cohort,
        schedule_id,
        students,
    }
}

fn session_uri(class: &Class) -> String {
    format!(
        "/api/teachers/{}/sessions/{}",
        class.cohort.teacher_id, class.schedule_id
    )
}

fn batch(date: &str, lines: &[(StudentId, &str)]) -> Value {
    json!({
        "date": date,
        "attendances": lines
            .iter()
            .map(|(student_id, status)| json!({ "student_id": student_id, "status": status }))
            .collect::<Vec<_>>()
    })
}

async fn attendance_rows(pool: &PgPool, schedule_id: ScheduleId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM attendances WHERE schedule_id = $1")
        .bind(schedule_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_roster_before_attendance(pool: PgPool) {
    let class = setup_class(&pool).await;

    let (status, body) = send(setup_test_app(pool.clone()), "GET", &session_uri(&class), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-03-10");
    assert_eq!(body["attendance_taken"], false);
    let names: Vec<_> = body["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["last_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alaoui", "Benali", "Chraibi"]);
    assert!(body["students"][0]["status"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_then_resubmit_updates_in_place(pool: PgPool) {
    let class = setup_class(&pool).await;
    let [a, b, c] = [class.students[0], class.students[1], class.students[2]];

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &session_uri(&class),
        Some(batch(
            "2025-03-10",
            &[(a, "present"), (b, "absent"), (c, "late")],
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attendance_taken"], true);
    assert_eq!(attendance_rows(&pool, class.schedule_id).await, 3);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &session_uri(&class),
        Some(batch(
            "2025-03-10",
            &[(a, "present"), (b, "excused"), (c, "present")],
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attendance_rows(&pool, class.schedule_id).await, 3);

    // Roster is ordered Alaoui (b), Benali (c), Chraibi (a).
    let statuses: Vec<_> = body["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["excused", "present", "present"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_by_other_teacher_forbidden(pool: PgPool) {
    let class = setup_class(&pool).await;
    let mut tx = pool.begin().await.unwrap();
    let other = create_teacher(&mut tx, "Idrissi").await;
    tx.commit().await.unwrap();

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "POST",
        &format!("/api/teachers/{}/sessions/{}", other, class.schedule_id),
        Some(batch("2025-03-10", &[(class.students[0], "present")])),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/teachers/{}/sessions/{}", other, class.schedule_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(attendance_rows(&pool, class.schedule_id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_rejects_duplicate_students(pool: PgPool) {
    let class = setup_class(&pool).await;
    let a = class.students[0];

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &session_uri(&class),
        Some(batch("2025-03-10", &[(a, "present"), (a, "absent")])),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["attendances"].is_array());
    assert_eq!(attendance_rows(&pool, class.schedule_id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_rejects_wrong_weekday(pool: PgPool) {
    let class = setup_class(&pool).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &session_uri(&class),
        Some(batch("2025-03-11", &[(class.students[0], "present")])),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["date"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_save_rejects_student_of_other_specialty(pool: PgPool) {
    let class = setup_class(&pool).await;
    let mut tx = pool.begin().await.unwrap();
    let other = create_cohort(&mut tx, "GE").await;
    let outsider = create_student(&mut tx, other.specialty_id, "GE2025001", "Zerouali", None).await;
    tx.commit().await.unwrap();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &session_uri(&class),
        Some(batch(
            "2025-03-10",
            &[(class.students[0], "present"), (outsider, "present")],
        )),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["attendances"].is_array());
    assert_eq!(attendance_rows(&pool, class.schedule_id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_empty_batch_rejected(pool: PgPool) {
    let class = setup_class(&pool).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        &session_uri(&class),
        Some(json!({ "date": "2025-03-10", "attendances": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["attendances"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_history_counts_per_session(pool: PgPool) {
    let class = setup_class(&pool).await;
    let [a, b, c] = [class.students[0], class.students[1], class.students[2]];

    for (date, statuses) in [
        ("2025-03-03", ["present", "present", "absent"]),
        ("2025-03-10", ["present", "late", "excused"]),
    ] {
        let (status, _) = send(
            setup_test_app(pool.clone()),
            "POST",
            &session_uri(&class),
            Some(batch(
                date,
                &[(a, statuses[0]), (b, statuses[1]), (c, statuses[2])],
            )),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!(
            "/api/teachers/{}/attendance/history",
            class.cohort.teacher_id
        ),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    let newest = &body["data"][0];
    assert_eq!(newest["attendance_date"], "2025-03-10");
    assert_eq!(newest["total"], 3);
    assert_eq!(newest["present"], 1);
    assert_eq!(newest["late"], 1);
    assert_eq!(newest["excused"], 1);
    assert_eq!(body["data"][1]["absent"], 1);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!(
            "/api/teachers/{}/attendance/history?from=2025-03-05&per_page=1",
            class.cohort.teacher_id
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_history_inverted_range(pool: PgPool) {
    let class = setup_class(&pool).await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!(
            "/api/teachers/{}/attendance/history?from=2025-03-10&to=2025-03-01",
            class.cohort.teacher_id
        ),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["from"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_attendance_records(pool: PgPool) {
    let class = setup_class(&pool).await;
    let a = class.students[0];

    send(
        setup_test_app(pool.clone()),
        "POST",
        &session_uri(&class),
        Some(batch("2025-03-10", &[(a, "late")])),
    )
    .await;

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/students/{}/attendance", a),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["status"], "late");
    assert_eq!(body["data"][0]["module_code"], "EB-M01");
    assert_eq!(body["data"][0]["teacher_name"], "Test Haddad");

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/students/{}/attendance", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
