mod common;

use axum::http::StatusCode;
use common::{
    Cohort, ScheduleFixture, create_cohort, create_schedule, create_student, send, setup_test_app,
};
use rollcall_models::ScheduleDay;
use serde_json::{Value, json};
use sqlx::PgPool;

fn template(cohort: &Cohort, day: &str, start: &str, end: &str, group: Option<&str>) -> Value {
    json!({
        "module_id": cohort.module_id,
        "teacher_id": cohort.teacher_id,
        "specialty_id": cohort.specialty_id,
        "day": day,
        "start_time": start,
        "end_time": end,
        "classroom": "R101",
        "semester": 1,
        "academic_year": "2024-2025",
        "group": group
    })
}

async fn create(pool: &PgPool, body: Value) -> (StatusCode, Value) {
    send(setup_test_app(pool.clone()), "POST", "/api/schedules", Some(body)).await
}

async fn setup_cohort(pool: &PgPool) -> Cohort {
    let mut tx = pool.begin().await.unwrap();
    let cohort = create_cohort(&mut tx, "EB").await;
    tx.commit().await.unwrap();
    cohort
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_schedule_returns_details(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;

    let (status, body) = create(&pool, template(&cohort, "monday", "08:00", "10:00", None)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["day"], "monday");
    assert_eq!(body["start_time"], "08:00");
    assert_eq!(body["end_time"], "10:00");
    assert_eq!(body["module_code"], "EB-M01");
    assert_eq!(body["teacher_name"], "Test Haddad");
    assert_eq!(body["specialty_name"], "Specialty EB");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_overlapping_template_rejected(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;
    create(&pool, template(&cohort, "monday", "08:00", "10:00", None)).await;

    let (status, body) = create(&pool, template(&cohort, "monday", "09:00", "11:00", None)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Schedule conflict detected")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_back_to_back_templates_allowed(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;
    create(&pool, template(&cohort, "monday", "08:00", "10:00", None)).await;

    let (status, _) = create(&pool, template(&cohort, "monday", "10:00", "12:00", None)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = create(&pool, template(&cohort, "tuesday", "08:00", "10:00", None)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_other_academic_year_does_not_conflict(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;
    create(&pool, template(&cohort, "monday", "08:00", "10:00", None)).await;

    let mut next_year = template(&cohort, "monday", "08:00", "10:00", None);
    next_year["academic_year"] = json!("2025-2026");
    let (status, _) = create(&pool, next_year).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_group_rules(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;
    create(&pool, template(&cohort, "monday", "08:00", "10:00", Some("G1"))).await;

    // Another group may share the slot.
    let (status, _) = create(&pool, template(&cohort, "monday", "08:00", "10:00", Some("G2"))).await;
    assert_eq!(status, StatusCode::CREATED);

    // The same group may not.
    let (status, _) = create(&pool, template(&cohort, "monday", "09:00", "10:00", Some("G1"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // A whole-cohort template on Tuesday blocks every group.
    create(&pool, template(&cohort, "tuesday", "08:00", "10:00", None)).await;
    let (status, _) = create(&pool, template(&cohort, "tuesday", "09:00", "11:00", Some("G1"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_day_outside_week_rejected(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;

    let (status, body) = create(&pool, template(&cohort, "friday", "08:00", "10:00", None)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["day"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_end_before_start_rejected(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;

    let (status, body) = create(&pool, template(&cohort, "monday", "10:00", "08:00", None)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["end_time"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_teacher_not_found(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;

    let mut body = template(&cohort, "monday", "08:00", "10:00", None);
    body["teacher_id"] = json!(uuid::Uuid::new_v4());
    let (status, _) = create(&pool, body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_checks_conflicts_excluding_itself(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;
    create(&pool, template(&cohort, "monday", "08:00", "10:00", None)).await;
    let (_, second) = create(&pool, template(&cohort, "monday", "10:00", "12:00", None)).await;
    let uri = format!("/api/schedules/{}", second["id"].as_str().unwrap());

    // Changing a field other than the slot keeps the template valid.
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(json!({ "classroom": "R202" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classroom"], "R202");
    assert_eq!(body["start_time"], "10:00");

    // Moving it onto the first template conflicts.
    let (status, _) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(json!({ "start_time": "09:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Clearing the classroom is an explicit null.
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(json!({ "classroom": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["classroom"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_and_delete(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;
    create(&pool, template(&cohort, "monday", "08:00", "10:00", None)).await;
    let (_, tuesday) = create(&pool, template(&cohort, "tuesday", "08:00", "10:00", None)).await;

    let (status, listed) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/schedules?specialty_id={}&day=tuesday", cohort.specialty_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], tuesday["id"]);

    let uri = format!("/api/schedules/{}", tuesday["id"].as_str().unwrap());
    let (status, _) = send(setup_test_app(pool.clone()), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(setup_test_app(pool.clone()), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_groups_of_specialty(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let cohort = create_cohort(&mut tx, "EB").await;
    create_student(&mut tx, cohort.specialty_id, "EB2025001", "Alaoui", Some("G2")).await;
    create_student(&mut tx, cohort.specialty_id, "EB2025002", "Benali", Some("G1")).await;
    create_student(&mut tx, cohort.specialty_id, "EB2025003", "Chraibi", Some("G1")).await;
    create_student(&mut tx, cohort.specialty_id, "EB2025004", "Daoudi", None).await;
    tx.commit().await.unwrap();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/schedules/groups?specialty_id={}", cohort.specialty_id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"], json!(["G1", "G2"]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_overlapping_creates_admit_one(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;

    for day in ["monday", "tuesday", "wednesday", "thursday", "saturday"] {
        let ((first, _), (second, _)) = tokio::join!(
            create(&pool, template(&cohort, day, "08:00", "09:00", None)),
            create(&pool, template(&cohort, day, "08:30", "09:30", None)),
        );

        let created = [first, second]
            .iter()
            .filter(|status| **status == StatusCode::CREATED)
            .count();
        assert_eq!(created, 1, "{day}: {first} / {second}");
    }

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedules WHERE specialty_id = $1")
        .bind(cohort.specialty_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_template_on_dropped_day_stays_editable(pool: PgPool) {
    // Friday is outside the default allowed days, as if SCHEDULE_DAYS had
    // changed after the template was created.
    let mut tx = pool.begin().await.unwrap();
    let cohort = create_cohort(&mut tx, "EB").await;
    let friday = create_schedule(
        &mut tx,
        ScheduleFixture {
            module_id: cohort.module_id,
            teacher_id: cohort.teacher_id,
            specialty_id: cohort.specialty_id,
            day: ScheduleDay::Friday,
            start: "08:00",
            end: "10:00",
            group: None,
        },
    )
    .await;
    tx.commit().await.unwrap();
    let uri = format!("/api/schedules/{}", friday);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(json!({ "classroom": "R305" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["day"], "friday");
    assert_eq!(body["classroom"], "R305");

    // Naming the day explicitly still goes through the allowed set.
    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(json!({ "day": "friday" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["day"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_moving_template_to_another_day_checks_target(pool: PgPool) {
    let cohort = setup_cohort(&pool).await;
    let (_, monday) = create(&pool, template(&cohort, "monday", "08:00", "10:00", None)).await;
    create(&pool, template(&cohort, "tuesday", "09:00", "11:00", None)).await;
    let uri = format!("/api/schedules/{}", monday["id"].as_str().unwrap());

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(json!({ "day": "tuesday" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "PUT",
        &uri,
        Some(json!({ "day": "wednesday" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["day"], "wednesday");
}
