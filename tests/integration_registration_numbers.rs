mod common;

use axum::http::StatusCode;
use common::{create_specialty, create_student, send, setup_test_app};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_numbers_are_consecutive(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let specialty_id = create_specialty(&mut tx, "EB").await;
    tx.commit().await.unwrap();

    let body = json!({ "specialty_id": specialty_id });
    let (status, first) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/registration-numbers",
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["number"], "EB2025001");
    assert_eq!(first["academic_year"], "2025-2026");
    assert_eq!(first["specialty_name"], "Specialty EB");

    let (status, second) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/registration-numbers",
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["number"], "EB2025002");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_continues_after_highest_number(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let specialty_id = create_specialty(&mut tx, "EB").await;
    tx.commit().await.unwrap();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/registration-numbers/bulk",
        Some(json!({ "specialty_id": specialty_id, "count": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["numbers"],
        json!(["EB2025001", "EB2025002", "EB2025003"])
    );

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/registration-numbers",
        Some(json!({ "specialty_id": specialty_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["number"], "EB2025004");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_bulk_count_out_of_range(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let specialty_id = create_specialty(&mut tx, "EB").await;
    tx.commit().await.unwrap();

    for count in [0, 501] {
        let (status, body) = send(
            setup_test_app(pool.clone()),
            "POST",
            "/api/registration-numbers/bulk",
            Some(json!({ "specialty_id": specialty_id, "count": count })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["fields"]["count"].is_array());
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_generate_for_unknown_specialty(pool: PgPool) {
    let (status, _) = send(
        setup_test_app(pool),
        "POST",
        "/api/registration-numbers",
        Some(json!({ "specialty_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_available_and_used_listings(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let specialty_id = create_specialty(&mut tx, "EB").await;
    create_student(&mut tx, specialty_id, "EB2025001", "Benali", None).await;
    tx.commit().await.unwrap();

    send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/registration-numbers",
        Some(json!({ "specialty_id": specialty_id })),
    )
    .await;

    let (status, available) = send(
        setup_test_app(pool.clone()),
        "GET",
        &format!("/api/registration-numbers/available?specialty_id={}", specialty_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let available = available.as_array().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["number"], "EB2025002");

    let (status, used) = send(
        setup_test_app(pool.clone()),
        "GET",
        "/api/registration-numbers/used",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let used = used.as_array().unwrap();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0]["number"], "EB2025001");
    assert_eq!(used[0]["student_name"], "Test Benali");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_used_number_rejected(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let specialty_id = create_specialty(&mut tx, "EB").await;
    create_student(&mut tx, specialty_id, "EB2025001", "Benali", None).await;
    tx.commit().await.unwrap();

    let id: uuid::Uuid =
        sqlx::query_scalar("SELECT id FROM registration_numbers WHERE number = 'EB2025001'")
            .fetch_one(&pool)
            .await
            .unwrap();

    let (status, _) = send(
        setup_test_app(pool.clone()),
        "DELETE",
        &format!("/api/registration-numbers/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_available_number(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let specialty_id = create_specialty(&mut tx, "EB").await;
    tx.commit().await.unwrap();

    let (_, generated) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/registration-numbers",
        Some(json!({ "specialty_id": specialty_id })),
    )
    .await;
    let uri = format!("/api/registration-numbers/{}", generated["id"].as_str().unwrap());

    let (status, _) = send(setup_test_app(pool.clone()), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(setup_test_app(pool.clone()), "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_long_specialty_code(pool: PgPool) {
    let code = "MAINTENANCE-INDUSTR";
    let mut tx = pool.begin().await.unwrap();
    let specialty_id = create_specialty(&mut tx, code).await;
    tx.commit().await.unwrap();

    let (status, body) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/registration-numbers",
        Some(json!({ "specialty_id": specialty_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let number = body["number"].as_str().unwrap().to_string();
    assert_eq!(number, format!("{}2025001", code));

    let (status, student) = send(
        setup_test_app(pool.clone()),
        "POST",
        "/api/registrations",
        Some(json!({
            "registration_number": number,
            "specialty_id": specialty_id,
            "first_name": "Amina",
            "last_name": "Benali",
            "email": "amina@test.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(student["registration_number"], number);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_generate_issues_distinct_numbers(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let specialty_id = create_specialty(&mut tx, "EB").await;
    tx.commit().await.unwrap();

    let mut requests = tokio::task::JoinSet::new();
    for _ in 0..5 {
        let app = setup_test_app(pool.clone());
        requests.spawn(async move {
            send(
                app,
                "POST",
                "/api/registration-numbers",
                Some(json!({ "specialty_id": specialty_id })),
            )
            .await
        });
    }

    let mut numbers = Vec::new();
    while let Some(result) = requests.join_next().await {
        let (status, body) = result.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        numbers.push(body["number"].as_str().unwrap().to_string());
    }
    numbers.sort();

    assert_eq!(
        numbers,
        vec!["EB2025001", "EB2025002", "EB2025003", "EB2025004", "EB2025005"]
    );
}
