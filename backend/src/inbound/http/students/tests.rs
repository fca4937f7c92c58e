//! Handler tests for the student records endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockStudentsCommand, MockStudentsQuery, StudentRegistrationError, StudentsCommand,
    StudentsQuery,
};
use crate::domain::{Error, StudentId};
use crate::inbound::http::validation::json_config;

fn ada() -> Student {
    Student::try_from_parts(1, "Ada Lovelace", "ada@example.com").expect("valid student")
}

fn state_with(
    query: impl StudentsQuery + 'static,
    command: impl StudentsCommand + 'static,
) -> HttpState {
    HttpState::new(Arc::new(query), Arc::new(command))
}

#[fixture]
fn idle_query() -> MockStudentsQuery {
    let mut query = MockStudentsQuery::new();
    query.expect_list_students().never();
    query
}

#[fixture]
fn idle_command() -> MockStudentsCommand {
    let mut command = MockStudentsCommand::new();
    command.expect_add_student().never();
    command
}

async fn send(
    state: HttpState,
    request: actix_test::TestRequest,
) -> (StatusCode, Option<String>, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .service(list_students)
            .service(create_student),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, location, value)
}

fn post_json(body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post().uri("/").set_json(body)
}

#[rstest]
#[actix_web::test]
async fn list_returns_students_as_json(idle_command: MockStudentsCommand) {
    let mut query = MockStudentsQuery::new();
    query
        .expect_list_students()
        .times(1)
        .return_once(|| Ok(vec![ada()]));

    let (status, _, body) = send(
        state_with(query, idle_command),
        actix_test::TestRequest::get().uri("/"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"id": 1, "name": "Ada Lovelace", "email": "ada@example.com"}])
    );
}

#[rstest]
#[actix_web::test]
async fn list_returns_empty_array_for_empty_store(idle_command: MockStudentsCommand) {
    let mut query = MockStudentsQuery::new();
    query
        .expect_list_students()
        .times(1)
        .return_once(|| Ok(Vec::new()));

    let (status, _, body) = send(
        state_with(query, idle_command),
        actix_test::TestRequest::get().uri("/"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn list_surfaces_unavailable_storage(idle_command: MockStudentsCommand) {
    let mut query = MockStudentsQuery::new();
    query
        .expect_list_students()
        .times(1)
        .return_once(|| Err(Error::service_unavailable("database unreachable")));

    let (status, _, body) = send(
        state_with(query, idle_command),
        actix_test::TestRequest::get().uri("/"),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], json!("service_unavailable"));
}

#[rstest]
#[actix_web::test]
async fn create_returns_201_with_location(idle_query: MockStudentsQuery) {
    let mut command = MockStudentsCommand::new();
    command
        .expect_add_student()
        .withf(|candidate| {
            candidate.name().as_ref() == "Ada Lovelace"
                && candidate.email().as_ref() == "ada@example.com"
        })
        .times(1)
        .return_once(|candidate| Ok(candidate.into_student(StudentId::new(1).expect("id"))));

    let (status, location, body) = send(
        state_with(idle_query, command),
        post_json(json!({"id": 99, "name": "Ada Lovelace", "email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(location.as_deref(), Some("/1"));
    assert_eq!(
        body,
        json!({"id": 1, "name": "Ada Lovelace", "email": "ada@example.com"})
    );
}

#[rstest]
#[case(json!({"email": "ada@example.com"}), "name", "missing_field")]
#[case(json!({"name": "Ada"}), "email", "missing_field")]
#[case(json!({}), "name", "missing_field")]
#[case(json!({"name": "  ", "email": "ada@example.com"}), "name", "empty_name")]
#[case(json!({"name": "Ada", "email": ""}), "email", "empty_email")]
#[case(json!({"name": "Ada", "email": "not-an-email"}), "email", "invalid_email")]
#[actix_web::test]
async fn create_rejects_invalid_payloads(
    idle_query: MockStudentsQuery,
    idle_command: MockStudentsCommand,
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let (status, location, body) =
        send(state_with(idle_query, idle_command), post_json(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(location.is_none());
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["field"], json!(field));
    assert_eq!(body["details"]["code"], json!(code));
}

#[rstest]
#[actix_web::test]
async fn create_rejects_malformed_json(
    idle_query: MockStudentsQuery,
    idle_command: MockStudentsCommand,
) {
    let request = actix_test::TestRequest::post()
        .uri("/")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\": ");

    let (status, _, body) = send(state_with(idle_query, idle_command), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["code"], json!("invalid_json"));
}

#[rstest]
#[actix_web::test]
async fn create_maps_duplicate_email_to_conflict(idle_query: MockStudentsQuery) {
    let mut command = MockStudentsCommand::new();
    command.expect_add_student().times(1).return_once(|_| {
        Err(StudentRegistrationError::DuplicateEmail {
            email: "ada@example.com".to_owned(),
        })
    });

    let (status, location, body) = send(
        state_with(idle_query, command),
        post_json(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(location.is_none());
    assert_eq!(body["code"], json!("conflict"));
    assert_eq!(
        body["details"],
        json!({"field": "email", "code": "duplicate_email"})
    );
}

#[rstest]
#[actix_web::test]
async fn create_redacts_storage_failures(idle_query: MockStudentsQuery) {
    let mut command = MockStudentsCommand::new();
    command.expect_add_student().times(1).return_once(|_| {
        Err(StudentRegistrationError::Storage {
            message: "relation \"students\" does not exist".to_owned(),
        })
    });

    let (status, _, body) = send(
        state_with(idle_query, command),
        post_json(json!({"name": "Ada", "email": "ada@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], json!("Internal server error"));
}
