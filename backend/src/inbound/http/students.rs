//! Student records API handlers.
//!
//! ```text
//! GET  /                                   -> 200 [{"id":1,"name":"Ada","email":"ada@example.com"}]
//! POST / {"name":"Ada","email":"ada@example.com"} -> 201 {"id":1,...}
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{NewStudent, Student};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, StudentSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    EMAIL, NAME, map_student_validation_error, require_field,
};

/// Request body for `POST /`.
///
/// Fields are optional so a missing field surfaces as a `missing_field`
/// validation error rather than a JSON parse failure. Any client-supplied
/// `id` is ignored.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateStudentRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
}

impl TryFrom<CreateStudentRequest> for NewStudent {
    type Error = crate::domain::Error;

    fn try_from(value: CreateStudentRequest) -> Result<Self, Self::Error> {
        let name = require_field(value.name, NAME)?;
        let email = require_field(value.email, EMAIL)?;
        NewStudent::try_from_strings(name, email).map_err(map_student_validation_error)
    }
}

/// List every student in ascending id order.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use student_records::inbound::http::students::list_students;
///
/// let app = App::new().service(list_students);
/// ```
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "All students", body = [StudentSchema]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/")]
pub async fn list_students(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Student>>> {
    let students = state.students.list_students().await?;
    Ok(web::Json(students))
}

/// Register a student and return the stored record.
#[utoipa::path(
    post,
    path = "/",
    request_body = CreateStudentRequest,
    responses(
        (
            status = 201,
            description = "Student registered",
            body = StudentSchema,
            headers(("Location" = String, description = "Path of the new record"))
        ),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "createStudent"
)]
#[post("/")]
pub async fn create_student(
    state: web::Data<HttpState>,
    payload: web::Json<CreateStudentRequest>,
) -> ApiResult<HttpResponse> {
    let candidate = NewStudent::try_from(payload.into_inner())?;
    debug!(email = %candidate.email(), "registering student");
    let student = state.registrations.add_student(candidate).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/{}", student.id())))
        .json(student))
}

#[cfg(test)]
mod tests;
