//! User endpoints.
//!
//! ```text
//! GET    /                       list users
//! POST   /create                 multipart: `data` (JSON profile) + `image`
//! GET    /user/{id}              user with expanded blogs
//! PUT    /user/{id}              multipart partial update
//! DELETE /user/{id}
//! GET    /users/{id}/blogs
//! GET    /users/analytics?timeframe=hour|day|month
//! GET    /users/filter?start=..&end=..
//! ```

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::ports::UserSubmission;
use crate::domain::{Blog, Error, RegistrationBucket, User, UserDetail, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::{FormParts, read_form};
use crate::inbound::http::responses::{CreatedBody, MessageBody, UpdateBody, created, deleted, updated};
use crate::inbound::http::schemas::{
    BlogSchema, ErrorSchema, RegistrationBucketSchema, UserDetailSchema, UserSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{AnalyticsParams, RangeParams};

/// Multipart part carrying the JSON profile document.
pub const DATA_FIELD: &str = "data";

/// Multipart body of `POST /create` and `PUT /user/{id}`.
#[derive(ToSchema)]
#[expect(dead_code, reason = "documents the multipart form for OpenAPI")]
pub struct UserForm {
    /// JSON object with the profile fields; partial on update.
    data: String,
    /// Optional profile image.
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}

fn user_submission(parts: FormParts) -> Result<UserSubmission, Error> {
    let document = match parts.text(DATA_FIELD) {
        None => Value::Object(Map::new()),
        Some(raw) => serde_json::from_str(raw)
            .map_err(|err| Error::invalid_argument(format!("field `data` is not valid JSON: {err}")))?,
    };
    Ok(UserSubmission {
        document,
        image: parts.image,
    })
}

/// List every user, oldest first.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.users_query.list_users().await?))
}

/// Create a user from a multipart form.
#[utoipa::path(
    post,
    path = "/create",
    request_body(content = UserForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User created", body = CreatedBody<UserSchema>),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/create")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let parts = read_form(payload, state.images.as_ref()).await?;
    let user = state.users.create_user(user_submission(parts)?).await?;
    Ok(created("User created successfully", user))
}

/// Fetch a user together with the blogs they wrote.
#[utoipa::path(
    get,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserDetailSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/user/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserDetail>> {
    let id = UserId::parse(&path)?;
    Ok(web::Json(state.users_query.user_detail(&id).await?))
}

/// Merge a partial profile into a user and re-validate it.
#[utoipa::path(
    put,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body(content = UserForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Update applied or nothing to change", body = UpdateBody),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/user/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let id = UserId::parse(&path)?;
    let parts = read_form(payload, state.images.as_ref()).await?;
    let outcome = state.users.update_user(&id, user_submission(parts)?).await?;
    Ok(updated("User", outcome))
}

/// Delete a user. Their blogs remain, without an author.
#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageBody),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/user/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = UserId::parse(&path)?;
    state.users.delete_user(&id).await?;
    Ok(deleted("User"))
}

/// Blogs written by a user.
#[utoipa::path(
    get,
    path = "/users/{id}/blogs",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Blogs", body = [BlogSchema]),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUserBlogs"
)]
#[get("/users/{id}/blogs")]
pub async fn user_blogs(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Blog>>> {
    let id = UserId::parse(&path)?;
    Ok(web::Json(state.users_query.user_blogs(&id).await?))
}

/// Registrations per hour of today, day of this month or month of this
/// year, in UTC+05:30. Every slot is present, zero-filled.
#[utoipa::path(
    get,
    path = "/users/analytics",
    params(AnalyticsParams),
    responses(
        (status = 200, description = "Gap-filled buckets, oldest first", body = [RegistrationBucketSchema]),
        (status = 400, description = "Unknown timeframe", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registrationAnalytics"
)]
#[get("/users/analytics")]
pub async fn registration_analytics(
    state: web::Data<HttpState>,
    params: web::Query<AnalyticsParams>,
) -> ApiResult<web::Json<Vec<RegistrationBucket>>> {
    let granularity = params.granularity()?;
    Ok(web::Json(
        state.users_query.registration_analytics(granularity).await?,
    ))
}

/// Users created in `[start, end)`.
#[utoipa::path(
    get,
    path = "/users/filter",
    params(RangeParams),
    responses(
        (status = 200, description = "Matching users, oldest first", body = [UserSchema]),
        (status = 400, description = "Missing or unparseable bound", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "filterUsers"
)]
#[get("/users/filter")]
pub async fn filter_users(
    state: web::Data<HttpState>,
    params: web::Query<RangeParams>,
) -> ApiResult<web::Json<Vec<User>>> {
    let range = params.to_range()?;
    Ok(web::Json(state.users_query.users_created_between(range).await?))
}
