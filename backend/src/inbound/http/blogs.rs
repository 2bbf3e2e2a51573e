//! Blog endpoints.
//!
//! Create and update take `multipart/form-data` with the text parts
//! `title`, `description`, `category`, `tags` and `userId`, plus an optional
//! `image` file. `tags` may be a JSON array or a single plain value.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::ports::BlogSubmission;
use crate::domain::{Blog, BlogId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::multipart::{FormParts, read_form};
use crate::inbound::http::responses::{CreatedBody, MessageBody, UpdateBody, created, deleted, updated};
use crate::inbound::http::schemas::{BlogSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

const TAGS_FIELD: &str = "tags";

/// Multipart body of `POST /blogs` and `PUT /blogs/{id}`.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "documents the multipart form for OpenAPI")]
pub struct BlogForm {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    /// JSON array of strings, e.g. `["rust","web"]`, or one plain tag.
    tags: Option<String>,
    /// Author id. On update a blank value detaches the blog.
    user_id: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}

fn tags_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(list @ Value::Array(_)) => list,
        _ => Value::String(raw.to_owned()),
    }
}

fn blog_submission(parts: FormParts) -> BlogSubmission {
    let fields: Map<String, Value> = parts
        .texts
        .into_iter()
        .map(|(name, raw)| {
            let value = if name == TAGS_FIELD {
                tags_value(&raw)
            } else {
                Value::String(raw)
            };
            (name, value)
        })
        .collect();
    BlogSubmission {
        fields,
        image: parts.image,
    }
}

/// List every blog, oldest first.
#[utoipa::path(
    get,
    path = "/blogs",
    responses(
        (status = 200, description = "Blogs", body = [BlogSchema]),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "listBlogs"
)]
#[get("/blogs")]
pub async fn list_blogs(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Blog>>> {
    Ok(web::Json(state.blogs_query.list_blogs().await?))
}

/// Create a blog; with `userId` it is linked to that author atomically.
#[utoipa::path(
    post,
    path = "/blogs",
    request_body(content = BlogForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Blog created", body = CreatedBody<BlogSchema>),
        (status = 400, description = "Validation failed or unknown author", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "createBlog"
)]
#[post("/blogs")]
pub async fn create_blog(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let parts = read_form(payload, state.images.as_ref()).await?;
    let blog = state.blogs.create_blog(blog_submission(parts)).await?;
    Ok(created("Blog created successfully", blog))
}

#[utoipa::path(
    get,
    path = "/blogs/{id}",
    params(("id" = String, Path, description = "Blog id")),
    responses(
        (status = 200, description = "Blog", body = BlogSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No such blog", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "getBlog"
)]
#[get("/blogs/{id}")]
pub async fn get_blog(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Blog>> {
    let id = BlogId::parse(&path)?;
    Ok(web::Json(state.blogs_query.blog(&id).await?))
}

/// Replace the submitted fields of a blog.
///
/// A `userId` part moves the blog to that author and a blank one detaches
/// it; both authors' blog lists change in the same transaction.
#[utoipa::path(
    put,
    path = "/blogs/{id}",
    params(("id" = String, Path, description = "Blog id")),
    request_body(content = BlogForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Update applied or nothing to change", body = UpdateBody),
        (status = 400, description = "Validation failed or unknown author", body = ErrorSchema),
        (status = 404, description = "No such blog", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "updateBlog"
)]
#[put("/blogs/{id}")]
pub async fn update_blog(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let id = BlogId::parse(&path)?;
    let parts = read_form(payload, state.images.as_ref()).await?;
    let outcome = state.blogs.update_blog(&id, blog_submission(parts)).await?;
    Ok(updated("Blog", outcome))
}

/// Delete a blog and drop it from its author's list.
#[utoipa::path(
    delete,
    path = "/blogs/{id}",
    params(("id" = String, Path, description = "Blog id")),
    responses(
        (status = 200, description = "Blog deleted", body = MessageBody),
        (status = 404, description = "No such blog", body = ErrorSchema)
    ),
    tags = ["blogs"],
    operation_id = "deleteBlog"
)]
#[delete("/blogs/{id}")]
pub async fn delete_blog(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = BlogId::parse(&path)?;
    state.blogs.delete_blog(&id).await?;
    Ok(deleted("Blog"))
}
