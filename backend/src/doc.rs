//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint of the inbound layer together
//! with the schema wrappers from [`crate::inbound::http::schemas`], which
//! describe domain types without coupling them to utoipa. The document is
//! served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::OpenApi;

use crate::inbound::http::blogs::BlogForm;
use crate::inbound::http::responses::{CountBody, MessageBody, UpdateBody};
use crate::inbound::http::schemas::{
    BlogSchema, CategorySchema, ErrorCodeSchema, ErrorSchema, FieldViolationSchema,
    GranularitySchema, RegistrationBucketSchema, TagSchema, UserDetailSchema, UserSchema,
};
use crate::inbound::http::terms::{CategoryInput, TagInput};
use crate::inbound::http::users::UserForm;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Content management API",
        description = "Users, blogs, tags and categories with image uploads and registration analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::user_blogs,
        crate::inbound::http::users::registration_analytics,
        crate::inbound::http::users::filter_users,
        crate::inbound::http::blogs::list_blogs,
        crate::inbound::http::blogs::create_blog,
        crate::inbound::http::blogs::get_blog,
        crate::inbound::http::blogs::update_blog,
        crate::inbound::http::blogs::delete_blog,
        crate::inbound::http::terms::list_tags,
        crate::inbound::http::terms::create_tag,
        crate::inbound::http::terms::get_tag,
        crate::inbound::http::terms::update_tag,
        crate::inbound::http::terms::delete_tag,
        crate::inbound::http::terms::list_categories,
        crate::inbound::http::terms::create_category,
        crate::inbound::http::terms::get_category,
        crate::inbound::http::terms::update_category,
        crate::inbound::http::terms::delete_category,
        crate::inbound::http::counts::count_users,
        crate::inbound::http::counts::count_blogs,
        crate::inbound::http::counts::count_tags,
        crate::inbound::http::counts::count_categories,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        UserDetailSchema,
        BlogSchema,
        TagSchema,
        CategorySchema,
        RegistrationBucketSchema,
        GranularitySchema,
        ErrorSchema,
        ErrorCodeSchema,
        FieldViolationSchema,
        MessageBody,
        UpdateBody,
        CountBody,
        UserForm,
        BlogForm,
        TagInput,
        CategoryInput,
    )),
    tags(
        (name = "users", description = "User profiles and registration analytics"),
        (name = "blogs", description = "Blog posts and their authors"),
        (name = "tags", description = "Blog tags"),
        (name = "categories", description = "Blog categories"),
        (name = "counts", description = "Record counts per entity"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
