//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; these wrappers mirror their wire
//! shape and register under the domain type's name via `#[schema(as = ..)]`.

#![expect(dead_code, reason = "fields exist only for OpenAPI schema generation")]

use utoipa::ToSchema;

/// Stable machine-readable error codes.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A submitted document failed validation; see `errors`.
    #[schema(rename = "validation_failed")]
    ValidationFailed,
    /// A required query parameter was absent.
    #[schema(rename = "missing_parameter")]
    MissingParameter,
    /// A parameter or path id could not be interpreted.
    #[schema(rename = "invalid_argument")]
    InvalidArgument,
    #[schema(rename = "not_found")]
    NotFound,
    /// The record store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// One rejected field.
#[derive(ToSchema)]
#[schema(as = crate::domain::FieldViolation)]
pub struct FieldViolationSchema {
    /// Dotted path of the field.
    #[schema(example = "address.city")]
    field: String,
    #[schema(example = "is required")]
    message: String,
}

/// Error response payload.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
pub struct ErrorSchema {
    code: ErrorCodeSchema,
    #[schema(example = "user 3fa85f64-5717-4562-b3fc-2c963f66afa6 not found")]
    message: String,
    /// Every violation, present for `validation_failed`.
    errors: Option<Vec<FieldViolationSchema>>,
    /// Correlates the response with server logs.
    trace_id: Option<String>,
    details: Option<serde_json::Value>,
}

/// Stored user. Nested groups are free-form objects in this schema.
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[schema(rename_all = "camelCase")]
pub struct UserSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    first_name: String,
    last_name: String,
    maiden_name: String,
    #[schema(minimum = 1)]
    age: u32,
    gender: String,
    #[schema(example = "ada@example.com")]
    email: String,
    phone: String,
    username: String,
    #[schema(min_length = 6)]
    password: String,
    birth_date: String,
    /// Public URL of the uploaded image.
    image: Option<String>,
    blood_group: String,
    height: f64,
    weight: f64,
    eye_color: String,
    #[schema(value_type = Object)]
    hair: serde_json::Value,
    domain: String,
    ip: String,
    mac_address: String,
    university: String,
    #[schema(value_type = Object)]
    address: serde_json::Value,
    #[schema(value_type = Object)]
    bank: serde_json::Value,
    #[schema(value_type = Object)]
    company: serde_json::Value,
    ein: String,
    ssn: String,
    user_agent: String,
    #[schema(value_type = Object)]
    crypto: serde_json::Value,
    role: String,
    /// Ids of the blogs this user wrote.
    blogs: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// A user with their blogs expanded. Carries every user field as well.
#[derive(ToSchema)]
#[schema(as = crate::domain::UserDetail)]
#[schema(rename_all = "camelCase")]
pub struct UserDetailSchema {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    username: String,
    blogs_count: usize,
    blogs: Vec<BlogSchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// Stored blog post.
#[derive(ToSchema)]
#[schema(as = crate::domain::Blog)]
#[schema(rename_all = "camelCase")]
pub struct BlogSchema {
    id: String,
    title: String,
    description: String,
    category: String,
    tags: Vec<String>,
    /// Author's user id; null once the author is deleted.
    author: Option<String>,
    image: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::Tag)]
#[schema(rename_all = "camelCase")]
pub struct TagSchema {
    id: String,
    #[schema(example = "rust")]
    tag_name: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::Category)]
#[schema(rename_all = "camelCase")]
pub struct CategorySchema {
    id: String,
    #[schema(example = "Travel")]
    category_name: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

#[derive(ToSchema)]
#[schema(as = crate::domain::Granularity)]
pub enum GranularitySchema {
    #[schema(rename = "hour")]
    Hour,
    #[schema(rename = "day")]
    Day,
    #[schema(rename = "month")]
    Month,
}

/// Registrations in `[start, end)`.
#[derive(ToSchema)]
#[schema(as = crate::domain::RegistrationBucket)]
pub struct RegistrationBucketSchema {
    count: u64,
    timeframe: GranularitySchema,
    #[schema(value_type = String, format = DateTime, example = "2024-03-14T18:30:00Z")]
    start: String,
    #[schema(value_type = String, format = DateTime, example = "2024-03-15T18:30:00Z")]
    end: String,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::PartialSchema;

    use super::*;

    fn json_of<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises")
    }

    #[rstest]
    fn wrappers_register_under_domain_names() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert_eq!(UserSchema::name(), "crate.domain.User");
        assert_eq!(RegistrationBucketSchema::name(), "crate.domain.RegistrationBucket");
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        let json = json_of::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(json.contains("errors"));
    }

    #[rstest]
    fn error_codes_are_snake_case() {
        let json = json_of::<ErrorCodeSchema>();
        for code in ["validation_failed", "missing_parameter", "service_unavailable"] {
            assert!(json.contains(code), "missing {code}");
        }
    }
}
