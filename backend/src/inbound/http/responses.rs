//! Success payloads shared by the CRUD handlers.

use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::UpdateOutcome;

/// Confirmation carrying only a message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    #[schema(example = "User deleted successfully")]
    pub message: String,
}

/// Result of an update. `modified` is false when nothing changed.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateBody {
    #[schema(example = "User updated successfully")]
    pub message: String,
    pub modified: bool,
}

/// Number of stored records.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountBody {
    pub count: u64,
}

/// A freshly created record and a confirmation message.
///
/// Documented as `CreatedBody<UserSchema>` and friends in the path specs.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedBody<T> {
    pub message: String,
    pub data: T,
}

pub(crate) fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    HttpResponse::Created().json(CreatedBody {
        message: message.to_owned(),
        data,
    })
}

pub(crate) fn updated(noun: &str, outcome: UpdateOutcome) -> HttpResponse {
    let message = if outcome.is_modified() {
        format!("{noun} updated successfully")
    } else {
        format!("{noun} unchanged")
    };
    HttpResponse::Ok().json(UpdateBody {
        message,
        modified: outcome.is_modified(),
    })
}

pub(crate) fn deleted(noun: &str) -> HttpResponse {
    HttpResponse::Ok().json(MessageBody {
        message: format!("{noun} deleted successfully"),
    })
}
