//! Record counts per entity, under `/api`.

use actix_web::{get, web};

use crate::domain::{CategoryKind, TagKind, TermKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::CountBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::{HttpState, TermState};

async fn count_terms<K: TermKind>(state: &HttpState) -> ApiResult<web::Json<CountBody>>
where
    HttpState: TermState<K>,
{
    let count = TermState::<K>::term_ports(state).query.count_terms().await?;
    Ok(web::Json(CountBody { count }))
}

#[utoipa::path(
    get,
    path = "/api/users/count",
    responses(
        (status = 200, description = "Number of users", body = CountBody),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["counts"],
    operation_id = "countUsers"
)]
#[get("/users/count")]
pub async fn count_users(state: web::Data<HttpState>) -> ApiResult<web::Json<CountBody>> {
    let count = state.users_query.count_users().await?;
    Ok(web::Json(CountBody { count }))
}

#[utoipa::path(
    get,
    path = "/api/blogs/count",
    responses((status = 200, description = "Number of blogs", body = CountBody)),
    tags = ["counts"],
    operation_id = "countBlogs"
)]
#[get("/blogs/count")]
pub async fn count_blogs(state: web::Data<HttpState>) -> ApiResult<web::Json<CountBody>> {
    let count = state.blogs_query.count_blogs().await?;
    Ok(web::Json(CountBody { count }))
}

#[utoipa::path(
    get,
    path = "/api/tags/count",
    responses((status = 200, description = "Number of tags", body = CountBody)),
    tags = ["counts"],
    operation_id = "countTags"
)]
#[get("/tags/count")]
pub async fn count_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<CountBody>> {
    count_terms::<TagKind>(&state).await
}

#[utoipa::path(
    get,
    path = "/api/categories/count",
    responses((status = 200, description = "Number of categories", body = CountBody)),
    tags = ["counts"],
    operation_id = "countCategories"
)]
#[get("/categories/count")]
pub async fn count_categories(state: web::Data<HttpState>) -> ApiResult<web::Json<CountBody>> {
    count_terms::<CategoryKind>(&state).await
}

/// Scope serving every count endpoint.
pub fn counts_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(count_users)
        .service(count_blogs)
        .service(count_tags)
        .service(count_categories)
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::BlogSubmission;
    use crate::inbound::http::test_utils::test_context;

    #[rstest]
    #[case("/api/users/count", 0)]
    #[case("/api/blogs/count", 2)]
    #[case("/api/tags/count", 1)]
    #[case("/api/categories/count", 0)]
    #[actix_web::test]
    async fn counts_reflect_stored_records(#[case] uri: &str, #[case] expected: u64) {
        let ctx = test_context();
        for title in ["one", "two"] {
            let fields = json!({
                "title": title,
                "description": "d",
                "category": "c",
                "tags": "t",
            });
            let Value::Object(fields) = fields else {
                unreachable!("literal object");
            };
            ctx.state
                .blogs
                .create_blog(BlogSubmission {
                    fields,
                    image: None,
                })
                .await
                .expect("seed blog");
        }
        ctx.state
            .tags
            .command
            .create_term(&json!({ "tagName": "rust" }))
            .await
            .expect("seed tag");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.state.clone()))
                .service(counts_scope()),
        )
        .await;

        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let body: CountBodyProbe = actix_test::call_and_read_body_json(&app, request).await;

        assert_eq!(body.count, expected);
    }

    #[derive(serde::Deserialize)]
    struct CountBodyProbe {
        count: u64,
    }
}
