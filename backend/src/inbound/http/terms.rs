//! Tag and category endpoints.
//!
//! Both families share one implementation, generic over [`TermKind`]. The
//! `term_endpoints!` macro stamps out the concrete, documented handlers for
//! each family and a `configure_*` function registering them.

use actix_web::{HttpResponse, web};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{CategoryKind, RecordId, TagKind, Term, TermKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::responses::{CreatedBody, MessageBody, UpdateBody, created, deleted, updated};
use crate::inbound::http::schemas::{CategorySchema, ErrorSchema, TagSchema};
use crate::inbound::http::state::{HttpState, TermPorts, TermState};

/// Body of `POST /tags` and `PUT /tags/{id}`.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "documents the request body for OpenAPI")]
pub struct TagInput {
    #[schema(example = "rust")]
    tag_name: String,
}

/// Body of `POST /categories` and `PUT /categories/{id}`.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "documents the request body for OpenAPI")]
pub struct CategoryInput {
    #[schema(example = "Travel")]
    category_name: String,
}

fn ports<K: TermKind>(state: &HttpState) -> &TermPorts<K>
where
    HttpState: TermState<K>,
{
    TermState::<K>::term_ports(state)
}

async fn list<K: TermKind>(state: &HttpState) -> ApiResult<web::Json<Vec<Term<K>>>>
where
    HttpState: TermState<K>,
{
    Ok(web::Json(ports::<K>(state).query.list_terms().await?))
}

async fn create<K: TermKind>(state: &HttpState, label: &str, body: &Value) -> ApiResult<HttpResponse>
where
    HttpState: TermState<K>,
{
    let term = ports::<K>(state).command.create_term(body).await?;
    Ok(created(&format!("{label} created successfully"), term))
}

async fn fetch<K: TermKind>(state: &HttpState, raw_id: &str) -> ApiResult<web::Json<Term<K>>>
where
    HttpState: TermState<K>,
{
    let id = RecordId::<Term<K>>::parse(raw_id)?;
    Ok(web::Json(ports::<K>(state).query.term(&id).await?))
}

async fn rename<K: TermKind>(
    state: &HttpState,
    label: &str,
    raw_id: &str,
    body: &Value,
) -> ApiResult<HttpResponse>
where
    HttpState: TermState<K>,
{
    let id = RecordId::<Term<K>>::parse(raw_id)?;
    let outcome = ports::<K>(state).command.rename_term(&id, body).await?;
    Ok(updated(label, outcome))
}

async fn remove<K: TermKind>(state: &HttpState, label: &str, raw_id: &str) -> ApiResult<HttpResponse>
where
    HttpState: TermState<K>,
{
    let id = RecordId::<Term<K>>::parse(raw_id)?;
    ports::<K>(state).command.delete_term(&id).await?;
    Ok(deleted(label))
}

macro_rules! term_endpoints {
    (
        kind: $kind:ty,
        label: $label:literal,
        tag: $tag:literal,
        schema: $schema:ty,
        input: $input:ty,
        collection: $collection:literal,
        item: $item:literal,
        handlers: ($list:ident, $create:ident, $get:ident, $update:ident, $delete:ident),
        configure: $configure:ident $(,)?
    ) => {
        #[utoipa::path(
            get,
            path = $collection,
            responses(
                (status = 200, description = "Every entry, oldest first", body = [$schema]),
                (status = 503, description = "Record store unavailable", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $list(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Term<$kind>>>> {
            list::<$kind>(&state).await
        }

        #[utoipa::path(
            post,
            path = $collection,
            request_body = $input,
            responses(
                (status = 201, description = "Entry created", body = CreatedBody<$schema>),
                (status = 400, description = "Name missing or blank", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $create(
            state: web::Data<HttpState>,
            body: web::Json<Value>,
        ) -> ApiResult<HttpResponse> {
            create::<$kind>(&state, $label, &body).await
        }

        #[utoipa::path(
            get,
            path = $item,
            params(("id" = String, Path, description = "Entry id")),
            responses(
                (status = 200, description = "Entry", body = $schema),
                (status = 400, description = "Malformed id", body = ErrorSchema),
                (status = 404, description = "No such entry", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $get(
            state: web::Data<HttpState>,
            path: web::Path<String>,
        ) -> ApiResult<web::Json<Term<$kind>>> {
            fetch::<$kind>(&state, &path).await
        }

        #[utoipa::path(
            put,
            path = $item,
            params(("id" = String, Path, description = "Entry id")),
            request_body = $input,
            responses(
                (status = 200, description = "Renamed or already named so", body = UpdateBody),
                (status = 400, description = "Name missing or blank", body = ErrorSchema),
                (status = 404, description = "No such entry", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $update(
            state: web::Data<HttpState>,
            path: web::Path<String>,
            body: web::Json<Value>,
        ) -> ApiResult<HttpResponse> {
            rename::<$kind>(&state, $label, &path, &body).await
        }

        #[utoipa::path(
            delete,
            path = $item,
            params(("id" = String, Path, description = "Entry id")),
            responses(
                (status = 200, description = "Entry deleted", body = MessageBody),
                (status = 404, description = "No such entry", body = ErrorSchema)
            ),
            tags = [$tag]
        )]
        pub async fn $delete(
            state: web::Data<HttpState>,
            path: web::Path<String>,
        ) -> ApiResult<HttpResponse> {
            remove::<$kind>(&state, $label, &path).await
        }

        /// Register the handlers of this family.
        pub fn $configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::resource($collection)
                    .route(web::get().to($list))
                    .route(web::post().to($create)),
            )
            .service(
                web::resource($item)
                    .route(web::get().to($get))
                    .route(web::put().to($update))
                    .route(web::delete().to($delete)),
            );
        }
    };
}

term_endpoints! {
    kind: TagKind,
    label: "Tag",
    tag: "tags",
    schema: TagSchema,
    input: TagInput,
    collection: "/tags",
    item: "/tags/{id}",
    handlers: (list_tags, create_tag, get_tag, update_tag, delete_tag),
    configure: configure_tags,
}

term_endpoints! {
    kind: CategoryKind,
    label: "Category",
    tag: "categories",
    schema: CategorySchema,
    input: CategoryInput,
    collection: "/categories",
    item: "/categories/{id}",
    handlers: (list_categories, create_category, get_category, update_category, delete_category),
    configure: configure_categories,
}

#[cfg(test)]
mod tests {
    //! Handler tests over the in-memory store.

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::inbound::http::test_utils::test_context;

    async fn json_body(response: actix_web::dev::ServiceResponse) -> Value {
        let body = actix_test::read_body(response).await;
        serde_json::from_slice(&body).expect("json body")
    }

    #[actix_web::test]
    async fn tags_and_categories_round_trip_separately() {
        let ctx = test_context();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.state.clone()))
                .configure(configure_tags)
                .configure(configure_categories),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/tags")
            .set_json(json!({ "tagName": "rust" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Tag created successfully");
        let id = body["data"]["id"].as_str().expect("tag id").to_owned();

        let request = actix_test::TestRequest::get()
            .uri(&format!("/tags/{id}"))
            .to_request();
        let fetched = json_body(actix_test::call_service(&app, request).await).await;
        assert_eq!(fetched["tagName"], "rust");

        let request = actix_test::TestRequest::get()
            .uri(&format!("/categories/{id}"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[case(json!({ "tagName": "rust" }), false, "Tag unchanged")]
    #[case(json!({ "tagName": "web" }), true, "Tag updated successfully")]
    #[actix_web::test]
    async fn renaming_reports_whether_the_name_changed(
        #[case] body: Value,
        #[case] modified: bool,
        #[case] message: &str,
    ) {
        let ctx = test_context();
        let created = ports::<TagKind>(&ctx.state)
            .command
            .create_term(&json!({ "tagName": "rust" }))
            .await
            .expect("seed tag");
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.state.clone()))
                .configure(configure_tags),
        )
        .await;

        let request = actix_test::TestRequest::put()
            .uri(&format!("/tags/{}", created.id))
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["modified"], modified);
        assert_eq!(body["message"], message);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "categoryName": "  " }))]
    #[actix_web::test]
    async fn blank_category_names_are_rejected(#[case] body: Value) {
        let ctx = test_context();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.state.clone()))
                .configure(configure_categories),
        )
        .await;

        let request = actix_test::TestRequest::post()
            .uri("/categories")
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["errors"][0]["field"], "categoryName");
    }

    #[actix_web::test]
    async fn deleting_an_unknown_category_is_not_found() {
        let ctx = test_context();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.state.clone()))
                .configure(configure_categories),
        )
        .await;

        let request = actix_test::TestRequest::delete()
            .uri("/categories/3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
