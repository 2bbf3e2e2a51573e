//! Server construction and middleware wiring.

mod config;
pub mod settings;
mod state_builders;

pub use config::ServerConfig;

use std::path::PathBuf;
use std::sync::Arc;

use actix_files::Files;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use cms_backend::Trace;
#[cfg(debug_assertions)]
use cms_backend::doc::ApiDoc;
use cms_backend::inbound::http::blogs::{create_blog, delete_blog, get_blog, list_blogs, update_blog};
use cms_backend::inbound::http::counts::counts_scope;
use cms_backend::inbound::http::health::{HealthState, live, ready};
use cms_backend::inbound::http::state::HttpState;
use cms_backend::inbound::http::terms::{configure_categories, configure_tags};
use cms_backend::inbound::http::users::{
    create_user, delete_user, filter_users, get_user, list_users, registration_analytics,
    update_user, user_blogs,
};
use cms_backend::outbound::uploads::UPLOADS_ROUTE;
use state_builders::{build_http_state, build_image_store};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    upload_root: PathBuf,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        upload_root,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(counts_scope())
        .service(registration_analytics)
        .service(filter_users)
        .service(user_blogs)
        .service(list_users)
        .service(create_user)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(list_blogs)
        .service(create_blog)
        .service(get_blog)
        .service(update_blog)
        .service(delete_blog)
        .configure(configure_tags)
        .configure(configure_categories)
        .service(ready)
        .service(live)
        .service(Files::new(UPLOADS_ROUTE, upload_root));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the upload directory cannot be
/// created or the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let images = Arc::new(build_image_store(&config, Arc::clone(&clock))?);
    let upload_root = images.root().to_path_buf();
    let http_state = web::Data::new(build_http_state(&config, images, clock));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            upload_root: upload_root.clone(),
        })
    })
    .bind(config.bind_addr())?
    .run();

    info!(addr = %config.bind_addr(), "server listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Routing smoke tests for the assembled application.

    use std::net::SocketAddr;

    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use settings::DEFAULT_MAX_UPLOAD_BYTES;

    fn memory_deps(uploads: &TempDir) -> AppDependencies {
        let config = ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            upload_dir: uploads.path().to_path_buf(),
            public_base_url: "http://localhost:3000".to_owned(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            db_pool: None,
        };
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let images = Arc::new(build_image_store(&config, Arc::clone(&clock)).expect("image store"));
        let upload_root = images.root().to_path_buf();
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: web::Data::new(build_http_state(&config, images, clock)),
            upload_root,
        }
    }

    #[rstest]
    #[case("/", StatusCode::OK)]
    #[case("/blogs", StatusCode::OK)]
    #[case("/tags", StatusCode::OK)]
    #[case("/categories", StatusCode::OK)]
    #[case("/users/analytics?timeframe=month", StatusCode::OK)]
    #[case("/users/filter", StatusCode::BAD_REQUEST)]
    #[case("/api/users/count", StatusCode::OK)]
    #[case("/health/ready", StatusCode::OK)]
    #[case("/uploads/missing.png", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn routes_resolve(#[case] uri: &str, #[case] expected: StatusCode) {
        let uploads = tempfile::tempdir().expect("upload dir");
        let app = test::init_service(build_app(memory_deps(&uploads))).await;

        let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(response.status(), expected, "{uri}");
    }

    #[rstest]
    #[actix_web::test]
    async fn committed_uploads_are_served() {
        let uploads = tempfile::tempdir().expect("upload dir");
        std::fs::write(uploads.path().join("1700000000000-cover.png"), b"png").expect("write");
        let app = test::init_service(build_app(memory_deps(&uploads))).await;

        let request = test::TestRequest::get()
            .uri("/uploads/1700000000000-cover.png")
            .to_request();
        let body = test::call_and_read_body(&app, request).await;

        assert_eq!(body.as_ref(), b"png");
    }
}
