//! Wiring of driven adapters into the HTTP state.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use cms_backend::inbound::http::state::{HttpState, StateAdapters};
use cms_backend::outbound::memory::InMemoryContentStore;
use cms_backend::outbound::persistence::{
    DieselBlogRepository, DieselCategoryRepository, DieselTagRepository, DieselUserRepository,
};
use cms_backend::outbound::uploads::LocalImageStore;

use super::ServerConfig;

/// Open the image store described by `config`.
///
/// # Errors
/// Fails when the upload directory cannot be created.
pub(crate) fn build_image_store(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<LocalImageStore> {
    LocalImageStore::open(
        &config.upload_dir,
        config.public_base_url.as_str(),
        config.max_upload_bytes,
        clock,
    )
}

/// Build handler state backed by PostgreSQL when a pool is configured and
/// by an in-memory store otherwise.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    images: Arc<LocalImageStore>,
    clock: Arc<dyn Clock>,
) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL record store");
            StateAdapters {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                blogs: Arc::new(DieselBlogRepository::new(pool.clone())),
                tags: Arc::new(DieselTagRepository::new(pool.clone())),
                categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
                images,
                clock,
            }
            .into_state()
        }
        None => {
            warn!("no database configured; records are kept in memory");
            let store = Arc::new(InMemoryContentStore::new());
            StateAdapters {
                users: Arc::clone(&store),
                blogs: Arc::clone(&store),
                tags: Arc::clone(&store),
                categories: store,
                images,
                clock,
            }
            .into_state()
        }
    }
}
