//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use cms_backend::outbound::persistence::DbPool;

use super::settings::ServerSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_dir: PathBuf,
    pub(crate) public_base_url: String,
    pub(crate) max_upload_bytes: u64,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration from loaded settings, without a database.
    #[must_use]
    pub fn from_settings(settings: &ServerSettings) -> Self {
        Self {
            bind_addr: settings.bind_addr(),
            upload_dir: settings.upload_dir().to_path_buf(),
            public_base_url: settings.public_base_url().to_owned(),
            max_upload_bytes: settings.max_upload_bytes(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, records are stored through the Diesel repositories;
    /// otherwise they live in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
