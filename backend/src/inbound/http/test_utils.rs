//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::{self, HeaderValue};
use tempfile::TempDir;

use crate::inbound::http::state::{HttpState, StateAdapters};
use crate::outbound::memory::InMemoryContentStore;
use crate::outbound::uploads::LocalImageStore;
use crate::test_support::{FixtureClock, fixture_timestamp};

/// Upload limit used by handler tests.
pub const TEST_UPLOAD_LIMIT: u64 = 64 * 1024;

/// Handler state over the in-memory store, with uploads in a scratch
/// directory.
pub struct TestContext {
    pub state: HttpState,
    pub store: Arc<InMemoryContentStore>,
    pub clock: Arc<FixtureClock>,
    pub uploads: TempDir,
}

/// Build a [`TestContext`] whose clock reads [`fixture_timestamp`].
pub fn test_context() -> TestContext {
    let uploads = tempfile::tempdir().expect("upload dir");
    let clock = FixtureClock::at(fixture_timestamp());
    let store = Arc::new(InMemoryContentStore::new());
    let images = LocalImageStore::open(
        uploads.path(),
        "http://localhost:3000",
        TEST_UPLOAD_LIMIT,
        clock.clone(),
    )
    .expect("image store");
    let state = StateAdapters {
        users: Arc::clone(&store),
        blogs: Arc::clone(&store),
        tags: Arc::clone(&store),
        categories: Arc::clone(&store),
        images: Arc::new(images),
        clock: clock.clone(),
    }
    .into_state();
    TestContext {
        state,
        store,
        clock,
        uploads,
    }
}

const BOUNDARY: &str = "----cms-test-boundary";

/// Hand-assembled `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, contents: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(contents);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    /// Content-type header and payload.
    pub fn finish(mut self) -> ((header::HeaderName, HeaderValue), Vec<u8>) {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        let content_type = HeaderValue::from_static(
            "multipart/form-data; boundary=----cms-test-boundary",
        );
        ((header::CONTENT_TYPE, content_type), self.bytes)
    }
}

/// Sorted names of the files in `dir`.
pub fn stored_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .expect("read upload dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
