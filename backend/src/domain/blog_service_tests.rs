//! Tests for the blog service.

use std::sync::Arc;

use chrono::TimeDelta;
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};

use super::*;
use crate::domain::ports::{MockBlogRepository, MockImageStore};
use crate::domain::{ErrorCode, UserId};
use crate::test_support::{fixture_clock, fixture_timestamp};

fn service(blogs: MockBlogRepository) -> BlogService<MockBlogRepository, MockImageStore> {
    BlogService::new(Arc::new(blogs), Arc::new(MockImageStore::new()), fixture_clock())
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn submission(value: Value) -> BlogSubmission {
    BlogSubmission {
        fields: fields(value),
        image: None,
    }
}

#[fixture]
fn stored_blog() -> Blog {
    let draft = BlogDraft::from_document(&json!({
        "title": "Monsoon notes",
        "description": "Rain in Bengaluru",
        "category": "Travel",
        "tags": ["weather", "india"],
    }))
    .expect("valid draft");
    Blog::new(
        BlogId::random(),
        draft,
        Some("http://localhost:3000/uploads/1-rain.png".to_owned()),
        fixture_timestamp() - TimeDelta::hours(5),
    )
}

#[rstest]
#[tokio::test]
async fn create_blog_links_the_author() {
    let author = UserId::random();
    let mut blogs = MockBlogRepository::new();
    blogs
        .expect_insert()
        .withf(move |blog| blog.author == Some(author) && blog.content.tags == ["rust"])
        .times(1)
        .return_once(|_| Ok(()));

    let blog = service(blogs)
        .create_blog(submission(json!({
            "title": "Ownership",
            "description": "Borrowing explained",
            "category": "Programming",
            "tags": "rust",
            "userId": author.to_string(),
            "author": "Display Name",
        })))
        .await
        .expect("blog created");

    assert_eq!(blog.author, Some(author));
    assert_eq!(blog.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_blog_reports_unknown_authors_as_validation_errors() {
    let author = UserId::random();
    let mut blogs = MockBlogRepository::new();
    blogs
        .expect_insert()
        .return_once(move |_| Err(BlogRepositoryError::author_not_found(author.to_string())));

    let error = service(blogs)
        .create_blog(submission(json!({
            "title": "Orphan",
            "description": "No author",
            "category": "Misc",
            "tags": ["a"],
            "userId": author.to_string(),
        })))
        .await
        .expect_err("unknown author");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert_eq!(error.violations()[0].field, "author");
}

#[rstest]
#[tokio::test]
async fn create_blog_collects_missing_fields() {
    let mut blogs = MockBlogRepository::new();
    blogs.expect_insert().times(0);

    let error = service(blogs)
        .create_blog(submission(json!({ "title": "Only a title" })))
        .await
        .expect_err("incomplete blog");

    let missing: Vec<&str> = error.violations().iter().map(|v| v.field.as_str()).collect();
    assert_eq!(missing, ["description", "category", "tags"]);
}

#[rstest]
#[tokio::test]
async fn update_blog_keeps_the_existing_image(stored_blog: Blog) {
    let id = stored_blog.id;
    let image = stored_blog.image.clone();
    let created_at = stored_blog.created_at;
    let mut blogs = MockBlogRepository::new();
    blogs
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_blog)));
    blogs
        .expect_update()
        .withf(move |blog| {
            blog.content.title == "Winter notes"
                && blog.image == image
                && blog.created_at == created_at
                && blog.updated_at == fixture_timestamp()
        })
        .times(1)
        .return_once(|_| Ok(true));

    let outcome = service(blogs)
        .update_blog(&id, submission(json!({ "title": "Winter notes" })))
        .await
        .expect("blog updated");

    assert!(outcome.is_modified());
}

#[rstest]
#[tokio::test]
async fn identical_blog_update_is_unchanged(stored_blog: Blog) {
    let id = stored_blog.id;
    let mut blogs = MockBlogRepository::new();
    blogs
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_blog)));
    blogs.expect_update().times(0);

    let outcome = service(blogs)
        .update_blog(&id, submission(json!({ "category": "Travel" })))
        .await
        .expect("no-op update");

    assert_eq!(outcome, UpdateOutcome::Unchanged);
}

#[rstest]
#[tokio::test]
async fn update_blog_reassigns_the_author(stored_blog: Blog) {
    let id = stored_blog.id;
    let author = UserId::random();
    let mut blogs = MockBlogRepository::new();
    blogs
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_blog)));
    blogs
        .expect_update()
        .withf(move |blog| blog.author == Some(author) && blog.content.title == "Monsoon notes")
        .times(1)
        .return_once(|_| Ok(true));

    let outcome = service(blogs)
        .update_blog(&id, submission(json!({ "userId": author.to_string() })))
        .await
        .expect("author changed");

    assert!(outcome.is_modified());
}

#[rstest]
#[tokio::test]
async fn update_blog_to_an_unknown_author_is_a_validation_error(stored_blog: Blog) {
    let id = stored_blog.id;
    let mut blogs = MockBlogRepository::new();
    blogs
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_blog)));
    blogs
        .expect_update()
        .return_once(|blog| {
            let missing = blog.author.map(|id| id.to_string()).unwrap_or_default();
            Err(BlogRepositoryError::author_not_found(missing))
        });

    let error = service(blogs)
        .update_blog(&id, submission(json!({ "userId": UserId::random().to_string() })))
        .await
        .expect_err("unknown author");

    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert_eq!(error.violations()[0].field, "author");
}

#[rstest]
#[tokio::test]
async fn deleting_a_missing_blog_is_not_found() {
    let mut blogs = MockBlogRepository::new();
    blogs.expect_delete().return_once(|_| Ok(false));

    let error = service(blogs)
        .delete_blog(&BlogId::random())
        .await
        .expect_err("missing blog");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn blog_lookup_maps_query_failures_to_internal_errors() {
    let mut blogs = MockBlogRepository::new();
    blogs
        .expect_find_by_id()
        .return_once(|_| Err(BlogRepositoryError::query("syntax error")));

    let error = service(blogs)
        .blog(&BlogId::random())
        .await
        .expect_err("query failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
