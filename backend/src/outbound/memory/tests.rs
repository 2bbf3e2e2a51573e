//! Behaviour of the in-memory record store.

use chrono::{TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::user::fixtures::user_document;
use crate::domain::{BlogDraft, Tag, TagId, TagKind};

#[fixture]
fn store() -> InMemoryContentStore {
    InMemoryContentStore::new()
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, hour, 0, 0)
        .single()
        .expect("valid instant")
}

fn user_at(created_at: DateTime<Utc>) -> User {
    let profile = UserProfile::from_document(&user_document()).expect("valid profile");
    User::new(UserId::random(), profile, created_at)
}

fn blog_by(author: Option<UserId>, created_at: DateTime<Utc>) -> Blog {
    let mut document = json!({
        "title": "Field notes",
        "description": "Observations",
        "category": "Science",
        "tags": ["notes"],
    });
    if let Some(author) = author {
        document["userId"] = json!(author.to_string());
    }
    let draft = BlogDraft::from_document(&document).expect("valid draft");
    Blog::new(BlogId::random(), draft, None, created_at)
}

#[rstest]
#[tokio::test]
async fn blog_insert_links_author_and_delete_unlinks(store: InMemoryContentStore) {
    let author = user_at(at(1));
    UserRepository::insert(&store, &author).await.expect("user stored");
    let blog = blog_by(Some(author.id), at(2));

    BlogRepository::insert(&store, &blog).await.expect("blog stored");
    let linked = UserRepository::find_by_id(&store, &author.id)
        .await
        .expect("lookup")
        .expect("user present");
    assert_eq!(linked.blogs, [blog.id]);

    assert!(BlogRepository::delete(&store, &blog.id).await.expect("delete"));
    let unlinked = UserRepository::find_by_id(&store, &author.id)
        .await
        .expect("lookup")
        .expect("user present");
    assert!(unlinked.blogs.is_empty());
}

#[rstest]
#[tokio::test]
async fn blog_with_unknown_author_is_not_written(store: InMemoryContentStore) {
    let blog = blog_by(Some(UserId::random()), at(2));

    let error = BlogRepository::insert(&store, &blog)
        .await
        .expect_err("unknown author");

    assert!(matches!(error, BlogRepositoryError::AuthorNotFound { .. }));
    assert_eq!(BlogRepository::count(&store).await.expect("count"), 0);
}

#[rstest]
#[tokio::test]
async fn deleting_a_user_detaches_their_blogs(store: InMemoryContentStore) {
    let author = user_at(at(1));
    UserRepository::insert(&store, &author).await.expect("user stored");
    let blog = blog_by(Some(author.id), at(2));
    BlogRepository::insert(&store, &blog).await.expect("blog stored");

    assert!(UserRepository::delete(&store, &author.id).await.expect("delete"));

    let orphan = BlogRepository::find_by_id(&store, &blog.id)
        .await
        .expect("lookup")
        .expect("blog kept");
    assert_eq!(orphan.author, None);
    assert!(!UserRepository::delete(&store, &author.id).await.expect("second delete"));
}

#[rstest]
#[tokio::test]
async fn created_range_is_half_open(store: InMemoryContentStore) {
    for hour in [1, 2, 3, 4] {
        UserRepository::insert(&store, &user_at(at(hour)))
            .await
            .expect("user stored");
    }

    let range = CreatedRange::new(at(2), at(4));
    let found = store.list_created_between(&range).await.expect("filter");
    let stamps = store.created_timestamps_between(&range).await.expect("stamps");

    let created: Vec<_> = found.iter().map(|user| user.created_at).collect();
    assert_eq!(created, [at(2), at(3)]);
    assert_eq!(stamps, created);
}

#[rstest]
#[tokio::test]
async fn listing_is_oldest_first(store: InMemoryContentStore) {
    let late = user_at(at(9));
    let early = user_at(at(9) - TimeDelta::hours(6));
    UserRepository::insert(&store, &late).await.expect("late stored");
    UserRepository::insert(&store, &early).await.expect("early stored");

    let listed = UserRepository::list(&store).await.expect("list");

    let ids: Vec<UserId> = listed.iter().map(|user| user.id).collect();
    assert_eq!(ids, [early.id, late.id]);
}

#[rstest]
#[tokio::test]
async fn terms_of_each_kind_are_kept_apart(store: InMemoryContentStore) {
    let tag = Tag::from_parts(TagId::random(), "rust".to_owned(), at(1), at(1));
    TermRepository::<TagKind>::insert(&store, &tag).await.expect("tag stored");

    let tags = TermRepository::<TagKind>::count(&store).await.expect("tag count");
    let categories = TermRepository::<crate::domain::CategoryKind>::count(&store)
        .await
        .expect("category count");
    assert_eq!((tags, categories), (1, 0));

    assert!(
        TermRepository::<TagKind>::rename(&store, &tag.id, "systems", at(2))
            .await
            .expect("rename")
    );
    let renamed = TermRepository::<TagKind>::find_by_id(&store, &tag.id)
        .await
        .expect("lookup")
        .expect("tag present");
    assert_eq!(renamed.name, "systems");
    assert_eq!(renamed.updated_at, at(2));
}

#[rstest]
#[tokio::test]
async fn blogs_are_listed_per_author(store: InMemoryContentStore) {
    let author = user_at(at(1));
    UserRepository::insert(&store, &author).await.expect("user stored");
    let first = blog_by(Some(author.id), at(3));
    let second = blog_by(Some(author.id), at(2));
    for blog in [&first, &second, &blog_by(None, at(4))] {
        BlogRepository::insert(&store, blog).await.expect("blog stored");
    }

    let listed = store.list_by_author(&author.id).await.expect("by author");

    let ids: Vec<BlogId> = listed.iter().map(|blog| blog.id).collect();
    assert_eq!(ids, [second.id, first.id]);
    assert!(
        store
            .list_by_author(&UserId::random())
            .await
            .expect("unknown author")
            .is_empty()
    );
}

#[rstest]
#[tokio::test]
async fn update_moves_the_blog_to_its_new_author(store: InMemoryContentStore) {
    let first = user_at(at(1));
    let second = user_at(at(2));
    for user in [&first, &second] {
        UserRepository::insert(&store, user).await.expect("user stored");
    }
    let blog = blog_by(Some(first.id), at(3));
    BlogRepository::insert(&store, &blog).await.expect("blog stored");

    let ghost = Blog {
        author: Some(UserId::random()),
        ..blog.clone()
    };
    let error = BlogRepository::update(&store, &ghost).await.expect_err("unknown author");
    assert!(matches!(error, BlogRepositoryError::AuthorNotFound { .. }));

    let moved = Blog {
        author: Some(second.id),
        updated_at: at(4),
        ..blog.clone()
    };
    assert!(BlogRepository::update(&store, &moved).await.expect("update"));

    let mut lists = Vec::new();
    for id in [first.id, second.id] {
        let user = UserRepository::find_by_id(&store, &id)
            .await
            .expect("lookup")
            .expect("user present");
        lists.push(user.blogs);
    }
    assert_eq!(lists, [vec![], vec![blog.id]]);
    let stored = BlogRepository::find_by_id(&store, &blog.id)
        .await
        .expect("lookup")
        .expect("blog present");
    assert_eq!(stored, moved);
}
