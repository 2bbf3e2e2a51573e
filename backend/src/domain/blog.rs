//! Blog posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::{FieldReader, FieldViolation, Violations};
use super::{Record, RecordId, UserId};

/// Identifier of a stored [`Blog`].
pub type BlogId = RecordId<Blog>;

/// Field carrying the author's user id in blog submissions.
pub const AUTHOR_ID_FIELD: &str = "userId";

/// Editable body of a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogContent {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl BlogContent {
    const FIELDS: [&'static str; 4] = ["title", "description", "category", "tags"];

    fn read(root: FieldReader<'_>, violations: &mut Violations) -> Self {
        Self {
            title: root.string("title", violations),
            description: root.string("description", violations),
            category: root.string("category", violations),
            tags: root.string_list("tags", violations),
        }
    }

    /// Validate a raw document.
    pub fn from_document(document: &Value) -> Result<Self, Vec<FieldViolation>> {
        let mut violations = Violations::default();
        let root = FieldReader::root(document, &mut violations);
        let content = Self::read(root, &mut violations);
        violations.finish(content)
    }
}

/// Validated blog submission, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDraft {
    pub content: BlogContent,
    pub author: Option<UserId>,
}

impl BlogDraft {
    /// Validate a submission. `userId`, when present, must be a UUID.
    ///
    /// # Examples
    /// ```
    /// use cms_backend::domain::BlogDraft;
    /// use serde_json::json;
    ///
    /// let draft = BlogDraft::from_document(&json!({
    ///     "title": "Hello",
    ///     "description": "First post",
    ///     "category": "News",
    ///     "tags": ["intro"]
    /// }))
    /// .expect("valid draft");
    /// assert!(draft.author.is_none());
    /// ```
    pub fn from_document(document: &Value) -> Result<Self, Vec<FieldViolation>> {
        let mut violations = Violations::default();
        let root = FieldReader::root(document, &mut violations);
        let content = BlogContent::read(root, &mut violations);
        let author = root
            .optional_string(AUTHOR_ID_FIELD, &mut violations)
            .and_then(|raw| match raw.parse::<UserId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    violations.push("author", "must be a valid user id");
                    None
                }
            });
        violations.finish(Self { content, author })
    }
}

/// Stored blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: BlogId,
    #[serde(flatten)]
    pub content: BlogContent,
    pub author: Option<UserId>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Blog {
    const NOUN: &'static str = "blog";
}

impl Blog {
    /// Overlay a form patch and re-validate the result.
    ///
    /// Provided content fields replace the stored ones. A provided `userId`
    /// re-assigns the author and a blank one clears it; when absent the
    /// current author is kept.
    pub fn patched(&self, patch: &Map<String, Value>) -> Result<BlogDraft, Vec<FieldViolation>> {
        let mut merged = match serde_json::to_value(&self.content) {
            Ok(Value::Object(current)) => current,
            _ => Map::new(),
        };
        if let Some(author) = self.author {
            merged.insert(AUTHOR_ID_FIELD.to_owned(), Value::String(author.to_string()));
        }
        for key in BlogContent::FIELDS.into_iter().chain([AUTHOR_ID_FIELD]) {
            if let Some(value) = patch.get(key) {
                merged.insert(key.to_owned(), value.clone());
            }
        }
        BlogDraft::from_document(&Value::Object(merged))
    }

    /// Build a freshly created blog from a validated draft.
    pub fn new(id: BlogId, draft: BlogDraft, image: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            content: draft.content,
            author: draft.author,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn document() -> Value {
        json!({
            "title": "Indexing JSONB",
            "description": "GIN or not GIN",
            "category": "Databases",
            "tags": ["postgres", "jsonb"],
            "author": "Ada Lovelace",
        })
    }

    #[rstest]
    fn author_display_name_is_ignored(document: Value) {
        let draft = BlogDraft::from_document(&document).expect("valid draft");
        assert!(draft.author.is_none());
        assert_eq!(draft.content.tags, ["postgres", "jsonb"]);
    }

    #[rstest]
    fn user_id_becomes_the_author(mut document: Value) {
        let author = UserId::random();
        document[AUTHOR_ID_FIELD] = json!(author.to_string());
        let draft = BlogDraft::from_document(&document).expect("valid draft");
        assert_eq!(draft.author, Some(author));
    }

    #[rstest]
    fn malformed_user_id_is_an_author_violation(mut document: Value) {
        document[AUTHOR_ID_FIELD] = json!("someone");
        let violations = BlogDraft::from_document(&document).expect_err("invalid");
        assert_eq!(violations[0].field, "author");
    }

    #[rstest]
    fn missing_fields_are_all_reported() {
        let violations = BlogDraft::from_document(&json!({ "title": "Only a title" }))
            .expect_err("invalid");
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["description", "category", "tags"]);
    }

    fn stored(document: &Value, author: Option<UserId>) -> Blog {
        let mut draft = BlogDraft::from_document(document).expect("valid draft");
        draft.author = author;
        Blog::new(BlogId::random(), draft, None, DateTime::<Utc>::UNIX_EPOCH)
    }

    #[rstest]
    fn patch_only_touches_provided_fields(document: Value) {
        let author = UserId::random();
        let blog = stored(&document, Some(author));
        let patch = json!({ "title": "Indexing JSONB, revisited", "author": "ignored" });

        let draft = blog
            .patched(patch.as_object().expect("object"))
            .expect("valid patch");

        assert_eq!(draft.content.title, "Indexing JSONB, revisited");
        assert_eq!(draft.content.category, "Databases");
        assert_eq!(draft.author, Some(author));
    }

    #[rstest]
    #[case(json!(""), None)]
    #[case(json!("00000000-0000-0000-0000-0000000000aa"), Some("00000000-0000-0000-0000-0000000000aa"))]
    fn patch_user_id_reassigns_the_author(
        document: Value,
        #[case] user_id: Value,
        #[case] expected: Option<&str>,
    ) {
        let blog = stored(&document, Some(UserId::random()));
        let patch = json!({ AUTHOR_ID_FIELD: user_id });

        let draft = blog
            .patched(patch.as_object().expect("object"))
            .expect("valid patch");

        assert_eq!(draft.author.map(|id| id.to_string()).as_deref(), expected);
    }

    #[rstest]
    fn patch_reports_every_violation(document: Value) {
        let blog = stored(&document, None);
        let patch = json!({ "tags": [], AUTHOR_ID_FIELD: "someone" });

        let violations = blog
            .patched(patch.as_object().expect("object"))
            .expect_err("invalid patch");

        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["tags", "author"]);
    }
}
