//! Diesel table definitions.
//!
//! Kept in step with `backend/migrations` by hand.

diesel::table! {
    /// Registered users. The profile document is stored whole as JSONB;
    /// `blog_ids` mirrors `blogs.author_id`.
    users (id) {
        id -> Uuid,
        profile -> Jsonb,
        blog_ids -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blog posts. `author_id` is set to null when the author is deleted.
    blogs (id) {
        id -> Uuid,
        title -> Text,
        description -> Text,
        category -> Text,
        tags -> Array<Text>,
        author_id -> Nullable<Uuid>,
        image -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    tags (id) {
        id -> Uuid,
        tag_name -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    categories (id) {
        id -> Uuid,
        category_name -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(blogs -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(blogs, categories, tags, users);
