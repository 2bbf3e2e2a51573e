//! PostgreSQL array functions used to maintain `users.blog_ids`.

use diesel::sql_types::{Array, Uuid};

diesel::define_sql_function! {
    /// `array_append(array, element)`.
    fn array_append(array: Array<Uuid>, element: Uuid) -> Array<Uuid>;
}

diesel::define_sql_function! {
    /// `array_remove(array, element)`; removes every occurrence.
    fn array_remove(array: Array<Uuid>, element: Uuid) -> Array<Uuid>;
}
