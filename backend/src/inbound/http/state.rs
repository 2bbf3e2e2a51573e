//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on domain
//! ports, so they can be exercised without a database.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BlogRepository, BlogsCommand, BlogsQuery, ImageStore, TermRepository, TermsCommand,
    TermsQuery, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    BlogService, CategoryKind, TagKind, TermKind, TermService, UserService,
};

/// Command and query ports for one term family.
pub struct TermPorts<K: TermKind> {
    pub command: Arc<dyn TermsCommand<K>>,
    pub query: Arc<dyn TermsQuery<K>>,
}

impl<K: TermKind> TermPorts<K> {
    fn backed_by<R>(terms: Arc<R>, clock: Arc<dyn Clock>) -> Self
    where
        R: TermRepository<K> + 'static,
    {
        let service = Arc::new(TermService::<K, R>::new(terms, clock));
        Self {
            command: service.clone(),
            query: service,
        }
    }
}

impl<K: TermKind> Clone for TermPorts<K> {
    fn clone(&self) -> Self {
        Self {
            command: Arc::clone(&self.command),
            query: Arc::clone(&self.query),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub blogs: Arc<dyn BlogsCommand>,
    pub blogs_query: Arc<dyn BlogsQuery>,
    pub tags: TermPorts<TagKind>,
    pub categories: TermPorts<CategoryKind>,
    /// Stages multipart uploads before they reach a command port.
    pub images: Arc<dyn ImageStore>,
}

/// Driven adapters from which the domain services behind [`HttpState`] are
/// built.
pub struct StateAdapters<U, B, T, C, I> {
    pub users: Arc<U>,
    pub blogs: Arc<B>,
    pub tags: Arc<T>,
    pub categories: Arc<C>,
    pub images: Arc<I>,
    pub clock: Arc<dyn Clock>,
}

impl<U, B, T, C, I> StateAdapters<U, B, T, C, I>
where
    U: UserRepository + 'static,
    B: BlogRepository + 'static,
    T: TermRepository<TagKind> + 'static,
    C: TermRepository<CategoryKind> + 'static,
    I: ImageStore + 'static,
{
    /// Wire the domain services and expose them as driving ports.
    pub fn into_state(self) -> HttpState {
        let Self {
            users,
            blogs,
            tags,
            categories,
            images,
            clock,
        } = self;
        let user_service = Arc::new(UserService::new(
            users,
            Arc::clone(&blogs),
            Arc::clone(&images),
            Arc::clone(&clock),
        ));
        let blog_service = Arc::new(BlogService::new(
            blogs,
            Arc::clone(&images),
            Arc::clone(&clock),
        ));
        HttpState {
            users: user_service.clone(),
            users_query: user_service,
            blogs: blog_service.clone(),
            blogs_query: blog_service,
            tags: TermPorts::backed_by(tags, Arc::clone(&clock)),
            categories: TermPorts::backed_by(categories, clock),
            images,
        }
    }
}

/// Access to the term ports of a given kind, for handlers generic over `K`.
pub trait TermState<K: TermKind> {
    fn term_ports(&self) -> &TermPorts<K>;
}

impl TermState<TagKind> for HttpState {
    fn term_ports(&self) -> &TermPorts<TagKind> {
        &self.tags
    }
}

impl TermState<CategoryKind> for HttpState {
    fn term_ports(&self) -> &TermPorts<CategoryKind> {
        &self.categories
    }
}
