use crate::{
    config::Config,
    services::{
        auth::AuthService,
        author::AuthorService,
        book::BookService,
        category::CategoryService,
        comment::CommentService,
        database::Database,
        notification::NotificationService,
        realtime::RealtimeService,
        user::UserService,
    },
};

/// Shared application state holding configuration and all services.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub author_service: AuthorService,
    pub book_service: BookService,
    pub category_service: CategoryService,
    pub comment_service: CommentService,
    pub notification_service: NotificationService,
    pub realtime_service: RealtimeService,
}

impl AppState {
    pub fn is_production(&self) -> bool {
        self.config.is_production()
    }

    pub fn is_development(&self) -> bool {
        self.config.is_development()
    }
}
