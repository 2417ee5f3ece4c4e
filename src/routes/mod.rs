pub mod auth;
pub mod author;
pub mod books;
pub mod categories;
pub mod comments;
pub mod notifications;
pub mod websocket;
