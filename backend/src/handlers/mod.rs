pub mod auth;
pub mod password_reset;
pub mod sessions;
pub mod users;
