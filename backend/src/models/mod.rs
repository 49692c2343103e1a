pub mod password_reset;
pub mod session;
pub mod user;
