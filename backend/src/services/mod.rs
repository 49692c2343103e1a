pub mod cleanup;
pub mod mailer;
pub mod session;
