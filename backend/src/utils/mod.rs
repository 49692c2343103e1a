pub mod jwt;
pub mod password;
pub mod signing_key;
