pub mod accept_language;
pub mod resolver;
pub mod router;
pub mod store;
