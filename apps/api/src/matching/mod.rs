pub mod cache;
pub mod experience;
pub mod handlers;
pub mod matcher;
pub mod resolver;
pub mod suggestions;
pub mod validation;
