pub mod canonical;
pub mod dictionary;
pub mod handlers;
