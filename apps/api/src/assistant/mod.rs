pub mod handlers;
pub mod intents;
