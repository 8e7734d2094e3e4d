pub mod assistants;
pub mod chat;
pub mod config_cmd;
pub mod prompt;
