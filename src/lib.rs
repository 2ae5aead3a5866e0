// Chatcloud: distinctive-word scoring for Telegram chat exports
//
// This is the library root. Each module corresponds to a stage of the
// pipeline: load the export, count words, score them, write the result.

pub mod activity;
pub mod config;
pub mod export;
pub mod output;
pub mod words;
