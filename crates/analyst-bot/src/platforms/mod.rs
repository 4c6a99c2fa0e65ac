//! Platform-specific chat clients

pub mod telegram;

pub use telegram::{Chat, IncomingMessage, TelegramClient, Update, User};
