pub mod chat;
pub mod config;
pub mod faqs;
pub mod health;
