pub mod chat;
pub mod core;
pub mod faq;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
