//! FAQ corpus: entries, the question→answer store and injectable sources.

mod sample;
mod source;
mod store;
mod types;

pub use sample::sample_faqs;
pub use source::{FaqSource, FaqSourceError, FileFaqSource, StaticFaqSource};
pub use store::FaqStore;
pub use types::Faq;
