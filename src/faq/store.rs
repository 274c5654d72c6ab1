use std::collections::HashMap;

use super::types::Faq;

/// Question → answer mapping backing retrieval results.
#[derive(Debug, Clone, Default)]
pub struct FaqStore {
    entries: HashMap<String, String>,
    order: Vec<String>,
}

impl FaqStore {
    /// Builds the store from a corpus. A repeated question replaces the
    /// earlier answer but keeps its first position.
    pub fn from_faqs(faqs: &[Faq]) -> Self {
        let mut store = FaqStore::default();
        for faq in faqs {
            if store
                .entries
                .insert(faq.question.clone(), faq.answer.clone())
                .is_none()
            {
                store.order.push(faq.question.clone());
            }
        }
        store
    }

    pub fn get(&self, question: &str) -> Option<Faq> {
        self.entries
            .get(question)
            .map(|answer| Faq::new(question, answer.clone()))
    }

    pub fn contains(&self, question: &str) -> bool {
        self.entries.contains_key(question)
    }

    /// Distinct questions in first-seen order.
    pub fn questions(&self) -> &[String] {
        &self.order
    }

    pub fn faqs(&self) -> Vec<Faq> {
        self.order
            .iter()
            .filter_map(|question| self.get(question))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
