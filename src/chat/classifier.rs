/// Decides whether a message is a greeting: after trimming and lowercasing,
/// the text must start with one of the vocabulary entries.
#[derive(Debug, Clone)]
pub struct GreetingClassifier {
    vocabulary: Vec<String>,
}

impl GreetingClassifier {
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vocabulary = vocabulary
            .into_iter()
            .map(|g| g.as_ref().trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn is_greeting(&self, text: &str) -> bool {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return false;
        }
        self.vocabulary
            .iter()
            .any(|greeting| normalized.starts_with(greeting.as_str()))
    }
}
