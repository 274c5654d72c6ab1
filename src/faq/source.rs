use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use super::sample::sample_faqs;
use super::types::Faq;

#[derive(Debug, Error)]
pub enum FaqSourceError {
    #[error("Failed to read FAQ file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse FAQ file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported FAQ file extension for {0} (expected .yaml, .yml, .json or .jsonl)")]
    UnsupportedFormat(PathBuf),

    #[error("FAQ entry #{index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },
}

/// Where the FAQ corpus comes from. Loaded at startup and on re-index.
pub trait FaqSource: Send + Sync {
    fn describe(&self) -> String;

    fn load(&self) -> Result<Vec<Faq>, FaqSourceError>;
}

#[derive(Debug, Clone)]
pub struct StaticFaqSource {
    faqs: Vec<Faq>,
}

impl StaticFaqSource {
    pub fn new(faqs: Vec<Faq>) -> Self {
        Self { faqs }
    }

    pub fn sample() -> Self {
        Self::new(sample_faqs())
    }
}

impl FaqSource for StaticFaqSource {
    fn describe(&self) -> String {
        format!("built-in ({} entries)", self.faqs.len())
    }

    fn load(&self) -> Result<Vec<Faq>, FaqSourceError> {
        validate_entries(self.faqs.clone())
    }
}

#[derive(Debug, Clone)]
pub struct FileFaqSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FaqDocument {
    List(Vec<Faq>),
    Wrapped { faqs: Vec<Faq> },
}

impl FaqDocument {
    fn into_faqs(self) -> Vec<Faq> {
        match self {
            FaqDocument::List(faqs) | FaqDocument::Wrapped { faqs } => faqs,
        }
    }
}

impl FileFaqSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_error(&self, message: impl ToString) -> FaqSourceError {
        FaqSourceError::Parse {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn parse_jsonl(&self, contents: &str) -> Result<Vec<Faq>, FaqSourceError> {
        let mut faqs = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let faq: Faq = serde_json::from_str(line)
                .map_err(|e| self.parse_error(format!("line {}: {}", line_no + 1, e)))?;
            faqs.push(faq);
        }
        Ok(faqs)
    }
}

impl FaqSource for FileFaqSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Faq>, FaqSourceError> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let contents = fs::read_to_string(&self.path).map_err(|source| FaqSourceError::Read {
            path: self.path.clone(),
            source,
        })?;

        let faqs = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str::<FaqDocument>(&contents)
                .map_err(|e| self.parse_error(e))?
                .into_faqs(),
            Some("json") => serde_json::from_str::<FaqDocument>(&contents)
                .map_err(|e| self.parse_error(e))?
                .into_faqs(),
            Some("jsonl") => self.parse_jsonl(&contents)?,
            _ => return Err(FaqSourceError::UnsupportedFormat(self.path.clone())),
        };

        validate_entries(faqs)
    }
}

fn validate_entries(faqs: Vec<Faq>) -> Result<Vec<Faq>, FaqSourceError> {
    faqs.into_iter()
        .enumerate()
        .map(|(index, faq)| {
            let question = faq.question.trim();
            let answer = faq.answer.trim();
            if question.is_empty() {
                return Err(FaqSourceError::EmptyField {
                    index,
                    field: "question",
                });
            }
            if answer.is_empty() {
                return Err(FaqSourceError::EmptyField {
                    index,
                    field: "answer",
                });
            }
            Ok(Faq::new(question, answer))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn sample_source_has_reference_corpus() {
        let faqs = StaticFaqSource::sample().load().expect("sample loads");
        assert_eq!(faqs.len(), 14);
        assert_eq!(faqs[0].question, "How do I reset my password?");
    }

    #[test]
    fn loads_yaml_list_and_wrapped_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let yaml = write(
            dir.path(),
            "faqs.yaml",
            "- question: Is there a free trial?\n  answer: Yes, 14 days.\n",
        );
        let json = write(
            dir.path(),
            "faqs.json",
            r#"{"faqs": [{"question": " What are your support hours? ", "answer": "9 to 6."}]}"#,
        );

        let from_yaml = FileFaqSource::new(yaml).load().expect("yaml loads");
        assert_eq!(from_yaml, vec![Faq::new("Is there a free trial?", "Yes, 14 days.")]);

        let from_json = FileFaqSource::new(json).load().expect("json loads");
        assert_eq!(from_json[0].question, "What are your support hours?");
    }

    #[test]
    fn loads_jsonl_skipping_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            dir.path(),
            "faqs.jsonl",
            "{\"question\":\"q1\",\"answer\":\"a1\"}\n\n{\"question\":\"q2\",\"answer\":\"a2\"}\n",
        );

        let faqs = FileFaqSource::new(path).load().expect("jsonl loads");
        assert_eq!(faqs.len(), 2);
    }

    #[test]
    fn rejects_empty_answers_and_unknown_formats() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write(
            dir.path(),
            "faqs.yml",
            "- question: q1\n  answer: a1\n- question: q2\n  answer: '  '\n",
        );
        let err = FileFaqSource::new(path).load().expect_err("blank answer");
        assert!(matches!(
            err,
            FaqSourceError::EmptyField {
                index: 1,
                field: "answer"
            }
        ));

        let csv = write(dir.path(), "faqs.csv", "q,a\n");
        assert!(matches!(
            FileFaqSource::new(csv).load(),
            Err(FaqSourceError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = FileFaqSource::new("/definitely/not/here.yaml")
            .load()
            .expect_err("missing file");
        assert!(matches!(err, FaqSourceError::Read { .. }));
    }
}
