//! Lesson records as they exist after loading: immutable, ordered, validated.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;

/// Stable identifier of an item across renders.
pub type ItemId = u32;

/// Header information for the generated site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub title: String,
    pub description: Option<String>,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            title: "Lessons".to_string(),
            description: None,
        }
    }
}

/// What to execute to obtain the printed output of a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RunTarget {
    /// A demonstration compiled into the binary, invoked as `<program> demo <name>`.
    Demo(String),
    /// An external program and its arguments.
    Command(Vec<String>),
}

impl fmt::Display for RunTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunTarget::Demo(name) => write!(f, "demo `{name}`"),
            RunTarget::Command(argv) => write!(f, "command `{}`", argv.join(" ")),
        }
    }
}

/// One code listing attached to an item.
///
/// The label is optional at load time; rendering requires it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSample {
    pub label: Option<String>,
    pub language: Option<String>,
    pub source: String,
    pub run: Option<RunTarget>,
}

impl CodeSample {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            label: None,
            language: None,
            source: source.into(),
            run: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_run(mut self, run: RunTarget) -> Self {
        self.run = Some(run);
        self
    }

    /// The label with surrounding whitespace removed, if one is present and non-blank.
    pub fn label(&self) -> Option<&str> {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

/// One lesson unit: prose plus its code samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: ItemId,
    title: String,
    description: String,
    samples: Vec<CodeSample>,
}

impl Item {
    pub fn new(
        id: ItemId,
        title: impl Into<String>,
        description: impl Into<String>,
        samples: Vec<CodeSample>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let description = description.into();

        if title.trim().is_empty() {
            return Err(DomainError::validation(format!("item {id} has an empty title")));
        }
        if description.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "item {id} has an empty description"
            )));
        }

        for (index, sample) in samples.iter().enumerate() {
            if let Some(RunTarget::Command(argv)) = &sample.run
                && argv.first().is_none_or(|program| program.trim().is_empty())
            {
                return Err(DomainError::validation(format!(
                    "item {id} sample #{} has an empty command",
                    index + 1
                )));
            }
        }

        Ok(Self {
            id,
            title: title.trim().to_string(),
            description,
            samples,
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn samples(&self) -> &[CodeSample] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_is_rejected() {
        let err = Item::new(4, "Noninstantiability", "  \n", Vec::new()).expect_err("invalid");
        assert_eq!(
            err,
            DomainError::validation("item 4 has an empty description")
        );
    }

    #[test]
    fn empty_command_is_rejected() {
        let sample = CodeSample::new("fn main() {}")
            .with_label("main.rs")
            .with_run(RunTarget::Command(Vec::new()));
        let err = Item::new(1, "Factories", "Prefer factories.", vec![sample]).expect_err("invalid");
        assert!(err.to_string().contains("empty command"), "{err}");
    }

    #[test]
    fn blank_label_reads_as_missing() {
        let sample = CodeSample::new("x").with_label("   ");
        assert_eq!(sample.label(), None);

        let sample = CodeSample::new("x").with_label(" Pizza.java ");
        assert_eq!(sample.label(), Some("Pizza.java"));
    }

    #[test]
    fn title_is_trimmed() {
        let item = Item::new(2, "  Builders ", "Use builders.", Vec::new()).expect("valid");
        assert_eq!(item.title(), "Builders");
    }
}
