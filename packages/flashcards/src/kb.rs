//! Knowledge base implementations.
//!
//! The filesystem layout is one directory per topic with one `.txt` document
//! per section: `{root}/{topic_code}/{section_code}.txt`. Section titles are
//! derived from the section code since the corpus carries no separate
//! metadata file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{FlashcardError, Result};
use crate::traits::kb::{KnowledgeBase, SectionRef};

/// Turn a kebab-case code into a display title.
fn humanize(code: &str) -> String {
    code.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Filesystem-backed knowledge base.
pub struct FsKnowledgeBase {
    root: PathBuf,
}

impl FsKnowledgeBase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn topic_dir(&self, topic_code: &str) -> PathBuf {
        self.root.join(topic_code)
    }
}

#[async_trait]
impl KnowledgeBase for FsKnowledgeBase {
    async fn list_sections(&self, topic_code: &str) -> Result<Vec<SectionRef>> {
        let dir = self.topic_dir(topic_code);

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // A topic with no corpus directory simply has no sections
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(FlashcardError::Storage(Box::new(e))),
        };

        let mut sections = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FlashcardError::Storage(Box::new(e)))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            if let Some(code) = path.file_stem().and_then(|s| s.to_str()) {
                let title = humanize(code);
                sections.push(SectionRef {
                    code: code.to_string(),
                    short_title: title.clone(),
                    title,
                });
            }
        }

        sections.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(sections)
    }

    async fn read_section(&self, topic_code: &str, section_code: &str) -> Result<String> {
        let path = self.topic_dir(topic_code).join(format!("{}.txt", section_code));

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FlashcardError::SectionNotFound {
                topic_code: topic_code.to_string(),
                section_code: section_code.to_string(),
            }),
            Err(e) => Err(FlashcardError::Storage(Box::new(e))),
        }
    }
}

/// In-memory knowledge base for tests.
#[derive(Default)]
pub struct MemoryKnowledgeBase {
    sections: HashMap<(String, String), (SectionRef, String)>,
}

impl MemoryKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(
        mut self,
        topic_code: impl Into<String>,
        section_code: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let topic_code = topic_code.into();
        let code = section_code.into();
        let title = title.into();
        let section = SectionRef {
            code: code.clone(),
            short_title: title.clone(),
            title,
        };
        self.sections
            .insert((topic_code, code), (section, content.into()));
        self
    }
}

#[async_trait]
impl KnowledgeBase for MemoryKnowledgeBase {
    async fn list_sections(&self, topic_code: &str) -> Result<Vec<SectionRef>> {
        let mut sections: Vec<SectionRef> = self
            .sections
            .iter()
            .filter(|((topic, _), _)| topic == topic_code)
            .map(|(_, (section, _))| section.clone())
            .collect();
        sections.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(sections)
    }

    async fn read_section(&self, topic_code: &str, section_code: &str) -> Result<String> {
        self.sections
            .get(&(topic_code.to_string(), section_code.to_string()))
            .map(|(_, content)| content.clone())
            .ok_or_else(|| FlashcardError::SectionNotFound {
                topic_code: topic_code.to_string(),
                section_code: section_code.to_string(),
            })
    }
}
