//! Document specifications for the filter

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde::Deserialize;
use spec_rules::prelude::*;

/// Document being filtered
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
}

/// Load documents from a JSON array file
pub async fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid documents in {}", path.display()))
}

/// Four documents an hour apart, starting 2023-06-27T20:56:00Z
pub fn sample_documents() -> Vec<Document> {
    let date = Utc
        .with_ymd_and_hms(2023, 6, 27, 20, 56, 0)
        .single()
        .expect("valid sample date");
    ["First", "Second", "Third", "Fourth"]
        .into_iter()
        .enumerate()
        .map(|(i, word)| Document {
            title: format!("{word} title"),
            content: format!("{word} doc content"),
            date: date + Duration::hours(i as i64),
        })
        .collect()
}

// ============================================================================
// Text Specifications
// ============================================================================

/// Title contains a word
pub struct TitleContainsWord {
    pub word: String,
}

impl TitleContainsWord {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }
}

#[async_trait]
impl Specification<Document> for TitleContainsWord {
    async fn evaluate(&self, _token: &CancellationToken, doc: &Document) -> SpecResult<bool> {
        Ok(doc.title.contains(&self.word))
    }

    fn describe(&self) -> String {
        format!("doc title must contain '{}'", self.word)
    }
}

/// Content contains a word
pub struct ContentContainsWord {
    pub word: String,
}

impl ContentContainsWord {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }
}

#[async_trait]
impl Specification<Document> for ContentContainsWord {
    async fn evaluate(&self, _token: &CancellationToken, doc: &Document) -> SpecResult<bool> {
        Ok(doc.content.contains(&self.word))
    }

    fn describe(&self) -> String {
        format!("doc content must contain '{}'", self.word)
    }
}

// ============================================================================
// Time-based Specifications
// ============================================================================

/// Document is dated strictly before a cutoff
pub struct DateBefore {
    pub cutoff: DateTime<Utc>,
}

impl DateBefore {
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self { cutoff }
    }
}

#[async_trait]
impl Specification<Document> for DateBefore {
    async fn evaluate(&self, _token: &CancellationToken, doc: &Document) -> SpecResult<bool> {
        Ok(doc.date < self.cutoff)
    }

    fn describe(&self) -> String {
        format!(
            "doc date must be lower than '{}'",
            self.cutoff.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// `date < cutoff AND ((title∋w1 AND content∋w1) OR (title∋w2 AND content∋w2) ...)`
pub fn build_rule(cutoff: DateTime<Utc>, words: &[String]) -> Spec<Document> {
    let mentions = words.iter().map(|word| {
        TitleContainsWord::new(word.as_str()).and(Spec::leaf(ContentContainsWord::new(word.as_str())))
    });
    DateBefore::new(cutoff).and(any_of(mentions))
}
