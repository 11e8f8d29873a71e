//! Weighted text relevance over a post's title and body.
//!
//! Title and body are treated as one searchable document where title
//! matches weigh more. A post matches only when every query term occurs in
//! it, which mirrors `plainto_tsquery` semantics in PostgreSQL.

use serde::Serialize;

/// Weight of a term occurrence in the title.
pub const TITLE_WEIGHT: f32 = 1.0;
/// Weight of a term occurrence in the body.
pub const BODY_WEIGHT: f32 = 0.4;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "that", "the", "to", "was", "with",
];

/// A parsed free-text query. Construction fails when nothing searchable is left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    terms: Vec<String>,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut terms: Vec<String> = tokenize(raw)
            .filter(|t| !STOP_WORDS.contains(&t.as_str()))
            .collect();
        terms.sort();
        terms.dedup();

        if terms.is_empty() {
            return None;
        }

        Some(Self {
            raw: raw.trim().to_string(),
            terms,
        })
    }

    /// The trimmed query text, as typed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Relevance of a document, or `None` when some term does not occur.
    pub fn rank(&self, title: &str, body: &str) -> Option<f32> {
        let title_tokens: Vec<String> = tokenize(title).collect();
        let body_tokens: Vec<String> = tokenize(body).collect();

        let mut score = 0.0;
        for term in &self.terms {
            let in_title = title_tokens.iter().filter(|t| *t == term).count();
            let in_body = body_tokens.iter().filter(|t| *t == term).count();
            if in_title + in_body == 0 {
                return None;
            }
            score += in_title as f32 * TITLE_WEIGHT + in_body as f32 * BODY_WEIGHT;
        }

        Some(score)
    }
}

/// A search result with its relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<T> {
    pub post: T,
    pub rank: f32,
}

/// Split text into lowercase alphanumeric words.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}
