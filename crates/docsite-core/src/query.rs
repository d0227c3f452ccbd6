//! Fuzzy querying over an in-memory corpus.
//!
//! Each searchable field is scored on a 0..=1 scale where lower is better:
//! an exact (case-insensitive) substring scores near zero, a scattered
//! fuzzy match scores by the share of gap characters inside its span, and
//! anything above the threshold does not match. Field scores combine as a
//! weighted product, so a strong title match outranks a strong body match.

use crate::utils::{char_window, truncate_chars};
use crate::{QueryResult, SearchDocument, SearchField, SectionGroup};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Score given to an exact substring hit.
const EXACT_SCORE: f64 = 0.001;

/// Shortest run of consecutive matched characters that counts as a match.
const MIN_MATCH_CHARS: usize = 2;

const SNIPPET_BEFORE: usize = 60;
const SNIPPET_AFTER: usize = 90;
const SNIPPET_FALLBACK: usize = 150;
const ELLIPSIS: &str = "...";

/// The queryable collection of indexed documents.
///
/// Lowercased field text is prepared once when the corpus is built.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<SearchDocument>,
    prepared: Vec<PreparedFields>,
}

#[derive(Debug, Clone, Default)]
struct PreparedFields {
    title: String,
    description: String,
    keywords: String,
    headings: Vec<String>,
    content: String,
}

impl PreparedFields {
    fn from_document(doc: &SearchDocument) -> Self {
        Self {
            title: doc.title.to_lowercase(),
            description: doc.description.to_lowercase(),
            keywords: doc.keywords.to_lowercase(),
            headings: doc.headings.iter().map(|h| h.text.to_lowercase()).collect(),
            content: doc.content.to_lowercase(),
        }
    }
}

impl Corpus {
    pub fn new(documents: Vec<SearchDocument>) -> Self {
        let prepared = documents.iter().map(PreparedFields::from_document).collect();
        Self {
            documents,
            prepared,
        }
    }

    pub fn documents(&self) -> &[SearchDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_documents(self) -> Vec<SearchDocument> {
        self.documents
    }
}

impl From<Vec<SearchDocument>> for Corpus {
    fn from(documents: Vec<SearchDocument>) -> Self {
        Self::new(documents)
    }
}

/// Tolerances for [`QueryEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Highest field score still counted as a match.
    pub threshold: f64,
    /// Trimmed queries shorter than this return nothing.
    pub min_query_chars: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            min_query_chars: 2,
        }
    }
}

/// Ranks corpus documents against free-text queries.
pub struct QueryEngine {
    matcher: SkimMatcherV2,
    options: QueryOptions,
}

impl QueryEngine {
    pub fn new(options: QueryOptions) -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
            options,
        }
    }

    pub const fn options(&self) -> QueryOptions {
        self.options
    }

    /// Every document matching the query, best first.
    ///
    /// Returns an empty list for queries below the length floor. Results are
    /// not capped; presentation code decides how many to show.
    pub fn search(&self, corpus: &Corpus, query: &str) -> Vec<QueryResult> {
        let query = query.trim();
        if query.chars().count() < self.options.min_query_chars {
            return Vec::new();
        }
        let needle = query.to_lowercase();

        let mut results: Vec<QueryResult> = corpus
            .documents
            .iter()
            .zip(&corpus.prepared)
            .filter_map(|(doc, fields)| {
                let (score, matched_fields) = self.score_document(fields, &needle)?;
                Some(QueryResult {
                    document: doc.clone(),
                    score,
                    matched_fields,
                    snippet: extract_snippet(&doc.content, query),
                })
            })
            .collect();

        // Stable: equal scores keep manifest order.
        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results
    }

    fn score_document(
        &self,
        fields: &PreparedFields,
        needle: &str,
    ) -> Option<(f64, Vec<SearchField>)> {
        let total_weight = SearchField::total_weight();
        let mut combined = 1.0;
        let mut matched = Vec::new();

        for field in SearchField::ALL {
            let score = match field {
                SearchField::Title => self.field_score(&fields.title, needle),
                SearchField::Description => self.field_score(&fields.description, needle),
                SearchField::Keywords => self.field_score(&fields.keywords, needle),
                SearchField::Content => self.field_score(&fields.content, needle),
                SearchField::Headings => fields
                    .headings
                    .iter()
                    .filter_map(|text| self.field_score(text, needle))
                    .min_by(f64::total_cmp),
            };

            if let Some(score) = score {
                combined *= score.powf(field.weight() / total_weight);
                matched.push(field);
            }
        }

        (!matched.is_empty()).then_some((combined, matched))
    }

    /// Score one lowercased field, or `None` if it does not match.
    fn field_score(&self, text: &str, needle: &str) -> Option<f64> {
        if text.is_empty() {
            return None;
        }
        if text.contains(needle) {
            return Some(EXACT_SCORE);
        }

        let (_, indices) = self.matcher.fuzzy_indices(text, needle)?;
        let (&first, &last) = (indices.first()?, indices.last()?);

        if longest_run(&indices) < MIN_MATCH_CHARS.min(indices.len()) {
            return None;
        }

        let pattern_len = indices.len();
        let gaps = (last - first + 1).saturating_sub(pattern_len);
        #[allow(clippy::cast_precision_loss)]
        let score = (gaps as f64 / pattern_len as f64).clamp(EXACT_SCORE, 1.0);

        (score <= self.options.threshold).then_some(score)
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}

/// Longest stretch of consecutive character indices.
fn longest_run(indices: &[usize]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<usize> = None;

    for &idx in indices {
        current = match previous {
            Some(p) if p + 1 == idx => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(idx);
    }

    longest
}

/// Preview text around the first case-insensitive occurrence of `query`.
///
/// Found: up to 60 characters before and 90 after the match, with `...`
/// on each side that was clipped. Not found: the first 150 characters
/// followed by `...`.
pub fn extract_snippet(content: &str, query: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = content.chars().collect();
    let folded: Vec<char> = chars.iter().map(|&c| fold_char(c)).collect();
    let needle: Vec<char> = query.chars().map(fold_char).collect();

    let position = if needle.is_empty() {
        None
    } else {
        folded.windows(needle.len()).position(|window| window == needle.as_slice())
    };

    let Some(start) = position else {
        return format!("{}{ELLIPSIS}", truncate_chars(content, SNIPPET_FALLBACK));
    };

    let window = char_window(&chars, start, needle.len(), SNIPPET_BEFORE, SNIPPET_AFTER);
    let mut snippet = String::with_capacity(window.text.len() + 2 * ELLIPSIS.len());
    if window.clipped_start {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&window.text);
    if window.clipped_end {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Single-char lowercase so folded text keeps the original char offsets.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Group ranked results by section, sections in first-occurrence order.
pub fn group_by_section(results: &[QueryResult]) -> Vec<SectionGroup> {
    let mut groups: Vec<SectionGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for result in results {
        let section = result.document.section.as_str();
        if let Some(&i) = positions.get(section) {
            groups[i].results.push(result.clone());
        } else {
            positions.insert(section, groups.len());
            groups.push(SectionGroup {
                section: section.to_string(),
                results: vec![result.clone()],
            });
        }
    }

    groups
}
