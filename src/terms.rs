//! Term frequencies for a label: the input a word cloud renders from.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::mood::MoodLabel;
use crate::normalize::tokenize;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "else", "ever", "few", "for", "from", "further", "get", "got", "had",
        "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself",
        "his", "how", "however", "i", "if", "im", "in", "into", "is", "it", "its", "itself",
        "just", "me", "more", "most", "my", "myself", "of", "off", "on", "once", "only", "or",
        "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own", "same",
        "shall", "she", "should", "since", "so", "some", "such", "than", "that", "the",
        "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
        "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
        "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
        "would", "you", "your", "yours", "yourself", "yourselves", "rt", "http", "https",
        "www", "com", "co", "amp", "i'm", "it's", "don't", "can't", "you're", "that's",
    ]
    .into_iter()
    .collect()
});

/// Most frequent terms across `records` carrying `label`, highest count
/// first, ties alphabetical. Stopwords, single characters and bare numbers
/// are skipped; a trailing `'s` is dropped.
pub fn top_terms<'a, I>(
    records: I,
    label: MoodLabel,
    limit: usize,
    extra_stopwords: &[String],
) -> Vec<TermCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let extra: HashSet<String> = extra_stopwords.iter().map(|s| s.trim().to_lowercase()).collect();

    let mut freq: HashMap<String, usize> = HashMap::new();
    for r in records.into_iter().filter(|r| r.label == label) {
        for tok in tokenize(&r.text).into_iter().filter(|t| t.is_word()) {
            let term = tok.lower.strip_suffix("'s").unwrap_or(&tok.lower);
            if term.chars().count() < 2
                || term.chars().all(|c| c.is_numeric())
                || STOPWORDS.contains(term)
                || extra.contains(term)
            {
                continue;
            }
            *freq.entry(term.to_string()).or_insert(0) += 1;
        }
    }

    let mut out: Vec<TermCount> = freq
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    out.truncate(limit);
    out
}
