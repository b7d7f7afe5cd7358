//! Reading time estimate for post content

use lazy_static::lazy_static;
use regex::Regex;

use crate::content::richtext::as_text;
use crate::content::ContentSection;

lazy_static! {
    static ref WORD_SEPARATOR: Regex = Regex::new(r"[,.\s]").unwrap();
}

/// Default reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Number of words across every heading and body of the post.
///
/// Headings and plain-text bodies are joined with commas and split on
/// whitespace, commas and periods; empty fragments are not words.
pub fn count_words(sections: &[ContentSection]) -> usize {
    let text = sections
        .iter()
        .flat_map(|section| [section.heading.clone().unwrap_or_default(), as_text(&section.body)])
        .collect::<Vec<_>>()
        .join(",");

    WORD_SEPARATOR
        .split(&text)
        .filter(|word| !word.is_empty())
        .count()
}

/// Estimated reading time in whole minutes, never less than one
pub fn reading_time(sections: &[ContentSection], words_per_minute: usize) -> usize {
    let words = count_words(sections);
    words.div_ceil(words_per_minute.max(1)).max(1)
}
