//! Plain-text helpers applied around the model call.

const SENTENCE_SEPARATOR: &str = ". ";

/// Cut `text` to at most `limit` characters, on a char boundary.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Keep the first `max` sentences, where a sentence ends at `". "`.
pub fn limit_sentences(text: &str, max: usize) -> String {
    let sentences: Vec<&str> = text.split(SENTENCE_SEPARATOR).collect();
    if sentences.len() <= max {
        return text.to_string();
    }

    let mut kept = sentences[..max].join(SENTENCE_SEPARATOR);
    kept.push('.');
    kept
}

pub fn append_source_link(summary: &str, url: &str) -> String {
    format!("{}\n\n[Read more here]({})", summary, url)
}

/// Split prose into sentences ending in `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = idx + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}
