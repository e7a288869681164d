//! Search-term highlighting
//!
//! Wraps every case-insensitive occurrence of a search term in the raw
//! markdown source with a `<mark>` element before parsing. This is a
//! lexical pass: a literal substring match with no awareness of
//! markdown syntax spans.

use regex::RegexBuilder;

/// Wrap occurrences of `term` in the source with highlight markers
///
/// An empty term returns the source unchanged.
pub fn apply_highlight(source: &str, term: &str) -> String {
    if term.is_empty() {
        return source.to_string();
    }

    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            log::warn!("highlight pattern failed to compile: {}", e);
            return source.to_string();
        }
    };

    pattern.replace_all(source, "<mark>$0</mark>").into_owned()
}
