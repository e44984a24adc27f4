//! Combined corpus of all documents in a run
//!
//! Each document's text is preceded by a delimiter line naming its source:
//!
//! ```text
//!
//! ----- [source: housing.pdf] -----
//! <text of housing.pdf>
//! ----- [source: seal.pdf] -----
//! <text of seal.pdf>
//! ```
//!
//! The delimiter is for traceability only and is never parsed downstream.

use std::ops::Range;

const DELIMITER_OPEN: &str = "\n----- [source: ";
const DELIMITER_CLOSE: &str = "] -----\n";

/// Location of one document's text inside a [`Corpus`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSpan {
    /// Display name of the source document
    pub name: String,

    /// Byte range of the document's text (delimiter excluded)
    pub range: Range<usize>,
}

/// Concatenated text of every document in a run
///
/// Document order matches input order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    text: String,
    spans: Vec<CorpusSpan>,
}

impl Corpus {
    /// Build a corpus from `(name, text)` pairs
    ///
    /// Deterministic in input order. The output length is the sum of the
    /// input lengths plus one [`Corpus::delimiter`] per document; nothing is
    /// reordered or truncated.
    ///
    /// # Examples
    ///
    /// ```
    /// use specsheet_domain::Corpus;
    ///
    /// let corpus = Corpus::build([("a.pdf", "PA66"), ("b.pdf", "IP67")]);
    /// assert!(corpus.as_str().find("PA66") < corpus.as_str().find("IP67"));
    /// assert_eq!(corpus.document_names(), vec!["a.pdf", "b.pdf"]);
    /// ```
    pub fn build<I, N, T>(documents: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let mut corpus = Self::default();
        for (name, text) in documents {
            corpus.push(name.as_ref(), text.as_ref());
        }
        corpus
    }

    /// Delimiter line written before a document's text
    ///
    /// Line breaks in the name are replaced with spaces so the delimiter
    /// always stays on a single line.
    pub fn delimiter(name: &str) -> String {
        let name: String = name
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        format!("{DELIMITER_OPEN}{name}{DELIMITER_CLOSE}")
    }

    fn push(&mut self, name: &str, text: &str) {
        self.text.push_str(&Self::delimiter(name));
        let start = self.text.len();
        self.text.push_str(text);
        self.spans.push(CorpusSpan {
            name: name.to_string(),
            range: start..self.text.len(),
        });
    }

    /// Full corpus text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the corpus holds no text at all
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Per-document spans, in input order
    pub fn spans(&self) -> &[CorpusSpan] {
        &self.spans
    }

    /// Source names, in input order
    pub fn document_names(&self) -> Vec<&str> {
        self.spans.iter().map(|s| s.name.as_str()).collect()
    }

    /// Text of one document, looked up by name
    pub fn document_text(&self, name: &str) -> Option<&str> {
        self.spans
            .iter()
            .find(|s| s.name == name)
            .map(|s| &self.text[s.range.clone()])
    }

    /// Leading `max_chars` characters of the corpus
    ///
    /// Documents late in the corpus may fall outside the prefix entirely.
    pub fn prefix(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_document_order_is_stable() {
        let corpus = Corpus::build([("a.pdf", "alpha text"), ("b.pdf", "beta text")]);
        let text = corpus.as_str();

        let delim_a = text.find(&Corpus::delimiter("a.pdf")).unwrap();
        let body_a = text.find("alpha text").unwrap();
        let delim_b = text.find(&Corpus::delimiter("b.pdf")).unwrap();
        let body_b = text.find("beta text").unwrap();

        assert!(delim_a < body_a);
        assert!(body_a < delim_b);
        assert!(delim_b < body_b);
    }

    #[test]
    fn test_length_is_sum_plus_delimiters() {
        let docs = [("one.pdf", "12345"), ("two.pdf", "")];
        let corpus = Corpus::build(docs);
        let expected: usize = docs
            .iter()
            .map(|(n, t)| Corpus::delimiter(n).len() + t.len())
            .sum();
        assert_eq!(corpus.len(), expected);
    }

    #[test]
    fn test_spans_point_at_document_text() {
        let corpus = Corpus::build([("a.pdf", "first"), ("b.pdf", "second")]);
        assert_eq!(corpus.document_text("a.pdf"), Some("first"));
        assert_eq!(corpus.document_text("b.pdf"), Some("second"));
        assert_eq!(corpus.document_text("c.pdf"), None);
    }

    #[test]
    fn test_empty_input() {
        let corpus = Corpus::build(Vec::<(String, String)>::new());
        assert!(corpus.is_empty());
        assert!(corpus.spans().is_empty());
    }

    #[test]
    fn test_delimiter_stays_on_one_line() {
        let delimiter = Corpus::delimiter("evil\nname.pdf");
        assert_eq!(delimiter.trim_matches('\n').lines().count(), 1);
        assert!(delimiter.contains("evil name.pdf"));
    }

    #[test]
    fn test_prefix_counts_characters() {
        let corpus = Corpus::build([("u.pdf", "äöü✓✓")]);
        let total = corpus.char_count();
        assert_eq!(corpus.prefix(total).len(), corpus.len());
        assert_eq!(corpus.prefix(total + 10), corpus.as_str());

        let cut = corpus.prefix(total - 1);
        assert_eq!(cut.chars().count(), total - 1);
        assert!(cut.ends_with('✓'));
    }

    #[test]
    fn test_prefix_hides_late_documents() {
        let long = "x".repeat(100);
        let corpus = Corpus::build([("early.pdf", long.as_str()), ("late.pdf", "LATE")]);
        assert!(!corpus.prefix(60).contains("LATE"));
        assert!(corpus.prefix(usize::MAX).contains("LATE"));
    }

    proptest! {
        #[test]
        fn prop_no_truncation(a in ".{0,64}", b in ".{0,64}") {
            let corpus = Corpus::build([("a", a.as_str()), ("b", b.as_str())]);
            prop_assert_eq!(corpus.document_text("a"), Some(a.as_str()));
            prop_assert_eq!(corpus.document_text("b"), Some(b.as_str()));
        }
    }
}
