//! Case-folded term matching over a fixed term set.

use regex::Regex;
use tika_config::MatchMode;

/// Matches an utterance against a set of terms.
///
/// In [`MatchMode::Substring`] a term matches anywhere, including inside a
/// longer word: `"is"` matches `"this"`. [`MatchMode::WordBoundary`] only
/// accepts a term that is neither preceded nor followed by a Unicode word
/// character (combining marks of Indic scripts count as word characters).
#[derive(Debug, Clone)]
pub struct TermMatcher {
    terms: Vec<String>,
    boundary: Option<Regex>,
}

impl TermMatcher {
    /// Build a matcher. Terms are case-folded, trimmed and deduplicated;
    /// empty terms are dropped.
    pub fn new<I, S>(terms: I, mode: MatchMode) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folded = fold_terms(terms);
        let boundary = match mode {
            MatchMode::WordBoundary if !folded.is_empty() => {
                let alternation = folded
                    .iter()
                    .map(|t| regex::escape(t))
                    .collect::<Vec<_>>()
                    .join("|");
                Some(Regex::new(&format!(r"(?:^|\W)(?:{alternation})(?:$|\W)"))?)
            }
            _ => None,
        };

        Ok(Self { terms: folded, boundary })
    }

    /// Substring matcher; cannot fail.
    pub fn substring<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { terms: fold_terms(terms), boundary: None }
    }

    /// True iff the case-folded `text` contains at least one term.
    pub fn matches(&self, text: &str) -> bool {
        if self.terms.is_empty() || text.is_empty() {
            return false;
        }
        let folded = text.to_lowercase();
        match &self.boundary {
            Some(re) => re.is_match(&folded),
            None => self.terms.iter().any(|t| folded.contains(t.as_str())),
        }
    }

    /// The case-folded terms, in first-seen order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn mode(&self) -> MatchMode {
        if self.boundary.is_some() {
            MatchMode::WordBoundary
        } else {
            MatchMode::Substring
        }
    }
}

fn fold_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut folded: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if !term.is_empty() && !folded.contains(&term) {
            folded.push(term);
        }
    }
    folded
}
