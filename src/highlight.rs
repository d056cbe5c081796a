/// Label emphasis predicate
///
/// Decides which chart labels are drawn in bold. A label is emphasized when it
/// contains any of the configured needles as a substring.
use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Highlight {
    automaton: Option<AhoCorasick>,
}

impl Highlight {
    /// Build a predicate from one or more substrings. Empty needles are ignored.
    pub fn new<I, S>(needles: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let needles: Vec<String> = needles
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if needles.is_empty() {
            return Ok(Self::none());
        }

        let automaton = AhoCorasick::new(&needles)
            .with_context(|| format!("Failed to build highlight matcher for {:?}", needles))?;

        Ok(Self {
            automaton: Some(automaton),
        })
    }

    /// A predicate that emphasizes nothing
    pub fn none() -> Self {
        Self { automaton: None }
    }

    pub fn matches(&self, label: &str) -> bool {
        match &self.automaton {
            Some(ac) => ac.is_match(label),
            None => false,
        }
    }
}

impl Default for Highlight {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        let highlight = Highlight::new(["optimap::HashMap"]).unwrap();

        assert!(highlight.matches("optimap::HashMap (wyhash)"));
        assert!(highlight.matches("ns::optimap::HashMap<int> (std::hash)"));
        assert!(!highlight.matches("std::unordered_map (std::hash)"));
    }

    #[test]
    fn test_multiple_needles() {
        let highlight = Highlight::new(["absl", "robin_hood"]).unwrap();

        assert!(highlight.matches("absl::flat_hash_map (absl::Hash)"));
        assert!(highlight.matches("robin_hood::unordered_map (robin_hood::hash)"));
        assert!(!highlight.matches("tsl::sparse_map (std::hash)"));
    }

    #[test]
    fn test_empty_needles_match_nothing() {
        let highlight = Highlight::new(["", ""]).unwrap();
        assert!(highlight.automaton.is_none());
        assert!(!highlight.matches("anything"));
        assert!(!Highlight::none().matches(""));
    }

    #[test]
    fn test_case_sensitive() {
        let highlight = Highlight::new(["Optimap"]).unwrap();
        assert!(!highlight.matches("optimap::HashMap (wyhash)"));
    }
}
