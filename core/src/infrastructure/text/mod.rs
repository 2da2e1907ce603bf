//! Accent-folding search pattern construction for free-text filters.

use crate::domain::filtering::ports::SearchPatterns;

/// Accented renditions for each folded base letter (Latin-1 coverage).
const FOLDS: &[&str] = &[
    "aáàâãä", "eéèêë", "iíìîï", "oóòôõö", "uúùûü", "cç", "nñ", "yýÿ",
];

/// Builds regex patterns in which every letter of the search term also
/// matches its accented variants, so `agua` finds `água`. Case folding is
/// left to the backend's case-insensitive matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccentFolding;

impl AccentFolding {
    fn family(ch: char) -> Option<&'static str> {
        let folded = ch.to_lowercase().next()?;
        FOLDS
            .iter()
            .find(|family| family.chars().any(|member| member == folded))
            .copied()
    }
}

impl SearchPatterns for AccentFolding {
    fn create_find_regex(&self, term: &str) -> String {
        let mut pattern = String::new();
        for ch in term.chars() {
            match Self::family(ch) {
                Some(family) => {
                    pattern.push('[');
                    pattern.push_str(family);
                    pattern.push(']');
                }
                None => pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0u8; 4]))),
            }
        }
        pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn find(term: &str, haystack: &str) -> bool {
        let pattern = AccentFolding.create_find_regex(term);
        Regex::new(&format!("(?i){pattern}"))
            .unwrap()
            .is_match(haystack)
    }

    #[test]
    fn test_folds_accents_both_ways() {
        assert!(find("agua", "água"));
        assert!(find("água", "agua"));
        assert!(find("acao", "Ação"));
    }

    #[test]
    fn test_plain_terms_still_match() {
        assert!(find("teste", "um teste qualquer"));
        assert!(!find("teste", "outra coisa"));
    }

    #[test]
    fn test_metacharacters_are_escaped() {
        let pattern = AccentFolding.create_find_regex("1+1 (two)");
        let regex = Regex::new(&pattern).unwrap();

        assert!(regex.is_match("1+1 (two)"));
        assert!(!regex.is_match("11 two"));
    }
}
