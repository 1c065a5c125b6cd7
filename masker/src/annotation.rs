//! Mask annotations: a strategy name with an optional argument.
//!
//! Annotation text is accepted in three forms:
//!
//! | Text | Strategy | Argument |
//! |------|----------|----------|
//! | `filled` | `filled` | (empty) |
//! | `filled(4)` | `filled` | `4` |
//! | `filled4` | `filled` | `4` |
//!
//! The parenthesised form allows arguments with punctuation, such as
//! `preserveEnds(3,3)`. The compact form splits at the first character that is
//! neither alphabetic nor `_`, so strategy names used with it must not contain
//! digits.

use std::fmt;

/// A parsed annotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    strategy: String,
    argument: String,
}

impl Annotation {
    /// Builds an annotation from its parts.
    pub fn new(strategy: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            argument: argument.into(),
        }
    }

    /// Parses annotation text. Returns `None` for blank text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(open) = text.find('(') {
            if open > 0 && text.ends_with(')') {
                let strategy = text[..open].trim();
                let argument = text[open + 1..text.len() - 1].trim();
                return Some(Self::new(strategy, argument));
            }
        }

        let split = text
            .find(|ch: char| !(ch.is_alphabetic() || ch == '_'))
            .unwrap_or(text.len());
        if split == 0 {
            return Some(Self::new(text, ""));
        }
        Some(Self::new(&text[..split], text[split..].trim()))
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// The argument text, empty when absent.
    pub fn argument(&self) -> &str {
        &self.argument
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.argument.is_empty() {
            f.write_str(&self.strategy)
        } else {
            write!(f, "{}({})", self.strategy, self.argument)
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::Annotation;

    #[test_case("filled", "filled", ""; "bare name")]
    #[test_case("filled(4)", "filled", "4"; "parenthesised argument")]
    #[test_case("filled4", "filled", "4"; "compact argument")]
    #[test_case("filled32", "filled", "32"; "compact two digits")]
    #[test_case("preserveEnds(3,3)", "preserveEnds", "3,3"; "two arguments")]
    #[test_case("preserveEnds( 2 , 4 )", "preserveEnds", "2 , 4"; "spaced arguments")]
    #[test_case("random100.5", "random", "100.5"; "compact float")]
    #[test_case("  zero  ", "zero", ""; "surrounding whitespace")]
    #[test_case("hash()", "hash", ""; "empty parentheses")]
    #[test_case("(3,3)", "(3,3)", ""; "no name")]
    fn parses(text: &str, strategy: &str, argument: &str) {
        let annotation = Annotation::parse(text).unwrap();
        assert_eq!(annotation.strategy(), strategy);
        assert_eq!(annotation.argument(), argument);
    }

    #[test]
    fn blank_text_is_no_annotation() {
        assert_eq!(Annotation::parse(""), None);
        assert_eq!(Annotation::parse("   "), None);
    }

    #[test]
    fn display_uses_parenthesised_form() {
        assert_eq!(Annotation::parse("filled4").unwrap().to_string(), "filled(4)");
        assert_eq!(Annotation::parse("hash").unwrap().to_string(), "hash");
    }
}
