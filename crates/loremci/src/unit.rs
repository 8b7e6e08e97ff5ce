use std::fmt::{self, Display, Formatter};
use std::num::NonZeroUsize;

/// The kind of text to generate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Unit {
    /// A single sentence.
    Sentence,
    /// A run of sentences.
    Paragraph,
}

impl Unit {
    /// All units, in the order they are presented to users.
    pub const ALL: [Self; 2] = [Self::Sentence, Self::Paragraph];

    /// Parses a unit from its name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.name().eq_ignore_ascii_case(name))
    }

    /// The canonical, upper-case name of the unit.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sentence => "SENTENCE",
            Self::Paragraph => "PARAGRAPH",
        }
    }

    /// The name of the file the unit's text is written to.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Sentence => "result.txt",
            Self::Paragraph => "result2.txt",
        }
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
        })
    }
}

/// A request for text of an exact length.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Request {
    /// What to generate.
    pub unit: Unit,
    /// The exact number of characters the text must have.
    pub target: NonZeroUsize,
}

impl Request {
    /// Creates a new request.
    pub fn new(unit: Unit, target: NonZeroUsize) -> Self {
        Self { unit, target }
    }

    /// Whether `text` has exactly the requested number of characters.
    pub fn is_met_by(&self, text: &str) -> bool {
        text.chars().count() == self.target.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_name() {
        assert_eq!(Unit::from_name("SENTENCE"), Some(Unit::Sentence));
        assert_eq!(Unit::from_name("paragraph"), Some(Unit::Paragraph));
        assert_eq!(Unit::from_name("Paragraph"), Some(Unit::Paragraph));
        assert_eq!(Unit::from_name("FOO"), None);
        assert_eq!(Unit::from_name(""), None);
    }

    #[test]
    fn test_request_counts_chars() {
        let request = Request::new(Unit::Sentence, NonZeroUsize::new(3).unwrap());
        assert!(request.is_met_by("abc"));
        assert!(request.is_met_by("äöü"));
        assert!(!request.is_met_by("ab"));
    }
}
