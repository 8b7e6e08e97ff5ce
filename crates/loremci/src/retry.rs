//! Retrying generation until the text has the exact requested length.

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroUsize;

use ecow::{EcoString, eco_format};

use crate::diag::HintedString;
use crate::lorem::Generate;
use crate::unit::{Request, Unit};

/// How often generation is attempted before giving up.
pub const MAX_ATTEMPTS: NonZeroUsize = NonZeroUsize::new(3).unwrap();

/// Generates text for the request, retrying until a result has exactly the
/// requested length.
///
/// The first exact result wins. Faults of the generator are returned right
/// away and not retried.
pub fn generate_exact<G>(
    generator: &mut G,
    request: Request,
    max_attempts: NonZeroUsize,
) -> Result<String, GenerateError>
where
    G: Generate + ?Sized,
{
    let target = request.target.get();
    let mut last = String::new();

    for attempt in 1..=max_attempts.get() {
        let text = generator
            .generate(request.unit, target)
            .map_err(GenerateError::Source)?;

        if request.is_met_by(&text) {
            tracing::debug!(attempt, target, "generated {} of exact length", request.unit);
            return Ok(text);
        }

        tracing::warn!(
            attempt,
            target,
            actual = text.chars().count(),
            "generated {} missed the target length, retrying",
            request.unit,
        );
        last = text;
    }

    Err(GenerateError::Exhausted {
        unit: request.unit,
        target,
        attempts: max_attempts.get(),
        last,
    })
}

/// Why no text could be generated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GenerateError {
    /// The text source failed.
    Source(EcoString),
    /// No attempt produced text of the exact length.
    Exhausted {
        /// What was requested.
        unit: Unit,
        /// The requested length.
        target: usize,
        /// How many attempts were made.
        attempts: usize,
        /// The text of the last attempt.
        last: String,
    },
}

impl std::error::Error for GenerateError {}

impl Display for GenerateError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Source(err) => write!(f, "failed to generate text ({err})"),
            Self::Exhausted { unit, target, attempts, last } => write!(
                f,
                "failed to generate a {unit} of exactly {target} characters \
                 after {attempts} attempts (last attempt had {} characters: {last:?})",
                last.chars().count(),
            ),
        }
    }
}

impl From<GenerateError> for HintedString {
    fn from(error: GenerateError) -> Self {
        let hint = match &error {
            GenerateError::Source(_) => None,
            GenerateError::Exhausted { .. } => {
                Some("very small lengths cannot always be filled exactly")
            }
        };
        let hinted = HintedString::new(eco_format!("{error}"));
        match hint {
            Some(hint) => hinted.with_hint(hint),
            None => hinted,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::diag::StrResult;

    /// Replays scripted results and counts calls.
    struct Scripted {
        results: VecDeque<StrResult<String>>,
        calls: usize,
    }

    impl Scripted {
        fn new<const N: usize>(texts: [&str; N]) -> Self {
            Self {
                results: texts.into_iter().map(|text| Ok(text.to_string())).collect(),
                calls: 0,
            }
        }
    }

    impl Generate for Scripted {
        fn generate(&mut self, _: Unit, _: usize) -> StrResult<String> {
            self.calls += 1;
            self.results.pop_front().expect("generator called too often")
        }
    }

    fn request(target: usize) -> Request {
        Request::new(Unit::Sentence, NonZeroUsize::new(target).unwrap())
    }

    #[test]
    fn test_first_exact_match_needs_one_attempt() {
        let mut generator = Scripted::new(["Lorem.", "Ipsum dolor."]);
        let text = generate_exact(&mut generator, request(6), MAX_ATTEMPTS).unwrap();
        assert_eq!(text, "Lorem.");
        assert_eq!(generator.calls, 1);
    }

    #[test]
    fn test_retries_until_exact() {
        let mut generator = Scripted::new(["Sit.", "Amet.", "Dolor."]);
        let text = generate_exact(&mut generator, request(6), MAX_ATTEMPTS).unwrap();
        assert_eq!(text, "Dolor.");
        assert_eq!(generator.calls, 3);
    }

    #[test]
    fn test_first_exact_match_wins() {
        let mut generator = Scripted::new(["Sed.", "Amet.", "Elit."]);
        let text = generate_exact(&mut generator, request(5), MAX_ATTEMPTS).unwrap();
        assert_eq!(text, "Amet.");
        assert_eq!(generator.calls, 2);
    }

    #[test]
    fn test_exhaustion_reports_last_attempt() {
        let mut generator = Scripted::new(["A.", "Ab.", "Abc.", "Abcdefghi."]);
        let err = generate_exact(&mut generator, request(10), MAX_ATTEMPTS).unwrap_err();
        assert_eq!(generator.calls, 3);
        assert_eq!(
            err,
            GenerateError::Exhausted {
                unit: Unit::Sentence,
                target: 10,
                attempts: 3,
                last: "Abc.".into(),
            }
        );

        let message = err.to_string();
        assert!(message.contains("after 3 attempts"));
        assert!(message.contains("4 characters"));
        assert!(message.contains("\"Abc.\""));
    }

    #[test]
    fn test_source_faults_are_not_retried() {
        let mut generator = Scripted {
            results: VecDeque::from([
                Err(EcoString::from("corpus vanished")),
                Ok("Lorem.".to_string()),
            ]),
            calls: 0,
        };
        let err = generate_exact(&mut generator, request(6), MAX_ATTEMPTS).unwrap_err();
        assert_eq!(err, GenerateError::Source("corpus vanished".into()));
        assert_eq!(generator.calls, 1);
    }

    #[test]
    fn test_lorem_reaches_exact_lengths() {
        let corpus = crate::lorem::Corpus::Builtin;
        let mut lorem = crate::lorem::Lorem::new(&corpus).unwrap();
        for unit in Unit::ALL {
            for target in [12, 50, 99, 280, 1000] {
                let request = Request::new(unit, NonZeroUsize::new(target).unwrap());
                let text = generate_exact(&mut lorem, request, MAX_ATTEMPTS).unwrap();
                assert_eq!(text.chars().count(), target);
            }
        }
    }
}
