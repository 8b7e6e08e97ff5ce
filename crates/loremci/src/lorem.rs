//! Lorem ipsum text that fits into a character budget.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;
use std::path::PathBuf;

use lipsum::MarkovChain;

use crate::diag::{StrResult, bail};
use crate::unit::Unit;

/// How many words each sentence of a paragraph has.
const SENTENCE_WORDS: RangeInclusive<usize> = 4..=12;

/// Produces text of at most a given number of characters.
pub trait Generate {
    /// Generates a `unit` of text with at most `max_chars` characters.
    ///
    /// The text may be shorter than requested. Errors are faults of the
    /// underlying text source.
    fn generate(&mut self, unit: Unit, max_chars: usize) -> StrResult<String>;
}

/// The texts a [`Lorem`] generator learns its words from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Corpus {
    /// The texts embedded in the `lipsum` crate.
    Builtin,
    /// A corpus installed from a local package.
    Local {
        /// Where the corpus text was loaded from.
        path: PathBuf,
        /// The corpus text.
        text: String,
    },
}

impl Corpus {
    /// The raw texts of the corpus.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Builtin => vec![lipsum::LOREM_IPSUM, lipsum::LIBER_PRIMUS],
            Self::Local { text, .. } => vec![text.as_str()],
        }
    }
}

impl Display for Corpus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Builtin => f.pad("built-in"),
            Self::Local { path, .. } => write!(f, "local ({})", path.display()),
        }
    }
}

/// A lorem ipsum generator backed by a Markov chain over a corpus.
pub struct Lorem<'a> {
    chain: MarkovChain<'a>,
    /// Lower-cased corpus words keyed by their length in characters.
    vocabulary: BTreeMap<usize, Vec<String>>,
    rng: fastrand::Rng,
}

impl<'a> Lorem<'a> {
    /// Trains a generator on the given corpus.
    pub fn new(corpus: &'a Corpus) -> StrResult<Self> {
        Self::with_rng(corpus, fastrand::Rng::new())
    }

    /// Trains a generator whose gap filling is seeded.
    pub fn with_seed(corpus: &'a Corpus, seed: u64) -> StrResult<Self> {
        Self::with_rng(corpus, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(corpus: &'a Corpus, rng: fastrand::Rng) -> StrResult<Self> {
        let mut chain = MarkovChain::new();
        let mut vocabulary: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut tokens = 0;

        for text in corpus.texts() {
            chain.learn(text);
            for word in text.split_whitespace().filter_map(normalize) {
                let word = word.to_lowercase();
                vocabulary.entry(word.chars().count()).or_default().push(word);
                tokens += 1;
            }
        }

        // The chain learns from word triples.
        if tokens < 3 {
            bail!("the {corpus} corpus has too few words to learn from");
        }

        for words in vocabulary.values_mut() {
            words.sort_unstable();
            words.dedup();
        }

        Ok(Self { chain, vocabulary, rng })
    }
}

impl Generate for Lorem<'_> {
    fn generate(&mut self, unit: Unit, max_chars: usize) -> StrResult<String> {
        let Self { chain, vocabulary, rng } = self;

        // Every accepted word takes at least two characters, so this bounds
        // the walk without cutting it short.
        let limit = max_chars.saturating_mul(2).saturating_add(64);
        let cap = match unit {
            Unit::Sentence => usize::MAX,
            Unit::Paragraph => *SENTENCE_WORDS.end(),
        };

        let mut draft = Draft::default();
        let mut left = 0;
        for word in chain.iter().filter_map(normalize).take(limit) {
            let word = word.to_lowercase();
            let new_sentence = draft.is_empty() || (unit == Unit::Paragraph && left == 0);
            if draft.len + draft.cost(&word, new_sentence) > max_chars {
                break;
            }

            if new_sentence {
                left = match unit {
                    Unit::Sentence => usize::MAX,
                    Unit::Paragraph => rng.usize(SENTENCE_WORDS),
                };
            }

            draft.push(word, new_sentence);
            left -= 1;
        }

        draft.close_gap(max_chars, cap, vocabulary, rng);
        tracing::trace!(%unit, max_chars, len = draft.len, "drafted text");
        Ok(draft.render())
    }
}

/// Strips punctuation off a corpus token, rejecting tokens that are not
/// plain words.
fn normalize(token: &str) -> Option<&str> {
    let word = token.trim_matches(|c: char| !c.is_alphabetic());
    (!word.is_empty() && word.chars().all(char::is_alphabetic)).then_some(word)
}

/// How many characters a lower-cased word takes once rendered. The first
/// word of a sentence is capitalized, which may change its length.
fn rendered_len(word: &str, initial: bool) -> usize {
    let mut chars = word.chars();
    if !initial {
        return chars.count();
    }
    chars.next().map_or(0, |first| first.to_uppercase().count() + chars.count())
}

/// Lower-cased sentences under construction along with their rendered
/// length.
#[derive(Default)]
struct Draft {
    sentences: Vec<Vec<String>>,
    len: usize,
}

impl Draft {
    fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// By how many characters the rendered text grows when pushing `word`.
    fn cost(&self, word: &str, new_sentence: bool) -> usize {
        let chars = rendered_len(word, new_sentence);
        if self.is_empty() {
            // The word and the full stop.
            chars + 1
        } else if new_sentence {
            // The separating space, the word and the full stop.
            chars + 2
        } else {
            // The separating space and the word.
            chars + 1
        }
    }

    fn push(&mut self, word: String, new_sentence: bool) {
        self.len += self.cost(&word, new_sentence);
        match self.sentences.last_mut() {
            Some(sentence) if !new_sentence => sentence.push(word),
            _ => self.sentences.push(vec![word]),
        }
    }

    /// Tries to make the draft exactly `max_chars` long with one more word,
    /// or by swapping the last word for a longer one. Sentences never grow
    /// beyond `cap` words. Leaves the draft short if the vocabulary has no
    /// word of the needed length.
    fn close_gap(
        &mut self,
        max_chars: usize,
        cap: usize,
        vocabulary: &BTreeMap<usize, Vec<String>>,
        rng: &mut fastrand::Rng,
    ) {
        let gap = max_chars.saturating_sub(self.len);
        if gap == 0 {
            return;
        }

        let mut pick = |chars: usize, initial: bool| -> Option<String> {
            let words = vocabulary.get(&chars)?;
            let fits = |word: &&String| rendered_len(word, initial) == chars;
            let count = words.iter().filter(fits).count();
            if count == 0 {
                return None;
            }
            words.iter().filter(fits).nth(rng.usize(..count)).cloned()
        };

        let Some(sentence) = self.sentences.last_mut() else {
            if let Some(word) = pick(gap - 1, true) {
                self.sentences.push(vec![word]);
                self.len += gap;
            }
            return;
        };

        if sentence.len() < cap
            && let Some(word) = pick(gap - 1, false)
        {
            sentence.push(word);
            self.len += gap;
            return;
        }

        let initial = sentence.len() == 1;
        if let Some(last) = sentence.last_mut()
            && let Some(word) = pick(rendered_len(last, initial) + gap, initial)
        {
            *last = word;
            self.len += gap;
        }
    }

    /// Capitalizes each sentence and ends it with a full stop.
    fn render(&self) -> String {
        let mut out = String::with_capacity(self.len);
        for (i, sentence) in self.sentences.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }

            for (j, word) in sentence.iter().enumerate() {
                if j > 0 {
                    out.push(' ');
                    out.push_str(word);
                    continue;
                }

                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_uppercase());
                    out.push_str(chars.as_str());
                }
            }

            out.push('.');
        }
        out
    }
}
