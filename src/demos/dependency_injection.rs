use std::collections::BTreeSet;
use std::io::{self, Write};

/// The resource a spell checker depends on.
pub trait Lexicon {
    fn name(&self) -> &str;
    fn contains(&self, word: &str) -> bool;
}

struct WordList {
    name: &'static str,
    words: BTreeSet<&'static str>,
}

impl WordList {
    fn new(name: &'static str, words: &[&'static str]) -> Self {
        Self {
            name,
            words: words.iter().copied().collect(),
        }
    }
}

impl Lexicon for WordList {
    fn name(&self) -> &str {
        self.name
    }

    fn contains(&self, word: &str) -> bool {
        self.words.contains(word.to_lowercase().as_str())
    }
}

/// A spell checker that receives its lexicon instead of creating one.
pub struct SpellChecker<L: Lexicon> {
    lexicon: L,
}

impl<L: Lexicon> SpellChecker<L> {
    pub fn new(lexicon: L) -> Self {
        Self { lexicon }
    }

    pub fn misspelled<'t>(&self, text: &'t str) -> Vec<&'t str> {
        text.split(|c: char| !c.is_alphabetic())
            .filter(|word| !word.is_empty() && !self.lexicon.contains(word))
            .collect()
    }

    pub fn lexicon_name(&self) -> &str {
        self.lexicon.name()
    }
}

pub(super) fn run(out: &mut dyn Write) -> io::Result<()> {
    let sentence = "The colour of the honour guard";

    let british = SpellChecker::new(WordList::new(
        "en-GB",
        &["the", "colour", "of", "honour", "guard"],
    ));
    let american = SpellChecker::new(WordList::new(
        "en-US",
        &["the", "color", "of", "honor", "guard"],
    ));

    for checker in [&british, &american] {
        writeln!(
            out,
            "{}: misspelled {:?}",
            checker.lexicon_name(),
            checker.misspelled(sentence)
        )?;
    }
    Ok(())
}
