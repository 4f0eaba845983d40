pub trait Lexicon {
    fn name(&self) -> &str;
    fn contains(&self, word: &str) -> bool;
}

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
}

fn main() {
    let sentence = "The colour of the honour guard";
    let british = SpellChecker::new(WordList::new("en-GB", &["the", "colour", "of", "honour", "guard"]));
    let american = SpellChecker::new(WordList::new("en-US", &["the", "color", "of", "honor", "guard"]));

    for checker in [&british, &american] {
        println!("{}: misspelled {:?}", checker.lexicon.name(), checker.misspelled(sentence));
    }
}
