use std::sync::Arc;

use rust_stemmers::{Algorithm, Stemmer};

use crate::analyzer::config::Stemming;

/// Token normalization strategy: token -> normalized token
pub type Normalizer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Leaves tokens untouched
pub fn identity() -> Normalizer {
    Arc::new(|token: &str| token.to_string())
}

/// English Snowball (Porter2) stemmer
pub fn stemmer() -> Normalizer {
    let stemmer = Stemmer::create(Algorithm::English);
    Arc::new(move |token: &str| stemmer.stem(token).into_owned())
}

impl Stemming {
    /// Pick the normalizer for this mode
    ///
    /// Lemmatization is not implemented here; it has to be injected. Without a
    /// lemmatizer, `Lemma` leaves tokens untouched.
    ///
    /// # Arguments
    /// * `lemmatizer` - injected lemmatizer, used only for `Lemma`
    pub fn normalizer(self, lemmatizer: Option<&Normalizer>) -> Normalizer {
        match self {
            Stemming::None => identity(),
            Stemming::Stem => stemmer(),
            Stemming::Lemma => lemmatizer.cloned().unwrap_or_else(identity),
        }
    }

    /// Normalizer for surface words coming from corpus term vectors
    ///
    /// Term vectors can only be matched against stemmed tokens; lemmatized
    /// datasets keep the surface form.
    pub fn term_vector_normalizer(self) -> Normalizer {
        match self {
            Stemming::Stem => stemmer(),
            Stemming::None | Stemming::Lemma => identity(),
        }
    }
}

/// Lowercase a text and split it into words
///
/// Words break on anything that isn't alphanumeric or an apostrophe.
/// Apostrophes inside a word are kept (`isn't`), leading and trailing ones are stripped.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Group consecutive words into space-joined n-grams
///
/// `n <= 1` returns the words unchanged; fewer than `n` words yield nothing.
pub fn ngrams(words: Vec<String>, n: usize) -> Vec<String> {
    if n <= 1 {
        return words;
    }
    words.windows(n).map(|w| w.join(" ")).collect()
}
