use std::collections::HashSet;

use crate::analyzer::{config::Settings, frequency::FrequencyTables};

/// Picks the working word (or n-gram) list from the dataset frequencies
pub struct VocabularySelector<'a> {
    settings: &'a Settings,
}

impl<'a> VocabularySelector<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        VocabularySelector { settings }
    }

    /// Select the word list
    ///
    /// - single words with an inclusion list: the inclusion list, verbatim
    /// - otherwise: tokens by descending tf (ties in first-seen order),
    ///   filtered by the exclusion list, or by the stop list when there is no
    ///   exclusion list, then cut to `num_words`
    ///
    /// In n-gram mode a gram is dropped when any of its words is excluded;
    /// without exclusions, an inclusion list keeps only grams sharing at
    /// least one word with it.
    pub fn select(&self, tables: &FrequencyTables) -> Vec<String> {
        let settings = self.settings;
        if settings.ngrams == 1 {
            if let Some(inclusion) = &settings.inclusion_list {
                return inclusion.clone();
            }
        }

        let excluded: HashSet<&str> = match (&settings.exclusion_list, &settings.stop_list) {
            (Some(exclusion), _) => exclusion.iter().map(String::as_str).collect(),
            (None, Some(stop_list)) => stop_list.words.iter().map(String::as_str).collect(),
            (None, None) => HashSet::new(),
        };
        let included: HashSet<&str> = settings
            .inclusion_list
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();

        let sorted = tables.sorted_by_tf().into_iter();
        let selected: Box<dyn Iterator<Item = &str> + '_> = if settings.ngrams == 1 {
            Box::new(sorted.filter(|token| !excluded.contains(token)))
        } else if !excluded.is_empty() {
            Box::new(sorted.filter(|gram| gram.split(' ').all(|w| !excluded.contains(w))))
        } else if !included.is_empty() {
            Box::new(sorted.filter(|gram| gram.split(' ').any(|w| included.contains(w))))
        } else {
            Box::new(sorted)
        };

        let limit = if settings.num_words == 0 { usize::MAX } else { settings.num_words };
        selected.take(limit).map(str::to_string).collect()
    }
}
