use std::io::Write;

use log::info;

use crate::{
    analyzer::{config::AnalyzerConfig, WordFrequencyAnalyzer},
    error::Result,
    jobs::JobContext,
    source::Dataset,
    utils::{
        export::{csv_safe_cell, report_writer},
        math::{ratio, tfidf},
    },
};

const FREQ_HEADER: &str = "Frequency";
const PROP_HEADER: &str = "Proportion";
const TFIDF_DATASET_HEADER: &str = "TF/IDF (vs. dataset)";
const TFIDF_CORPUS_HEADER: &str = "TF/IDF (vs. corpus)";
const DF_HEADER: &str = "DF (in corpus)";
const TYPES_HEADER: &str = "Number of types";
const TOKENS_HEADER: &str = "Number of tokens";
const TTR_HEADER: &str = "Type/token ratio";

/// Analyze `dataset` and write its word frequency report as CSV
///
/// # Arguments
/// * `context` - document and corpus sources
/// * `dataset` - dataset to analyze
/// * `config` - analyzer options, passed through unchanged
/// * `out` - CSV destination
pub fn run<W: Write>(context: &JobContext<'_>, dataset: &Dataset, config: &AnalyzerConfig, out: W) -> Result<()> {
    let analyzer = context.analyze(dataset, config)?;
    let corpus_size = match context.term_vectors {
        Some(source) => source.corpus_size()?,
        None => 0,
    };
    write_report(&analyzer, dataset, corpus_size, out)?;
    info!(
        "word frequency report for '{}': {} words, {} blocks",
        dataset.name,
        analyzer.word_list().len(),
        analyzer.blocks().len()
    );
    Ok(())
}

/// Write the word frequency report of a finished analysis
///
/// Per-block columns are only written when there is more than one block.
/// Corpus TF-IDF cells are left empty when no corpus frequencies are known.
pub fn write_report<W: Write>(
    analyzer: &WordFrequencyAnalyzer,
    dataset: &Dataset,
    corpus_size: u64,
    out: W,
) -> Result<()> {
    let mut wtr = report_writer(out);
    let num_documents = dataset.num_documents();
    let has_corpus = !analyzer.df_in_corpus().is_empty();
    let df_in_corpus = |word: &str| analyzer.df_in_corpus().get(word).copied().unwrap_or(0);

    wtr.write_record([csv_safe_cell(format!("Word frequency information for \"{}\"", dataset.name))])?;
    wtr.write_record([""])?;

    if analyzer.blocks().len() > 1 {
        wtr.write_record(["Each block of document:"])?;

        let mut name_row = vec![String::new()];
        let mut header_row = vec![String::new()];
        let mut word_rows: Vec<Vec<String>> = analyzer
            .word_list()
            .iter()
            .map(|word| vec![csv_safe_cell(word.clone())])
            .collect();
        let mut types_row = vec![TYPES_HEADER.to_string()];
        let mut tokens_row = vec![TOKENS_HEADER.to_string()];
        let mut ttr_row = vec![TTR_HEADER.to_string()];

        for (block, stats) in analyzer.blocks().iter().zip(analyzer.block_stats()) {
            name_row.push(csv_safe_cell(stats.name.clone()));
            name_row.extend(std::iter::repeat(String::new()).take(3));
            header_row.extend([FREQ_HEADER, PROP_HEADER, TFIDF_DATASET_HEADER, TFIDF_CORPUS_HEADER].map(str::to_string));

            for (word, row) in analyzer.word_list().iter().zip(word_rows.iter_mut()) {
                let count = block.get(word).copied().unwrap_or(0);
                let proportion = ratio(count, stats.tokens);
                let df_in_dataset = analyzer.df_in_dataset().get(word).copied().unwrap_or(0);
                row.push(count.to_string());
                row.push(proportion.to_string());
                row.push(tfidf(proportion, df_in_dataset, num_documents).to_string());
                row.push(if has_corpus {
                    tfidf(proportion, df_in_corpus(word), corpus_size).to_string()
                } else {
                    String::new()
                });
            }

            for (row, value) in [
                (&mut types_row, stats.types.to_string()),
                (&mut tokens_row, stats.tokens.to_string()),
                (&mut ttr_row, stats.type_token_ratio().to_string()),
            ] {
                row.push(value);
                row.extend(std::iter::repeat(String::new()).take(3));
            }
        }

        wtr.write_record(&name_row)?;
        wtr.write_record(&header_row)?;
        for row in &word_rows {
            wtr.write_record(row)?;
        }
        wtr.write_record(&types_row)?;
        wtr.write_record(&tokens_row)?;
        wtr.write_record(&ttr_row)?;
    }

    wtr.write_record([""])?;
    wtr.write_record(["For the entire dataset:"])?;
    wtr.write_record(["", FREQ_HEADER, PROP_HEADER, DF_HEADER, TFIDF_CORPUS_HEADER])?;
    for word in analyzer.word_list() {
        let tf = analyzer.tf_in_dataset().get(word).copied().unwrap_or(0);
        let mut row = vec![
            csv_safe_cell(word.clone()),
            tf.to_string(),
            ratio(tf, analyzer.num_dataset_tokens()).to_string(),
        ];
        if has_corpus {
            row.push(df_in_corpus(word).to_string());
            row.push(tfidf(tf, df_in_corpus(word), corpus_size).to_string());
        } else {
            row.extend([String::new(), String::new()]);
        }
        wtr.write_record(&row)?;
    }
    wtr.write_record([TYPES_HEADER.to_string(), analyzer.num_dataset_types().to_string()])?;
    wtr.write_record([TOKENS_HEADER.to_string(), analyzer.num_dataset_tokens().to_string()])?;
    wtr.write_record([
        TTR_HEADER.to_string(),
        ratio(analyzer.num_dataset_types(), analyzer.num_dataset_tokens()).to_string(),
    ])?;
    wtr.write_record([""])?;
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::MemoryCorpus;

    fn corpus() -> MemoryCorpus {
        let mut corpus = MemoryCorpus::new();
        corpus
            .add_document("d1", Some("One"), "the cat sat on the mat")
            .add_document("d2", Some("Two"), "the dog sat")
            .add_document("d3", None, "a bird flew");
        corpus
    }

    fn report(config: AnalyzerConfig, with_corpus: bool) -> Vec<Vec<String>> {
        let corpus = corpus();
        let dataset = Dataset::new("pets", &["d1", "d2"]);
        let mut context = JobContext::new(&corpus);
        if with_corpus {
            context = context.with_term_vectors(&corpus);
        }
        let mut buf = Vec::new();
        run(&context, &dataset, &config, &mut buf).unwrap();

        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(buf.as_slice())
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn single_block_report_has_only_dataset_section() {
        let rows = report(AnalyzerConfig::default(), true);
        assert_eq!(rows[0], vec!["Word frequency information for \"pets\""]);
        assert_eq!(rows[1], vec![""]);
        assert_eq!(rows[2], vec![""]);
        assert_eq!(rows[3], vec!["For the entire dataset:"]);
        assert_eq!(rows[4], vec!["", "Frequency", "Proportion", "DF (in corpus)", "TF/IDF (vs. corpus)"]);

        // the: tf 3 of 9 tokens, in 2 of 3 corpus documents
        let the = &rows[5];
        assert_eq!(the[0], "the");
        assert_eq!(the[1], "3");
        assert_eq!(the[3], "2");
        let score: f64 = the[4].parse().unwrap();
        assert!((score - 3.0 * (3.0f64 / 2.0).log10()).abs() < 1e-9);

        let n = rows.len();
        assert_eq!(rows[n - 4], vec!["Number of types", "6"]);
        assert_eq!(rows[n - 3], vec!["Number of tokens", "9"]);
        assert_eq!(rows[n - 1], vec![""]);
    }

    #[test]
    fn corpus_columns_are_empty_without_corpus_stats() {
        let rows = report(AnalyzerConfig::default(), false);
        assert_eq!(rows[5][3], "");
        assert_eq!(rows[5][4], "");
    }

    #[test]
    fn multi_block_report_lists_every_block() {
        let config = AnalyzerConfig {
            split_across: false,
            ..Default::default()
        };
        let rows = report(config, true);
        assert_eq!(rows[2], vec!["Each block of document:"]);
        assert_eq!(
            rows[3],
            vec!["", "Block #1/1 (within 'One')", "", "", "", "Block #1/1 (within 'Two')", "", "", ""]
        );
        assert_eq!(rows[4].len(), 9);
        assert_eq!(rows[4][1], "Frequency");
        assert_eq!(rows[4][8], "TF/IDF (vs. corpus)");

        // "the" appears twice in the 6 tokens of "One", once in "Two"
        let the = &rows[5];
        assert_eq!(the[0], "the");
        assert_eq!(the[1], "2");
        assert!((the[2].parse::<f64>().unwrap() - 2.0 / 6.0).abs() < 1e-9);
        // in both dataset documents: idf is zero
        assert_eq!(the[3].parse::<f64>().unwrap(), 0.0);
        assert_eq!(the[5], "1");

        let types_row = rows.iter().find(|r| r[0] == "Number of types").unwrap();
        assert_eq!(types_row, &vec!["Number of types", "5", "", "", "", "3", "", "", ""]);
    }

    #[test]
    fn dataset_name_is_quoted() {
        let mut corpus = MemoryCorpus::new();
        corpus.add_document("d1", None, "plain words");
        let dataset = Dataset::new("=cmd", &["d1"]);
        let mut buf = Vec::new();
        run(&JobContext::new(&corpus), &dataset, &AnalyzerConfig::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("\"Word frequency information for \"\"=cmd\"\"\""));
    }
}
