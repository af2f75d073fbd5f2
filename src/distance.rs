use anyhow::{bail, Result};

use crate::embed::{cosine_distance, TokenEmbedder};
use crate::progress::Progress;
use crate::stimuli::{DistanceRecord, StimulusRow};

/// The four fixed sentence-context versions of every stimulus.
pub const VERSIONS: [&str; 4] = ["M1_a", "M1_b", "M2_a", "M2_b"];

/// Number of unordered version pairs per stimulus row.
pub const PAIRS_PER_ROW: usize = 6;

/// Lower-case, strip period characters, split on whitespace.
pub fn clean_sentence(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .replace('.', "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Zero-based index of the target word's first occurrence in a cleaned
/// sentence. Inflection mismatch between the stored word and its surface
/// form is not guarded against; it surfaces here as a lookup error.
pub fn target_index(tokens: &[String], word: &str, sentence: &str) -> Result<usize> {
    match tokens.iter().position(|t| t == word) {
        Some(index) => Ok(index),
        None => bail!("target word {word:?} not found in sentence {sentence:?}"),
    }
}

/// The six unordered version pairs, combinations of 4 taken 2, in
/// generation order.
pub fn version_pairs() -> Vec<(&'static str, &'static str)> {
    let mut pairs = Vec::with_capacity(PAIRS_PER_ROW);
    for i in 0..VERSIONS.len() {
        for j in (i + 1)..VERSIONS.len() {
            pairs.push((VERSIONS[i], VERSIONS[j]));
        }
    }
    pairs
}

/// Compute all six pairwise records for one stimulus row. The target index
/// is re-derived for every pair rather than cached per version; a row fails
/// as a whole on the first lookup or provider error.
fn compare_row(
    row: &StimulusRow,
    elmo: &dyn TokenEmbedder,
    bert: &dyn TokenEmbedder,
    progress: &mut Progress,
) -> Result<Vec<DistanceRecord>> {
    let word = &row.string;
    let mut records = Vec::with_capacity(PAIRS_PER_ROW);

    for (v1, v2) in version_pairs() {
        let version = format!("{v1}_{v2}");
        let same = v1[..2] == v2[..2];

        let ex1 = row.sentence(v1)?;
        let ex2 = row.sentence(v2)?;

        let ex1_index = target_index(&clean_sentence(ex1), word, ex1)?;
        let ex2_index = target_index(&clean_sentence(ex2), word, ex2)?;

        let b1 = bert.embed(ex1, ex1_index)?;
        let b2 = bert.embed(ex2, ex2_index)?;

        let e1 = elmo.embed(ex1, ex1_index)?;
        let e2 = elmo.embed(ex2, ex2_index)?;

        records.push(DistanceRecord {
            string: row.string.clone(),
            distance_bert: cosine_distance(&b1, &b2),
            distance_elmo: cosine_distance(&e1, &e2),
            same,
            ambiguity_type_mw: row.different_entries_mw.clone(),
            ambiguity_type_oed: row.different_entries_oed.clone(),
            ambiguity_type: row.ambiguity_type.clone(),
            different_frame: row.different_frame.clone(),
            overlap: row.original_condition.clone(),
            class: row.class.clone(),
            version,
            source: row.source.clone(),
            word: row.word.clone(),
        });

        progress.tick();
    }

    Ok(records)
}

/// Run the pairwise comparison over every stimulus row. Sequential and
/// fail-fast: the first error halts the run and no records survive it.
pub fn compute_distances(
    rows: &[StimulusRow],
    elmo: &dyn TokenEmbedder,
    bert: &dyn TokenEmbedder,
) -> Result<Vec<DistanceRecord>> {
    let mut progress = Progress::new(rows.len() * PAIRS_PER_ROW);
    let mut records = Vec::with_capacity(rows.len() * PAIRS_PER_ROW);

    for row in rows {
        records.extend(compare_row(row, elmo, bert, &mut progress)?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::Embedding;

    /// Deterministic stub: a distinct fixed vector per (sentence, index).
    struct StubEmbedder;

    impl TokenEmbedder for StubEmbedder {
        fn embed(&self, sentence: &str, target_index: usize) -> Result<Embedding> {
            let mut seed = target_index as f32 + 1.0;
            for byte in sentence.bytes() {
                seed += byte as f32;
            }
            Ok(vec![seed, seed * 0.5 + 1.0, 1.0])
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn bank_row() -> StimulusRow {
        StimulusRow {
            string: "bank".into(),
            m1_a: "He sat by the bank of the river.".into(),
            m1_b: "The bank was covered in grass.".into(),
            m2_a: "The bank was closed on Sunday.".into(),
            m2_b: "She deposited money at the bank.".into(),
            different_entries_mw: "1".into(),
            different_entries_oed: "1".into(),
            ambiguity_type: "Homonym".into(),
            different_frame: "0".into(),
            original_condition: "Low".into(),
            class: "N".into(),
            source: "original".into(),
            word: "bank".into(),
        }
    }

    #[test]
    fn clean_sentence_lowercases_and_strips_periods() {
        let tokens = clean_sentence("The Bank was closed.");
        assert_eq!(tokens, vec!["the", "bank", "was", "closed"]);
    }

    #[test]
    fn clean_sentence_is_idempotent() {
        let once = clean_sentence("He sat by the Bank. Of the river.");
        let twice = clean_sentence(&once.join(" "));
        assert_eq!(once, twice);
    }

    #[test]
    fn target_index_finds_first_occurrence() {
        let tokens = clean_sentence("the bank near the bank.");
        assert_eq!(target_index(&tokens, "bank", "").unwrap(), 1);
    }

    #[test]
    fn target_index_fails_when_word_absent() {
        let tokens = clean_sentence("He rowed along the shore.");
        let err = target_index(&tokens, "bank", "He rowed along the shore.").unwrap_err();
        assert!(err.to_string().contains("bank"));
    }

    #[test]
    fn six_unique_unordered_pairs() {
        let pairs = version_pairs();
        assert_eq!(pairs.len(), PAIRS_PER_ROW);
        for (v1, v2) in &pairs {
            assert!(v1 < v2);
            assert!(!pairs.contains(&(*v2, *v1)));
        }
    }

    #[test]
    fn end_to_end_labels_and_same_flags() {
        let rows = vec![bank_row()];
        let records = compute_distances(&rows, &StubEmbedder, &StubEmbedder).unwrap();

        assert_eq!(records.len(), 6);
        let labels: Vec<&str> = records.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "M1_a_M1_b",
                "M1_a_M2_a",
                "M1_a_M2_b",
                "M1_b_M2_a",
                "M1_b_M2_b",
                "M2_a_M2_b"
            ]
        );
        let same: Vec<bool> = records.iter().map(|r| r.same).collect();
        assert_eq!(same, vec![true, false, false, false, false, true]);
    }

    #[test]
    fn output_count_is_six_per_row() {
        let rows = vec![bank_row(), bank_row(), bank_row()];
        let records = compute_distances(&rows, &StubEmbedder, &StubEmbedder).unwrap();
        assert_eq!(records.len(), rows.len() * PAIRS_PER_ROW);
    }

    #[test]
    fn pass_through_columns_survive() {
        let rows = vec![bank_row()];
        let records = compute_distances(&rows, &StubEmbedder, &StubEmbedder).unwrap();
        let record = &records[0];
        assert_eq!(record.string, "bank");
        assert_eq!(record.ambiguity_type, "Homonym");
        assert_eq!(record.overlap, "Low");
        assert_eq!(record.class, "N");
        assert_eq!(record.word, "bank");
    }

    #[test]
    fn distances_are_zero_for_identical_sentences() {
        let mut row = bank_row();
        row.m1_b = row.m1_a.clone();
        let records = compute_distances(&[row], &StubEmbedder, &StubEmbedder).unwrap();
        assert!(records[0].distance_bert.abs() < 1e-6);
        assert!(records[0].distance_elmo.abs() < 1e-6);
    }

    #[test]
    fn missing_word_in_one_variant_fails_whole_row() {
        let mut row = bank_row();
        row.m2_a = "The branch was closed on Sunday.".into();
        let result = compute_distances(&[row], &StubEmbedder, &StubEmbedder);
        assert!(result.is_err());
    }
}
