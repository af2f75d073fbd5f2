use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One stimulus: a target word, four sentence-context versions, and the
/// experiment metadata carried through unchanged to every output record.
/// Immutable once loaded; identified by its position in the source table.
#[derive(Debug, Clone, Deserialize)]
pub struct StimulusRow {
    #[serde(rename = "String")]
    pub string: String,
    #[serde(rename = "M1_a")]
    pub m1_a: String,
    #[serde(rename = "M1_b")]
    pub m1_b: String,
    #[serde(rename = "M2_a")]
    pub m2_a: String,
    #[serde(rename = "M2_b")]
    pub m2_b: String,
    #[serde(rename = "Different_entries_MW")]
    pub different_entries_mw: String,
    #[serde(rename = "Different_entries_OED")]
    pub different_entries_oed: String,
    #[serde(rename = "Ambiguity_Type")]
    pub ambiguity_type: String,
    #[serde(rename = "Different_frame")]
    pub different_frame: String,
    #[serde(rename = "Original Condition")]
    pub original_condition: String,
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Word")]
    pub word: String,
}

impl StimulusRow {
    /// The sentence for a given version label.
    pub fn sentence(&self, version: &str) -> Result<&str> {
        match version {
            "M1_a" => Ok(&self.m1_a),
            "M1_b" => Ok(&self.m1_b),
            "M2_a" => Ok(&self.m2_a),
            "M2_b" => Ok(&self.m2_b),
            other => bail!("unknown version label {other:?}"),
        }
    }
}

/// One output row: both provider distances for a single (stimulus, version
/// pair). The leading `string` and trailing `word` columns are both present
/// in the observed output schema and both are kept.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceRecord {
    pub string: String,
    pub distance_bert: f32,
    pub distance_elmo: f32,
    pub same: bool,
    pub ambiguity_type_mw: String,
    pub ambiguity_type_oed: String,
    pub ambiguity_type: String,
    pub different_frame: String,
    pub overlap: String,
    #[serde(rename = "Class")]
    pub class: String,
    pub version: String,
    pub source: String,
    pub word: String,
}

/// Read the stimuli table into memory. Any missing column or malformed
/// value fails the whole load.
pub fn load_stimuli(path: &Path) -> Result<Vec<StimulusRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening stimuli file {}", path.display()))?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: StimulusRow =
            result.with_context(|| format!("parsing stimuli row in {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Serialize all accumulated records in one pass. Nothing is written until
/// the entire computation has finished.
pub fn write_records(path: &Path, records: &[DistanceRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating output file {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing output to {}", path.display()))?;
    Ok(())
}
