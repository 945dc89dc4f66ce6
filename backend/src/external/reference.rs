//! Reference dataset loading

use anyhow::{bail, Context};
use shared::{HistoricalRecord, ReferenceData};
use std::io::Read;
use std::path::Path;

/// Load the historical site-year table from a CSV export
pub fn load_reference_csv(path: impl AsRef<Path>) -> anyhow::Result<ReferenceData> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening reference dataset {}", path.display()))?;
    read_reference_csv(file)
        .with_context(|| format!("reading reference dataset {}", path.display()))
}

pub fn read_reference_csv<R: Read>(reader: R) -> anyhow::Result<ReferenceData> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for (idx, row) in rdr.deserialize::<HistoricalRecord>().enumerate() {
        // Header is line 1
        let record = row.with_context(|| format!("malformed row at line {}", idx + 2))?;
        records.push(record);
    }
    if records.is_empty() {
        bail!("reference dataset has no rows");
    }
    Ok(ReferenceData::new(records))
}
