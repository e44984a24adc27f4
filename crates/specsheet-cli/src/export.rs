//! CSV export of analysis results.

use crate::error::Result;
use crate::output::label_for;
use specsheet_domain::AnalysisRecord;
use specsheet_extractor::Roster;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

/// Label of the trailing row listing the processed documents
pub const PROCESSED_FILES_LABEL: &str = "Processed Files";

/// Write `record` as CSV rows of `(label, value)`.
///
/// Layout: an `Attribute,Value` header, one row per attribute in roster
/// order, an empty row, then `Processed Files` followed by every document
/// name.
pub fn write_csv<W: io::Write>(writer: W, record: &AnalysisRecord, roster: &Roster) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    csv.write_record(["Attribute", "Value"])?;
    for result in record.results() {
        csv.write_record([label_for(roster, result.attribute()).as_str(), result.value()])?;
    }

    csv.write_record(std::iter::empty::<&str>())?;

    let mut processed = vec![PROCESSED_FILES_LABEL];
    processed.extend(record.documents().iter().map(String::as_str));
    csv.write_record(&processed)?;

    csv.flush()?;
    Ok(())
}

/// Write `record` to a CSV file at `path`.
pub fn export_csv(path: &Path, record: &AnalysisRecord, roster: &Roster) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, record, roster)?;
    info!("Exported {} attribute(s) to {}", record.len(), path.display());
    Ok(())
}
