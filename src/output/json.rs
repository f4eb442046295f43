use crate::model::ScanRecord;
use anyhow::Result;

pub fn print_json(record: &ScanRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    println!("{}", json);
    Ok(())
}
