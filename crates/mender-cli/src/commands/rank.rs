use crate::OutputFormat;
use anyhow::Result;
use mender_core::{WeightStore, rank};
use std::path::Path;

pub fn execute(weights: &Path, field: &str, format: OutputFormat) -> Result<()> {
    let table = WeightStore::new(weights).load()?;
    let ranked = rank(&table, field);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ranked)?),
        OutputFormat::Table => {
            println!("Rank,Selector,Score");
            for (idx, r) in ranked.iter().enumerate() {
                println!("{},\"{}\",{}", idx + 1, r.selector.replace('"', "\"\""), r.score);
            }
        }
        OutputFormat::Pretty => {
            if ranked.is_empty() {
                println!("No learned selectors for {}; resolution would use fallback mode.", field);
                return Ok(());
            }
            for (idx, r) in ranked.iter().enumerate() {
                println!("{}. {} ({})", idx + 1, r.selector, r.score);
            }
        }
    }

    Ok(())
}
