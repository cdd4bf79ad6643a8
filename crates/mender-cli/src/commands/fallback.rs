use crate::OutputFormat;
use anyhow::Result;
use mender_core::FallbackTable;
use std::path::Path;

pub fn execute(fallback: Option<&Path>, field: Option<&str>, format: OutputFormat) -> Result<()> {
    let table = match fallback {
        Some(path) => FallbackTable::from_file(path)?,
        None => FallbackTable::builtin(),
    };

    let fields: Vec<(&str, &[String])> = table
        .field_types()
        .filter(|field_type| field.is_none_or(|wanted| wanted == *field_type))
        .map(|field_type| (field_type, table.candidates(field_type)))
        .collect();

    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|(field_type, selectors)| (field_type.to_string(), serde_json::json!(selectors)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Table => {
            println!("Field,Order,Selector");
            for (field_type, selectors) in &fields {
                for (idx, selector) in selectors.iter().enumerate() {
                    println!("{},{},\"{}\"", field_type, idx + 1, selector.replace('"', "\"\""));
                }
            }
        }
        OutputFormat::Pretty => {
            if fields.is_empty() {
                println!("No fallback selectors configured.");
            }
            for (field_type, selectors) in &fields {
                println!("{}", console::style(field_type).bold());
                for (idx, selector) in selectors.iter().enumerate() {
                    println!("  {}. {}", idx + 1, selector);
                }
            }
        }
    }

    Ok(())
}
