use crate::OutputFormat;
use anyhow::Result;
use mender_core::{RankedSelector, WeightStore, WeightTable, rank};
use std::path::Path;

/// Ranked selectors for one field-type
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldRanking {
    pub field_type: String,
    pub selectors: Vec<RankedSelector>,
}

/// Rank every field-type in the table, or just `field` when given
pub fn ranked_fields(table: &WeightTable, field: Option<&str>) -> Vec<FieldRanking> {
    table
        .field_types()
        .filter(|field_type| field.is_none_or(|wanted| wanted == *field_type))
        .map(|field_type| FieldRanking {
            field_type: field_type.to_string(),
            selectors: rank(table, field_type),
        })
        .collect()
}

pub fn execute(weights: &Path, field: Option<&str>, format: OutputFormat) -> Result<()> {
    tracing::debug!("Showing weight store: {}", weights.display());

    let table = WeightStore::new(weights).load()?;

    let output = match format {
        // The raw table, exactly as persisted
        OutputFormat::Json if field.is_none() => format!("{}\n", WeightStore::to_string(&table)?),
        OutputFormat::Json => format!(
            "{}\n",
            serde_json::to_string_pretty(&ranked_fields(&table, field))?
        ),
        OutputFormat::Table => format_table(&ranked_fields(&table, field)),
        OutputFormat::Pretty => format_pretty(&ranked_fields(&table, field), weights),
    };

    print!("{}", output);
    Ok(())
}

fn format_pretty(fields: &[FieldRanking], weights: &Path) -> String {
    use console::style;

    let mut output = String::new();
    output.push_str(&format!(
        "\n{}\n\n",
        style(format!("Selector weights: {}", weights.display()))
            .bold()
            .cyan()
    ));

    if fields.is_empty() {
        output.push_str("  No learned selectors yet.\n");
        return output;
    }

    for field in fields {
        output.push_str(&format!("{}\n", style(&field.field_type).bold()));
        for (idx, ranked) in field.selectors.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {:<40} {}\n",
                idx + 1,
                ranked.selector,
                ranked.score
            ));
        }
        output.push('\n');
    }

    output
}

fn format_table(fields: &[FieldRanking]) -> String {
    let mut output = String::new();
    output.push_str("Field,Rank,Selector,Score\n");
    for field in fields {
        for (idx, ranked) in field.selectors.iter().enumerate() {
            output.push_str(&format!(
                "{},{},\"{}\",{}\n",
                field.field_type,
                idx + 1,
                ranked.selector.replace('"', "\"\""),
                ranked.score
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_fields_filters_by_field() {
        let table = WeightStore::from_str(
            r#"{"username": {"a": 1, "b": 4}, "password": {"c": 2}}"#,
        )
        .unwrap();

        let all = ranked_fields(&table, None);
        assert_eq!(all.len(), 2);

        let only = ranked_fields(&table, Some("username"));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].selectors[0].selector, "b");
    }

    #[test]
    fn test_table_format_quotes_selectors() {
        let table = WeightStore::from_str(r#"{"login_button": {"input[type=\"submit\"]": 2}}"#).unwrap();
        let output = format_table(&ranked_fields(&table, None));

        assert!(output.starts_with("Field,Rank,Selector,Score\n"));
        assert!(output.contains("login_button,1,\"input[type=\"\"submit\"\"]\",2"));
    }
}
