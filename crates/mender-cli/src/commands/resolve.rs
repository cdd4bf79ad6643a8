use crate::{OutputFormat, SessionOptions};
use anyhow::Result;
use mender_browser::{CdpProbe, normalize_url};
use mender_core::{MatchSource, Resolution};

/// Outcome of one field resolution, detached from the element handle
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResolvedField {
    pub field_type: String,
    pub selector: String,
    pub score: u64,
    pub source: &'static str,
}

impl<E> From<&Resolution<E>> for ResolvedField {
    fn from(resolution: &Resolution<E>) -> Self {
        Self {
            field_type: resolution.field_type.clone(),
            selector: resolution.selector.clone(),
            score: resolution.score,
            source: resolution.source.as_str(),
        }
    }
}

/// Resolve each field in order against the attached Chrome tab.
/// Weights are committed only if every field resolves.
pub fn execute(
    options: &SessionOptions,
    fields: &[String],
    url: Option<&str>,
    port: u16,
    format: OutputFormat,
) -> Result<()> {
    let mut session = options.open()?;
    let mut probe = CdpProbe::connect(port)?;

    if let Some(url) = url {
        probe.goto(&normalize_url(url)?)?;
    }

    let mut resolved = Vec::with_capacity(fields.len());
    for field in fields {
        let resolution = session.resolve(field, &mut probe)?;
        resolved.push(ResolvedField::from(&resolution));
    }

    session.commit()?;

    print!("{}", render(&resolved, format)?);
    Ok(())
}

pub fn render(resolved: &[ResolvedField], format: OutputFormat) -> Result<String> {
    let output = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(resolved)?),
        OutputFormat::Table => {
            let mut output = String::from("Field,Selector,Score,Source\n");
            for field in resolved {
                output.push_str(&format!(
                    "{},\"{}\",{},{}\n",
                    field.field_type,
                    field.selector.replace('"', "\"\""),
                    field.score,
                    field.source
                ));
            }
            output
        }
        OutputFormat::Pretty => {
            let mut output = String::new();
            for field in resolved {
                let marker = if field.source == MatchSource::Fallback.as_str() {
                    "⚠️"
                } else {
                    "✅"
                };
                output.push_str(&format!(
                    "{} {}: {} (score {}, {})\n",
                    marker, field.field_type, field.selector, field.score, field.source
                ));
            }
            output
        }
    };

    Ok(output)
}
