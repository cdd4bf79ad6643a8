use crate::weights::WeightTable;
use serde::Serialize;

/// A learned selector with its current score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSelector {
    pub selector: String,
    pub score: u64,
}

/// Known selectors for `field_type`, highest score first
///
/// Equal scores keep insertion order, so the selector learned first wins the
/// tie. An unknown field-type ranks nothing.
pub fn rank(table: &WeightTable, field_type: &str) -> Vec<RankedSelector> {
    let Some(scores) = table.scores(field_type) else {
        return Vec::new();
    };

    let mut ranked: Vec<RankedSelector> = scores
        .iter()
        .map(|(selector, score)| RankedSelector {
            selector: selector.to_string(),
            score,
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}
