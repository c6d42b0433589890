use serde::{Deserialize, Serialize};

/// One row of the fact table. Ids are 1-based and dense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub id: i64,
    pub fact: String,
}

impl FactRecord {
    /// Number facts densely from 1, skipping blank entries.
    pub fn numbered<I, S>(facts: I) -> Vec<FactRecord>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        facts
            .into_iter()
            .filter_map(|fact| {
                let fact = fact.as_ref().trim();
                (!fact.is_empty()).then(|| fact.to_string())
            })
            .zip(1..)
            .map(|(fact, id)| FactRecord { id, fact })
            .collect()
    }
}
