//! Serializable cache snapshots handed from the prefetch step to readers.

use notehub_api_types::NotesPage;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::keys::QueryKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DehydratedQuery {
    pub key: QueryKey,
    pub data: NotesPage,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DehydratedState {
    pub queries: Vec<DehydratedQuery>,
}

impl DehydratedState {
    pub fn find(&self, key: &QueryKey) -> Option<&DehydratedQuery> {
        self.queries.iter().find(|query| &query.key == key)
    }

    /// JSON safe to place inside a `<script type="application/json">` element.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self).map(|json| json.replace('<', "\\u003c"))
    }
}
