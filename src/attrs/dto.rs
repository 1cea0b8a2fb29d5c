use serde::{Deserialize, Serialize};

use super::repo_types::Attr;

/// `{id, name}` as returned for tags and ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrResponse {
    pub id: i64,
    pub name: String,
}

impl From<Attr> for AttrResponse {
    fn from(a: Attr) -> Self {
        Self { id: a.id, name: a.name }
    }
}

#[derive(Debug, Deserialize)]
pub struct AttrPayload {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttrPatch {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub assigned_only: Option<String>,
}
