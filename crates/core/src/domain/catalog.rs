use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogItemId(pub String);

/// A purchasable service as published by the catalog collaborator.
///
/// Read-only from the simulator's point of view: the core copies it into
/// quote lines but never mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub name: String,
    pub credits: u32,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, credits: u32) -> Self {
        Self { id: CatalogItemId(id.into()), name: name.into(), credits }
    }
}
