use serde::{Deserialize, Serialize};

/// One entry of the provider's model catalog after filtering.
///
/// `name` duplicates `id` (the full model id is the display name); optional
/// provider fields default when absent from the listing response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub latest: bool,
}
