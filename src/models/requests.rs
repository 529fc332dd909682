use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{DateSelection, FacetValue, PostId};

/// Request to filter candidates by availability
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FilterRequest {
    /// `[start, end, quantity]` as submitted by the facet
    #[validate(length(max = 3))]
    #[serde(alias = "selected_values", rename = "selectedValues", default)]
    pub selected_values: Vec<FacetValue>,
    /// Unfiltered post ids; every catalog post when omitted
    #[serde(default)]
    pub candidates: Option<Vec<PostId>>,
}

impl FilterRequest {
    pub fn selection(&self) -> DateSelection {
        DateSelection::from_values(&self.selected_values)
    }
}
