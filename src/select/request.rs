use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::range_hint;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No pages selected to slice")]
    NothingSelected,
}

/// Wire payload for the slice operation.
///
/// Both the contiguous range bounds and the explicit page list are always
/// populated: the explicit list is authoritative when non-empty, the bounds
/// are a fallback for range-only backends. Field names match the original
/// JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceRequest {
    pub start_page: u32,
    pub end_page: u32,
    pub pages: Vec<u32>,
}

/// Build the slice payload from a reconciled page set and an optional
/// precomputed range hint.
pub fn build(
    reconciled: &[u32],
    hint: Option<(u32, u32)>,
) -> Result<SliceRequest, ValidationError> {
    let (start_page, end_page) = hint
        .or_else(|| range_hint(reconciled))
        .ok_or(ValidationError::NothingSelected)?;

    Ok(SliceRequest {
        start_page,
        end_page,
        pages: reconciled.to_vec(),
    })
}
