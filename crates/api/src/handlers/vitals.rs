//! Vital catalogue endpoint.

use axum::Json;
use serde::Serialize;
use vitalwatch_core::entry::entry_bounds;
use vitalwatch_core::thresholds::{band, reference_range, ClassificationBand};
use vitalwatch_core::vitals::{VitalInfo, VitalKey};

use crate::response::DataResponse;

/// Everything a client needs to label, format and validate one vital.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalDescriptor {
    #[serde(flatten)]
    pub info: VitalInfo,
    pub reference_range: &'static str,
    pub band: ClassificationBand,
    pub entry_min: f64,
    pub entry_max: f64,
}

impl From<VitalKey> for VitalDescriptor {
    fn from(key: VitalKey) -> Self {
        let (entry_min, entry_max) = entry_bounds(key);
        Self {
            info: key.info(),
            reference_range: reference_range(key),
            band: band(key),
            entry_min,
            entry_max,
        }
    }
}

/// GET /vitals
pub async fn list_vitals() -> Json<DataResponse<Vec<VitalDescriptor>>> {
    Json(DataResponse {
        data: VitalKey::ALL.into_iter().map(VitalDescriptor::from).collect(),
    })
}
