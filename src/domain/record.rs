use chrono::NaiveDateTime;

use crate::{common::money::Money, domain::vehicle::VehicleRecord};

/// Ledger timestamp layout. The embedded comma is why the writer quotes the
/// field and the reader re-joins trailing fields.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d,%H:%M:%S";

/// A priced crossing as it appears in the ledger. Written once, never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedRecord {
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub toll_fare: Money,
    pub timestamp: String,
}

impl ProcessedRecord {
    pub fn new(
        vehicle_number: impl Into<String>,
        vehicle_type: impl Into<String>,
        toll_fare: Money,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            vehicle_number: vehicle_number.into(),
            vehicle_type: vehicle_type.into(),
            toll_fare,
            timestamp: timestamp.into(),
        }
    }

    pub fn priced(vehicle: &VehicleRecord, toll_fare: Money, at: NaiveDateTime) -> Self {
        Self::new(
            vehicle.vehicle_number.clone(),
            vehicle.vehicle_type.clone(),
            toll_fare,
            at.format(TIMESTAMP_FORMAT).to_string(),
        )
    }
}
