use crate::common::money::Money;

/// One crossing read from the input file. Lives only for the duration of the
/// batch step that prices it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    pub vehicle_number: String,
    pub vehicle_type: String,
    pub declared_balance: Money,
}

impl VehicleRecord {
    pub fn new(
        vehicle_number: impl Into<String>,
        vehicle_type: impl Into<String>,
        declared_balance: Money,
    ) -> Self {
        Self {
            vehicle_number: vehicle_number.into(),
            vehicle_type: vehicle_type.into(),
            declared_balance,
        }
    }

    pub fn can_cover(&self, fare: Money) -> bool {
        self.declared_balance >= fare
    }
}
