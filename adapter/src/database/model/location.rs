use kernel::model::{id::LocationId, location::Location};

pub struct LocationRow {
    pub location_id: LocationId,
    pub location_name: String,
    pub capacity: u32,
}

impl From<&LocationRow> for Location {
    fn from(value: &LocationRow) -> Self {
        let LocationRow {
            location_id,
            location_name,
            capacity,
        } = value;
        Location {
            location_id: *location_id,
            location_name: location_name.clone(),
            capacity: *capacity,
        }
    }
}
