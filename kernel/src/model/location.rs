use crate::model::id::LocationId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub location_id: LocationId,
    pub location_name: String,
    // 1日あたりの座席数（0 より大きい）
    pub capacity: u32,
}
