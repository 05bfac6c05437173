use crate::model::id::{LocationId, UserId, WaitlistEntryId};
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub entry_id: WaitlistEntryId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub date: NaiveDate,
    // 同一プロセス内で厳密に単調増加する
    pub timestamp: DateTime<Utc>,
}

/// Sorts entries into promotion order: oldest timestamp first.
pub fn fifo_order(entries: &mut [WaitlistEntry]) {
    entries.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.entry_id.cmp(&b.entry_id))
    });
}
