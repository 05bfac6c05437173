use chrono::{DateTime, Duration, NaiveDate, Utc};
use kernel::model::{
    booking::BookingStatus,
    calendar::YearMonth,
    change::LedgerChange,
    day_status::DayStatus,
    id::{BookingId, LocationId, UserId, WaitlistEntryId},
    location::Location,
    user::User,
};
use parking_lot::{Mutex as SyncMutex, RwLock};
use shared::config::LedgerConfig;
use std::{
    collections::{BTreeMap, HashMap},
    ops::{Deref, DerefMut},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tokio::sync::{broadcast, Mutex, OwnedMutexGuard};

use self::model::{
    booking::{BookingRow, DayLedger},
    location::LocationRow,
    user::UserTable,
};

pub mod model;

pub type DayKey = (LocationId, NaiveDate);

struct Store {
    config: LedgerConfig,
    // 拠点は起動時に確定し、以後変わらない
    locations: BTreeMap<LocationId, LocationRow>,
    users: RwLock<UserTable>,
    days: RwLock<HashMap<DayKey, Arc<Mutex<DayLedger>>>>,
    booking_index: RwLock<HashMap<BookingId, DayKey>>,
    booking_seq: AtomicU64,
    waitlist_seq: AtomicU64,
    clock: SyncMutex<DateTime<Utc>>,
    changes: broadcast::Sender<LedgerChange>,
}

/// In-memory ledger store. Cloning shares the same underlying state.
#[derive(Clone)]
pub struct Database(Arc<Store>);

/// Exclusive access to one (location, date). Dropping it releases the day.
pub struct DayTransaction {
    key: DayKey,
    guard: OwnedMutexGuard<DayLedger>,
}

impl DayTransaction {
    pub fn location_id(&self) -> LocationId {
        self.key.0
    }

    pub fn date(&self) -> NaiveDate {
        self.key.1
    }
}

impl Deref for DayTransaction {
    type Target = DayLedger;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for DayTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl Database {
    pub fn new(config: LedgerConfig) -> Self {
        let locations = config
            .locations
            .iter()
            .map(|seed| {
                let row = LocationRow {
                    location_id: LocationId::new(),
                    location_name: seed.name.clone(),
                    capacity: seed.capacity,
                };
                (row.location_id, row)
            })
            .collect();
        // 受信者がいなくても送信側は保持しておく
        let (changes, _) = broadcast::channel(config.event_buffer.max(1));
        Self(Arc::new(Store {
            config,
            locations,
            users: RwLock::new(UserTable::default()),
            days: RwLock::new(HashMap::new()),
            booking_index: RwLock::new(HashMap::new()),
            booking_seq: AtomicU64::new(1),
            waitlist_seq: AtomicU64::new(1),
            clock: SyncMutex::new(DateTime::<Utc>::MIN_UTC),
            changes,
        }))
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.0.config
    }

    pub fn locations(&self) -> Vec<Location> {
        let mut locations: Vec<Location> = self.0.locations.values().map(Location::from).collect();
        locations.sort_by(|a, b| a.location_name.cmp(&b.location_name));
        locations
    }

    pub fn location(&self, location_id: LocationId) -> Option<Location> {
        self.0.locations.get(&location_id).map(Location::from)
    }

    pub fn location_by_name(&self, name: &str) -> Option<Location> {
        let name = name.trim();
        self.0
            .locations
            .values()
            .find(|row| row.location_name.eq_ignore_ascii_case(name))
            .map(Location::from)
    }

    pub fn user(&self, user_id: UserId) -> Option<User> {
        self.read_users(|users| users.get(user_id).map(User::from))
    }

    // ロックガードを外に出さない（await をまたいで保持しないため）
    pub fn read_users<R>(&self, f: impl FnOnce(&UserTable) -> R) -> R {
        f(&self.0.users.read())
    }

    pub fn write_users<R>(&self, f: impl FnOnce(&mut UserTable) -> R) -> R {
        f(&mut self.0.users.write())
    }

    /// Locks the (location, date) slice, creating it on first use.
    pub async fn begin(&self, location_id: LocationId, date: NaiveDate) -> DayTransaction {
        let key = (location_id, date);
        DayTransaction {
            key,
            guard: self.slot_or_create(key).lock_owned().await,
        }
    }

    /// Locks the slice only if something was ever written to it.
    pub async fn begin_existing(
        &self,
        location_id: LocationId,
        date: NaiveDate,
    ) -> Option<DayTransaction> {
        let key = (location_id, date);
        let slot = self.0.days.read().get(&key).cloned()?;
        Some(DayTransaction {
            key,
            guard: slot.lock_owned().await,
        })
    }

    fn slot_or_create(&self, key: DayKey) -> Arc<Mutex<DayLedger>> {
        if let Some(slot) = self.0.days.read().get(&key) {
            return slot.clone();
        }
        self.0.days.write().entry(key).or_default().clone()
    }

    pub async fn day_status(&self, location: &Location, date: NaiveDate) -> DayStatus {
        let (bookings, waitlist) = match self.begin_existing(location.location_id, date).await {
            Some(tx) => (tx.confirmed_count(), tx.waitlist.len()),
            None => (0, 0),
        };
        DayStatus::new(bookings, waitlist, location.capacity, self.config().waitlist_cap)
    }

    /// Every booking row (any status) dated within `month`, ordered by date then id.
    pub async fn bookings_in(&self, month: YearMonth) -> Vec<BookingRow> {
        let mut keys: Vec<DayKey> = self
            .0
            .days
            .read()
            .keys()
            .filter(|(_, date)| month.contains(*date))
            .copied()
            .collect();
        keys.sort();

        let mut rows = Vec::new();
        for (location_id, date) in keys {
            if let Some(tx) = self.begin_existing(location_id, date).await {
                rows.extend(tx.bookings.iter().cloned());
            }
        }
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.booking_id.cmp(&b.booking_id)));
        rows
    }

    pub fn new_booking(&self, tx: &mut DayTransaction, user_id: UserId) -> BookingRow {
        let booking_id = BookingId::new(self.0.booking_seq.fetch_add(1, Ordering::Relaxed));
        let row = BookingRow {
            booking_id,
            user_id,
            location_id: tx.location_id(),
            date: tx.date(),
            status: BookingStatus::Confirmed,
            booked_at: self.now(),
            cancelled_at: None,
        };
        tx.bookings.push(row.clone());
        self.0.booking_index.write().insert(booking_id, tx.key);
        row
    }

    pub fn booking_location(&self, booking_id: BookingId) -> Option<DayKey> {
        self.0.booking_index.read().get(&booking_id).copied()
    }

    pub fn next_entry_id(&self) -> WaitlistEntryId {
        WaitlistEntryId::new(self.0.waitlist_seq.fetch_add(1, Ordering::Relaxed))
    }

    /// Strictly increasing wall-clock time. Waitlist order depends on it.
    pub fn now(&self) -> DateTime<Utc> {
        let mut last = self.0.clock.lock();
        let now = Utc::now();
        let next = if now > *last {
            now
        } else {
            *last + Duration::microseconds(1)
        };
        *last = next;
        next
    }

    pub fn publish(&self, change: LedgerChange) {
        // 購読者がいないときの送信エラーは無視してよい
        let _ = self.0.changes.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerChange> {
        self.0.changes.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        !self.0.locations.is_empty()
    }
}

pub fn connect_database_with(cfg: &LedgerConfig) -> Database {
    Database::new(cfg.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::config::LocationSeed;

    fn config(capacity: u32) -> LedgerConfig {
        LedgerConfig {
            locations: vec![LocationSeed {
                name: "Chennai".into(),
                capacity,
            }],
            ..LedgerConfig::default()
        }
    }

    #[test]
    fn clock_never_repeats() {
        let db = connect_database_with(&config(1));
        let mut previous = db.now();
        for _ in 0..1_000 {
            let next = db.now();
            assert!(next > previous);
            previous = next;
        }
    }

    #[tokio::test]
    async fn untouched_days_are_not_materialized() {
        let db = connect_database_with(&config(1));
        let location = db.locations().remove(0);
        let date = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        assert!(db.begin_existing(location.location_id, date).await.is_none());
        assert_eq!(
            db.day_status(&location, date).await,
            DayStatus::new(0, 0, 1, 20)
        );
        drop(db.begin(location.location_id, date).await);
        assert!(db.begin_existing(location.location_id, date).await.is_some());
    }

    #[test]
    fn locations_are_found_case_insensitively() {
        let db = connect_database_with(&config(1));
        assert!(db.location_by_name(" chennai ").is_some());
        assert!(db.location_by_name("Mumbai").is_none());
    }
}
