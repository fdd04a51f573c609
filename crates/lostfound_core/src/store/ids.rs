//! Item id issuance.
//!
//! Ids are wall-clock milliseconds, bumped past the last issued id and past
//! every id already present in the target snapshot.

use crate::model::item::ItemId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic id source.
pub struct IdGenerator {
    last_issued: ItemId,
    clock: Box<dyn Fn() -> ItemId + Send>,
}

impl IdGenerator {
    /// Generator backed by the system clock.
    pub fn system() -> Self {
        Self::with_clock(epoch_millis)
    }

    /// Generator backed by a caller-provided millisecond clock.
    pub fn with_clock(clock: impl Fn() -> ItemId + Send + 'static) -> Self {
        Self {
            last_issued: 0,
            clock: Box::new(clock),
        }
    }

    /// Issues an id strictly greater than `floor` and than any id issued before.
    pub fn next_id(&mut self, floor: ItemId) -> ItemId {
        let now = (self.clock)();
        let id = now
            .max(self.last_issued.saturating_add(1))
            .max(floor.saturating_add(1));
        self.last_issued = id;
        id
    }
}

fn epoch_millis() -> ItemId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| ItemId::try_from(elapsed.as_millis()).unwrap_or(ItemId::MAX))
        .unwrap_or(0)
}
