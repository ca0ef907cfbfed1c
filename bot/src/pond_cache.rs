use lucky_ponds_client::PondReader;
use lucky_ponds_core::state::{PondId, PondSnapshot};
use lucky_ponds_core::status::{resolve_status, PondStatus};
use lucky_ponds_core::UnixTimestamp;

use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::hash_map::HashMap;
use std::collections::hash_set::HashSet;

pub const MAX_ERROR_STREAK: u8 = 20;

/// Contains the cached data of a pond
pub struct PondRecord {
    /// The most recent snapshot of the pond
    pub snapshot: PondSnapshot,
    /// The number of times an unexpected error occured on consecutive
    /// winner selections
    pub error_streak: u8,
}

impl PondRecord {
    /// Initializes a pond record by loading the pond's snapshot
    pub async fn new<R: PondReader>(
        reader: &R,
        pond_id: &PondId,
    ) -> Result<Self, anyhow::Error> {
        let snapshot = reader.get_pond_status(pond_id).await?;
        Ok(Self {
            snapshot,
            error_streak: 0,
        })
    }

    /// Updates the stored snapshot
    pub async fn update_snapshot<R: PondReader>(
        &mut self,
        reader: &R,
        pond_id: &PondId,
    ) -> Result<(), anyhow::Error> {
        self.snapshot = reader.get_pond_status(pond_id).await?;
        Ok(())
    }

    /// Logs error appropriately, if unexpected error occurs then increments
    /// error_streak. Returns whether the error was unexpected.
    ///
    /// Expected errors:
    ///
    ///  - The cycle was rolled over by another agent between the status
    ///  check and the submission
    ///
    ///  - The cycle slipped back in progress before the submission landed
    ///
    /// Both are recognized by the ledger reporting the pond as still in
    /// progress
    pub async fn report_error<R: PondReader>(
        &mut self,
        reader: &R,
        pond_id: &PondId,
        error: &anyhow::Error,
    ) -> Result<bool, anyhow::Error> {
        self.update_snapshot(reader, pond_id).await?;

        if error.to_string().ends_with("is in progress") {
            return Ok(false);
        }

        self.error_streak += 1;
        Ok(true)
    }

    /// Resets error streak.
    /// Should be used after successful winner selection.
    pub fn reset_error_streak(&mut self) {
        self.error_streak = 0;
    }

    /// Returns if the pond is likely broken. Currently identified by
    /// receiving a certain number of consecutive errors on winner selection
    pub fn is_faulty_pond(&self) -> bool {
        self.error_streak > MAX_ERROR_STREAK
    }
}

type HashedPonds = HashMap<PondId, PondRecord>;
type HashedIdSet = HashSet<PondId>;

/// Manages pond snapshots for caching
pub struct ManagedPonds {
    /// The winner selection timelock, fetched once for the whole contract
    pub timelock: UnixTimestamp,
    /// Hashmap containing all watched ponds and their data
    pub hashed_ponds: HashedPonds,
    /// Hashset containing ids of dormant (completed) ponds
    pub dormant_ponds: HashedIdSet,
    /// Hashset containing ids of erroneous ponds
    pub error_ponds: HashedIdSet,
}

impl ManagedPonds {
    pub fn new(timelock: UnixTimestamp) -> Self {
        Self {
            timelock,
            hashed_ponds: HashedPonds::new(),
            dormant_ponds: HashedIdSet::new(),
            error_ponds: HashedIdSet::new(),
        }
    }

    /// Returns a mutable reference to a pond record if the pond awaits
    /// winner selection
    ///
    ///  - Returns none if the pond was parked (dormant, erroneous)
    ///
    ///  - Returns none if the pond's cycle or timelock is not over yet
    pub async fn get_or_insert_pond<R: PondReader>(
        &mut self,
        reader: &R,
        pond_id: PondId,
        now: UnixTimestamp,
    ) -> Result<Option<&mut PondRecord>, anyhow::Error> {
        // if previously identified as dormant or uncallable, return none
        if self.dormant_ponds.get(&pond_id).is_some() || self.error_ponds.get(&pond_id).is_some()
        {
            return Ok(None);
        }

        // fetch or refresh the pond record
        let pond_record = match self.hashed_ponds.entry(pond_id) {
            Vacant(entry) => entry.insert(PondRecord::new(reader, &pond_id).await?),
            Occupied(entry) => {
                let record = entry.into_mut();
                record.update_snapshot(reader, &pond_id).await?;
                record
            }
        };

        match resolve_status(&pond_record.snapshot, now, self.timelock) {
            // a distributed pond never reopens, register it and return none
            PondStatus::Completed => {
                self.dormant_ponds.insert(pond_id);
                Ok(None)
            }
            PondStatus::SelectWinner => Ok(Some(pond_record)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::SimLedger;
    use lucky_ponds_client::{Clock, MockClock, PondActions};
    use lucky_ponds_core::state::Cadence;
    use lucky_ponds_core::DAY_PERIOD;

    use std::sync::Arc;

    #[tokio::test]
    async fn only_ponds_awaiting_selection_are_returned() {
        let clock = Arc::new(MockClock::new(1400));
        let ledger = SimLedger::new(Arc::clone(&clock), 20);
        let pond_id = ledger.add_pond("cache-pond", Cadence::FiveMin).unwrap();
        let mut managed_ponds = ManagedPonds::new(20);

        // open cycle
        let record = managed_ponds
            .get_or_insert_pond(&ledger, pond_id, 1400)
            .await
            .unwrap();
        assert!(record.is_none());
        // timelock still running
        let record = managed_ponds
            .get_or_insert_pond(&ledger, pond_id, 1510)
            .await
            .unwrap();
        assert!(record.is_none());
        // timelock expired
        let record = managed_ponds
            .get_or_insert_pond(&ledger, pond_id, 1525)
            .await
            .unwrap();
        assert!(record.is_some());
    }

    #[tokio::test]
    async fn completed_ponds_are_parked() {
        let clock = Arc::new(MockClock::new(100_000));
        let ledger = SimLedger::new(Arc::clone(&clock), 60);
        let pond_id = ledger.add_pond("daily-pond", Cadence::Daily).unwrap();
        let mut managed_ponds = ManagedPonds::new(60);

        clock.advance(2 * DAY_PERIOD - 100_000 + 61);
        let now = clock.now();
        assert!(managed_ponds
            .get_or_insert_pond(&ledger, pond_id, now)
            .await
            .unwrap()
            .is_some());
        ledger.select_winner(&pond_id).await.unwrap();

        assert!(managed_ponds
            .get_or_insert_pond(&ledger, pond_id, now)
            .await
            .unwrap()
            .is_none());
        assert!(managed_ponds.dormant_ponds.contains(&pond_id));
        // parked ponds are skipped without a fetch
        assert!(managed_ponds
            .get_or_insert_pond(&ledger, pond_id, now)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn repeated_expected_errors_do_not_park_the_pond() {
        // the pond opened with the wall cycle [1200, 1500)
        let clock = Arc::new(MockClock::new(1400));
        let ledger = SimLedger::new(Arc::clone(&clock), 20);
        let pond_id = ledger.add_pond("racy-pond", Cadence::FiveMin).unwrap();
        let mut managed_ponds = ManagedPonds::new(20);

        let record = managed_ponds
            .get_or_insert_pond(&ledger, pond_id, 1525)
            .await
            .unwrap()
            .unwrap();
        // another agent already rolled the cycle
        let race = anyhow::anyhow!("pond \"racy-pond\" is in progress");
        for _ in 0..(MAX_ERROR_STREAK as usize + 5) {
            let unexpected = record.report_error(&ledger, &pond_id, &race).await.unwrap();
            assert!(!unexpected);
        }
        assert!(!record.is_faulty_pond());

        let broken = anyhow::anyhow!("deserialization failed");
        for _ in 0..(MAX_ERROR_STREAK as usize + 1) {
            let unexpected = record.report_error(&ledger, &pond_id, &broken).await.unwrap();
            assert!(unexpected);
        }
        assert!(record.is_faulty_pond());
    }
}
