use lucky_ponds_client::{Clock, PondActions, PondReader};
use lucky_ponds_core::clock::{cycle_start, next_boundary};
use lucky_ponds_core::state::{
    check_deposit_amount, pad_to_32_bytes, Cadence, PondId, PondSnapshot, TokenConfig,
};
use lucky_ponds_core::status::{is_interaction_disabled, resolve_status, PondStatus};
use lucky_ponds_core::{UnixTimestamp, FIVE_MIN_PERIOD, HOUR_PERIOD};

use anyhow::anyhow;
use async_trait::async_trait;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Minimum deposit of a simulated pond (in the smallest token unit).
const SIM_MIN_DEPOSIT: u64 = 1_000_000;

/// In-memory ledger standing in for the pond contract.
///
/// Lets the whole selection lifecycle run locally: tosses accumulate value
/// and winner selection rolls a five-minute pond into the wall cycle
/// containing `now`, or marks any other pond distributed.
pub struct SimLedger<C: Clock> {
    clock: Arc<C>,
    timelock: UnixTimestamp,
    ponds: Mutex<HashMap<PondId, PondSnapshot>>,
}

impl<C: Clock> SimLedger<C> {
    pub fn new(clock: Arc<C>, timelock: UnixTimestamp) -> Self {
        Self {
            clock,
            timelock,
            ponds: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a pond opening with the current cycle of its cadence.
    pub fn add_pond(&self, name: &str, cadence: Cadence) -> Result<PondId, anyhow::Error> {
        let pond_id = pad_to_32_bytes(name)?;
        let now = self.clock.now();
        let (start_time, end_time) = initial_cycle(cadence, now);
        let snapshot = PondSnapshot {
            name: pond_id,
            start_time,
            end_time,
            cadence,
            prize_distributed: false,
            min_deposit: SIM_MIN_DEPOSIT,
            max_total_deposit: 0,
            total_deposits: 0,
            total_value: 0,
            total_participants: 0,
            token_config: TokenConfig::Native,
        };
        self.ponds.lock().unwrap().insert(pond_id, snapshot);
        Ok(pond_id)
    }
}

fn initial_cycle(cadence: Cadence, now: UnixTimestamp) -> (UnixTimestamp, UnixTimestamp) {
    match next_boundary(cadence, now) {
        Some(boundary) => {
            let start = cycle_start(cadence, boundary).unwrap_or(now);
            (start, boundary)
        }
        // custom ponds get an hour-long cycle starting now
        None => (now, now + HOUR_PERIOD),
    }
}

fn no_such_pond(pond_id: &PondId) -> anyhow::Error {
    anyhow!("no such pond: \"{}\"", String::from_utf8_lossy(pond_id))
}

#[async_trait]
impl<C: Clock> PondReader for SimLedger<C> {
    async fn get_pond_status(&self, pond_id: &PondId) -> Result<PondSnapshot, anyhow::Error> {
        self.ponds
            .lock()
            .unwrap()
            .get(pond_id)
            .cloned()
            .ok_or_else(|| no_such_pond(pond_id))
    }

    async fn selection_timelock(&self) -> Result<UnixTimestamp, anyhow::Error> {
        Ok(self.timelock)
    }

    async fn pond_ids(&self) -> Result<Vec<PondId>, anyhow::Error> {
        let mut ids: Vec<PondId> = self.ponds.lock().unwrap().keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl<C: Clock> PondActions for SimLedger<C> {
    async fn select_winner(&self, pond_id: &PondId) -> Result<(), anyhow::Error> {
        let now = self.clock.now();
        let mut ponds = self.ponds.lock().unwrap();
        let pond = ponds.get_mut(pond_id).ok_or_else(|| no_such_pond(pond_id))?;
        match resolve_status(pond, now, self.timelock) {
            PondStatus::SelectWinner => (),
            _ => {
                return Err(anyhow!(
                    "pond \"{}\" is in progress",
                    String::from_utf8_lossy(pond_id)
                ))
            }
        }
        match pond.cadence {
            Cadence::FiveMin => {
                // roll into the wall cycle containing `now`
                if let Some(boundary) = next_boundary(Cadence::FiveMin, now) {
                    pond.start_time = boundary - FIVE_MIN_PERIOD;
                    pond.end_time = boundary;
                }
                pond.total_deposits = 0;
                pond.total_value = 0;
                pond.total_participants = 0;
            }
            _ => pond.prize_distributed = true,
        }
        Ok(())
    }

    async fn toss(&self, pond_id: &PondId, amount: u64) -> Result<(), anyhow::Error> {
        let now = self.clock.now();
        let mut ponds = self.ponds.lock().unwrap();
        let pond = ponds.get_mut(pond_id).ok_or_else(|| no_such_pond(pond_id))?;
        let status = resolve_status(pond, now, self.timelock);
        if status != PondStatus::Open {
            return Err(anyhow!(
                "pond \"{}\" is not open for deposits",
                String::from_utf8_lossy(pond_id)
            ));
        }
        if is_interaction_disabled(pond, status, now) {
            return Err(anyhow!(
                "pond \"{}\" is locked around its cycle edge",
                String::from_utf8_lossy(pond_id)
            ));
        }
        check_deposit_amount(pond, amount)?;
        pond.total_deposits += 1;
        pond.total_value += amount;
        pond.total_participants += 1;
        Ok(())
    }
}
