use async_trait::async_trait;
use lucky_ponds_core::state::{PondId, PondSnapshot};
use lucky_ponds_core::UnixTimestamp;

/// Read surface of the pond contract.
///
/// Implemented by the wallet/contract-binding collaborator; the watcher
/// only ever reads through this trait and never mutates contract state.
#[async_trait]
pub trait PondReader: Send + Sync {
    /// Fetches the current snapshot of a pond.
    async fn get_pond_status(&self, pond_id: &PondId) -> Result<PondSnapshot, anyhow::Error>;

    /// Duration of the winner-selection timelock in seconds.
    ///
    /// Changes rarely; callers fetch it once and cache it.
    async fn selection_timelock(&self) -> Result<UnixTimestamp, anyhow::Error>;

    /// Ids of every pond registered on the contract.
    async fn pond_ids(&self) -> Result<Vec<PondId>, anyhow::Error>;
}

/// Transaction surface of the pond contract.
///
/// Submission stays with the wallet collaborator; this crate only decides
/// when a submission is safe.
#[async_trait]
pub trait PondActions: Send + Sync {
    /// Submits the winner-selection transaction for an elapsed cycle.
    async fn select_winner(&self, pond_id: &PondId) -> Result<(), anyhow::Error>;

    /// Tosses a deposit into the pond.
    async fn toss(&self, pond_id: &PondId, amount: u64) -> Result<(), anyhow::Error>;
}
