use crate::error::PondCoreError;
use crate::{
    UnixTimestamp, DAY_PERIOD, DEFAULT_SELECTION_TIMELOCK, FIVE_MIN_PERIOD,
    FIVE_MIN_SELECTION_TIMELOCK, HOUR_PERIOD, WEEK_PERIOD,
};

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use std::convert::TryFrom;
use std::str::FromStr;

/// A unique identifier of a pond.
///
/// It is the "slugified" [`PondName`].
pub type PondId = [u8; 32];
/// The name of the pond that may be up to 32 characters long.
pub type PondName = [u8; 32];
/// Address of a token mint account on the host chain.
pub type TokenAddress = [u8; 32];

/// Pads a human-readable id to the fixed-width representation stored on the
/// contract.
pub fn pad_to_32_bytes(input: &str) -> Result<[u8; 32], PondCoreError> {
    if input.len() > 32 {
        return Err(PondCoreError::PondIdTooLong);
    }
    let mut bytes = [0_u8; 32];
    bytes[..input.len()].copy_from_slice(input.as_bytes());
    Ok(bytes)
}

/// Scheduling pattern of a pond.
///
/// Fixed cadences cycle on wall-clock UTC marks, while `Custom` ponds run
/// until the end time stored in the contract.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum Cadence {
    FiveMin = 0,
    Hourly = 1,
    Daily = 2,
    Weekly = 3,
    Monthly = 4,
    Custom = 5,
}

impl Cadence {
    /// Fixed length of one cycle in seconds.
    ///
    /// `None` for `Monthly` (calendar-dependent) and `Custom`
    /// (contract-driven).
    pub fn period(self) -> Option<UnixTimestamp> {
        match self {
            Cadence::FiveMin => Some(FIVE_MIN_PERIOD),
            Cadence::Hourly => Some(HOUR_PERIOD),
            Cadence::Daily => Some(DAY_PERIOD),
            Cadence::Weekly => Some(WEEK_PERIOD),
            Cadence::Monthly | Cadence::Custom => None,
        }
    }

    /// Timelock applied after a cycle ends when the contract supplies none.
    pub fn default_timelock(self) -> UnixTimestamp {
        match self {
            Cadence::FiveMin => FIVE_MIN_SELECTION_TIMELOCK,
            _ => DEFAULT_SELECTION_TIMELOCK,
        }
    }
}

impl TryFrom<u8> for Cadence {
    type Error = PondCoreError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Cadence::FiveMin),
            1 => Ok(Cadence::Hourly),
            2 => Ok(Cadence::Daily),
            3 => Ok(Cadence::Weekly),
            4 => Ok(Cadence::Monthly),
            5 => Ok(Cadence::Custom),
            _ => Err(PondCoreError::UnknownCadence(value)),
        }
    }
}

impl FromStr for Cadence {
    type Err = PondCoreError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "five-min" => Ok(Cadence::FiveMin),
            "hourly" => Ok(Cadence::Hourly),
            "daily" => Ok(Cadence::Daily),
            "weekly" => Ok(Cadence::Weekly),
            "monthly" => Ok(Cadence::Monthly),
            "custom" => Ok(Cadence::Custom),
            _ => Err(PondCoreError::UnknownCadenceName),
        }
    }
}

/// Means of payment accepted by a pond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum TokenConfig {
    /// Deposits in the chain's native token.
    Native,
    /// Deposits in a token identified by its mint address.
    Token { mint: TokenAddress },
}

/// Read-only view of a pond's on-chain state, fetched once per refresh.
///
/// The timing core never mutates a snapshot, it only derives a
/// [`PondStatus`](crate::status::PondStatus) from it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PondSnapshot {
    /// Name of the pond.
    pub name: PondName,
    /// When the pond's current cycle opened (in seconds).
    pub start_time: UnixTimestamp,
    /// When the pond's current cycle is scheduled to close (in seconds).
    ///
    /// Advisory only for five-minute ponds, whose authoritative boundary is
    /// the wall clock.
    pub end_time: UnixTimestamp,
    /// Scheduling pattern of the pond.
    pub cadence: Cadence,
    /// Set once the winner of the ended cycle has been paid out.
    pub prize_distributed: bool,
    /// Minimum accepted deposit (in the smallest token unit).
    pub min_deposit: u64,
    /// Cap on the pond's total deposited value (in the smallest token unit).
    pub max_total_deposit: u64,
    /// Number of deposits tossed into the current cycle.
    pub total_deposits: u64,
    /// Total deposited value of the current cycle (in the smallest token
    /// unit).
    pub total_value: u64,
    /// Number of distinct depositors in the current cycle.
    pub total_participants: u64,
    /// Configuration of the token the pond accepts.
    pub token_config: TokenConfig,
}

/// Checks a deposit amount against the pond's constraints before it is
/// handed to the transaction collaborator.
pub fn check_deposit_amount(snapshot: &PondSnapshot, amount: u64) -> Result<(), PondCoreError> {
    if amount < snapshot.min_deposit {
        return Err(PondCoreError::DepositTooLow);
    }
    let new_total = snapshot
        .total_value
        .checked_add(amount)
        .ok_or(PondCoreError::ArithmeticError)?;
    if snapshot.max_total_deposit != 0 && new_total > snapshot.max_total_deposit {
        return Err(PondCoreError::DepositCapExceeded);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_snapshot() -> PondSnapshot {
        PondSnapshot {
            name: pad_to_32_bytes("daily-pond").unwrap(),
            start_time: 1000,
            end_time: 2000,
            cadence: Cadence::Daily,
            prize_distributed: false,
            min_deposit: 100,
            max_total_deposit: 1000,
            total_deposits: 2,
            total_value: 500,
            total_participants: 2,
            token_config: TokenConfig::Native,
        }
    }

    #[test]
    fn cadence_conversions() {
        for discriminant in 0..=5 {
            let cadence = Cadence::try_from(discriminant).unwrap();
            assert_eq!(cadence as u8, discriminant);
        }
        assert_eq!(
            Cadence::try_from(6),
            Err(PondCoreError::UnknownCadence(6))
        );
        assert_eq!("five-min".parse::<Cadence>(), Ok(Cadence::FiveMin));
        assert_eq!("monthly".parse::<Cadence>(), Ok(Cadence::Monthly));
        assert_eq!(
            "fortnightly".parse::<Cadence>(),
            Err(PondCoreError::UnknownCadenceName)
        );
    }

    #[test]
    fn id_padding() {
        let id = pad_to_32_bytes("lily-pond").unwrap();
        assert_eq!(&id[..9], b"lily-pond");
        assert_eq!(&id[9..], &[0_u8; 23]);
        assert_eq!(
            pad_to_32_bytes("x".repeat(33).as_str()),
            Err(PondCoreError::PondIdTooLong)
        );
    }

    #[test]
    fn deposit_checks() {
        let snapshot = test_snapshot();
        assert_eq!(
            check_deposit_amount(&snapshot, 99),
            Err(PondCoreError::DepositTooLow)
        );
        assert_eq!(check_deposit_amount(&snapshot, 100), Ok(()));
        assert_eq!(check_deposit_amount(&snapshot, 500), Ok(()));
        assert_eq!(
            check_deposit_amount(&snapshot, 501),
            Err(PondCoreError::DepositCapExceeded)
        );
        let mut uncapped = test_snapshot();
        uncapped.max_total_deposit = 0;
        assert_eq!(check_deposit_amount(&uncapped, 10_000), Ok(()));
        let mut near_overflow = test_snapshot();
        near_overflow.total_value = u64::MAX;
        assert_eq!(
            check_deposit_amount(&near_overflow, 100),
            Err(PondCoreError::ArithmeticError)
        );
    }
}
