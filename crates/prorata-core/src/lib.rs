// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PRORATA - DIVIDEND DISTRIBUTION CORE
//
// Pull-based proportional distribution ledger: deposits are apportioned
// retroactively to share holders via a single magnified per-share
// accumulator plus a signed per-account correction term. Deposits and
// entitlement queries are both O(1); no holder iteration anywhere on the
// hot path. All financial arithmetic uses u128/i128 (no floating-point).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod config;
pub mod distributor;
pub mod errors;
pub mod events;
pub mod math;
pub mod token;

pub use config::DistributorConfig;
pub use distributor::{DividendDistributor, DistributorSummary, HolderRecord};
pub use errors::{DividendError, ErrorCategory};
pub use events::Event;
pub use token::{DividendToken, TokenLedger};

/// Account identifier. Opaque to the core — the underlying ledger owns
/// address derivation and validation.
pub type Address = String;

/// Fixed-point magnitude for the per-share accumulator: 10^12.
/// A deposit of `amount` against `total_shares` moves the accumulator by
/// `amount * MAGNITUDE / total_shares`, so per-deposit floor-rounding
/// loss stays below one value unit per holder as long as total share
/// supply stays under MAGNITUDE.
pub const MAGNITUDE: u128 = 1_000_000_000_000;

/// Default minimum balance for an account to be counted as an active
/// holder. Any nonzero balance qualifies until an operator raises it.
pub const DEFAULT_ELIGIBILITY_THRESHOLD: u128 = 1;

/// Read-only view of the underlying fungible share ledger.
///
/// Mutating operations on that ledger (mint/transfer/burn) must invoke
/// `DividendDistributor::on_balance_will_change` with pre-mutation
/// balances BEFORE the mutation becomes visible through `balance_of`.
/// `TokenLedger`/`DividendToken` in this crate implement that discipline;
/// external ledgers plugging in here carry the same obligation.
pub trait ShareLedger {
    /// Current share balance of `account` (0 for unknown accounts).
    fn balance_of(&self, account: &str) -> u128;
    /// Current total share supply.
    fn total_supply(&self) -> u128;
}

/// External value-transfer primitive used by withdrawals.
///
/// The core computes how much is owed; moving the settlement asset is
/// delegated here. A reported failure rolls the triggering withdrawal
/// back in full, so implementations must not partially pay.
pub trait ValueTransfer {
    fn pay(&mut self, account: &str, amount: u128) -> Result<(), String>;
}
