// ─────────────────────────────────────────────────────────────────
// Error taxonomy for the distribution core.
//
// Three categories with different handling contracts:
//   CallerMisuse        — surfaced immediately, no state change, no retry
//   ArithmeticBounds    — invariant violation, fatal to the operation
//   ExternalDependency  — recoverable; the operation rolled back fully
// No error is ever swallowed: every failure aborts its operation with
// zero partial state mutation.
// ─────────────────────────────────────────────────────────────────

use thiserror::Error;

use crate::Address;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DividendError {
    /// Deposit against zero total share supply — nothing to attribute it to.
    #[error("cannot record deposit: total share supply is zero")]
    EmptyPool,

    /// Withdrawal requested with zero withdrawable remainder.
    #[error("nothing to withdraw for {0}")]
    NothingToWithdraw(Address),

    /// `exclude` on an account already excluded.
    #[error("account {0} is already excluded from dividends")]
    AlreadyExcluded(Address),

    /// `include` on an account that is not excluded.
    #[error("account {0} is not excluded from dividends")]
    NotExcluded(Address),

    /// `set_threshold` with the value already in effect.
    #[error("eligibility threshold is already {0}")]
    ThresholdUnchanged(u128),

    /// Debit exceeds the account's share balance (reference token ledger).
    #[error("insufficient balance for {account}: have {balance}, need {needed}")]
    InsufficientBalance {
        account: Address,
        balance: u128,
        needed: u128,
    },

    /// Checked u128/i128 arithmetic failed. The payload names the
    /// operation for diagnostics (e.g. "per_share_rate += delta").
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// The signed entitlement intermediate went negative. Cannot occur
    /// under correct hook discipline; indicates a stale correction term.
    #[error("negative entitlement intermediate for {0}: correction out of sync")]
    NegativeEntitlement(Address),

    /// An account has withdrawn more than its accumulated entitlement.
    /// Indicates a hook-discipline bug upstream.
    #[error(
        "accounting invariant violated for {account}: withdrawn {withdrawn} exceeds entitlement {entitlement}"
    )]
    AccountingInvariant {
        account: Address,
        withdrawn: u128,
        entitlement: u128,
    },

    /// The external value-transfer collaborator reported failure. The
    /// triggering withdrawal was rolled back; the caller may retry.
    #[error("payout transfer failed for {account}: {reason}")]
    PayoutTransfer { account: Address, reason: String },
}

/// Coarse error category, used by callers to pick a handling policy
/// without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    CallerMisuse,
    ArithmeticBounds,
    ExternalDependency,
}

impl DividendError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DividendError::EmptyPool
            | DividendError::NothingToWithdraw(_)
            | DividendError::AlreadyExcluded(_)
            | DividendError::NotExcluded(_)
            | DividendError::ThresholdUnchanged(_)
            | DividendError::InsufficientBalance { .. } => ErrorCategory::CallerMisuse,
            DividendError::Overflow(_)
            | DividendError::NegativeEntitlement(_)
            | DividendError::AccountingInvariant { .. } => ErrorCategory::ArithmeticBounds,
            DividendError::PayoutTransfer { .. } => ErrorCategory::ExternalDependency,
        }
    }

    /// True for the one recoverable category: the caller may retry the
    /// operation later without operator intervention.
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::ExternalDependency
    }
}
