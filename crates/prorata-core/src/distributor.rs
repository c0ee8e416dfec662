// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PRORATA - DIVIDEND DISTRIBUTOR
//
// The accounting kernel: a single magnified per-share accumulator plus a
// signed per-holder correction term. Recording a deposit and querying an
// entitlement are both O(1); the only O(n) operation is an administrative
// threshold change, bounded by the number of tracked holders.
//
// Correction discipline: every change to a holder's dividend-effective
// balance passes through `sync_holder`, which adds
// `per_share_rate * (old_effective - new_effective)` to the correction.
// This locks in the entitlement accrued under the old balance, so the
// global accumulator can keep moving without retroactively re-pricing
// past deposits. Exclusion drops the effective balance to zero (freezing
// entitlement); re-inclusion leaves it at zero until the next balance
// change re-engages accrual.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::DividendError;
use crate::events::Event;
use crate::math;
use crate::{Address, ShareLedger, ValueTransfer, DEFAULT_ELIGIBILITY_THRESHOLD, MAGNITUDE};

/// Per-holder dividend accounting state.
///
/// Created implicitly on first balance-affecting interaction and never
/// deleted — historical entitlement must stay computable at zero balance.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HolderRecord {
    /// Cumulative value already paid out. Monotonically non-decreasing.
    pub withdrawn: u128,
    /// Signed additive adjustment neutralizing the accumulator's effect
    /// on this holder's pre-sync balance history.
    pub correction: i128,
    /// Dividend-effective balance at the last sync. Equals the ledger
    /// balance for included holders at every quiescent point; zero while
    /// excluded (and after re-inclusion, until the next balance change).
    pub tracked_balance: u128,
    /// Administratively opted out of all dividend accounting.
    pub excluded: bool,
}

/// Global distribution state.
/// MAINNET-style determinism: BTreeMap/BTreeSet for stable iteration
/// and serialization (same convention as the share ledger).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DividendDistributor {
    /// Cumulative value per share since genesis, scaled by `MAGNITUDE`.
    pub per_share_rate: u128,
    /// Lifetime sum of all recorded deposits.
    pub total_distributed: u128,
    /// Lifetime sum of all completed payouts.
    pub total_withdrawn: u128,
    /// Minimum balance for active-holder eligibility. Mutable.
    pub eligibility_threshold: u128,
    /// Per-holder accounting records, keyed by address.
    pub holders: BTreeMap<Address, HolderRecord>,
    /// Observational active-holder set. Does not gate entitlement —
    /// only the externally reported holder count.
    pub eligible: BTreeSet<Address>,
    /// Events pending consumption, appended at commit points.
    #[serde(skip)]
    events: Vec<Event>,
}

impl Default for DividendDistributor {
    fn default() -> Self {
        Self::new(DEFAULT_ELIGIBILITY_THRESHOLD)
    }
}

impl DividendDistributor {
    pub fn new(eligibility_threshold: u128) -> Self {
        Self {
            per_share_rate: 0,
            total_distributed: 0,
            total_withdrawn: 0,
            eligibility_threshold,
            holders: BTreeMap::new(),
            eligible: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────
    // Dividend accumulator
    // ─────────────────────────────────────────────────────────────────

    /// Record an incoming deposit against the current total share supply.
    ///
    /// Fails with `EmptyPool` if `total_shares == 0`. A zero-amount
    /// deposit succeeds without moving any state (explicit early exit,
    /// not an error). Floor division leaves up to `total_shares - 1`
    /// scaled units per deposit as unattributable dust retained by the
    /// pool — never an over-payment.
    pub fn record_deposit(
        &mut self,
        depositor: &str,
        amount: u128,
        total_shares: u128,
    ) -> Result<(), DividendError> {
        if total_shares == 0 {
            return Err(DividendError::EmptyPool);
        }
        if amount == 0 {
            return Ok(());
        }

        let delta = math::checked_mul(amount, MAGNITUDE, "deposit amount * MAGNITUDE")?
            / total_shares;
        // Validate both additions before committing either.
        let new_rate = math::checked_add(self.per_share_rate, delta, "per_share_rate += delta")?;
        let new_total =
            math::checked_add(self.total_distributed, amount, "total_distributed += amount")?;

        self.per_share_rate = new_rate;
        self.total_distributed = new_total;
        self.events.push(Event::DepositRecorded {
            depositor: depositor.to_string(),
            amount,
        });
        info!(
            "deposit recorded: depositor={} amount={} total_shares={} per_share_rate={}",
            depositor, amount, total_shares, self.per_share_rate
        );
        Ok(())
    }

    /// Lifetime proportional entitlement of `account`, in value units.
    ///
    /// `floor((per_share_rate * effective_balance + correction) / MAGNITUDE)`,
    /// computed in the widened signed domain. O(1), pure; calling twice
    /// with no intervening state change returns the same value.
    pub fn accumulated_entitlement(&self, account: &str) -> Result<u128, DividendError> {
        let (tracked, correction) = match self.holders.get(account) {
            Some(rec) => (rec.tracked_balance, rec.correction),
            None => return Ok(0),
        };
        let scaled = math::widen_signed(
            math::checked_mul(self.per_share_rate, tracked, "per_share_rate * balance")?,
            "widen per_share_rate * balance",
        )?;
        let signed_total =
            math::checked_add_signed(scaled, correction, "scaled balance + correction")?;
        if signed_total < 0 {
            return Err(DividendError::NegativeEntitlement(account.to_string()));
        }
        Ok(math::narrow_unsigned(signed_total, "narrow entitlement")? / MAGNITUDE)
    }

    // ─────────────────────────────────────────────────────────────────
    // Balance-change hook
    // ─────────────────────────────────────────────────────────────────

    /// Balance-change hook. Must be invoked BEFORE the underlying ledger
    /// applies the mutation, once per affected account with that
    /// account's own post-mutation balance (for a transfer: once for the
    /// sender, once for the receiver — never conflated).
    ///
    /// Locks in the entitlement accrued under the old balance by folding
    /// `per_share_rate * (old - new)` into the correction term, so the
    /// lifetime-proportional share stays exact across arbitrary balance
    /// histories. Never moves value.
    pub fn on_balance_will_change(
        &mut self,
        account: &str,
        new_balance: u128,
    ) -> Result<(), DividendError> {
        self.sync_holder(account, new_balance)
    }

    /// The single correction-sync choke-point. `new_balance` is the
    /// ledger balance the account is about to have; while excluded the
    /// effective balance is pinned to zero, so the sync is a no-op and
    /// entitlement stays frozen.
    fn sync_holder(&mut self, account: &str, new_balance: u128) -> Result<(), DividendError> {
        let rate = self.per_share_rate;
        let rec = self.holders.entry(account.to_string()).or_default();
        let new_effective = if rec.excluded { 0 } else { new_balance };
        if new_effective == rec.tracked_balance {
            return Ok(());
        }
        let old_scaled = math::widen_signed(
            math::checked_mul(rate, rec.tracked_balance, "rate * old balance")?,
            "widen rate * old balance",
        )?;
        let new_scaled = math::widen_signed(
            math::checked_mul(rate, new_effective, "rate * new balance")?,
            "widen rate * new balance",
        )?;
        // Both operands are non-negative i128, so the difference cannot wrap.
        let new_correction =
            math::checked_add_signed(rec.correction, old_scaled - new_scaled, "correction sync")?;
        rec.correction = new_correction;
        rec.tracked_balance = new_effective;
        Ok(())
    }

    /// Membership resync: member iff
    /// `balance >= threshold && !excluded`. Called from every trigger
    /// that can change the predicate (post-mutation balance updates,
    /// exclusion toggles, threshold changes).
    pub fn resync_eligibility(&mut self, account: &str, balance: u128) {
        let excluded = self
            .holders
            .get(account)
            .map(|rec| rec.excluded)
            .unwrap_or(false);
        if !excluded && balance >= self.eligibility_threshold {
            self.eligible.insert(account.to_string());
        } else {
            self.eligible.remove(account);
        }
    }

    // ─────────────────────────────────────────────────────────────────
    // Withdrawal ledger
    // ─────────────────────────────────────────────────────────────────

    /// Still-withdrawable remainder: entitlement minus already-withdrawn.
    /// A negative remainder reports `AccountingInvariant`; correct hook
    /// discipline guarantees this never triggers.
    pub fn withdrawable_of(&self, account: &str) -> Result<u128, DividendError> {
        let entitlement = self.accumulated_entitlement(account)?;
        let withdrawn = self
            .holders
            .get(account)
            .map(|rec| rec.withdrawn)
            .unwrap_or(0);
        if withdrawn > entitlement {
            return Err(DividendError::AccountingInvariant {
                account: account.to_string(),
                withdrawn,
                entitlement,
            });
        }
        Ok(entitlement - withdrawn)
    }

    /// Withdraw the full withdrawable remainder for `account`.
    ///
    /// Commit-then-pay: the withdrawal counters are updated BEFORE the
    /// external transfer so a re-entrant call during payment sees zero
    /// withdrawable. If the payer reports failure, both counters are
    /// rolled back and the operation fails with `PayoutTransfer` —
    /// the two steps form one atomic unit.
    pub fn withdraw(
        &mut self,
        payer: &mut impl ValueTransfer,
        account: &str,
    ) -> Result<u128, DividendError> {
        let amount = self.withdrawable_of(account)?;
        if amount == 0 {
            return Err(DividendError::NothingToWithdraw(account.to_string()));
        }

        let prior_withdrawn = self
            .holders
            .get(account)
            .map(|rec| rec.withdrawn)
            .unwrap_or(0);
        let new_withdrawn =
            math::checked_add(prior_withdrawn, amount, "withdrawn += amount")?;
        let prior_total = self.total_withdrawn;
        let new_total = math::checked_add(prior_total, amount, "total_withdrawn += amount")?;

        // Commit first (closes the re-entrancy window), then pay.
        self.holders.entry(account.to_string()).or_default().withdrawn = new_withdrawn;
        self.total_withdrawn = new_total;

        if let Err(reason) = payer.pay(account, amount) {
            // Failed external payment: revert the commit in full.
            if let Some(rec) = self.holders.get_mut(account) {
                rec.withdrawn = prior_withdrawn;
            }
            self.total_withdrawn = prior_total;
            warn!(
                "payout failed, withdrawal rolled back: account={} amount={} reason={}",
                account, amount, reason
            );
            return Err(DividendError::PayoutTransfer {
                account: account.to_string(),
                reason,
            });
        }

        self.events.push(Event::WithdrawalCompleted {
            account: account.to_string(),
            amount,
        });
        info!("withdrawal completed: account={} amount={}", account, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────────────
    // Holder eligibility administration
    // ─────────────────────────────────────────────────────────────────

    /// Administratively exclude `account` from dividend accounting.
    /// Forces a correction sync (locking in entitlement accrued so far)
    /// and unconditionally removes the account from the eligible set.
    /// Assumes the caller already passed the external authorization gate.
    pub fn exclude(&mut self, account: &str) -> Result<(), DividendError> {
        if self
            .holders
            .get(account)
            .map(|rec| rec.excluded)
            .unwrap_or(false)
        {
            return Err(DividendError::AlreadyExcluded(account.to_string()));
        }
        // Effective balance drops to zero: one last sync freezes the
        // entitlement, then the flag pins it there.
        self.sync_holder(account, 0)?;
        self.holders
            .entry(account.to_string())
            .or_default()
            .excluded = true;
        self.eligible.remove(account);
        self.events.push(Event::AccountExcluded {
            account: account.to_string(),
        });
        info!("account excluded from dividends: {}", account);
        Ok(())
    }

    /// Re-include a previously excluded account. Re-evaluates eligibility
    /// against the current ledger balance but does NOT re-sync the
    /// correction: the correction was already current at exclusion time
    /// and every hook in between was a frozen no-op, so entitlement stays
    /// exactly where exclusion left it until the next balance change.
    pub fn include(&mut self, account: &str, balance: u128) -> Result<(), DividendError> {
        match self.holders.get_mut(account) {
            Some(rec) if rec.excluded => rec.excluded = false,
            _ => return Err(DividendError::NotExcluded(account.to_string())),
        }
        self.resync_eligibility(account, balance);
        self.events.push(Event::AccountIncluded {
            account: account.to_string(),
        });
        info!("account re-included in dividends: {}", account);
        Ok(())
    }

    /// Update the active-holder threshold and re-evaluate every tracked,
    /// non-excluded account against it. Fails with `ThresholdUnchanged`
    /// when the value is already in effect. This is the system's sole
    /// O(n) administrative hot spot, bounded by tracked-holder count.
    pub fn set_threshold(
        &mut self,
        ledger: &impl ShareLedger,
        new_value: u128,
    ) -> Result<(), DividendError> {
        if new_value == self.eligibility_threshold {
            return Err(DividendError::ThresholdUnchanged(new_value));
        }
        self.eligibility_threshold = new_value;

        let tracked: Vec<Address> = self.holders.keys().cloned().collect();
        for account in tracked {
            let balance = ledger.balance_of(&account);
            self.resync_eligibility(&account, balance);
        }
        self.events.push(Event::ThresholdUpdated { new_value });
        info!("eligibility threshold updated: {}", new_value);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────
    // Reporting
    // ─────────────────────────────────────────────────────────────────

    /// Number of active holders (balance >= threshold, not excluded).
    pub fn eligible_count(&self) -> usize {
        self.eligible.len()
    }

    pub fn is_eligible_holder(&self, account: &str) -> bool {
        self.eligible.contains(account)
    }

    /// Deposited value not yet paid out (includes rounding dust).
    pub fn outstanding(&self) -> u128 {
        self.total_distributed.saturating_sub(self.total_withdrawn)
    }

    /// Drain the buffered events since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn summary(&self) -> DistributorSummary {
        DistributorSummary {
            per_share_rate: self.per_share_rate,
            total_distributed: self.total_distributed,
            total_withdrawn: self.total_withdrawn,
            outstanding: self.outstanding(),
            eligibility_threshold: self.eligibility_threshold,
            tracked_holders: self.holders.len() as u64,
            eligible_holders: self.eligible.len() as u64,
        }
    }

    /// Accounting invariant audit (diagnostic — a correctly functioning
    /// system always passes):
    ///   - total_withdrawn <= total_distributed
    ///   - per-holder withdrawn sums to total_withdrawn
    ///   - entitlement >= withdrawn for every holder
    pub fn audit(&self) -> Result<(), String> {
        if self.total_withdrawn > self.total_distributed {
            return Err(format!(
                "audit FAILED: total_withdrawn {} > total_distributed {}",
                self.total_withdrawn, self.total_distributed
            ));
        }
        let withdrawn_sum: u128 = self.holders.values().map(|rec| rec.withdrawn).sum();
        if withdrawn_sum != self.total_withdrawn {
            return Err(format!(
                "audit FAILED: per-holder withdrawn sum {} != total_withdrawn {}",
                withdrawn_sum, self.total_withdrawn
            ));
        }
        for (account, rec) in &self.holders {
            let entitlement = self
                .accumulated_entitlement(account)
                .map_err(|e| format!("audit FAILED: entitlement for {}: {}", account, e))?;
            if rec.withdrawn > entitlement {
                return Err(format!(
                    "audit FAILED: {} withdrawn {} > entitlement {}",
                    account, rec.withdrawn, entitlement
                ));
            }
        }
        Ok(())
    }
}

/// Serializable summary of distributor state (for reporting endpoints).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DistributorSummary {
    pub per_share_rate: u128,
    pub total_distributed: u128,
    pub total_withdrawn: u128,
    pub outstanding: u128,
    pub eligibility_threshold: u128,
    pub tracked_holders: u64,
    pub eligible_holders: u64,
}
