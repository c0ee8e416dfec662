// ─────────────────────────────────────────────────────────────────
// Reference dividend-paying token.
//
// Composes the fungible share ledger with the distributor and enforces
// the hook discipline the `ShareLedger` contract demands: every
// balance mutation invokes the hook with pre-mutation balances (one
// call per affected side of a transfer) before the change becomes
// visible, then resyncs eligibility against the post-change balance.
// Administrative entry points assume the caller already passed the
// external authorization gate.
// ─────────────────────────────────────────────────────────────────

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::DistributorConfig;
use crate::distributor::DividendDistributor;
use crate::errors::DividendError;
use crate::events::Event;
use crate::math;
use crate::{Address, ShareLedger, ValueTransfer};

/// In-memory fungible share ledger.
/// BTreeMap guarantees deterministic iteration and serialization.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TokenLedger {
    pub accounts: BTreeMap<Address, u128>,
    pub total_supply: u128,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareLedger for TokenLedger {
    fn balance_of(&self, account: &str) -> u128 {
        self.accounts.get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }
}

/// Share ledger + dividend distributor, mutated in lock-step.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DividendToken {
    pub name: String,
    pub symbol: String,
    pub ledger: TokenLedger,
    pub distributor: DividendDistributor,
}

impl DividendToken {
    pub fn new(name: &str, symbol: &str, eligibility_threshold: u128) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            ledger: TokenLedger::new(),
            distributor: DividendDistributor::new(eligibility_threshold),
        }
    }

    pub fn from_config(config: &DistributorConfig) -> Self {
        Self::new(
            &config.token_name,
            &config.token_symbol,
            config.eligibility_threshold,
        )
    }

    // ─────────────────────────────────────────────────────────────────
    // Share ledger mutations (hook before, resync after)
    // ─────────────────────────────────────────────────────────────────

    /// Mint new shares to `to`.
    pub fn mint(&mut self, to: &str, amount: u128) -> Result<(), DividendError> {
        let new_balance =
            math::checked_add(self.ledger.balance_of(to), amount, "mint credit")?;
        let new_supply =
            math::checked_add(self.ledger.total_supply, amount, "mint supply")?;

        self.distributor.on_balance_will_change(to, new_balance)?;
        self.ledger.accounts.insert(to.to_string(), new_balance);
        self.ledger.total_supply = new_supply;
        self.distributor.resync_eligibility(to, new_balance);
        info!("mint: to={} amount={} supply={}", to, amount, new_supply);
        Ok(())
    }

    /// Transfer shares between accounts. The hook fires once per side
    /// with that side's own balances, never conflating the two.
    pub fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), DividendError> {
        let from_balance = self.ledger.balance_of(from);
        if from_balance < amount {
            return Err(DividendError::InsufficientBalance {
                account: from.to_string(),
                balance: from_balance,
                needed: amount,
            });
        }
        if from == to {
            // Self-transfer: balances end where they started.
            return Ok(());
        }
        let new_from = from_balance - amount;
        let new_to = math::checked_add(self.ledger.balance_of(to), amount, "transfer credit")?;

        self.distributor.on_balance_will_change(from, new_from)?;
        self.distributor.on_balance_will_change(to, new_to)?;
        self.ledger.accounts.insert(from.to_string(), new_from);
        self.ledger.accounts.insert(to.to_string(), new_to);
        self.distributor.resync_eligibility(from, new_from);
        self.distributor.resync_eligibility(to, new_to);
        info!("transfer: from={} to={} amount={}", from, to, amount);
        Ok(())
    }

    /// Burn shares from `from`, shrinking total supply.
    pub fn burn(&mut self, from: &str, amount: u128) -> Result<(), DividendError> {
        let balance = self.ledger.balance_of(from);
        if balance < amount {
            return Err(DividendError::InsufficientBalance {
                account: from.to_string(),
                balance,
                needed: amount,
            });
        }
        let new_balance = balance - amount;
        let new_supply =
            math::checked_sub(self.ledger.total_supply, amount, "burn supply")?;

        self.distributor.on_balance_will_change(from, new_balance)?;
        self.ledger.accounts.insert(from.to_string(), new_balance);
        self.ledger.total_supply = new_supply;
        self.distributor.resync_eligibility(from, new_balance);
        info!("burn: from={} amount={} supply={}", from, amount, new_supply);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────
    // Distribution passthroughs
    // ─────────────────────────────────────────────────────────────────

    /// Record an incoming value deposit against the current supply.
    pub fn deposit(&mut self, depositor: &str, amount: u128) -> Result<(), DividendError> {
        self.distributor
            .record_deposit(depositor, amount, self.ledger.total_supply)
    }

    /// Withdraw `account`'s full withdrawable remainder via `payer`.
    pub fn withdraw(
        &mut self,
        payer: &mut impl ValueTransfer,
        account: &str,
    ) -> Result<u128, DividendError> {
        self.distributor.withdraw(payer, account)
    }

    pub fn withdrawable_of(&self, account: &str) -> Result<u128, DividendError> {
        self.distributor.withdrawable_of(account)
    }

    pub fn accumulated_entitlement(&self, account: &str) -> Result<u128, DividendError> {
        self.distributor.accumulated_entitlement(account)
    }

    // ─────────────────────────────────────────────────────────────────
    // Administration (caller assumed authorized)
    // ─────────────────────────────────────────────────────────────────

    pub fn exclude(&mut self, account: &str) -> Result<(), DividendError> {
        self.distributor.exclude(account)
    }

    pub fn include(&mut self, account: &str) -> Result<(), DividendError> {
        let balance = self.ledger.balance_of(account);
        self.distributor.include(account, balance)
    }

    pub fn set_threshold(&mut self, new_value: u128) -> Result<(), DividendError> {
        self.distributor.set_threshold(&self.ledger, new_value)
    }

    // ─────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────

    pub fn balance_of(&self, account: &str) -> u128 {
        self.ledger.balance_of(account)
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.distributor.drain_events()
    }
}
