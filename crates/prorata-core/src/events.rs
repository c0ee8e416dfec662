// ─────────────────────────────────────────────────────────────────
// Observable events emitted by the distribution core.
//
// The distributor buffers events at commit points; a consumer drains
// them after each operation via `DividendDistributor::drain_events`.
// Events are emitted only after the state change they describe has
// fully committed — a rolled-back withdrawal emits nothing.
// ─────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::Address;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A deposit was recorded and attributed to current holders.
    DepositRecorded { depositor: Address, amount: u128 },
    /// A withdrawal committed and the external payment succeeded.
    WithdrawalCompleted { account: Address, amount: u128 },
    /// An account was administratively excluded from dividend accounting.
    AccountExcluded { account: Address },
    /// A previously excluded account was re-included.
    AccountIncluded { account: Address },
    /// The active-holder eligibility threshold changed.
    ThresholdUpdated { new_value: u128 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_roundtrip() {
        let events = vec![
            Event::DepositRecorded {
                depositor: "PRTdep".to_string(),
                amount: 100,
            },
            Event::WithdrawalCompleted {
                account: "PRTacc".to_string(),
                amount: 30,
            },
            Event::AccountExcluded {
                account: "PRTacc".to_string(),
            },
            Event::AccountIncluded {
                account: "PRTacc".to_string(),
            },
            Event::ThresholdUpdated { new_value: 500 },
        ];
        let json = serde_json::to_string(&events).unwrap();
        let back: Vec<Event> = serde_json::from_str(&json).unwrap();
        assert_eq!(events, back);
    }
}
