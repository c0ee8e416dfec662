//! Fuzz target: dividend accounting under arbitrary operation sequences
//!
//! Drives the full dividend token through arbitrary interleavings of
//! mint/transfer/burn/deposit/withdraw/exclude/include/set_threshold and
//! asserts the accounting invariants after every step:
//! 1. No panics on any sequence (errors are fine, panics are not)
//! 2. total_withdrawn never exceeds total_distributed
//! 3. The internal audit passes at every quiescent point
//!
//! Run: cargo +nightly fuzz run fuzz_distributor_ops

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use prorata_core::{DividendToken, ValueTransfer};

const HOLDERS: [&str; 4] = ["PRTa", "PRTb", "PRTc", "PRTd"];

#[derive(Arbitrary, Debug)]
enum Op {
    Mint { holder: u8, amount: u32 },
    Transfer { from: u8, to: u8, amount: u32 },
    Burn { holder: u8, amount: u32 },
    Deposit { amount: u32 },
    Withdraw { holder: u8 },
    Exclude { holder: u8 },
    Include { holder: u8 },
    SetThreshold { value: u32 },
}

struct SinkBank {
    paid: u128,
}

impl ValueTransfer for SinkBank {
    fn pay(&mut self, _account: &str, amount: u128) -> Result<(), String> {
        self.paid += amount;
        Ok(())
    }
}

fn holder(index: u8) -> &'static str {
    HOLDERS[index as usize % HOLDERS.len()]
}

fuzz_target!(|ops: Vec<Op>| {
    // bound the sequence so rate/correction magnitudes stay in range
    if ops.len() > 64 {
        return;
    }

    let mut tok = DividendToken::new("Prorata", "PRT", 1);
    let mut bank = SinkBank { paid: 0 };

    for op in &ops {
        // every rejection is a legal outcome; every panic is a bug
        match op {
            Op::Mint { holder: h, amount } => {
                let _ = tok.mint(holder(*h), *amount as u128);
            }
            Op::Transfer { from, to, amount } => {
                let _ = tok.transfer(holder(*from), holder(*to), *amount as u128);
            }
            Op::Burn { holder: h, amount } => {
                let _ = tok.burn(holder(*h), *amount as u128);
            }
            Op::Deposit { amount } => {
                let _ = tok.deposit("PRTtreasury", *amount as u128);
            }
            Op::Withdraw { holder: h } => {
                let _ = tok.withdraw(&mut bank, holder(*h));
            }
            Op::Exclude { holder: h } => {
                let _ = tok.exclude(holder(*h));
            }
            Op::Include { holder: h } => {
                let _ = tok.include(holder(*h));
            }
            Op::SetThreshold { value } => {
                let _ = tok.set_threshold(*value as u128);
            }
        }

        assert!(
            tok.distributor.total_withdrawn <= tok.distributor.total_distributed,
            "paid out more than was ever deposited"
        );
    }

    assert_eq!(bank.paid, tok.distributor.total_withdrawn);
    if let Err(report) = tok.distributor.audit() {
        panic!("{}", report);
    }
});
