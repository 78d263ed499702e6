//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};

use crate::age::{LsdbAge, LspKey};
use crate::interface::InterfaceIndex;
use crate::packet::LevelNumber;
use crate::packet::pdu::Lsp;

// Action pending on an LSP handed over to the aging queue.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum LspProcessing {
    Refresh,
    MaxAge,
}

// LSDB entry: one LSP plus the bookkeeping needed to age it.
//
// The current age is never stored. It is derived from the age the LSP had
// on arrival and from how far the aging counter moved since then.
#[derive(Clone, Debug)]
pub struct LspWrapper {
    pub lsp: Lsp,
    pub level: LevelNumber,
    pub self_originated: bool,
    // Age of the LSP when it was accepted (MaxAge - Remaining Lifetime).
    pub lsp_age_received: u32,
    // Aging counter value when the LSP was accepted.
    pub age_counter_when_received: u32,
    // Number of aging counter rollovers when the LSP was accepted.
    pub age_counter_rollover_when_added: u32,
    // Aging bin currently holding the LSP.
    pub bin_number: Option<u32>,
    // Interface the LSP was received on or is transmitted over.
    pub ifindex: Option<InterfaceIndex>,
    pub lsp_processing: Option<LspProcessing>,
}

// ===== impl LspProcessing =====

impl std::fmt::Display for LspProcessing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LspProcessing::Refresh => write!(f, "refresh"),
            LspProcessing::MaxAge => write!(f, "max-age"),
        }
    }
}

// ===== impl LspWrapper =====

impl LspWrapper {
    // Creates a new wrapper, taking a snapshot of the aging clock.
    pub(crate) fn new(
        level: LevelNumber,
        lsp: Lsp,
        self_originated: bool,
        ifindex: Option<InterfaceIndex>,
        age: &LsdbAge,
    ) -> LspWrapper {
        let max_age = age.max_age();
        let lsp_age_received =
            max_age - std::cmp::min(lsp.rem_lifetime as u32, max_age);

        LspWrapper {
            lsp,
            level,
            self_originated,
            lsp_age_received,
            age_counter_when_received: age.age_counter(),
            age_counter_rollover_when_added: age.age_counter_rollover(),
            bin_number: None,
            ifindex,
            lsp_processing: None,
        }
    }

    pub fn key(&self) -> LspKey {
        LspKey::new(self.level, self.lsp.lsp_id)
    }

    // Computes the current LSP age.
    //
    // LSPs received from other systems are considered dead once the aging
    // counter rolled over without them being re-received. Self-originated
    // LSPs are exempt from that rule, since their refresh is driven locally.
    pub fn current_age(&self, age: &LsdbAge) -> u32 {
        let max_age = age.max_age();
        let counter = age.age_counter();
        let rollover = age.age_counter_rollover();
        let rollover_changed = self.age_counter_rollover_when_added != rollover;

        let current_age = if counter >= self.age_counter_when_received {
            if !self.self_originated && rollover_changed {
                return max_age;
            }
            self.lsp_age_received + (counter - self.age_counter_when_received)
        } else {
            self.lsp_age_received
                + (max_age + counter - self.age_counter_when_received)
        };

        if current_age >= max_age {
            return max_age;
        }

        // A whole cycle went by without the LSP being touched.
        if current_age == self.lsp_age_received && rollover_changed {
            return max_age;
        }

        current_age
    }

    pub fn remaining_lifetime(&self, age: &LsdbAge) -> u32 {
        age.max_age() - self.current_age(age)
    }
}
