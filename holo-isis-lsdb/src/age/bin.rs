//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::packet::{LevelNumber, LspId};

// Identifies an LSP across both levels.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[derive(new)]
pub struct LspKey {
    pub level: LevelNumber,
    pub lsp_id: LspId,
}

// Set of LSPs that will reach MaxAge at the same aging tick.
#[derive(Clone, Debug, Default)]
pub struct LspBin {
    bin_number: u32,
    lsps: BTreeSet<LspKey>,
}

// ===== impl LspBin =====

impl LspBin {
    pub fn new(bin_number: u32) -> LspBin {
        LspBin {
            bin_number,
            lsps: Default::default(),
        }
    }

    pub fn bin_number(&self) -> u32 {
        self.bin_number
    }

    pub fn add_lsp(&mut self, key: LspKey) -> bool {
        self.lsps.insert(key)
    }

    pub fn remove_lsp(&mut self, key: &LspKey) -> bool {
        self.lsps.remove(key)
    }

    pub fn contains(&self, key: &LspKey) -> bool {
        self.lsps.contains(key)
    }

    pub fn lsps(&self) -> impl Iterator<Item = &LspKey> + '_ {
        self.lsps.iter()
    }

    pub fn len(&self) -> usize {
        self.lsps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lsps.is_empty()
    }
}
