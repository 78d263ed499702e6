//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod bin;

use std::collections::HashMap;

pub use bin::{LspBin, LspKey};

use crate::config::Config;
use crate::debug::Debug;
use crate::error::Error;
use crate::lsdb::LspMap;
use crate::packet::Levels;
use crate::wrapper::{LspProcessing, LspWrapper};

// LSDB aging state.
//
// Every LSP in the database sits in exactly one of `max_age` bins. The bin
// number is the value the age counter will have when the LSP reaches
// MaxAge, so each tick only needs to look at two bins: the one whose LSPs
// are due for a refresh and the one whose LSPs have just expired.
#[derive(Debug)]
pub struct LsdbAge {
    max_age: u32,
    refresh_interval: u32,
    age_counter: u32,
    age_counter_rollover: u32,
    bins: HashMap<u32, LspBin>,
}

// ===== impl LsdbAge =====

impl LsdbAge {
    pub fn new(config: &Config) -> LsdbAge {
        let max_age = config.max_age as u32;
        let mut age = LsdbAge {
            max_age,
            refresh_interval: config.refresh_interval as u32,
            age_counter: 0,
            age_counter_rollover: 0,
            bins: HashMap::with_capacity(max_age as usize),
        };
        for bin_number in 0..max_age {
            age.add_lsp_bin(bin_number, LspBin::new(bin_number));
        }
        age
    }

    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    pub fn refresh_interval(&self) -> u32 {
        self.refresh_interval
    }

    pub fn age_counter(&self) -> u32 {
        self.age_counter
    }

    pub fn age_counter_rollover(&self) -> u32 {
        self.age_counter_rollover
    }

    // Registers a bin unless one with the same number already exists.
    pub fn add_lsp_bin(&mut self, bin_number: u32, bin: LspBin) {
        self.bins.entry(bin_number).or_insert(bin);
    }

    pub fn get_lsp_bin(&self, bin_number: u32) -> Option<&LspBin> {
        self.bins.get(&bin_number)
    }

    // Converts an LSP age into the number of the bin holding it.
    //
    // When the age is greater than the counter, the LSP's arrival predates
    // the last counter wraparound.
    pub fn age2bin(&self, age: u32) -> u32 {
        let counter = self.age_counter as i64;
        let age = age as i64;
        let max_age = self.max_age as i64;

        let bin = if age <= counter {
            counter - age
        } else {
            (max_age - 1) + (counter - age)
        };

        // Only reachable with age == MaxAge and a zero counter.
        bin.rem_euclid(max_age) as u32
    }

    // Bin holding the LSPs whose refresh is due on this tick.
    pub fn refresh_bin(&self) -> u32 {
        (self.age_counter + self.refresh_interval) % self.max_age
    }

    // Bin holding the LSPs whose lifetime elapsed on the previous tick.
    pub fn max_age_bin(&self) -> u32 {
        (self.age_counter + self.max_age - 1) % self.max_age
    }

    // Places the wrapper into the bin matching its current age.
    pub(crate) fn add_lsp_to_bin(&mut self, wrapper: &mut LspWrapper) {
        let age = wrapper.current_age(self);
        let bin_number = self.age2bin(age);
        self.bins
            .entry(bin_number)
            .or_insert_with(|| LspBin::new(bin_number))
            .add_lsp(wrapper.key());
        wrapper.bin_number = Some(bin_number);
    }

    // Removes the wrapper from the bin it currently belongs to, if any.
    pub fn remove_lsp_from_bin(&mut self, wrapper: &mut LspWrapper) {
        let Some(bin_number) = wrapper.bin_number.take() else {
            return;
        };
        if let Some(bin) = self.bins.get_mut(&bin_number) {
            bin.remove_lsp(&wrapper.key());
        }
    }

    // Collects the self-originated LSPs due for a refresh.
    //
    // The collected wrappers are tagged and unlinked from their bin. They are
    // binned again once the refreshed instance is installed.
    pub(crate) fn refresh_lsa(
        &mut self,
        dbs: &mut Levels<LspMap>,
    ) -> Vec<LspWrapper> {
        let bin_number = self.refresh_bin();
        let mut refresh = vec![];

        for key in self.bin_keys(bin_number) {
            let Some(wrapper) = dbs.get_mut(key.level).get_mut(&key.lsp_id)
            else {
                self.unlink_orphan(bin_number, &key);
                continue;
            };
            if !wrapper.self_originated {
                continue;
            }

            wrapper.lsp_processing = Some(LspProcessing::Refresh);
            self.remove_lsp_from_bin(wrapper);
            Debug::LspAgingDispatch(wrapper, bin_number).log();
            refresh.push(wrapper.clone());
        }

        refresh
    }

    // Collects the LSPs that reached MaxAge.
    //
    // LSPs found in the bin that don't report MaxAge yet are left untouched;
    // they will be reconsidered the next time the bin comes around.
    pub(crate) fn max_age_lsa(
        &mut self,
        dbs: &mut Levels<LspMap>,
    ) -> Vec<LspWrapper> {
        let bin_number = self.max_age_bin();
        let mut expired = vec![];

        for key in self.bin_keys(bin_number) {
            let Some(wrapper) = dbs.get_mut(key.level).get_mut(&key.lsp_id)
            else {
                self.unlink_orphan(bin_number, &key);
                continue;
            };
            if wrapper.current_age(self) != self.max_age {
                continue;
            }

            wrapper.lsp_processing = Some(LspProcessing::MaxAge);
            self.remove_lsp_from_bin(wrapper);
            Debug::LspAgingDispatch(wrapper, bin_number).log();
            expired.push(wrapper.clone());
        }

        expired
    }

    // Advances the age counter by one tick, wrapping at MaxAge.
    pub(crate) fn advance(&mut self) {
        self.age_counter += 1;
        if self.age_counter >= self.max_age {
            self.age_counter = 0;
            self.age_counter_rollover =
                self.age_counter_rollover.wrapping_add(1);
        }
    }

    fn bin_keys(&self, bin_number: u32) -> Vec<LspKey> {
        self.bins
            .get(&bin_number)
            .map(|bin| bin.lsps().copied().collect())
            .unwrap_or_default()
    }

    // Drops a bin entry whose LSP no longer exists in the database.
    fn unlink_orphan(&mut self, bin_number: u32, key: &LspKey) {
        Error::BinEntryNotFound(bin_number, key.level, key.lsp_id).log();
        if let Some(bin) = self.bins.get_mut(&bin_number) {
            bin.remove_lsp(key);
        }
    }
}
