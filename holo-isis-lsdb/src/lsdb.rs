//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, Sender};

use crate::age::{LsdbAge, LspBin};
use crate::config::Config;
use crate::debug::Debug;
use crate::error::{ConfigError, Error};
use crate::events;
use crate::interface::{InterfaceIndex, InterfaceRegistry};
use crate::packet::consts::PduType;
use crate::packet::pdu::Lsp;
use crate::packet::{LevelNumber, Levels, LspId, SystemId};
use crate::task::{IntervalTask, Task};
use crate::tasks;
use crate::tasks::messages::{LspAgingMsg, TopologyMsg};
use crate::topology::TopologyEvent;
use crate::wrapper::LspWrapper;

// Per-level LSP database.
pub type LspMap = BTreeMap<LspId, LspWrapper>;

// Outcome of comparing a received LSP against the stored instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum LspFreshness {
    Latest,
    Old,
    Same,
}

// Summary of an LSP, as advertised in CSNPs.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LspHeader {
    pub lsp_id: LspId,
    pub seqno: u32,
    pub cksum: u16,
    pub rem_lifetime: u16,
}

// Link-state database handle.
//
// Handles are cheap to clone and share the same underlying database. The
// per-level maps and the aging bins sit behind a single lock, so moving an
// LSP between bins and updating its map entry is one atomic step.
#[derive(Clone, Debug)]
pub struct Lsdb {
    config: Arc<Config>,
    state: Arc<Mutex<LsdbState>>,
    topology_tx: Sender<TopologyMsg>,
    aging: Arc<Mutex<Option<AgingTasks>>>,
}

#[derive(Debug)]
pub struct LsdbState {
    pub dbs: Levels<LspMap>,
    pub age: LsdbAge,
    // Next sequence number to hand out, per level.
    pub seqno: Levels<u32>,
}

#[derive(Debug)]
struct AgingTasks {
    ticker: IntervalTask,
    consumer: Task<()>,
}

// ===== impl Lsdb =====

impl Lsdb {
    pub fn new(
        config: Config,
        topology_tx: Sender<TopologyMsg>,
    ) -> Result<Lsdb, ConfigError> {
        config.validate()?;

        let state = LsdbState {
            dbs: Default::default(),
            age: LsdbAge::new(&config),
            seqno: Levels {
                l1: config.init_seqno,
                l2: config.init_seqno,
            },
        };

        Ok(Lsdb {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(state)),
            topology_tx,
            aging: Default::default(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn age_counter(&self) -> u32 {
        self.state().age.age_counter()
    }

    pub fn age_counter_rollover(&self) -> u32 {
        self.state().age.age_counter_rollover()
    }

    // Looks up an LSP, refreshing its Remaining Lifetime field on the way.
    pub fn find_lsp(
        &self,
        pdu_type: PduType,
        lsp_id: &LspId,
    ) -> Option<LspWrapper> {
        let level = lsp_level(pdu_type)?;

        let mut state = self.state();
        let state = &mut *state;
        let wrapper = state.dbs.get_mut(level).get_mut(lsp_id)?;
        let rem_lifetime = wrapper.remaining_lifetime(&state.age);
        wrapper.lsp.set_rem_lifetime(rem_lifetime as u16);
        Some(wrapper.clone())
    }

    // Installs an LSP, replacing any previous instance with the same LSP ID.
    //
    // LSPs learned from other systems are announced on the topology queue.
    // Returns false only when the PDU isn't an LSP.
    pub async fn add_lsp(
        &self,
        mut lsp: Lsp,
        self_originated: bool,
        ifindex: Option<InterfaceIndex>,
    ) -> bool {
        let Some(level) = lsp_level(lsp.pdu_type) else {
            return false;
        };

        // Update the PDU length and checksum of locally built LSPs.
        if self_originated {
            lsp.encode();
        }

        let notification =
            self.state().install(level, lsp, self_originated, ifindex);

        if let Some(wrapper) = notification {
            self.notify_topology(wrapper, TopologyEvent::Added).await;
        }

        true
    }

    // Removes an LSP from the database. Unknown LSPs are ignored.
    pub async fn delete_lsp(&self, lsp: &Lsp) {
        let Some(level) = lsp_level(lsp.pdu_type) else {
            return;
        };

        self.remove_lsp(level, &lsp.lsp_id, |_| true).await;
    }

    // Returns the next sequence number for a self-originated LSP.
    pub fn ls_sequence_number(&self, level: LevelNumber) -> u32 {
        let mut state = self.state();
        let next = state.seqno.get_mut(level);
        let seqno = *next;
        match next.checked_add(1) {
            Some(following) => *next = following,
            // The last sequence number keeps being handed out.
            None => Error::SeqnoExhausted(level).log(),
        }
        seqno
    }

    // Makes the level's sequence number generator continue after `seqno`.
    pub fn set_ls_sequence_number(&self, level: LevelNumber, seqno: u32) {
        let mut state = self.state();
        let next = state.seqno.get_mut(level);
        *next = std::cmp::max(*next, seqno.saturating_add(1));
    }

    // Returns the headers of all LSPs of the given level, with their
    // remaining lifetime as of now.
    pub fn all_lsp_headers(
        &self,
        level: LevelNumber,
        exclude_max_age: bool,
    ) -> Vec<LspHeader> {
        let state = self.state();
        state
            .dbs
            .get(level)
            .values()
            .filter_map(|wrapper| {
                let rem_lifetime = wrapper.remaining_lifetime(&state.age);
                if exclude_max_age && rem_lifetime == 0 {
                    return None;
                }
                Some(LspHeader {
                    lsp_id: wrapper.lsp.lsp_id,
                    seqno: wrapper.lsp.seqno,
                    cksum: wrapper.lsp.cksum,
                    rem_lifetime: rem_lifetime as u16,
                })
            })
            .collect()
    }

    pub fn lsps(&self, level: LevelNumber) -> Vec<LspWrapper> {
        self.state().dbs.get(level).values().cloned().collect()
    }

    pub fn lsp_count(&self, level: LevelNumber) -> usize {
        self.state().dbs.get(level).len()
    }

    // Returns the current age of an LSP.
    pub fn lsp_age(&self, level: LevelNumber, lsp_id: &LspId) -> Option<u32> {
        let state = self.state();
        state
            .dbs
            .get(level)
            .get(lsp_id)
            .map(|wrapper| wrapper.current_age(&state.age))
    }

    // Returns the bin an LSP of the given age would be placed in.
    pub fn age2bin(&self, age: u32) -> u32 {
        self.state().age.age2bin(age)
    }

    pub fn lsp_bin(&self, bin_number: u32) -> Option<LspBin> {
        self.state().age.get_lsp_bin(bin_number).cloned()
    }

    // Runs one aging tick.
    //
    // Refresh candidates are always dispatched before max-age candidates,
    // and the age counter only advances once both are queued.
    pub async fn age_lsp(&self, aging_tx: &Sender<LspAgingMsg>) {
        let refresh = {
            let mut state = self.state();
            let state = &mut *state;
            state.age.refresh_lsa(&mut state.dbs)
        };
        if !dispatch(aging_tx, refresh).await {
            return;
        }

        let expired = {
            let mut state = self.state();
            let state = &mut *state;
            state.age.max_age_lsa(&mut state.dbs)
        };
        if !dispatch(aging_tx, expired).await {
            return;
        }

        self.state().age.advance();
    }

    // Starts the aging ticker and the aging queue consumer. Calling this
    // again while aging is running has no effect.
    pub fn start_db_aging(&self, interfaces: Arc<dyn InterfaceRegistry>) {
        let mut aging = self.aging.lock().unwrap();
        if aging.is_some() {
            return;
        }

        Debug::AgingStart.log();
        let (aging_tx, aging_rx) = mpsc::channel(self.config.queue_capacity);
        let ticker = tasks::aging_ticker(self, aging_tx);
        let consumer = tasks::aging_consumer(self, interfaces, aging_rx);
        *aging = Some(AgingTasks { ticker, consumer });
    }

    // Stops the aging ticker between two ticks, then waits for the aging
    // queue to be drained.
    pub async fn stop_db_aging(&self) {
        let Some(aging) = self.aging.lock().unwrap().take() else {
            return;
        };

        Debug::AgingStop.log();
        if let Err(error) = aging.ticker.stop().await {
            Error::TaskFailure("aging ticker", error).log();
        }
        if let Err(error) = aging.consumer.await {
            Error::TaskFailure("aging consumer", error).log();
        }
    }

    pub fn is_aging_running(&self) -> bool {
        self.aging.lock().unwrap().is_some()
    }

    // Carries out the action an aging queue message was tagged with.
    //
    // This is what the aging consumer task runs for every message. It's
    // exposed for embedders that drive the aging queue themselves.
    pub async fn process_aging_msg(
        &self,
        interfaces: &dyn InterfaceRegistry,
        msg: LspAgingMsg,
    ) -> Result<(), Error> {
        events::process_lsp_aging(self, interfaces, msg).await
    }

    // Checks whether an LSP taken off the aging queue is still the instance
    // in the database, waiting for the same action.
    pub(crate) fn is_aging_pending(&self, queued: &LspWrapper) -> bool {
        self.state().is_aging_pending(queued)
    }

    // Installs the refreshed instance of a self-originated LSP, unless a new
    // instance replaced the queued one in the meantime.
    pub(crate) fn install_refreshed(
        &self,
        queued: &LspWrapper,
        lsp: Lsp,
        ifindex: InterfaceIndex,
    ) -> bool {
        let mut state = self.state();
        if !state.is_aging_pending(queued) {
            return false;
        }
        state.install(queued.level, lsp, true, Some(ifindex));
        true
    }

    // Puts an LSP whose refresh failed back into the aging bins, so that the
    // refresh is attempted again the next time its bin comes around.
    pub(crate) fn rebin_failed_refresh(&self, queued: &LspWrapper) {
        let mut state = self.state();
        if !state.is_aging_pending(queued) {
            return;
        }

        let state = &mut *state;
        let lsdb = state.dbs.get_mut(queued.level);
        if let Some(stored) = lsdb.get_mut(&queued.lsp.lsp_id) {
            stored.lsp_processing = None;
            state.age.add_lsp_to_bin(stored);
        }
    }

    // Deletes an LSP that reached MaxAge, unless a new instance replaced it
    // after it was queued.
    pub(crate) async fn remove_expired(&self, queued: &LspWrapper) -> bool {
        self.remove_lsp(queued.level, &queued.lsp.lsp_id, |stored| {
            aging_pending(stored, queued)
        })
        .await
    }

    async fn remove_lsp<F>(
        &self,
        level: LevelNumber,
        lsp_id: &LspId,
        filter: F,
    ) -> bool
    where
        F: FnOnce(&LspWrapper) -> bool + Send,
    {
        let wrapper = {
            let mut state = self.state();
            let state = &mut *state;
            let lsdb = state.dbs.get_mut(level);

            if !lsdb.get(lsp_id).is_some_and(filter) {
                return false;
            }
            let Some(mut wrapper) = lsdb.remove(lsp_id) else {
                return false;
            };
            state.age.remove_lsp_from_bin(&mut wrapper);
            Debug::LspDelete(level, &wrapper.lsp).log();
            wrapper
        };

        self.notify_topology(wrapper, TopologyEvent::Removed).await;
        true
    }

    async fn notify_topology(&self, wrapper: LspWrapper, event: TopologyEvent) {
        let msg = TopologyMsg { wrapper, event };
        if self.topology_tx.send(msg).await.is_err() {
            Error::QueueClosed("topology").log();
        }
    }

    fn state(&self) -> MutexGuard<'_, LsdbState> {
        self.state.lock().unwrap()
    }
}

// ===== impl LsdbState =====

impl LsdbState {
    // Replaces any previous instance of the LSP and bins the new one.
    //
    // Returns a copy of the installed entry when it has to be announced on
    // the topology queue.
    fn install(
        &mut self,
        level: LevelNumber,
        lsp: Lsp,
        self_originated: bool,
        ifindex: Option<InterfaceIndex>,
    ) -> Option<LspWrapper> {
        let lsdb = self.dbs.get_mut(level);

        // Unlink the previous instance from its aging bin.
        if let Some(mut old) = lsdb.remove(&lsp.lsp_id) {
            self.age.remove_lsp_from_bin(&mut old);
        }

        let mut wrapper =
            LspWrapper::new(level, lsp, self_originated, ifindex, &self.age);
        self.age.add_lsp_to_bin(&mut wrapper);
        Debug::LspInstall(&wrapper).log();

        let notification = (!self_originated).then(|| wrapper.clone());
        lsdb.insert(wrapper.lsp.lsp_id, wrapper);
        notification
    }

    fn is_aging_pending(&self, queued: &LspWrapper) -> bool {
        self.dbs
            .get(queued.level)
            .get(&queued.lsp.lsp_id)
            .is_some_and(|stored| aging_pending(stored, queued))
    }
}

// ===== helper functions =====

// Maps an LSP PDU type to its level.
fn lsp_level(pdu_type: PduType) -> Option<LevelNumber> {
    match pdu_type {
        PduType::LspL1 => Some(LevelNumber::L1),
        PduType::LspL2 => Some(LevelNumber::L2),
        _ => {
            Error::UnknownPduType(pdu_type).log();
            None
        }
    }
}

fn aging_pending(stored: &LspWrapper, queued: &LspWrapper) -> bool {
    stored.bin_number.is_none()
        && stored.lsp.seqno == queued.lsp.seqno
        && stored.lsp_processing == queued.lsp_processing
}

// Pushes LSPs onto the aging queue, waiting for room when it's full.
async fn dispatch(
    aging_tx: &Sender<LspAgingMsg>,
    wrappers: Vec<LspWrapper>,
) -> bool {
    for wrapper in wrappers {
        if aging_tx.send(LspAgingMsg { wrapper }).await.is_err() {
            Error::QueueClosed("aging").log();
            return false;
        }
    }
    true
}

// ===== global functions =====

// Compares a received LSP against the instance stored in the LSDB.
//
// A checksum mismatch is reported as `Latest` even when the sequence numbers
// are equal (or the received one is lower).
pub fn is_newer_or_same(received: &Lsp, stored: &Lsp) -> LspFreshness {
    if received.seqno > stored.seqno || received.cksum != stored.cksum {
        LspFreshness::Latest
    } else if received.seqno < stored.seqno {
        LspFreshness::Old
    } else {
        LspFreshness::Same
    }
}

// Returns the ID of the non-pseudonode, zero-fragment LSP of a system.
pub fn lsp_key(system_id: SystemId) -> LspId {
    LspId::from((system_id, 0, 0))
}
