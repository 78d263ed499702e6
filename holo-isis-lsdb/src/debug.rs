//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tracing::debug;

use crate::packet::LevelNumber;
use crate::packet::pdu::Lsp;
use crate::topology::TopologyEvent;
use crate::wrapper::LspWrapper;

// LSDB debug messages.
#[derive(Debug)]
pub enum Debug<'a> {
    // Aging engine
    AgingStart,
    AgingStop,
    // LSDB maintenance
    LspInstall(&'a LspWrapper),
    LspDelete(LevelNumber, &'a Lsp),
    LspRefresh(LevelNumber, &'a Lsp),
    LspExpire(LevelNumber, &'a Lsp),
    // Aging queue
    LspAgingDispatch(&'a LspWrapper, u32),
    LspAgingStale(&'a LspWrapper),
    // Topology notifications
    TopologyNotify(&'a LspWrapper, TopologyEvent),
}

// ===== impl Debug =====

impl Debug<'_> {
    // Log debug message using the tracing API.
    pub(crate) fn log(&self) {
        match self {
            Debug::AgingStart | Debug::AgingStop => {
                debug!("{}", self);
            }
            Debug::LspInstall(wrapper) => {
                debug!(
                    level = %wrapper.level,
                    lsp_id = %wrapper.lsp.lsp_id,
                    seqno = %wrapper.lsp.seqno,
                    age = %wrapper.lsp_age_received,
                    bin = ?wrapper.bin_number,
                    self_originated = %wrapper.self_originated,
                    "{}", self
                );
            }
            Debug::LspDelete(level, lsp)
            | Debug::LspRefresh(level, lsp)
            | Debug::LspExpire(level, lsp) => {
                debug!(%level, lsp_id = %lsp.lsp_id, seqno = %lsp.seqno, "{}", self);
            }
            Debug::LspAgingDispatch(wrapper, bin) => {
                // Parent span(s): lsdb-aging
                debug!(
                    level = %wrapper.level,
                    lsp_id = %wrapper.lsp.lsp_id,
                    %bin,
                    processing = ?wrapper.lsp_processing,
                    "{}", self
                );
            }
            Debug::LspAgingStale(wrapper) => {
                // Parent span(s): lsdb-aging
                debug!(
                    level = %wrapper.level,
                    lsp_id = %wrapper.lsp.lsp_id,
                    seqno = %wrapper.lsp.seqno,
                    processing = ?wrapper.lsp_processing,
                    "{}", self
                );
            }
            Debug::TopologyNotify(wrapper, event) => {
                // Parent span(s): topology
                debug!(level = %wrapper.level, lsp_id = %wrapper.lsp.lsp_id, %event, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Debug<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Debug::AgingStart => {
                write!(f, "starting LSDB aging")
            }
            Debug::AgingStop => {
                write!(f, "stopping LSDB aging")
            }
            Debug::LspInstall(..) => {
                write!(f, "installing LSP")
            }
            Debug::LspDelete(..) => {
                write!(f, "deleting LSP")
            }
            Debug::LspRefresh(..) => {
                write!(f, "refreshing LSP")
            }
            Debug::LspExpire(..) => {
                write!(f, "LSP reached MaxAge")
            }
            Debug::LspAgingDispatch(..) => {
                write!(f, "queueing LSP for aging action")
            }
            Debug::LspAgingStale(..) => {
                write!(f, "ignoring superseded aging action")
            }
            Debug::TopologyNotify(..) => {
                write!(f, "notifying topology change")
            }
        }
    }
}
