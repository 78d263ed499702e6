//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::debug::Debug;
use crate::error::Error;
use crate::interface::InterfaceRegistry;
use crate::lsdb::Lsdb;
use crate::tasks::messages::{LspAgingMsg, TopologyMsg};
use crate::topology::TopologyProvider;
use crate::wrapper::{LspProcessing, LspWrapper};

// ===== LSP aging =====

pub(crate) async fn process_lsp_aging(
    lsdb: &Lsdb,
    interfaces: &dyn InterfaceRegistry,
    msg: LspAgingMsg,
) -> Result<(), Error> {
    let wrapper = msg.wrapper;
    match wrapper.lsp_processing {
        Some(LspProcessing::Refresh) => {
            process_lsp_refresh(lsdb, interfaces, wrapper).await
        }
        Some(LspProcessing::MaxAge) => process_lsp_max_age(lsdb, wrapper).await,
        None => {
            Err(Error::UntaggedAgingMsg(wrapper.level, wrapper.lsp.lsp_id))
        }
    }
}

// Re-originates a self-originated LSP with a new sequence number and a full
// lifetime, floods it and installs the new instance.
//
// When the refresh can't be carried out, the stored instance goes back to
// its aging bin and is reconsidered the next time that bin is due.
async fn process_lsp_refresh(
    lsdb: &Lsdb,
    interfaces: &dyn InterfaceRegistry,
    wrapper: LspWrapper,
) -> Result<(), Error> {
    if !wrapper.self_originated {
        return Ok(());
    }

    // Nothing to do if another instance was installed in the meantime.
    if !lsdb.is_aging_pending(&wrapper) {
        Debug::LspAgingStale(&wrapper).log();
        return Ok(());
    }

    let result = refresh_lsp(lsdb, interfaces, &wrapper);
    if result.is_err() {
        lsdb.rebin_failed_refresh(&wrapper);
    }
    result
}

fn refresh_lsp(
    lsdb: &Lsdb,
    interfaces: &dyn InterfaceRegistry,
    wrapper: &LspWrapper,
) -> Result<(), Error> {
    let level = wrapper.level;
    let lsp_id = wrapper.lsp.lsp_id;

    let ifindex = wrapper
        .ifindex
        .ok_or(Error::MissingInterface(level, lsp_id))?;
    if !interfaces.is_operational(ifindex) {
        return Err(Error::InterfaceDown(ifindex));
    }

    let seqno = wrapper
        .lsp
        .seqno
        .checked_add(1)
        .ok_or(Error::SeqnoWrapped(level, lsp_id))?;

    let mut lsp = wrapper.lsp.clone();
    lsp.seqno = seqno;
    lsp.rem_lifetime = lsdb.config().max_age;
    let data = lsp.encode();
    Debug::LspRefresh(level, &lsp).log();

    interfaces.send_lsp(ifindex, data)?;
    lsdb.set_ls_sequence_number(level, seqno);
    if !lsdb.install_refreshed(wrapper, lsp, ifindex) {
        Debug::LspAgingStale(wrapper).log();
    }

    Ok(())
}

async fn process_lsp_max_age(
    lsdb: &Lsdb,
    wrapper: LspWrapper,
) -> Result<(), Error> {
    Debug::LspExpire(wrapper.level, &wrapper.lsp).log();

    if !lsdb.remove_expired(&wrapper).await {
        Debug::LspAgingStale(&wrapper).log();
    }

    Ok(())
}

// ===== topology notifications =====

pub(crate) fn process_topology_msg(
    provider: &dyn TopologyProvider,
    msg: TopologyMsg,
) {
    Debug::TopologyNotify(&msg.wrapper, msg.event).log();
    provider.process_lsp(&msg.wrapper, msg.event);
}
