//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::Arc;

use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{Instrument, debug_span};

use crate::events;
use crate::interface::InterfaceRegistry;
use crate::lsdb::Lsdb;
use crate::task::{IntervalTask, Task};
use crate::topology::TopologyProvider;

//
// LSDB tasks diagram:
//
//                +-------------+
//                |  protocol   | (add_lsp / delete_lsp)
//                +-------------+
//                       |
//                       V
//   aging_ticker   +---------+  topology_tx (bounded)   +-------------------+
//   (1x, 1s)  ---> |  LSDB   | -----------------------> | topology_notifier | -> TopologyProvider
//                  +---------+                          +-------------------+
//                       |  ^
//   aging_tx (bounded)  |  | add_lsp / delete_lsp
//                       V  |
//                  +----------------+
//                  | aging_consumer | -> InterfaceRegistry (LSP refresh)
//                  +----------------+
//

// LSDB inter-task message types.
pub mod messages {
    use crate::topology::TopologyEvent;
    use crate::wrapper::LspWrapper;

    // LSP handed over by the aging ticker. The wrapper's `lsp_processing`
    // field tells what to do with it.
    #[derive(Debug)]
    pub struct LspAgingMsg {
        pub wrapper: LspWrapper,
    }

    // Change of an externally learned LSP.
    #[derive(Debug)]
    pub struct TopologyMsg {
        pub wrapper: LspWrapper,
        pub event: TopologyEvent,
    }
}

// ===== LSDB tasks =====

// Periodic aging tick.
pub(crate) fn aging_ticker(
    lsdb: &Lsdb,
    aging_tx: Sender<messages::LspAgingMsg>,
) -> IntervalTask {
    let span = debug_span!("lsdb-aging");
    let _span_guard = span.enter();

    let lsdb = lsdb.clone();
    let interval = lsdb.config().tick_interval();
    IntervalTask::new(interval, false, move || {
        let lsdb = lsdb.clone();
        let aging_tx = aging_tx.clone();
        async move {
            lsdb.age_lsp(&aging_tx).await;
        }
    })
}

// Aging queue consumer.
//
// Exits once every sender is gone and the queue has been drained.
pub(crate) fn aging_consumer(
    lsdb: &Lsdb,
    interfaces: Arc<dyn InterfaceRegistry>,
    mut aging_rx: Receiver<messages::LspAgingMsg>,
) -> Task<()> {
    let span = debug_span!("lsdb-aging");
    let _span_guard = span.enter();

    let lsdb = lsdb.clone();
    Task::spawn(
        async move {
            while let Some(msg) = aging_rx.recv().await {
                if let Err(error) =
                    lsdb.process_aging_msg(interfaces.as_ref(), msg).await
                {
                    error.log();
                }
            }
        }
        .in_current_span(),
    )
}

// Topology notification queue consumer.
//
// Exits once every LSDB handle is gone and the queue has been drained.
pub fn topology_notifier(
    mut topology_rx: Receiver<messages::TopologyMsg>,
    provider: Arc<dyn TopologyProvider>,
) -> Task<()> {
    let span = debug_span!("topology");
    let _span_guard = span.enter();

    Task::spawn(
        async move {
            while let Some(msg) = topology_rx.recv().await {
                events::process_topology_msg(provider.as_ref(), msg);
            }
        }
        .in_current_span(),
    )
}
