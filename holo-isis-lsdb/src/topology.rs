//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};

use crate::wrapper::LspWrapper;

// Change to the set of externally learned LSPs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum TopologyEvent {
    Added,
    Removed,
}

// Consumer of LSDB changes, responsible for topology (SPF) recomputation.
pub trait TopologyProvider: Send + Sync {
    fn process_lsp(&self, wrapper: &LspWrapper, event: TopologyEvent);
}

// ===== impl TopologyEvent =====

impl std::fmt::Display for TopologyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyEvent::Added => write!(f, "added"),
            TopologyEvent::Removed => write!(f, "removed"),
        }
    }
}
