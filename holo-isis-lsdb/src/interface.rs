//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::Bytes;

use crate::error::IoError;

// Index of an interface in the externally owned interface registry.
//
// LSP wrappers only keep this handle, never a reference to the interface
// itself, so an interface can go away while its LSPs are still queued.
pub type InterfaceIndex = u32;

// Transmit side of the interfaces LSPs are flooded over.
pub trait InterfaceRegistry: Send + Sync {
    // Returns whether the interface still exists and its transport is up.
    fn is_operational(&self, ifindex: InterfaceIndex) -> bool;

    // Frames the serialized LSP and writes it out the given interface.
    fn send_lsp(
        &self,
        ifindex: InterfaceIndex,
        data: Bytes,
    ) -> Result<(), IoError>;
}
