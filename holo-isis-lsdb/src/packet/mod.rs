//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod consts;
pub mod error;
pub mod pdu;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

// IS-IS routing level. Each level has its own LSDB.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub enum LevelNumber {
    L1 = 1,
    L2 = 2,
}

// Pair of per-level values, indexed by `LevelNumber`.
#[derive(Clone, Debug, Default)]
pub struct Levels<T> {
    pub l1: T,
    pub l2: T,
}

// Six-octet System ID.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct SystemId([u8; 6]);

// LSP identifier: originating system, pseudonode number and fragment.
//
// The derived ordering (system, then pseudonode, then fragment) is the
// order CSNPs list LSPs in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct LspId {
    pub system_id: SystemId,
    pub pseudonode: u8,
    pub fragment: u8,
}

// ===== impl LevelNumber =====

impl LevelNumber {
    pub const ALL: [LevelNumber; 2] = [LevelNumber::L1, LevelNumber::L2];
}

impl std::fmt::Display for LevelNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelNumber::L1 => write!(f, "1"),
            LevelNumber::L2 => write!(f, "2"),
        }
    }
}

// ===== impl Levels =====

impl<T> Levels<T> {
    pub fn get(&self, level: LevelNumber) -> &T {
        if level == LevelNumber::L1 {
            &self.l1
        } else {
            &self.l2
        }
    }

    pub fn get_mut(&mut self, level: LevelNumber) -> &mut T {
        if level == LevelNumber::L1 {
            &mut self.l1
        } else {
            &mut self.l2
        }
    }
}

// ===== impl SystemId =====

impl SystemId {
    pub(crate) fn decode(buf: &mut Bytes) -> Self {
        let mut octets = [0; 6];
        buf.copy_to_slice(&mut octets);
        SystemId(octets)
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.0);
    }
}

impl From<[u8; 6]> for SystemId {
    fn from(octets: [u8; 6]) -> SystemId {
        SystemId(octets)
    }
}

// Dotted notation, e.g. "1921.6800.1001".
impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, pair) in self.0.chunks(2).enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{:02x}{:02x}", pair[0], pair[1])?;
        }
        Ok(())
    }
}

// ===== impl LspId =====

impl LspId {
    pub(crate) fn decode(buf: &mut Bytes) -> Self {
        let system_id = SystemId::decode(buf);
        let pseudonode = buf.get_u8();
        let fragment = buf.get_u8();
        LspId::from((system_id, pseudonode, fragment))
    }

    pub(crate) fn encode(&self, buf: &mut BytesMut) {
        self.system_id.encode(buf);
        buf.put_slice(&[self.pseudonode, self.fragment]);
    }

    pub const fn is_pseudonode(&self) -> bool {
        self.pseudonode != 0
    }
}

impl From<(SystemId, u8, u8)> for LspId {
    fn from((system_id, pseudonode, fragment): (SystemId, u8, u8)) -> LspId {
        LspId {
            system_id,
            pseudonode,
            fragment,
        }
    }
}

impl std::fmt::Display for LspId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02x}-{:02x}",
            self.system_id, self.pseudonode, self.fragment
        )
    }
}
