//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bitflags::bitflags;
use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::packet::LevelNumber;

pub const IDRP_DISCRIMINATOR: u8 = 0x83;
pub const VERSION_PROTO_EXT: u8 = 1;
pub const VERSION: u8 = 1;

// IS-IS PDU types.
//
// IANA registry:
// https://www.iana.org/assignments/isis-pdu/isis-pdu.xhtml#pdu
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum PduType {
    HelloLanL1 = 15,
    HelloLanL2 = 16,
    HelloP2P = 17,
    LspL1 = 18,
    LspL2 = 20,
    CsnpL1 = 24,
    CsnpL2 = 25,
    PsnpL1 = 26,
    PsnpL2 = 27,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct LspFlags: u8 {
        const P = 0x80;
        const ATT = 0x40;
        const OL = 0x04;
        const IS_TYPE2 = 0x02;
        const IS_TYPE1 = 0x01;
    }
}

// ===== impl PduType =====

impl PduType {
    // Returns the level of an LSP PDU type, or `None` for every other PDU
    // type.
    pub fn lsp_level(&self) -> Option<LevelNumber> {
        match self {
            PduType::LspL1 => Some(LevelNumber::L1),
            PduType::LspL2 => Some(LevelNumber::L2),
            _ => None,
        }
    }
}

impl From<LevelNumber> for PduType {
    fn from(level: LevelNumber) -> PduType {
        match level {
            LevelNumber::L1 => PduType::LspL1,
            LevelNumber::L2 => PduType::LspL2,
        }
    }
}
