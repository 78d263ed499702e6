//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};

pub type DecodeResult<T> = Result<T, DecodeError>;

// LSP decoding errors.
#[derive(Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum DecodeError {
    IncompletePdu,
    InvalidHeaderLength(u8),
    InvalidIrdpDiscriminator(u8),
    InvalidVersion(u8),
    InvalidIdLength(u8),
    UnknownPduType(u8),
    UnexpectedPduType(u8),
    InvalidPduLength(u16),
}

// ===== impl DecodeError =====

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::IncompletePdu => {
                write!(f, "buffer shorter than the LSP header")
            }
            DecodeError::InvalidHeaderLength(hdr_len) => {
                write!(f, "unexpected fixed header length {}", hdr_len)
            }
            DecodeError::InvalidIrdpDiscriminator(discriminator) => {
                write!(f, "bad IDRP discriminator {:#04x}", discriminator)
            }
            DecodeError::InvalidVersion(version) => {
                write!(f, "unsupported version {}", version)
            }
            DecodeError::InvalidIdLength(id_len) => {
                write!(f, "unsupported System ID length {}", id_len)
            }
            DecodeError::UnknownPduType(pdu_type) => {
                write!(f, "unknown PDU type {}", pdu_type)
            }
            DecodeError::UnexpectedPduType(pdu_type) => {
                write!(f, "PDU type {} is not an LSP", pdu_type)
            }
            DecodeError::InvalidPduLength(pdu_len) => {
                write!(f, "PDU length {} does not match the buffer", pdu_len)
            }
        }
    }
}

impl std::error::Error for DecodeError {}
