//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use tokio::task::JoinError;
use tracing::{error, warn};

use crate::interface::InterfaceIndex;
use crate::packet::consts::PduType;
use crate::packet::{LevelNumber, LspId};

// LSDB errors.
#[derive(Debug)]
pub enum Error {
    // I/O errors
    IoError(IoError),
    // LSDB operations
    UnknownPduType(PduType),
    BinEntryNotFound(u32, LevelNumber, LspId),
    // Aging queue processing
    UntaggedAgingMsg(LevelNumber, LspId),
    MissingInterface(LevelNumber, LspId),
    InterfaceDown(InterfaceIndex),
    SeqnoWrapped(LevelNumber, LspId),
    SeqnoExhausted(LevelNumber),
    // Inter-task communication
    QueueClosed(&'static str),
    TaskFailure(&'static str, JoinError),
}

// LSDB I/O errors.
#[derive(Debug)]
pub enum IoError {
    SendError(std::io::Error),
}

// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(&'static str),
}

// ===== impl Error =====

impl Error {
    pub fn log(&self) {
        match self {
            Error::IoError(error) => {
                error.log();
            }
            Error::UnknownPduType(pdu_type) => {
                warn!(?pdu_type, "{}", self);
            }
            Error::BinEntryNotFound(bin, level, lsp_id) => {
                warn!(%bin, %level, %lsp_id, "{}", self);
            }
            Error::UntaggedAgingMsg(level, lsp_id)
            | Error::MissingInterface(level, lsp_id)
            | Error::SeqnoWrapped(level, lsp_id) => {
                warn!(%level, %lsp_id, "{}", self);
            }
            Error::InterfaceDown(ifindex) => {
                warn!(%ifindex, "{}", self);
            }
            Error::SeqnoExhausted(level) => {
                error!(%level, "{}", self);
            }
            Error::QueueClosed(queue) => {
                error!(%queue, "{}", self);
            }
            Error::TaskFailure(task, error) => {
                error!(%task, %error, "{}", self);
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(error) => error.fmt(f),
            Error::UnknownPduType(..) => {
                write!(f, "unknown LSP type")
            }
            Error::BinEntryNotFound(..) => {
                write!(f, "aging bin references an LSP missing from the LSDB")
            }
            Error::UntaggedAgingMsg(..) => {
                write!(f, "LSP queued for aging without a processing tag")
            }
            Error::MissingInterface(..) => {
                write!(f, "self-originated LSP has no interface to refresh on")
            }
            Error::InterfaceDown(..) => {
                write!(f, "interface is not operational, skipping LSP refresh")
            }
            Error::SeqnoWrapped(..) => {
                write!(f, "LSP sequence number space exhausted")
            }
            Error::SeqnoExhausted(..) => {
                write!(f, "no sequence numbers left for self-originated LSPs")
            }
            Error::QueueClosed(..) => {
                write!(f, "queue closed")
            }
            Error::TaskFailure(..) => {
                write!(f, "task failed")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(error) => Some(error),
            Error::TaskFailure(_, error) => Some(error),
            _ => None,
        }
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

// ===== impl IoError =====

impl IoError {
    pub(crate) fn log(&self) {
        match self {
            IoError::SendError(error) => {
                warn!(error = %with_source(error), "{}", self);
            }
        }
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::SendError(..) => {
                write!(f, "failed to send LSP")
            }
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::SendError(error) => Some(error),
        }
    }
}

// ===== impl ConfigError =====

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(..) => {
                write!(f, "failed to read configuration file")
            }
            ConfigError::Parse(..) => {
                write!(f, "failed to parse configuration file")
            }
            ConfigError::Invalid(reason) => {
                write!(f, "invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(error) => Some(error),
            ConfigError::Parse(error) => Some(error),
            ConfigError::Invalid(..) => None,
        }
    }
}

// ===== helper functions =====

fn with_source<E: std::error::Error>(error: E) -> String {
    if let Some(source) = error.source() {
        format!("{} ({})", error, with_source(source))
    } else {
        error.to_string()
    }
}
