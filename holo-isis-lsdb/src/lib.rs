//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod age;
pub mod config;
pub mod debug;
pub mod error;
pub mod events;
pub mod interface;
pub mod lsdb;
pub mod packet;
pub mod task;
pub mod tasks;
pub mod topology;
pub mod wrapper;
