//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use holo_isis_lsdb::config::Config;
use holo_isis_lsdb::error::ConfigError;
use holo_isis_lsdb::lsdb::{
    Lsdb, LspFreshness, is_newer_or_same, lsp_key,
};
use holo_isis_lsdb::packet::consts::PduType;
use holo_isis_lsdb::packet::pdu::Lsp;
use holo_isis_lsdb::packet::{LevelNumber, LspId};
use holo_isis_lsdb::topology::TopologyEvent;
use tokio::sync::mpsc;

use super::{
    aging_channel, config, drain, lsp, lsp_id, new_lsdb, system_id, tick,
};

#[test]
fn test_invalid_config() {
    let (topology_tx, _topology_rx) = mpsc::channel(1);
    let result = Lsdb::new(config(10, 10), topology_tx);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_seqno_per_level() {
    let (lsdb, _topology_rx) = new_lsdb(Config::default());

    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L1), 1);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L1), 2);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L1), 3);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L2), 1);

    lsdb.set_ls_sequence_number(LevelNumber::L1, 10);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L1), 11);

    // Never goes backwards.
    lsdb.set_ls_sequence_number(LevelNumber::L1, 5);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L1), 12);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L2), 2);
}

// Once exhausted, the last sequence number keeps being handed out.
#[test]
fn test_seqno_exhausted() {
    let (lsdb, _topology_rx) = new_lsdb(Config::default());

    lsdb.set_ls_sequence_number(LevelNumber::L1, u32::MAX - 2);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L1), u32::MAX - 1);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L1), u32::MAX);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L1), u32::MAX);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L2), 1);
}

#[test]
fn test_seqno_initial_value() {
    let config = Config {
        init_seqno: 100,
        ..Default::default()
    };
    let (lsdb, _topology_rx) = new_lsdb(config);
    assert_eq!(lsdb.ls_sequence_number(LevelNumber::L2), 100);
}

#[tokio::test]
async fn test_add_find() {
    let (lsdb, mut topology_rx) = new_lsdb(Config::default());

    let lsp1 = lsp(LevelNumber::L1, 1, 5, 1200);
    assert!(lsdb.add_lsp(lsp1, false, Some(3)).await);
    let wrapper = lsdb.find_lsp(PduType::LspL1, &lsp_id(1)).unwrap();
    assert_eq!(wrapper.lsp.seqno, 5);
    assert_eq!(wrapper.ifindex, Some(3));
    assert!(!wrapper.self_originated);

    // Levels are kept apart.
    assert!(lsdb.find_lsp(PduType::LspL2, &lsp_id(1)).is_none());
    assert_eq!(lsdb.lsp_count(LevelNumber::L1), 1);
    assert_eq!(lsdb.lsp_count(LevelNumber::L2), 0);

    let msgs = drain(&mut topology_rx);
    assert_eq!(msgs.len(), 1);
    assert_eq!(msgs[0].event, TopologyEvent::Added);
    assert_eq!(msgs[0].wrapper.lsp.lsp_id, lsp_id(1));
}

#[tokio::test]
async fn test_add_self_originated_not_announced() {
    let (lsdb, mut topology_rx) = new_lsdb(Config::default());

    lsdb.add_lsp(lsp(LevelNumber::L2, 1, 1, 1200), true, Some(1)).await;
    assert!(drain(&mut topology_rx).is_empty());

    let wrapper = lsdb.find_lsp(PduType::LspL2, &lsp_id(1)).unwrap();
    assert!(wrapper.self_originated);
    assert!(wrapper.lsp.is_checksum_valid());
}

#[tokio::test]
async fn test_replace() {
    let (lsdb, _topology_rx) = new_lsdb(Config::default());

    lsdb.add_lsp(lsp(LevelNumber::L1, 1, 1, 1200), false, None).await;
    lsdb.add_lsp(lsp(LevelNumber::L1, 1, 2, 1200), false, None).await;
    assert_eq!(lsdb.lsp_count(LevelNumber::L1), 1);

    let wrapper = lsdb.find_lsp(PduType::LspL1, &lsp_id(1)).unwrap();
    assert_eq!(wrapper.lsp.seqno, 2);
}

#[tokio::test]
async fn test_unknown_pdu_type() {
    let (lsdb, mut topology_rx) = new_lsdb(Config::default());

    let mut csnp = lsp(LevelNumber::L1, 1, 1, 1200);
    csnp.pdu_type = PduType::CsnpL1;
    assert!(!lsdb.add_lsp(csnp.clone(), false, None).await);
    assert!(lsdb.find_lsp(PduType::CsnpL1, &lsp_id(1)).is_none());
    lsdb.delete_lsp(&csnp).await;

    assert_eq!(lsdb.lsp_count(LevelNumber::L1), 0);
    assert!(drain(&mut topology_rx).is_empty());
}

#[tokio::test]
async fn test_find_updates_lifetime() {
    let (lsdb, _topology_rx) = new_lsdb(Config::default());
    let (aging_tx, _aging_rx) = aging_channel();

    lsdb.add_lsp(lsp(LevelNumber::L1, 1, 1, 1000), false, None).await;
    tick(&lsdb, &aging_tx, 3).await;

    let wrapper = lsdb.find_lsp(PduType::LspL1, &lsp_id(1)).unwrap();
    assert_eq!(wrapper.lsp.rem_lifetime, 997);

    let decoded = Lsp::decode(wrapper.lsp.raw.clone()).unwrap();
    assert_eq!(decoded.rem_lifetime, 997);
    assert!(decoded.is_checksum_valid());
}

#[tokio::test]
async fn test_delete_idempotent() {
    let (lsdb, mut topology_rx) = new_lsdb(Config::default());
    let lsp1 = lsp(LevelNumber::L2, 1, 1, 1200);

    lsdb.add_lsp(lsp1.clone(), false, None).await;
    let bin_number = lsdb.lsps(LevelNumber::L2)[0].bin_number.unwrap();
    lsdb.delete_lsp(&lsp1).await;
    lsdb.delete_lsp(&lsp1).await;
    lsdb.delete_lsp(&lsp(LevelNumber::L2, 9, 1, 1200)).await;

    assert_eq!(lsdb.lsp_count(LevelNumber::L2), 0);
    assert!(lsdb.lsp_bin(bin_number).unwrap().is_empty());

    let events = drain(&mut topology_rx)
        .into_iter()
        .map(|msg| msg.event)
        .collect::<Vec<_>>();
    assert_eq!(events, [TopologyEvent::Added, TopologyEvent::Removed]);
}

#[tokio::test]
async fn test_lsp_headers() {
    let (lsdb, _topology_rx) = new_lsdb(Config::default());

    lsdb.add_lsp(lsp(LevelNumber::L1, 1, 1, 1200), false, None).await;
    lsdb.add_lsp(lsp(LevelNumber::L1, 2, 7, 0), false, None).await;
    lsdb.add_lsp(lsp(LevelNumber::L2, 3, 1, 1200), false, None).await;

    let headers = lsdb.all_lsp_headers(LevelNumber::L1, false);
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].lsp_id, lsp_id(1));
    assert_eq!(headers[0].rem_lifetime, 1200);
    assert_eq!(headers[1].lsp_id, lsp_id(2));
    assert_eq!(headers[1].seqno, 7);
    assert_eq!(headers[1].rem_lifetime, 0);

    let headers = lsdb.all_lsp_headers(LevelNumber::L1, true);
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].lsp_id, lsp_id(1));
}

#[test]
fn test_is_newer_or_same() {
    let stored = lsp(LevelNumber::L1, 1, 10, 1200);

    let newer = lsp(LevelNumber::L1, 1, 11, 1200);
    assert_eq!(is_newer_or_same(&newer, &stored), LspFreshness::Latest);

    let older = lsp(LevelNumber::L1, 1, 9, 1200);
    let mut older_same_cksum = older.clone();
    older_same_cksum.cksum = stored.cksum;
    assert_eq!(
        is_newer_or_same(&older_same_cksum, &stored),
        LspFreshness::Old
    );

    let same = stored.clone();
    assert_eq!(is_newer_or_same(&same, &stored), LspFreshness::Same);

    // Same sequence number, different contents.
    let mut conflicting = stored.clone();
    conflicting.cksum = stored.cksum.wrapping_add(1);
    assert_eq!(is_newer_or_same(&conflicting, &stored), LspFreshness::Latest);

    // A checksum mismatch wins over a lower sequence number.
    assert_ne!(older.cksum, stored.cksum);
    assert_eq!(is_newer_or_same(&older, &stored), LspFreshness::Latest);
}

#[test]
fn test_lsp_key() {
    let lsp_id = lsp_key(system_id(7));
    assert_eq!(lsp_id, LspId::from((system_id(7), 0, 0)));
    assert!(!lsp_id.is_pseudonode());
}
