// =============================================================================
// Governance Tracker — HIP proposals and validator votes
// =============================================================================
//
// Tracks Hyperliquid Improvement Proposals with aye/nay validator votes.
// There is no public governance API yet, so the tracker serves the curated
// demo set; the types are the contract a future subgraph-backed fetcher
// must produce.

use serde::{Deserialize, Serialize};

/// One validator's vote on a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HipVote {
    pub validator: String,
    pub stake: u64,
}

/// A governance proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hip {
    pub id: String,
    pub title: String,
    /// "active" or "closed".
    pub status: String,
    pub proposer: String,
    pub aye: Vec<HipVote>,
    pub nay: Vec<HipVote>,
}

impl Hip {
    /// Total stake voting aye.
    pub fn aye_stake(&self) -> u64 {
        self.aye.iter().map(|v| v.stake).sum()
    }

    /// Total stake voting nay.
    pub fn nay_stake(&self) -> u64 {
        self.nay.iter().map(|v| v.stake).sum()
    }
}

/// The demo proposal set shown on the governance panel.
pub fn demo_hips() -> Vec<Hip> {
    let vote = |validator: &str, stake: u64| HipVote {
        validator: validator.to_string(),
        stake,
    };

    vec![
        Hip {
            id: "HIP-1".to_string(),
            title: "Increase beHYPE staking rewards".to_string(),
            status: "active".to_string(),
            proposer: "0xabc".to_string(),
            aye: vec![vote("val1", 12_000), vote("val2", 8_000)],
            nay: vec![vote("val3", 2_000)],
        },
        Hip {
            id: "HIP-2".to_string(),
            title: "Adjust fee structure".to_string(),
            status: "closed".to_string(),
            proposer: "0xdef".to_string(),
            aye: vec![vote("val2", 5_000)],
            nay: vec![vote("val1", 3_000), vote("val4", 1_000)],
        },
    ]
}
