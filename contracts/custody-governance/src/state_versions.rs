use near_sdk::borsh::{BorshSerialize, BorshDeserialize};
use near_sdk::store::LookupMap;
use crate::types::{Group, Proposal};

#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct StateV010 {
    pub version: String,
    pub groups: LookupMap<u64, Group>,
    pub proposals: LookupMap<u64, Proposal>,
    pub next_group_id: u64,
    pub next_proposal_id: u64,
}
