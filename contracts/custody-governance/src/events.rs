use near_sdk::{near, AccountId};

use crate::types::ProposalStatus;

#[near(event_json(standard = "nep297"))]
pub enum GovernanceEvent {
    #[event_version("1.0.0")]
    GroupCreated { group_id: u64, name: String, threshold: u32, member_count: u32 },
    #[event_version("1.0.0")]
    ProposalCreated { proposal_id: u64, proposer: AccountId, kind: String, target: Option<AccountId> },
    #[event_version("1.0.0")]
    VoteCast { proposal_id: u64, voter: AccountId, vote_count: u32, status: ProposalStatus },
    #[event_version("1.0.0")]
    ProposalExecuted { proposal_id: u64, executor: AccountId },
    #[event_version("1.0.0")]
    ProposalFailed { proposal_id: u64 },
    #[event_version("1.0.0")]
    StateMigrated { old_version: String, new_version: String },
}
