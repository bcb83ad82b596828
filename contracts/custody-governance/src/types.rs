use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::store::{IterableSet, Vector};
use near_sdk::AccountId;
use near_sdk_macros::NearSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[borsh(crate = "near_sdk::borsh")]
#[abi(json, borsh)]
pub enum ProposalStatus {
    Active,
    Passed,
    Failed,
    Executed,
}

impl ProposalStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Executed)
    }
}

/// Whitelist edit applied to the owning group when the proposal executes.
/// `None` is a pure authorization decision with no whitelist effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, BorshSerialize, BorshDeserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[borsh(crate = "near_sdk::borsh")]
#[abi(json, borsh)]
pub enum ProposalAction {
    None,
    AddExecutor { executor: AccountId },
    RemoveExecutor { executor: AccountId },
}

impl ProposalAction {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AddExecutor { .. } => "add_executor",
            Self::RemoveExecutor { .. } => "remove_executor",
        }
    }

    pub fn target(&self) -> Option<&AccountId> {
        match self {
            Self::None => None,
            Self::AddExecutor { executor } | Self::RemoveExecutor { executor } => Some(executor),
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, NearSchema)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub creator: AccountId,
    pub members: IterableSet<AccountId>,
    pub threshold: u32,
    pub trusted_executors: IterableSet<AccountId>,
    pub secret_id: Vec<u8>,
    pub voting_period_ms: u64,
    pub created_at_ms: u64,
    pub proposal_ids: Vector<u64>,
}

#[derive(BorshSerialize, BorshDeserialize, NearSchema)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub struct Proposal {
    pub id: u64,
    pub group_id: u64,
    pub proposer: AccountId,
    pub title: String,
    pub description: String,
    pub action: ProposalAction,
    pub status: ProposalStatus,
    pub votes: IterableSet<AccountId>,
    pub created_at_ms: u64,
    pub expires_at_ms: u64,
}

/// Outcome of the release-authorization gate. The custodian service only
/// releases the protected share on `Authorized`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, BorshSerialize, BorshDeserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[borsh(crate = "near_sdk::borsh")]
#[abi(json, borsh)]
pub enum ReleaseVerdict {
    Authorized,
    Denied { reason: DenialReason },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[borsh(crate = "near_sdk::borsh")]
#[abi(json, borsh)]
pub enum DenialReason {
    IdentifierMismatch,
    InvalidProposal,
    NotAuthorized,
    UntrustedExecutor,
}

#[derive(Clone, Serialize, Deserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[abi(json)]
pub struct GroupView {
    pub id: u64,
    pub name: String,
    pub creator: AccountId,
    pub members: Vec<AccountId>,
    pub threshold: u32,
    pub trusted_executors: Vec<AccountId>,
    pub voting_period_ms: u64,
    pub created_at_ms: u64,
}

impl From<&Group> for GroupView {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
            creator: group.creator.clone(),
            members: group.members.iter().cloned().collect(),
            threshold: group.threshold,
            trusted_executors: group.trusted_executors.iter().cloned().collect(),
            voting_period_ms: group.voting_period_ms,
            created_at_ms: group.created_at_ms,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[abi(json)]
pub struct ProposalView {
    pub id: u64,
    pub group_id: u64,
    pub proposer: AccountId,
    pub title: String,
    pub description: String,
    pub action: ProposalAction,
    pub status: ProposalStatus,
    pub votes: Vec<AccountId>,
    pub vote_count: u32,
    pub created_at_ms: u64,
    pub expires_at_ms: u64,
}

impl From<&Proposal> for ProposalView {
    fn from(proposal: &Proposal) -> Self {
        Self {
            id: proposal.id,
            group_id: proposal.group_id,
            proposer: proposal.proposer.clone(),
            title: proposal.title.clone(),
            description: proposal.description.clone(),
            action: proposal.action.clone(),
            status: proposal.status,
            votes: proposal.votes.iter().cloned().collect(),
            vote_count: proposal.votes.len(),
            created_at_ms: proposal.created_at_ms,
            expires_at_ms: proposal.expires_at_ms,
        }
    }
}
