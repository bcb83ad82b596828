use crate::errors::GovernanceError;
use crate::events::GovernanceEvent;
use crate::state_versions::StateV010;
use crate::types::{
    DenialReason, Group, GroupView, Proposal, ProposalAction, ProposalStatus, ProposalView,
    ReleaseVerdict,
};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::store::{IterableSet, LookupMap, Vector};
use near_sdk::{env, log, AccountId, BorshStorageKey};
use semver::Version;
use subtle::ConstantTimeEq;

pub const DEFAULT_VOTING_PERIOD_MS: u64 = 7 * 24 * 60 * 60 * 1000;

const STATE_KEY: &[u8] = b"STATE";

#[derive(BorshSerialize, BorshDeserialize, BorshStorageKey)]
#[borsh(crate = "near_sdk::borsh")]
pub enum StorageKey {
    Groups,
    Proposals,
    GroupMembers { group_id: u64 },
    GroupExecutors { group_id: u64 },
    GroupProposals { group_id: u64 },
    ProposalVotes { proposal_id: u64 },
}

#[derive(BorshSerialize, BorshDeserialize, near_sdk_macros::NearSchema)]
#[borsh(crate = "near_sdk::borsh")]
#[abi(borsh)]
pub struct GovernanceContractState {
    pub version: String,
    pub groups: LookupMap<u64, Group>,
    pub proposals: LookupMap<u64, Proposal>,
    pub next_group_id: u64,
    pub next_proposal_id: u64,
    pub default_voting_period_ms: u64,
}

impl GovernanceContractState {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            groups: LookupMap::new(StorageKey::Groups),
            proposals: LookupMap::new(StorageKey::Proposals),
            next_group_id: 1,
            next_proposal_id: 1,
            default_voting_period_ms: DEFAULT_VOTING_PERIOD_MS,
        }
    }

    /// Creates a group with a fixed member set and vote threshold. The member
    /// list is deduplicated with set semantics before the threshold is checked.
    pub fn create_group(
        &mut self,
        caller: &AccountId,
        name: String,
        members: Vec<AccountId>,
        threshold: u32,
        secret_id: Vec<u8>,
        voting_period_ms: Option<u64>,
    ) -> Result<u64, GovernanceError> {
        let group_id = self.next_group_id;

        let mut member_set = IterableSet::new(StorageKey::GroupMembers { group_id });
        for member in members {
            member_set.insert(member);
        }
        let member_count = member_set.len();

        if threshold == 0 || threshold > member_count {
            return Err(GovernanceError::InvalidThreshold);
        }

        let group = Group {
            id: group_id,
            name: name.clone(),
            creator: caller.clone(),
            members: member_set,
            threshold,
            trusted_executors: IterableSet::new(StorageKey::GroupExecutors { group_id }),
            secret_id,
            voting_period_ms: voting_period_ms.unwrap_or(self.default_voting_period_ms),
            created_at_ms: env::block_timestamp_ms(),
            proposal_ids: Vector::new(StorageKey::GroupProposals { group_id }),
        };
        self.groups.insert(group_id, group);
        self.next_group_id += 1;

        log!("Created group {} with {} members", group_id, member_count);
        GovernanceEvent::GroupCreated {
            group_id,
            name,
            threshold,
            member_count,
        }
        .emit();

        Ok(group_id)
    }

    /// Creates a proposal in `Active` status. Only group members may propose.
    pub fn create_proposal(
        &mut self,
        caller: &AccountId,
        group_id: u64,
        title: String,
        description: String,
        action: ProposalAction,
    ) -> Result<u64, GovernanceError> {
        let group = self
            .groups
            .get(&group_id)
            .ok_or(GovernanceError::GroupNotFound)?;
        if !group.members.contains(caller) {
            return Err(GovernanceError::NotMember);
        }
        let voting_period_ms = group.voting_period_ms;

        let proposal_id = self.next_proposal_id;
        let created_at_ms = env::block_timestamp_ms();
        let proposal = Proposal {
            id: proposal_id,
            group_id,
            proposer: caller.clone(),
            title,
            description,
            action: action.clone(),
            status: ProposalStatus::Active,
            votes: IterableSet::new(StorageKey::ProposalVotes { proposal_id }),
            created_at_ms,
            expires_at_ms: created_at_ms.saturating_add(voting_period_ms),
        };
        self.proposals.insert(proposal_id, proposal);
        self.next_proposal_id += 1;

        let group = self
            .groups
            .get_mut(&group_id)
            .expect("Group should exist");
        group.proposal_ids.push(proposal_id);

        log!("Created proposal {} in group {}", proposal_id, group_id);
        GovernanceEvent::ProposalCreated {
            proposal_id,
            proposer: caller.clone(),
            kind: action.kind().to_string(),
            target: action.target().cloned(),
        }
        .emit();

        Ok(proposal_id)
    }

    /// Records one vote per member. The status flips to `Passed` in the same
    /// operation that crosses the threshold, so `votes >= threshold` with an
    /// `Active` status is never observable.
    pub fn vote(
        &mut self,
        caller: &AccountId,
        group_id: u64,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        let group = self
            .groups
            .get(&group_id)
            .ok_or(GovernanceError::GroupNotFound)?;
        if !group.members.contains(caller) {
            return Err(GovernanceError::NotMember);
        }
        let threshold = group.threshold;

        let proposal = self
            .proposals
            .get_mut(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound)?;
        if proposal.group_id != group_id {
            return Err(GovernanceError::InvalidProposal);
        }
        if proposal.votes.contains(caller) {
            return Err(GovernanceError::AlreadyVoted);
        }
        if proposal.status != ProposalStatus::Active {
            return Err(GovernanceError::AlreadyFinalized);
        }
        if env::block_timestamp_ms() >= proposal.expires_at_ms {
            return Err(GovernanceError::ProposalExpired);
        }

        proposal.votes.insert(caller.clone());
        let vote_count = proposal.votes.len();
        if vote_count >= threshold {
            proposal.status = ProposalStatus::Passed;
        }
        let status = proposal.status;

        log!(
            "Vote by {} on proposal {} ({}/{})",
            caller,
            proposal_id,
            vote_count,
            threshold
        );
        GovernanceEvent::VoteCast {
            proposal_id,
            voter: caller.clone(),
            vote_count,
            status,
        }
        .emit();

        Ok(())
    }

    /// Applies a passed proposal's whitelist action and marks it `Executed`.
    /// No membership check: passing already encodes the authorization, so any
    /// party may flush a passed decision into effect.
    pub fn execute_proposal(
        &mut self,
        caller: &AccountId,
        group_id: u64,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        if !self.groups.contains_key(&group_id) {
            return Err(GovernanceError::GroupNotFound);
        }

        let action = {
            let proposal = self
                .proposals
                .get(&proposal_id)
                .ok_or(GovernanceError::ProposalNotFound)?;
            if proposal.group_id != group_id {
                return Err(GovernanceError::InvalidProposal);
            }
            if proposal.status != ProposalStatus::Passed {
                return Err(GovernanceError::NotPassed);
            }
            proposal.action.clone()
        };

        let group = self
            .groups
            .get_mut(&group_id)
            .expect("Group should exist");
        match &action {
            ProposalAction::None => {}
            // Both edits are idempotent: a duplicate insert and a removal of
            // an absent entry are no-ops.
            ProposalAction::AddExecutor { executor } => {
                group.trusted_executors.insert(executor.clone());
            }
            ProposalAction::RemoveExecutor { executor } => {
                group.trusted_executors.remove(executor);
            }
        }

        let proposal = self
            .proposals
            .get_mut(&proposal_id)
            .expect("Proposal should exist");
        proposal.status = ProposalStatus::Executed;

        log!("Executed proposal {} ({})", proposal_id, action.kind());
        GovernanceEvent::ProposalExecuted {
            proposal_id,
            executor: caller.clone(),
        }
        .emit();

        Ok(())
    }

    /// Fails an `Active` proposal whose voting period has elapsed without
    /// reaching the threshold. Permissionless, like `execute_proposal`.
    pub fn finalize_expired(
        &mut self,
        group_id: u64,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        if !self.groups.contains_key(&group_id) {
            return Err(GovernanceError::GroupNotFound);
        }

        let proposal = self
            .proposals
            .get_mut(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound)?;
        if proposal.group_id != group_id {
            return Err(GovernanceError::InvalidProposal);
        }
        if proposal.status != ProposalStatus::Active {
            return Err(GovernanceError::AlreadyFinalized);
        }
        if env::block_timestamp_ms() < proposal.expires_at_ms {
            return Err(GovernanceError::VotingStillOpen);
        }

        proposal.status = ProposalStatus::Failed;

        log!("Proposal {} failed after voting period expired", proposal_id);
        GovernanceEvent::ProposalFailed { proposal_id }.emit();

        Ok(())
    }

    /// The release-authorization gate. Read-only and idempotent; the custodian
    /// service calls it before every release attempt. A release is permitted
    /// on `Passed` as well as `Executed`, since the whitelist bookkeeping and
    /// the secret release are independent actions that may race.
    pub fn authorize_release(
        &self,
        group_id: u64,
        proposal_id: u64,
        claimed_secret_id: &[u8],
        executor: &AccountId,
    ) -> Result<ReleaseVerdict, GovernanceError> {
        let group = self
            .groups
            .get(&group_id)
            .ok_or(GovernanceError::GroupNotFound)?;
        let proposal = self
            .proposals
            .get(&proposal_id)
            .ok_or(GovernanceError::ProposalNotFound)?;

        // Constant-time comparison: this gate is a security boundary.
        let id_matches = claimed_secret_id.len() == group.secret_id.len()
            && bool::from(claimed_secret_id.ct_eq(&group.secret_id));
        if !id_matches {
            return Ok(ReleaseVerdict::Denied {
                reason: DenialReason::IdentifierMismatch,
            });
        }
        if proposal.group_id != group.id {
            return Ok(ReleaseVerdict::Denied {
                reason: DenialReason::InvalidProposal,
            });
        }
        if !matches!(
            proposal.status,
            ProposalStatus::Passed | ProposalStatus::Executed
        ) {
            return Ok(ReleaseVerdict::Denied {
                reason: DenialReason::NotAuthorized,
            });
        }
        if !group.trusted_executors.contains(executor) {
            return Ok(ReleaseVerdict::Denied {
                reason: DenialReason::UntrustedExecutor,
            });
        }

        Ok(ReleaseVerdict::Authorized)
    }

    pub fn is_member(&self, group_id: u64, account_id: &AccountId) -> bool {
        self.groups
            .get(&group_id)
            .is_some_and(|group| group.members.contains(account_id))
    }

    pub fn is_trusted_executor(&self, group_id: u64, account_id: &AccountId) -> bool {
        self.groups
            .get(&group_id)
            .is_some_and(|group| group.trusted_executors.contains(account_id))
    }

    pub fn proposal_status(&self, proposal_id: u64) -> Option<ProposalStatus> {
        self.proposals
            .get(&proposal_id)
            .map(|proposal| proposal.status)
    }

    pub fn get_group(&self, group_id: u64) -> Option<GroupView> {
        self.groups.get(&group_id).map(GroupView::from)
    }

    pub fn get_proposal(&self, proposal_id: u64) -> Option<ProposalView> {
        self.proposals.get(&proposal_id).map(ProposalView::from)
    }

    pub fn get_proposals(&self, group_id: u64, limit: u32, offset: u32) -> Vec<ProposalView> {
        assert!(limit <= 100, "Limit exceeds maximum allowed value");
        let group = match self.groups.get(&group_id) {
            Some(group) => group,
            None => return Vec::new(),
        };
        group
            .proposal_ids
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .filter_map(|proposal_id| self.proposals.get(proposal_id).map(ProposalView::from))
            .collect()
    }

    pub fn migrate() -> Self {
        const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");
        let current_version =
            Version::parse(CURRENT_VERSION).expect("Invalid current version in Cargo.toml");

        let state_bytes = env::storage_read(STATE_KEY).unwrap_or_default();

        // Try current version
        if let Ok(state) = near_sdk::borsh::from_slice::<GovernanceContractState>(&state_bytes) {
            if let Ok(state_version) = Version::parse(&state.version) {
                if state_version >= current_version {
                    env::log_str("State is at current or newer version, no migration needed");
                    return state;
                }
            }
        }

        // Try version 0.1.0
        if let Ok(old_state) = near_sdk::borsh::from_slice::<StateV010>(&state_bytes) {
            if let Ok(old_version) = Version::parse(&old_state.version) {
                if old_version <= Version::parse("0.1.0").unwrap() {
                    env::log_str(&format!(
                        "Migrating from state version {}",
                        old_state.version
                    ));
                    let new_state = GovernanceContractState {
                        version: CURRENT_VERSION.to_string(),
                        groups: old_state.groups,
                        proposals: old_state.proposals,
                        next_group_id: old_state.next_group_id,
                        next_proposal_id: old_state.next_proposal_id,
                        default_voting_period_ms: DEFAULT_VOTING_PERIOD_MS,
                    };
                    GovernanceEvent::StateMigrated {
                        old_version: old_state.version,
                        new_version: CURRENT_VERSION.to_string(),
                    }
                    .emit();
                    return new_state;
                }
            }
        }

        // If no valid state was found or version is unknown, initialize a new state
        env::log_str("No valid prior state found or unknown version, initializing new state");
        Self::new()
    }
}

impl Default for GovernanceContractState {
    fn default() -> Self {
        Self::new()
    }
}
