use crate::errors::GovernanceError;
use crate::state::GovernanceContractState;
use crate::types::{GroupView, ProposalAction, ProposalStatus, ProposalView, ReleaseVerdict};
use near_sdk::json_types::Base64VecU8;
use near_sdk::{env, near, AccountId, PanicOnDefault};

pub mod errors;
mod events;
pub mod state;
pub mod state_versions;
pub mod types;

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct CustodyGovernance {
    state: GovernanceContractState,
}

#[near]
impl CustodyGovernance {
    #[init]
    pub fn new() -> Self {
        Self {
            state: GovernanceContractState::new(),
        }
    }

    #[handle_result]
    pub fn create_group(
        &mut self,
        name: String,
        members: Vec<AccountId>,
        threshold: u32,
        secret_id: Base64VecU8,
        voting_period_ms: Option<u64>,
    ) -> Result<u64, GovernanceError> {
        self.state.create_group(
            &env::predecessor_account_id(),
            name,
            members,
            threshold,
            secret_id.0,
            voting_period_ms,
        )
    }

    #[handle_result]
    pub fn create_proposal(
        &mut self,
        group_id: u64,
        title: String,
        description: String,
        action: ProposalAction,
    ) -> Result<u64, GovernanceError> {
        self.state.create_proposal(
            &env::predecessor_account_id(),
            group_id,
            title,
            description,
            action,
        )
    }

    #[handle_result]
    pub fn vote(&mut self, group_id: u64, proposal_id: u64) -> Result<(), GovernanceError> {
        self.state
            .vote(&env::predecessor_account_id(), group_id, proposal_id)
    }

    #[handle_result]
    pub fn execute_proposal(
        &mut self,
        group_id: u64,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        self.state
            .execute_proposal(&env::predecessor_account_id(), group_id, proposal_id)
    }

    #[handle_result]
    pub fn finalize_expired(
        &mut self,
        group_id: u64,
        proposal_id: u64,
    ) -> Result<(), GovernanceError> {
        self.state.finalize_expired(group_id, proposal_id)
    }

    #[handle_result]
    pub fn authorize_release(
        &self,
        group_id: u64,
        proposal_id: u64,
        claimed_secret_id: Base64VecU8,
        executor: AccountId,
    ) -> Result<ReleaseVerdict, GovernanceError> {
        self.state
            .authorize_release(group_id, proposal_id, &claimed_secret_id.0, &executor)
    }

    pub fn is_member(&self, group_id: u64, account_id: AccountId) -> bool {
        self.state.is_member(group_id, &account_id)
    }

    pub fn is_trusted_executor(&self, group_id: u64, account_id: AccountId) -> bool {
        self.state.is_trusted_executor(group_id, &account_id)
    }

    pub fn proposal_status(&self, proposal_id: u64) -> Option<ProposalStatus> {
        self.state.proposal_status(proposal_id)
    }

    pub fn get_group(&self, group_id: u64) -> Option<GroupView> {
        self.state.get_group(group_id)
    }

    pub fn get_proposal(&self, proposal_id: u64) -> Option<ProposalView> {
        self.state.get_proposal(proposal_id)
    }

    pub fn get_proposals(&self, group_id: u64, limit: u32, offset: u32) -> Vec<ProposalView> {
        self.state.get_proposals(group_id, limit, offset)
    }

    #[private]
    #[init(ignore_state)]
    pub fn migrate() -> Self {
        Self {
            state: GovernanceContractState::migrate(),
        }
    }
}
