use near_sdk::{env, FunctionError};
use near_sdk_macros::NearSchema;
use near_sdk::borsh::{BorshSerialize, BorshDeserialize};

#[derive(Debug, PartialEq, NearSchema, BorshSerialize, BorshDeserialize)]
#[abi(borsh)]
pub enum GovernanceError {
    NotMember,
    InvalidProposal,
    AlreadyVoted,
    AlreadyFinalized,
    NotPassed,
    IdentifierMismatch,
    NotAuthorized,
    UntrustedExecutor,
    InvalidThreshold,
    GroupNotFound,
    ProposalNotFound,
    VotingStillOpen,
    ProposalExpired,
}

impl FunctionError for GovernanceError {
    fn panic(&self) -> ! {
        env::panic_str(match self {
            GovernanceError::NotMember => "Caller is not a group member",
            GovernanceError::InvalidProposal => "Proposal does not belong to this group",
            GovernanceError::AlreadyVoted => "Caller has already voted on this proposal",
            GovernanceError::AlreadyFinalized => "Proposal is no longer active",
            GovernanceError::NotPassed => "Proposal has not passed",
            GovernanceError::IdentifierMismatch => "Secret identifier mismatch",
            GovernanceError::NotAuthorized => "Release not authorized by governance",
            GovernanceError::UntrustedExecutor => "Executor is not whitelisted",
            GovernanceError::InvalidThreshold => "Threshold must be between 1 and the member count",
            GovernanceError::GroupNotFound => "Group not found",
            GovernanceError::ProposalNotFound => "Proposal not found",
            GovernanceError::VotingStillOpen => "Voting period has not expired",
            GovernanceError::ProposalExpired => "Voting period has expired",
        })
    }
}
