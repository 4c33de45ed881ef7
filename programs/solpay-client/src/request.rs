use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::{InstructionData, ToAccountMetas};

use crate::error::{Result, SolpayError};
use crate::instructions::create_stream::{CreateStreamAccounts, CreateStreamArgs};
use crate::instructions::withdraw::{WithdrawAccounts, WithdrawArgs};

/// Deposit and release period of a new stream. `amount` is in the
/// mint's base units, `duration` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamParameters {
    pub amount: u64,
    pub duration: i64,
}

impl StreamParameters {
    pub fn new(amount: u64, duration: i64) -> Self {
        StreamParameters { amount, duration }
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(SolpayError::InvalidParameters("amount must be greater than zero"));
        }
        if self.duration <= 0 {
            return Err(SolpayError::InvalidParameters("duration must be greater than zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Withdraw,
}

/// One call into the program with everything it needs. A create always
/// carries its deposit parameters; a withdraw takes none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOperation {
    Create {
        accounts: CreateStreamAccounts,
        args: StreamParameters,
    },
    Withdraw {
        accounts: WithdrawAccounts,
    },
}

/// A fully resolved call into the stream program. Nothing here touches
/// the network; hand it to a [`crate::transport::StreamTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    pub program_id: Pubkey,
    pub mint: Pubkey,
    pub operation: StreamOperation,
}

impl StreamRequest {
    pub fn kind(&self) -> OperationKind {
        match self.operation {
            StreamOperation::Create { .. } => OperationKind::Create,
            StreamOperation::Withdraw { .. } => OperationKind::Withdraw,
        }
    }

    /// Deposit parameters, present only on a create.
    pub fn args(&self) -> Option<StreamParameters> {
        match self.operation {
            StreamOperation::Create { args, .. } => Some(args),
            StreamOperation::Withdraw { .. } => None,
        }
    }

    pub fn sender(&self) -> Pubkey {
        match &self.operation {
            StreamOperation::Create { accounts, .. } => accounts.sender,
            StreamOperation::Withdraw { accounts } => accounts.sender,
        }
    }

    pub fn recipient(&self) -> Pubkey {
        match &self.operation {
            StreamOperation::Create { accounts, .. } => accounts.recipient,
            StreamOperation::Withdraw { accounts } => accounts.recipient,
        }
    }

    pub fn stream(&self) -> Pubkey {
        match &self.operation {
            StreamOperation::Create { accounts, .. } => accounts.stream,
            StreamOperation::Withdraw { accounts } => accounts.stream,
        }
    }

    pub fn vault(&self) -> Pubkey {
        match &self.operation {
            StreamOperation::Create { accounts, .. } => accounts.vault,
            StreamOperation::Withdraw { accounts } => accounts.vault,
        }
    }

    /// The wallet that has to sign: the sender funds a stream, the
    /// recipient pulls from it.
    pub fn signer(&self) -> Pubkey {
        match self.kind() {
            OperationKind::Create => self.sender(),
            OperationKind::Withdraw => self.recipient(),
        }
    }

    /// Associated token accounts the program expects to exist already,
    /// as `(owner, address)` pairs.
    pub fn token_accounts_to_open(&self) -> Vec<(Pubkey, Pubkey)> {
        match &self.operation {
            StreamOperation::Create { accounts, .. } => vec![(accounts.stream, accounts.vault)],
            StreamOperation::Withdraw { accounts } => {
                vec![(accounts.recipient, accounts.recipient_token)]
            }
        }
    }

    pub fn data(&self) -> Vec<u8> {
        match self.operation {
            StreamOperation::Create { args, .. } => CreateStreamArgs::from(args).data(),
            StreamOperation::Withdraw { .. } => WithdrawArgs.data(),
        }
    }

    pub fn instruction(&self) -> Instruction {
        let accounts = match &self.operation {
            StreamOperation::Create { accounts, .. } => accounts.to_account_metas(None),
            StreamOperation::Withdraw { accounts } => accounts.to_account_metas(None),
        };
        Instruction {
            program_id: self.program_id,
            accounts,
            data: self.data(),
        }
    }
}
