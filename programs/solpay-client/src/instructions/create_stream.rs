use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;
use anchor_lang::solana_program::{system_program, sysvar};
use anchor_lang::{InstructionData, ToAccountMetas};
use anchor_spl::token::ID as TOKEN_PROGRAM_ID;

use super::sighash;
use crate::address::{find_stream_address, resolve_parties, token_account_address, IntoIdentity};
use crate::config::ProgramConfig;
use crate::error::Result;
use crate::request::{StreamOperation, StreamParameters, StreamRequest};

pub fn build(
    config: &ProgramConfig,
    sender: impl IntoIdentity,
    recipient: impl IntoIdentity,
    params: StreamParameters,
) -> Result<StreamRequest> {

    // Reject bad parties and parameters before deriving anything
    let (sender, recipient) = resolve_parties(sender, recipient)?;
    params.validate()?;

    // Stream PDA, and the token accounts on both ends of the deposit
    let (stream, bump) = find_stream_address(&config.program_id, &sender, &recipient)?;
    let sender_token = token_account_address(&sender, &config.mint);
    let vault = token_account_address(&stream, &config.mint);
    log::debug!("create_stream: stream {stream} (bump {bump}), vault {vault}");

    Ok(StreamRequest {
        program_id: config.program_id,
        mint: config.mint,
        operation: StreamOperation::Create {
            accounts: CreateStreamAccounts {
                sender,
                recipient,
                stream,
                sender_token,
                vault,
                system_program: system_program::ID,
                token_program: TOKEN_PROGRAM_ID,
                rent: sysvar::rent::ID,
            },
            args: params,
        },
    })
}


/// Accounts of the program's `create_stream` instruction, in the order
/// the program reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateStreamAccounts {

    /// Funds the stream and pays rent for the stream account
    pub sender: Pubkey,

    pub recipient: Pubkey,

    /// PDA at `[b"stream", sender, recipient]`, created by the instruction
    pub stream: Pubkey,

    /// Sender's associated token account for the mint
    pub sender_token: Pubkey,

    /// The stream's associated token account. Holds the deposit until
    /// the recipient withdraws it.
    pub vault: Pubkey,

    pub system_program: Pubkey,

    pub token_program: Pubkey,

    pub rent: Pubkey,
}

impl ToAccountMetas for CreateStreamAccounts {
    fn to_account_metas(&self, is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.sender, is_signer.unwrap_or(true)),
            AccountMeta::new_readonly(self.recipient, false),
            AccountMeta::new(self.stream, false),
            AccountMeta::new(self.sender_token, false),
            AccountMeta::new(self.vault, false),
            AccountMeta::new_readonly(self.system_program, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.rent, false),
        ]
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateStreamArgs {
    pub amount: u64,
    pub duration: i64,
}

impl From<StreamParameters> for CreateStreamArgs {
    fn from(params: StreamParameters) -> Self {
        CreateStreamArgs {
            amount: params.amount,
            duration: params.duration,
        }
    }
}

impl InstructionData for CreateStreamArgs {
    fn data(&self) -> Vec<u8> {
        let mut data = sighash("global", "create_stream").to_vec();
        data.extend_from_slice(&self.amount.to_le_bytes());
        data.extend_from_slice(&self.duration.to_le_bytes());
        data
    }
}
