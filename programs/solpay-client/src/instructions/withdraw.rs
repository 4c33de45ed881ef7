use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::AccountMeta;
use anchor_lang::{InstructionData, ToAccountMetas};
use anchor_spl::token::ID as TOKEN_PROGRAM_ID;

use super::sighash;
use crate::address::{find_stream_address, resolve_parties, token_account_address, IntoIdentity};
use crate::config::ProgramConfig;
use crate::error::Result;
use crate::request::{StreamOperation, StreamRequest};

pub fn build(
    config: &ProgramConfig,
    sender: impl IntoIdentity,
    recipient: impl IntoIdentity,
) -> Result<StreamRequest> {
    let (sender, recipient) = resolve_parties(sender, recipient)?;

    // Same stream and vault the create request derived
    let (stream, _) = find_stream_address(&config.program_id, &sender, &recipient)?;
    let vault = token_account_address(&stream, &config.mint);
    let recipient_token = token_account_address(&recipient, &config.mint);

    Ok(StreamRequest {
        program_id: config.program_id,
        mint: config.mint,
        operation: StreamOperation::Withdraw {
            accounts: WithdrawAccounts {
                sender,
                recipient,
                stream,
                vault,
                recipient_token,
                token_program: TOKEN_PROGRAM_ID,
            },
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawAccounts {

    /// Only used as a seed, never signs
    pub sender: Pubkey,

    /// Signs the withdrawal
    pub recipient: Pubkey,

    pub stream: Pubkey,

    pub vault: Pubkey,

    /// Recipient's associated token account for the mint
    pub recipient_token: Pubkey,

    pub token_program: Pubkey,
}

impl ToAccountMetas for WithdrawAccounts {
    fn to_account_metas(&self, is_signer: Option<bool>) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.sender, false),
            AccountMeta::new(self.recipient, is_signer.unwrap_or(true)),
            AccountMeta::new(self.stream, false),
            AccountMeta::new(self.vault, false),
            AccountMeta::new(self.recipient_token, false),
            AccountMeta::new_readonly(self.token_program, false),
        ]
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawArgs;

impl InstructionData for WithdrawArgs {
    fn data(&self) -> Vec<u8> {
        sighash("global", "withdraw").to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdraw_data_is_bare_discriminator() {
        assert_eq!(WithdrawArgs.data(), vec![183, 18, 70, 156, 148, 109, 161, 34]);
    }

    #[test]
    fn recipient_signs_withdrawal() {
        let accounts = WithdrawAccounts {
            sender: Pubkey::new_unique(),
            recipient: Pubkey::new_unique(),
            stream: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            recipient_token: Pubkey::new_unique(),
            token_program: TOKEN_PROGRAM_ID,
        };
        let metas = accounts.to_account_metas(None);

        assert_eq!(metas.len(), 6);
        assert!(!metas[0].is_signer && !metas[0].is_writable);
        assert_eq!(metas[1].pubkey, accounts.recipient);
        assert!(metas[1].is_signer && metas[1].is_writable);
        assert_eq!(metas.iter().filter(|m| m.is_signer).count(), 1);
    }
}
