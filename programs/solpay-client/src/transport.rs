use std::rc::Rc;

use anchor_client::solana_sdk::commitment_config::CommitmentConfig;
use anchor_client::solana_sdk::instruction::Instruction;
use anchor_client::solana_sdk::pubkey::Pubkey;
use anchor_client::solana_sdk::signature::{Keypair, Signature, Signer};
use anchor_client::Program;
use spl_associated_token_account::instruction::create_associated_token_account;

use crate::error::Result;
use crate::instructions::create_stream::CreateStreamArgs;
use crate::instructions::withdraw::WithdrawArgs;
use crate::request::{StreamOperation, StreamRequest};

/// Where built requests go. The builders never talk to the network; a
/// transport signs, submits and reads accounts on their behalf.
pub trait StreamTransport {

    fn submit(&self, request: &StreamRequest) -> Result<Signature>;

    /// Raw data of an account, `None` if it does not exist.
    fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;
}

/// Submits through `anchor_client`, signing with the connected wallet.
pub struct AnchorTransport {
    program: Program,
    wallet: Rc<Keypair>,
    commitment: CommitmentConfig,
}

impl AnchorTransport {
    pub fn new(program: Program, wallet: Rc<Keypair>, commitment: CommitmentConfig) -> Self {
        AnchorTransport {
            program,
            wallet,
            commitment,
        }
    }
}

/// Instructions that open whichever of the request's token accounts do
/// not exist yet, paid for by `payer`. The program takes them as already
/// initialized.
pub fn token_account_setup(
    request: &StreamRequest,
    payer: &Pubkey,
    transport: &impl StreamTransport,
) -> Result<Vec<Instruction>> {
    let mut setup = Vec::new();
    for (owner, address) in request.token_accounts_to_open() {
        if transport.account_data(&address)?.is_none() {
            log::info!("opening token account {address} for {owner}");
            setup.push(create_associated_token_account(payer, &owner, &request.mint));
        }
    }
    Ok(setup)
}

impl StreamTransport for AnchorTransport {

    fn submit(&self, request: &StreamRequest) -> Result<Signature> {
        let mut builder = self.program.request();
        for instruction in token_account_setup(request, &self.wallet.pubkey(), self)? {
            builder = builder.instruction(instruction);
        }

        builder = match request.operation {
            StreamOperation::Create { accounts, args } => {
                builder.accounts(accounts).args(CreateStreamArgs::from(args))
            }
            StreamOperation::Withdraw { accounts } => builder.accounts(accounts).args(WithdrawArgs),
        };

        let signature = builder
            .signer(&*self.wallet)
            .payer(self.wallet.clone())
            .send()?;
        log::info!("{:?} tx signature: {signature}", request.kind());
        Ok(signature)
    }

    fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let account = self
            .program
            .rpc()
            .get_account_with_commitment(address, self.commitment)?
            .value;
        Ok(account.map(|account| account.data))
    }
}
