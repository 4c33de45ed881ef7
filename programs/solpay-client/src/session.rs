use std::path::Path;
use std::rc::Rc;

use anchor_client::solana_sdk::pubkey::Pubkey;
use anchor_client::solana_sdk::signature::{read_keypair_file, Signature, Signer};
use anchor_client::Client;

use crate::address::{find_stream_address, resolve_parties, IntoIdentity};
use crate::config::{ClientConfig, ProgramConfig};
use crate::error::{Result, SolpayError};
use crate::request::{StreamParameters, StreamRequest};
use crate::state::PaymentStream;
use crate::transport::{AnchorTransport, StreamTransport};
use crate::{build_create_request, build_withdraw_request};

/// A connected wallet plus the deployment it talks to. The wallet is the
/// sender when creating streams and the recipient when withdrawing.
pub struct SolpayClient<T: StreamTransport> {
    wallet: Pubkey,
    config: ProgramConfig,
    transport: T,
}

impl SolpayClient<AnchorTransport> {

    /// Loads the wallet keypair and sets up an `anchor_client` provider
    /// for the configured cluster.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let path = Path::new(&config.wallet_path);
        if !path.exists() {
            return Err(SolpayError::WalletNotFound(config.wallet_path.clone()));
        }
        let wallet = Rc::new(read_keypair_file(path).map_err(|e| {
            SolpayError::Config(format!("unreadable keypair {}: {e}", config.wallet_path))
        })?);
        log::info!("Connected with public key: {}", wallet.pubkey());

        let client = Client::new_with_options(config.cluster.clone(), wallet.clone(), config.commitment);
        let program = client.program(config.program.program_id);
        let transport = AnchorTransport::new(program, wallet.clone(), config.commitment);

        Ok(SolpayClient {
            wallet: wallet.pubkey(),
            config: config.program,
            transport,
        })
    }
}

impl<T: StreamTransport> SolpayClient<T> {

    pub fn with_transport(wallet: impl IntoIdentity, config: ProgramConfig, transport: T) -> Result<Self> {
        Ok(SolpayClient {
            wallet: wallet.into_identity("wallet")?,
            config,
            transport,
        })
    }

    pub fn wallet(&self) -> Pubkey {
        self.wallet
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Streams `params.amount` from the wallet to `recipient`.
    pub fn create_stream(&self, recipient: impl IntoIdentity, params: StreamParameters) -> Result<Signature> {
        let request = build_create_request(&self.config, self.wallet, recipient, params)?;
        self.submit(&request)
    }

    /// Pulls whatever has been released so far from `sender`'s stream to
    /// the wallet.
    pub fn withdraw(&self, sender: impl IntoIdentity) -> Result<Signature> {
        let request = build_withdraw_request(&self.config, sender, self.wallet)?;
        self.submit(&request)
    }

    pub fn stream_state(
        &self,
        sender: impl IntoIdentity,
        recipient: impl IntoIdentity,
    ) -> Result<Option<PaymentStream>> {
        let (sender, recipient) = resolve_parties(sender, recipient)?;
        let (stream, _) = find_stream_address(&self.config.program_id, &sender, &recipient)?;
        self.transport
            .account_data(&stream)?
            .map(|data| PaymentStream::try_from_account_data(&data))
            .transpose()
    }

    fn submit(&self, request: &StreamRequest) -> Result<Signature> {
        match self.transport.submit(request) {
            Ok(signature) => {
                log::info!("{:?} on stream {} succeeded", request.kind(), request.stream());
                Ok(signature)
            }
            Err(e) => {
                log::error!("{:?} on stream {} failed: {e}", request.kind(), request.stream());
                Err(e)
            }
        }
    }
}
