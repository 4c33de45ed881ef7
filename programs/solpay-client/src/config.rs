use std::env;
use std::str::FromStr;

use anchor_client::solana_sdk::commitment_config::CommitmentConfig;
use anchor_client::Cluster;
use anchor_lang::prelude::Pubkey;

use crate::address::IntoIdentity;
use crate::error::{Result, SolpayError};

pub const PROGRAM_ID_VAR: &str = "SOLPAY_PROGRAM_ID";
pub const MINT_VAR: &str = "SOLPAY_MINT";
pub const CLUSTER_VAR: &str = "SOLPAY_CLUSTER";
pub const COMMITMENT_VAR: &str = "SOLPAY_COMMITMENT";
pub const WALLET_VAR: &str = "SOLPAY_WALLET";

pub const DEFAULT_CLUSTER: &str = "devnet";
pub const DEFAULT_COMMITMENT: &str = "processed";
pub const DEFAULT_WALLET_PATH: &str = "~/.config/solana/id.json";

/// Everything the request builders need to know about the deployment:
/// which program owns the streams and which mint they are denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramConfig {
    pub program_id: Pubkey,
    pub mint: Pubkey,
}

impl ProgramConfig {
    pub fn new(program_id: Pubkey, mint: Pubkey) -> Self {
        ProgramConfig { program_id, mint }
    }

    pub fn from_env() -> Result<Self> {
        let program_id = required_var(PROGRAM_ID_VAR)?.into_identity("program")?;
        let mint = required_var(MINT_VAR)?.into_identity("mint")?;
        Ok(ProgramConfig { program_id, mint })
    }
}

/// Program config plus the connection settings a wallet session needs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub program: ProgramConfig,
    pub cluster: Cluster,
    pub commitment: CommitmentConfig,
    pub wallet_path: String,
}

impl ClientConfig {
    /// Reads `SOLPAY_*` variables, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let program = ProgramConfig::from_env()?;
        let cluster = parse_cluster(&optional_var(CLUSTER_VAR, DEFAULT_CLUSTER))?;
        let commitment = parse_commitment(&optional_var(COMMITMENT_VAR, DEFAULT_COMMITMENT))?;
        let wallet_path = shellexpand::tilde(&optional_var(WALLET_VAR, DEFAULT_WALLET_PATH)).into_owned();

        Ok(ClientConfig {
            program,
            cluster,
            commitment,
            wallet_path,
        })
    }
}

pub fn parse_cluster(value: &str) -> Result<Cluster> {
    Cluster::from_str(value)
        .map_err(|e| SolpayError::Config(format!("{CLUSTER_VAR}={value}: {e}")))
}

pub fn parse_commitment(value: &str) -> Result<CommitmentConfig> {
    match value {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(SolpayError::Config(format!(
            "{COMMITMENT_VAR}={other}: expected processed, confirmed or finalized"
        ))),
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| SolpayError::Config(format!("{name} must be set")))
}

fn optional_var(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_names() {
        assert_eq!(parse_commitment("processed").unwrap(), CommitmentConfig::processed());
        assert_eq!(parse_commitment("finalized").unwrap(), CommitmentConfig::finalized());
        assert!(matches!(parse_commitment("eventually"), Err(SolpayError::Config(_))));
    }

    #[test]
    fn cluster_names() {
        assert!(matches!(parse_cluster("devnet").unwrap(), Cluster::Devnet));
        assert!(matches!(parse_cluster("localnet").unwrap(), Cluster::Localnet));
    }
}
