pub mod address;
pub mod config;
pub mod error;
pub mod instructions;
pub mod request;
pub mod session;
pub mod state;
pub mod transport;

use address::IntoIdentity;
use config::ProgramConfig;
use error::Result;
use request::{StreamParameters, StreamRequest};

pub use error::SolpayError;
pub use session::SolpayClient;

/// Assembles a `create_stream` call: `sender` deposits `params.amount`
/// into a vault released to `recipient` over `params.duration` seconds.
pub fn build_create_request(
    config: &ProgramConfig,
    sender: impl IntoIdentity,
    recipient: impl IntoIdentity,
    params: StreamParameters,
) -> Result<StreamRequest> {
    instructions::create_stream::build(config, sender, recipient, params)
}

/// Assembles a `withdraw` call for the stream between `sender` and
/// `recipient`. The recipient signs.
pub fn build_withdraw_request(
    config: &ProgramConfig,
    sender: impl IntoIdentity,
    recipient: impl IntoIdentity,
) -> Result<StreamRequest> {
    instructions::withdraw::build(config, sender, recipient)
}
