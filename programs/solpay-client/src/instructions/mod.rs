pub mod create_stream;
pub mod withdraw;

use anchor_lang::solana_program::hash::hash;

pub const DISCRIMINATOR_SIZE: usize = 8;

/// First eight bytes of `sha256("<namespace>:<name>")`, the prefix the
/// program dispatches instructions and accounts on.
pub fn sighash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_SIZE] {
    let preimage = format!("{namespace}:{name}");
    let mut discriminator = [0u8; DISCRIMINATOR_SIZE];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..DISCRIMINATOR_SIZE]);
    discriminator
}
