use std::str::FromStr;

use anchor_lang::prelude::Pubkey;

use crate::error::{Result, SolpayError};

pub const STREAM_SEED: &[u8] = b"stream";

/// Anything a caller may hand us as an account holder: a parsed key,
/// raw bytes, or a base58 string straight from user input.
pub trait IntoIdentity {
    fn into_identity(self, role: &'static str) -> Result<Pubkey>;
}

impl IntoIdentity for Pubkey {
    fn into_identity(self, _role: &'static str) -> Result<Pubkey> {
        Ok(self)
    }
}

impl IntoIdentity for &Pubkey {
    fn into_identity(self, _role: &'static str) -> Result<Pubkey> {
        Ok(*self)
    }
}

impl IntoIdentity for [u8; 32] {
    fn into_identity(self, _role: &'static str) -> Result<Pubkey> {
        Ok(Pubkey::new_from_array(self))
    }
}

impl IntoIdentity for &[u8] {
    fn into_identity(self, role: &'static str) -> Result<Pubkey> {
        let bytes: [u8; 32] = self.try_into().map_err(|_| SolpayError::InvalidIdentity {
            role,
            reason: format!("expected 32 bytes, got {}", self.len()),
        })?;
        Ok(Pubkey::new_from_array(bytes))
    }
}

impl IntoIdentity for Vec<u8> {
    fn into_identity(self, role: &'static str) -> Result<Pubkey> {
        self.as_slice().into_identity(role)
    }
}

impl IntoIdentity for &str {
    fn into_identity(self, role: &'static str) -> Result<Pubkey> {
        Pubkey::from_str(self.trim()).map_err(|e| SolpayError::InvalidIdentity {
            role,
            reason: format!("{self:?} is not a base58 public key ({e})"),
        })
    }
}

impl IntoIdentity for String {
    fn into_identity(self, role: &'static str) -> Result<Pubkey> {
        self.as_str().into_identity(role)
    }
}

impl IntoIdentity for &String {
    fn into_identity(self, role: &'static str) -> Result<Pubkey> {
        self.as_str().into_identity(role)
    }
}

/// Resolves both parties of a stream. They must be different accounts.
pub fn resolve_parties(
    sender: impl IntoIdentity,
    recipient: impl IntoIdentity,
) -> Result<(Pubkey, Pubkey)> {
    let sender = sender.into_identity("sender")?;
    let recipient = recipient.into_identity("recipient")?;
    if sender == recipient {
        return Err(SolpayError::InvalidIdentity {
            role: "recipient",
            reason: "recipient must differ from sender".to_string(),
        });
    }
    Ok((sender, recipient))
}

/// Walks the bump seed down from 255 and returns the first address that is
/// off the ed25519 curve, i.e. one only `program_id` can sign for.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    search_bump(seeds, program_id, |seeds, program_id| {
        Pubkey::create_program_address(seeds, program_id).ok()
    })
}

/// Bump loop behind [`find_program_address`]. `derive` gets the seeds with
/// the candidate bump appended and returns `None` to reject it.
fn search_bump<F>(seeds: &[&[u8]], program_id: &Pubkey, derive: F) -> Result<(Pubkey, u8)>
where
    F: Fn(&[&[u8]], &Pubkey) -> Option<Pubkey>,
{
    let mut bump: u8 = 255;
    loop {
        let bump_seed = [bump];
        let mut seeds_with_bump = seeds.to_vec();
        seeds_with_bump.push(&bump_seed);

        if let Some(pda) = derive(&seeds_with_bump, program_id) {
            break Ok((pda, bump));
        } else if bump == 0 {
            break Err(SolpayError::DerivationExhausted);
        } else {
            bump -= 1;
        }
    }
}

pub fn find_stream_address(
    program_id: &Pubkey,
    sender: &Pubkey,
    recipient: &Pubkey,
) -> Result<(Pubkey, u8)> {
    find_program_address(&[STREAM_SEED, sender.as_ref(), recipient.as_ref()], program_id)
}

/// Associated token account of `owner` for `mint`. Works for program
/// addresses too, which is how the stream's vault is located.
pub fn token_account_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_program_address_vectors() {
        let program_id = Pubkey::from_str("BPFLoaderUpgradeab1e11111111111111111111111").unwrap();
        let seed_key = Pubkey::from_str("SeedPubey1111111111111111111111111111111111").unwrap();

        assert_eq!(
            Pubkey::create_program_address(&[b"Talking", b"Squirrels"], &program_id).unwrap(),
            Pubkey::from_str("2fnQrngrQT4SeLcdToJAD96phoEjNL2man2kfRLCASVk").unwrap(),
        );
        assert_eq!(
            Pubkey::create_program_address(&[seed_key.as_ref(), &[1]], &program_id).unwrap(),
            Pubkey::from_str("976ymqVnfE32QFe6NfGDctSvVa36LWnvYxhU6G2232YL").unwrap(),
        );
    }

    #[test]
    fn bump_search_matches_runtime() {
        for _ in 0..32 {
            let program_id = Pubkey::new_unique();
            let sender = Pubkey::new_unique();
            let recipient = Pubkey::new_unique();

            let ours = find_stream_address(&program_id, &sender, &recipient).unwrap();
            let runtime = Pubkey::find_program_address(
                &[STREAM_SEED, sender.as_ref(), recipient.as_ref()],
                &program_id,
            );
            assert_eq!(ours, runtime);
        }
    }

    #[test]
    fn every_bump_rejected() {
        let program_id = Pubkey::new_unique();
        let tried = std::cell::RefCell::new(Vec::new());

        let result = search_bump(&[STREAM_SEED], &program_id, |seeds, _| {
            tried.borrow_mut().push(seeds[seeds.len() - 1][0]);
            None
        });

        assert_eq!(result, Err(SolpayError::DerivationExhausted));
        let tried = tried.into_inner();
        assert_eq!(tried.len(), 256);
        assert_eq!((tried[0], tried[255]), (255, 0));
    }

    #[test]
    fn last_bump_still_accepted() {
        let program_id = Pubkey::new_unique();
        let found = search_bump(&[STREAM_SEED], &program_id, |seeds, program_id| {
            (seeds[1][0] == 0).then(|| *program_id)
        });
        assert_eq!(found, Ok((program_id, 0)));
    }

    #[test]
    fn stream_address_vector() {
        let program_id = Pubkey::new_from_array([7; 32]);
        let (stream, bump) = find_stream_address(
            &program_id,
            &Pubkey::new_from_array([1; 32]),
            &Pubkey::new_from_array([2; 32]),
        )
        .unwrap();

        assert_eq!(stream.to_string(), "9Qv5LPmhJCrbron44sLDxcofyVQQAa8nEsFu6Ft6hn1t");
        assert_eq!(bump, 254);
    }

    #[test]
    fn identity_lengths() {
        let short: &[u8] = &[1; 31];
        assert_eq!(
            short.into_identity("sender"),
            Err(SolpayError::InvalidIdentity {
                role: "sender",
                reason: "expected 32 bytes, got 31".to_string(),
            }),
        );
        assert!(vec![1u8; 33].into_identity("recipient").is_err());
        assert_eq!(vec![1u8; 32].into_identity("recipient"), Ok(Pubkey::new_from_array([1; 32])));
    }

    #[test]
    fn identity_strings() {
        let key = Pubkey::new_unique();
        assert_eq!(key.to_string().into_identity("sender"), Ok(key));
        assert!(matches!(
            "RECIPIENT_ADDRESS".into_identity("recipient"),
            Err(SolpayError::InvalidIdentity { role: "recipient", .. })
        ));
        assert!("".into_identity("recipient").is_err());
    }

    #[test]
    fn parties_must_differ() {
        let key = Pubkey::new_unique();
        assert!(matches!(
            resolve_parties(key, key),
            Err(SolpayError::InvalidIdentity { role: "recipient", .. })
        ));
    }
}
