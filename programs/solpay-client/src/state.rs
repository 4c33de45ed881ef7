use anchor_lang::prelude::*;

use crate::error::SolpayError;
use crate::instructions::{sighash, DISCRIMINATOR_SIZE};

pub const PAYMENT_STREAM_SIZE: usize = DISCRIMINATOR_SIZE + 32 + 32 + 8 + 8 + 8 + 8 + 1;

/// On-chain record the program keeps at the stream address.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentStream {

    pub sender: Pubkey,

    pub recipient: Pubkey,

    /// Total deposit, released linearly between start and end
    pub amount: u64,

    pub start_time: i64,

    pub end_time: i64,

    /// Sum of everything already paid out to the recipient
    pub withdrawn_amount: u64,

    pub bump: u8,
}

impl PaymentStream {

    pub fn discriminator() -> [u8; DISCRIMINATOR_SIZE] {
        sighash("account", "PaymentStream")
    }

    pub fn try_from_account_data(data: &[u8]) -> std::result::Result<Self, SolpayError> {
        if data.len() < PAYMENT_STREAM_SIZE {
            return Err(SolpayError::InvalidStreamAccount(format!(
                "expected {PAYMENT_STREAM_SIZE} bytes, got {}",
                data.len()
            )));
        }
        if data[..DISCRIMINATOR_SIZE] != Self::discriminator() {
            return Err(SolpayError::InvalidStreamAccount(
                "account discriminator mismatch".to_string(),
            ));
        }
        let mut body = &data[DISCRIMINATOR_SIZE..];
        PaymentStream::deserialize(&mut body)
            .map_err(|e| SolpayError::InvalidStreamAccount(e.to_string()))
    }

    /// Amount released to the recipient by `now` on the linear schedule,
    /// whether or not it has been withdrawn yet. Elapsed time is capped at
    /// the stream length here. The deployed program does not cap it, so a
    /// withdrawal after `end_time` asks for more than the deposit and the
    /// token transfer fails; see [`PaymentStream::is_past_end`].
    pub fn vested_amount_at(&self, now: i64) -> u64 {
        let total_time = self.end_time.saturating_sub(self.start_time);
        if total_time <= 0 {
            return if now >= self.start_time { self.amount } else { 0 };
        }
        let elapsed_time = now.saturating_sub(self.start_time).clamp(0, total_time);

        // elapsed <= total, so the quotient never exceeds amount
        ((self.amount as u128) * (elapsed_time as u128) / (total_time as u128)) as u64
    }

    pub fn withdrawable_amount_at(&self, now: i64) -> u64 {
        self.vested_amount_at(now).saturating_sub(self.withdrawn_amount)
    }

    /// Whether `now` is after the end of the release period, where the
    /// program refuses withdrawals.
    pub fn is_past_end(&self, now: i64) -> bool {
        now > self.end_time
    }

    pub fn is_fully_withdrawn(&self) -> bool {
        self.withdrawn_amount >= self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_DAY: i64 = 86_400;

    fn day_long_stream() -> PaymentStream {
        PaymentStream {
            sender: Pubkey::new_unique(),
            recipient: Pubkey::new_unique(),
            amount: 100,
            start_time: 1_000,
            end_time: 1_000 + ONE_DAY,
            withdrawn_amount: 0,
            bump: 254,
        }
    }

    fn account_data(stream: &PaymentStream) -> Vec<u8> {
        let mut data = PaymentStream::discriminator().to_vec();
        data.extend(stream.try_to_vec().unwrap());
        data
    }

    #[test]
    fn account_discriminator() {
        assert_eq!(PaymentStream::discriminator(), [124, 85, 193, 22, 93, 1, 143, 75]);
    }

    #[test]
    fn decode_account() {
        let stream = day_long_stream();
        let data = account_data(&stream);

        assert_eq!(data.len(), PAYMENT_STREAM_SIZE);
        assert_eq!(PaymentStream::try_from_account_data(&data), Ok(stream));
    }

    #[test]
    fn reject_foreign_accounts() {
        let mut data = account_data(&day_long_stream());
        data[0] ^= 0xff;
        assert!(matches!(
            PaymentStream::try_from_account_data(&data),
            Err(SolpayError::InvalidStreamAccount(_))
        ));
        assert!(PaymentStream::try_from_account_data(&data[..40]).is_err());
    }

    #[test]
    fn linear_release() {
        let mut stream = day_long_stream();

        assert_eq!(stream.vested_amount_at(0), 0);
        assert_eq!(stream.vested_amount_at(1_000), 0);
        assert_eq!(stream.vested_amount_at(1_000 + ONE_DAY / 2), 50);
        assert_eq!(stream.vested_amount_at(1_000 + ONE_DAY), 100);
        assert_eq!(stream.vested_amount_at(1_000 + 10 * ONE_DAY), 100);

        stream.withdrawn_amount = 50;
        assert_eq!(stream.withdrawable_amount_at(1_000 + ONE_DAY / 4), 0);
        assert_eq!(stream.withdrawable_amount_at(1_000 + ONE_DAY), 50);
        assert!(!stream.is_fully_withdrawn());
    }

    #[test]
    fn release_period_end() {
        let stream = day_long_stream();
        assert!(!stream.is_past_end(1_000 + ONE_DAY / 2));
        assert!(!stream.is_past_end(1_000 + ONE_DAY));
        assert!(stream.is_past_end(1_000 + ONE_DAY + 1));
        // schedule stays capped at the deposit past the end
        assert_eq!(stream.vested_amount_at(1_000 + ONE_DAY + 1), stream.amount);
    }

    #[test]
    fn large_amounts_do_not_overflow() {
        let mut stream = day_long_stream();
        stream.amount = u64::MAX;
        assert_eq!(stream.vested_amount_at(1_000 + ONE_DAY), u64::MAX);
        assert_eq!(stream.vested_amount_at(1_000 + ONE_DAY / 2), u64::MAX / 2);
    }
}
