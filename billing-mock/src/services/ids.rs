//! Identifier and filler generation.
//!
//! Identifiers are uniform random numbers of a fixed decimal width. They are
//! not guaranteed unique; the store re-rolls on a clash it can see.

use rand::distributions::Alphanumeric;
use rand::Rng;

pub const ACCT_NO_DIGITS: u32 = 7;
pub const PLAN_NO_DIGITS: u32 = 7;
pub const SERVICE_NO_DIGITS: u32 = 7;
pub const USAGE_TYPE_NO_DIGITS: u32 = 7;
pub const CREDIT_NO_DIGITS: u32 = 8;
pub const BILLING_GROUP_NO_DIGITS: u32 = 9;
pub const DUNNING_GROUP_NO_DIGITS: u32 = 9;
pub const PLAN_INSTANCE_NO_DIGITS: u32 = 9;
pub const CONTACT_NO_DIGITS: u32 = 8;
pub const SESSION_ID_LEN: usize = 32;

/// Widest width whose range still fits in an `i64`.
const MAX_DIGITS: u32 = 18;

/// Random number in `[0, 10^digits)`. Zero digits yields 0.
pub fn number(digits: u32) -> i64 {
    if digits == 0 {
        return 0;
    }
    let upper = 10_i64.pow(digits.min(MAX_DIGITS));
    rand::thread_rng().gen_range(0..upper)
}

/// Random string of `len` decimal digits.
pub fn digits(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Random alphanumeric string of `len` characters.
pub fn filler(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_stays_within_width() {
        for _ in 0..1_000 {
            let n = number(8);
            assert!((0..100_000_000).contains(&n));
        }
    }

    #[test]
    fn zero_width_number_is_zero() {
        assert_eq!(number(0), 0);
    }

    #[test]
    fn oversized_width_is_clamped() {
        assert!(number(40) >= 0);
    }

    #[test]
    fn empty_lengths_give_empty_strings() {
        assert_eq!(filler(0), "");
        assert_eq!(digits(0), "");
    }

    #[test]
    fn filler_and_digits_have_requested_shape() {
        let f = filler(24);
        assert_eq!(f.len(), 24);
        assert!(f.chars().all(|c| c.is_ascii_alphanumeric()));

        let d = digits(12);
        assert_eq!(d.len(), 12);
        assert!(d.chars().all(|c| c.is_ascii_digit()));
    }
}
