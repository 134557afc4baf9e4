//! Fresh-id minting: base-36 millisecond timestamp plus a random base-36
//! suffix. Collisions would need two ids minted in the same millisecond
//! with the same 64-bit draw, which is good enough for a demo store.

use chrono::{DateTime, Utc};

/// Mint a fresh id for a ticket, user, or session token.
#[must_use]
pub fn generate_id(now: DateTime<Utc>) -> String {
    let millis = u128::from(now.timestamp_millis().unsigned_abs());
    let salt = u128::from(rand::random::<u64>());
    format!("{}{}", base36(millis), base36(salt))
}

fn base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
