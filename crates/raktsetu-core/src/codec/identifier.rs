//! RTID generation.
//!
//! Format: `RTID MMDD NNNNC`, where `MMDD` comes from the target date,
//! `NNNN` is a zero-padded number below 10000 and `C` an upper-case letter.

use rand::Rng;

/// Leading token of every tracking identifier.
pub const RTID_PREFIX: &str = "RTID";

/// Generate an RTID for a `YYYY-MM-DD` target date using the thread RNG.
pub fn generate_identifier(target_date: &str) -> String {
    generate_identifier_with(target_date, &mut rand::thread_rng())
}

/// Generate an RTID drawing randomness from `rng`.
///
/// Month and day are cut from fixed offsets of the input without parsing.
/// Input that is too short yields empty segments rather than an error.
pub fn generate_identifier_with<R: Rng + ?Sized>(target_date: &str, rng: &mut R) -> String {
    let month = target_date.get(5..7).unwrap_or("");
    let day = target_date.get(8..10).unwrap_or("");

    let serial: u16 = rng.gen_range(0..10_000);
    let suffix = char::from(b'A' + rng.gen_range(0..26u8));

    format!("{RTID_PREFIX} {month}{day} {serial:04}{suffix}")
}

/// Check that a string has the shape `RTID dddd ddddL`.
pub fn is_well_formed(rtid: &str) -> bool {
    let mut parts = rtid.split(' ');
    let (Some(prefix), Some(date), Some(tail), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let tail = tail.as_bytes();
    prefix == RTID_PREFIX
        && date.len() == 4
        && date.bytes().all(|b| b.is_ascii_digit())
        && tail.len() == 5
        && tail[..4].iter().all(u8::is_ascii_digit)
        && tail[4].is_ascii_uppercase()
}
