//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the remote
//! command channel) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

/// Maximum argument length accepted from a remote caller.
pub const MAX_ARG_LEN: usize = 64;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Remote `setRPM(arg)`; `arg` is parsed with [`parse_permissive_int`].
    SetRpm(heapless::String<MAX_ARG_LEN>),
}

/// Lenient decimal integer parse.
///
/// Leading whitespace is skipped, one optional sign is accepted, then the
/// longest run of ASCII digits is consumed.  Anything after that is
/// ignored.  No digits yields `0`.  Overflow saturates at the `i64` bounds.
pub fn parse_permissive_int(input: &str) -> i64 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }
    value
}
