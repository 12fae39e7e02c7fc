//! Wire vocabulary of the piloting protocol: the sentinel, the read
//! deadlines, the exact server command strings, the per-message length
//! ceilings and the parsers for the three structured client messages.

use crate::net::shared::{SessionError, SessionResult};
use std::str;
use std::time::Duration;

/// Two-byte terminator closing every message in both directions.
pub const SENTINEL: &[u8] = b"\x07\x08";

/// Read deadline outside a recharge interlude.
pub const READ_DEADLINE: Duration = Duration::from_secs(1);
/// Read deadline while the client recharges.
pub const RECHARGE_DEADLINE: Duration = Duration::from_secs(5);

pub const SERVER_MOVE: &[u8] = b"102 MOVE\x07\x08";
pub const SERVER_TURN_LEFT: &[u8] = b"103 TURN LEFT\x07\x08";
pub const SERVER_TURN_RIGHT: &[u8] = b"104 TURN RIGHT\x07\x08";
pub const SERVER_PICK_UP: &[u8] = b"105 GET MESSAGE\x07\x08";
pub const SERVER_LOGOUT: &[u8] = b"106 LOGOUT\x07\x08";
pub const SERVER_KEY_REQUEST: &[u8] = b"107 KEY REQUEST\x07\x08";
pub const SERVER_OK: &[u8] = b"200 OK\x07\x08";
pub const SERVER_LOGIN_FAILED: &[u8] = b"300 LOGIN FAILED\x07\x08";
pub const SERVER_SYNTAX_ERROR: &[u8] = b"301 SYNTAX ERROR\x07\x08";
pub const SERVER_LOGIC_ERROR: &[u8] = b"302 LOGIC ERROR\x07\x08";
pub const SERVER_KEY_OUT_OF_RANGE: &[u8] = b"303 KEY OUT OF RANGE\x07\x08";

pub const CLIENT_RECHARGING: &[u8] = b"RECHARGING\x07\x08";
pub const CLIENT_FULL_POWER: &[u8] = b"FULL POWER\x07\x08";

/// On-wire length ceilings, sentinel included. A read that hits its
/// ceiling without a sentinel is a syntax failure, though the framer
/// never caps below [`CEILING_RECHARGE`] since a recharge interlude may
/// pre-empt any read.
pub const CEILING_USERNAME: usize = 20;
pub const CEILING_KEY_ID: usize = 5;
pub const CEILING_CONFIRMATION: usize = 7;
pub const CEILING_CLIENT_OK: usize = 12;
pub const CEILING_RECHARGE: usize = 12;
pub const CEILING_SECRET: usize = 100;

/// Message content without the trailing sentinel.
#[inline]
pub fn content(frame: &[u8]) -> &[u8] {
    &frame[..frame.len() - SENTINEL.len()]
}

/// Encodes a confirmation number as decimal ASCII plus the sentinel.
#[inline]
pub fn confirmation_frame(value: u16) -> Vec<u8> {
    let mut frame = value.to_string().into_bytes();
    frame.extend_from_slice(SENTINEL);
    frame
}

/// Parses a key id frame. Digits only; the range check is the key table
/// lookup, not this parser. The integer is wide enough that any digit
/// string fitting under the lifted framing cap parses without overflow.
pub fn parse_key_id(frame: &[u8]) -> SessionResult<u64> {
    parse_decimal(content(frame)).ok_or(SessionError::Syntax)
}

/// Parses a client confirmation frame: decimal digits, at most a 5-digit
/// value. The recharge floor lifts the framing cap above the natural
/// ceiling, so the over-long value check has to live here.
pub fn parse_confirmation(frame: &[u8]) -> SessionResult<u32> {
    let value = parse_decimal(content(frame)).ok_or(SessionError::Syntax)?;

    if value > 99999 {
        return Err(SessionError::Syntax);
    }

    Ok(value as u32)
}

/// Parses a position report of the form `OK <x> <y>`. Coordinate tokens
/// must match `-?[0-9]+` and fit a signed 32-bit integer.
pub fn parse_client_ok(frame: &[u8]) -> SessionResult<(i32, i32)> {
    let text = str::from_utf8(content(frame)).map_err(|_| SessionError::Syntax)?;
    let mut fields = text.split(' ');

    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some("OK"), Some(x), Some(y), None) => Ok((parse_coord(x)?, parse_coord(y)?)),
        _ => Err(SessionError::Syntax),
    }
}

fn parse_decimal(digits: &[u8]) -> Option<u64> {
    if digits.is_empty() || !digits.iter().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    str::from_utf8(digits).ok()?.parse().ok()
}

fn parse_coord(token: &str) -> SessionResult<i32> {
    let digits = token.strip_prefix('-').unwrap_or(token);

    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(SessionError::Syntax);
    }

    token.parse().map_err(|_| SessionError::Syntax)
}
