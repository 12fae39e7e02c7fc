//! Identity arithmetic for the challenge/response handshake. Every robot
//! authenticates against one of five shared-secret pairs; both sides
//! derive their confirmation numbers from the same 16-bit username hash.

/// Server/client secret pair behind one key id.
#[derive(Debug, Clone, Copy)]
pub struct KeyPair {
    pub server: u16,
    pub client: u16,
}

/// Fixed shared-secret table, indexed by key id.
pub const KEY_TABLE: [KeyPair; 5] = [
    KeyPair { server: 23019, client: 32037 },
    KeyPair { server: 32037, client: 29295 },
    KeyPair { server: 18789, client: 13603 },
    KeyPair { server: 16443, client: 29533 },
    KeyPair { server: 18189, client: 21952 },
];

/// Looks up the secret pair for a key id. A miss is the out-of-range
/// signal.
#[inline]
pub fn key_pair(id: u64) -> Option<&'static KeyPair> {
    if id < KEY_TABLE.len() as u64 {
        Some(&KEY_TABLE[id as usize])
    } else {
        None
    }
}

/// Username hash: the byte sum scaled by 1000 and folded into 16 bits.
/// Computed over the raw received bytes, so non-ASCII names hash the
/// bytes they arrived as.
#[inline]
pub fn username_hash(username: &[u8]) -> u16 {
    let sum: u32 = username.iter().map(|&byte| u32::from(byte)).sum();

    (sum.wrapping_mul(1000) % 65536) as u16
}

/// Confirmation number the server sends for a given username hash.
#[inline]
pub fn server_confirmation(hash: u16, keys: &KeyPair) -> u16 {
    hash.wrapping_add(keys.server)
}

/// Confirmation number the client must answer with.
#[inline]
pub fn client_confirmation(hash: u16, keys: &KeyPair) -> u16 {
    hash.wrapping_add(keys.client)
}
