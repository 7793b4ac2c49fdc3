// src/db/ids.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::RecordId;

/// 15 random bytes encode to exactly 20 characters.
pub const RECORD_ID_BYTES: usize = 15;

/// New document id from the OS RNG. This is what the repository calls.
pub fn generate_record_id() -> RecordId {
    let mut rng = OsRng;
    RecordId::new(generate_id(&mut rng, RECORD_ID_BYTES))
}

/// URL-safe base64 (no padding) of `nbytes` random bytes, so ids can sit
/// in paths without escaping.
pub fn generate_id<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buf)
}
