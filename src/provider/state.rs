//! CSRF state issuance and verification.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	callback::Callback,
	session::{STATE_KEY, SessionStore},
};

const NONCE_LEN: usize = 64;

/// Generates a fresh 43-character state token.
///
/// The token is the URL-safe base64 (unpadded) SHA-256 digest of a random alphanumeric nonce.
pub fn generate() -> String {
	let nonce = rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect::<String>();
	let digest = Sha256::digest(nonce.as_bytes());

	URL_SAFE_NO_PAD.encode(digest)
}

/// Stores `state` in the session slot, replacing any earlier value.
pub fn store(session: &dyn SessionStore, state: &str) {
	session.put(STATE_KEY, state.to_owned());
}

/// Compares the stored state with the one echoed by the callback.
///
/// Fails closed: an absent or empty stored value, an absent callback value, or any byte
/// difference yields [`Error::InvalidState`].
pub fn verify(session: &dyn SessionStore, callback: &Callback) -> Result<()> {
	let stored = session.get(STATE_KEY).filter(|state| !state.is_empty());

	match (stored, callback.state()) {
		(Some(stored), Some(echoed)) if stored == echoed => Ok(()),
		_ => Err(Error::InvalidState),
	}
}
