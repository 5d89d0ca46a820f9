//
// Copyright (c) 2025 rustmailer.com (https://rustmailer.com)
//
// This file is part of the Aliasd Mailbox Settings Project
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use base64::{engine::general_purpose, Engine as _};
use ring::pbkdf2::{self, derive, verify};
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;

use crate::modules::error::code::ErrorCode;
use crate::modules::error::AliasdResult;
use crate::raise_error;

const SCHEME: &str = "pbkdf2-sha256";
const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 32;
const HASH_LEN: usize = 32;

/// Derives a storable hash from a user password or an alias token.
///
/// Layout: `pbkdf2-sha256$<iterations>$<salt>$<hash>`, salt and hash URL-safe base64.
pub fn hash_secret(secret: &str) -> AliasdResult<String> {
    internal_hash_secret(secret, ITERATIONS)
        .map_err(|_| raise_error!("Failed to hash secret.".into(), ErrorCode::InternalError))
}

/// Returns `false` for a wrong secret as well as for a malformed stored hash.
pub fn verify_secret(secret: &str, stored: &str) -> bool {
    internal_verify_secret(secret, stored).is_ok()
}

fn internal_hash_secret(secret: &str, iterations: u32) -> Result<String, ring::error::Unspecified> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)?;
    let rounds = NonZeroU32::new(iterations).ok_or(ring::error::Unspecified)?;
    let mut hash = [0u8; HASH_LEN];
    derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        &salt,
        secret.as_bytes(),
        &mut hash,
    );
    Ok(format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        general_purpose::URL_SAFE_NO_PAD.encode(salt),
        general_purpose::URL_SAFE_NO_PAD.encode(hash)
    ))
}

fn internal_verify_secret(secret: &str, stored: &str) -> Result<(), ring::error::Unspecified> {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(ring::error::Unspecified);
    };
    if scheme != SCHEME {
        return Err(ring::error::Unspecified);
    }
    let rounds = iterations
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(ring::error::Unspecified)?;
    let salt = general_purpose::URL_SAFE_NO_PAD
        .decode(salt)
        .map_err(|_| ring::error::Unspecified)?;
    let hash = general_purpose::URL_SAFE_NO_PAD
        .decode(hash)
        .map_err(|_| ring::error::Unspecified)?;
    verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        &salt,
        secret.as_bytes(),
        &hash,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify() {
        let stored = internal_hash_secret("correct horse battery staple", 1_000).unwrap();
        assert!(stored.starts_with("pbkdf2-sha256$1000$"));
        assert!(verify_secret("correct horse battery staple", &stored));
        assert!(!verify_secret("correct horse battery", &stored));
    }

    #[test]
    fn test_same_secret_gets_distinct_salts() {
        let a = internal_hash_secret("token", 1_000).unwrap();
        let b = internal_hash_secret("token", 1_000).unwrap();
        assert_ne!(a, b);
        assert!(verify_secret("token", &a));
        assert!(verify_secret("token", &b));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_secret("token", ""));
        assert!(!verify_secret("token", "pbkdf2-sha256$0$AAAA$AAAA"));
        assert!(!verify_secret("token", "md5$1000$AAAA$AAAA"));
        assert!(!verify_secret("token", "pbkdf2-sha256$1000$!!$AAAA"));
    }
}
