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
use rand::RngCore;
use ring::rand::{SecureRandom, SystemRandom};

pub mod encrypt;

#[macro_export]
macro_rules! raise_error {
    ($message:expr, $code:expr) => {
        $crate::modules::error::AliasdError::Generic {
            message: $message,
            location: snafu::location!(),
            code: $code,
        }
    };
}

#[macro_export]
macro_rules! utc_now {
    () => {
        chrono::Utc::now().timestamp_millis()
    };
}

/// Random, non-zero identifier using at most `bits` bits.
#[macro_export]
macro_rules! id {
    ($bits:expr) => {
        $crate::modules::utils::random_id($bits)
    };
}

/// URL-safe random secret carrying `bits` bits of entropy.
#[macro_export]
macro_rules! generate_token {
    ($bits:expr) => {
        $crate::modules::utils::random_token($bits)
    };
}

#[macro_export]
macro_rules! aliasd_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

pub fn random_id(bits: u32) -> u64 {
    let bits = bits.clamp(1, 63);
    let mask = (1u64 << bits) - 1;
    loop {
        let id = rand::random::<u64>() & mask;
        if id != 0 {
            return id;
        }
    }
}

pub fn random_token(bits: usize) -> String {
    let mut bytes = vec![0u8; bits.div_ceil(8).max(16)];
    let rng = SystemRandom::new();
    if rng.fill(&mut bytes).is_err() {
        // SystemRandom only fails when the OS entropy source is unavailable.
        rand::rng().fill_bytes(&mut bytes);
    }
    general_purpose::URL_SAFE_NO_PAD.encode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_respect_bit_width() {
        for _ in 0..1000 {
            let id = random_id(53);
            assert!(id > 0);
            assert!(id < (1u64 << 53));
        }
    }

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = random_token(128);
        let b = random_token(128);
        assert_ne!(a, b);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
