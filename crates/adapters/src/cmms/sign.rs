// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request signing: lowercase hex HMAC-SHA256 of the URL minus its scheme.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub(crate) fn sign_url(secret: &str, url: &str) -> String {
    let unsigned = url.split_once("://").map_or(url, |(_, rest)| rest);
    // HMAC accepts keys of any length, so this cannot fail
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(unsigned.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
