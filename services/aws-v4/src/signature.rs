// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::Write;

use log::debug;
use proxysign_core::hash::{hex_hmac_sha256, hex_sha256};
use proxysign_core::time::{format_iso8601, DateTime};
use proxysign_core::Result;

use crate::constants::AWS4_HMAC_SHA256;

/// Build the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(canonical_request: &str, scope: &str, timestamp: DateTime) -> Result<String> {
    let encoded_req = hex_sha256(canonical_request.as_bytes());
    let timestamp = format_iso8601(timestamp);

    let mut f = String::new();
    f.try_reserve_exact(
        AWS4_HMAC_SHA256.len() + timestamp.len() + scope.len() + encoded_req.len() + 3,
    )?;

    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{timestamp}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{encoded_req}")?;

    Ok(f)
}

/// Compute the hex signature of `canonical_request` with a derived signing key.
pub fn compute(
    canonical_request: &str,
    signing_key: &[u8],
    scope: &str,
    timestamp: DateTime,
) -> Result<String> {
    let string_to_sign = string_to_sign(canonical_request, scope, timestamp)?;
    debug!("calculated string to sign: {string_to_sign}");

    hex_hmac_sha256(signing_key, string_to_sign.as_bytes())
}
