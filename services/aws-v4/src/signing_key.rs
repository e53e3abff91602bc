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

use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use proxysign_core::hash::hmac_sha256;
use proxysign_core::time::{format_date, is_date_of, DateTime};
use proxysign_core::utils::Redact;
use proxysign_core::{Error, Result};

use crate::constants::AWS4_REQUEST;

/// Scope a signing key is valid for: `20150830/us-east-1/s3/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScope {
    date: String,
    value: String,
}

impl KeyScope {
    /// Create a new scope for `date` (formatted as `YYYYMMDD`).
    pub fn new(date: &str, region: &str, service: &str) -> Self {
        Self {
            date: date.to_string(),
            value: format!("{date}/{region}/{service}/{AWS4_REQUEST}"),
        }
    }

    /// The UTC date part of this scope.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The full scope string.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Display for KeyScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Signing key derived for one [`KeyScope`].
///
/// The key and its scope are always created together and never changed, so a
/// holder can't see a key of one day paired with the scope of another.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    key: Vec<u8>,
    scope: KeyScope,
}

impl SigningKey {
    /// Derive the signing key via the SigV4 HMAC chain:
    ///
    /// ```text
    /// kDate    = HMAC("AWS4" + secret, date)
    /// kRegion  = HMAC(kDate, region)
    /// kService = HMAC(kRegion, service)
    /// kSigning = HMAC(kService, "aws4_request")
    /// ```
    pub fn derive(secret: &str, date: &str, region: &str, service: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::config_invalid(
                "secret_key must not be empty to derive signing key",
            ));
        }

        let mut secret_key = Vec::new();
        secret_key.try_reserve_exact(4 + secret.len())?;
        secret_key.extend_from_slice(b"AWS4");
        secret_key.extend_from_slice(secret.as_bytes());

        let sign_date = hmac_sha256(&secret_key, date.as_bytes())?;
        let sign_region = hmac_sha256(&sign_date, region.as_bytes())?;
        let sign_service = hmac_sha256(&sign_region, service.as_bytes())?;
        let key = hmac_sha256(&sign_service, AWS4_REQUEST.as_bytes())?;

        Ok(Self {
            key,
            scope: KeyScope::new(date, region, service),
        })
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    /// Scope this key is valid for.
    pub fn scope(&self) -> &KeyScope {
        &self.scope
    }
}

impl Debug for SigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key", &"***")
            .field("scope", &self.scope)
            .finish()
    }
}

/// CredentialCache derives the daily signing key and keeps it until the UTC
/// date changes.
///
/// The cached key is published as a whole `Arc`, readers either see the old
/// pair or the new one. Two threads racing over a date rollover may both
/// derive the key; the last write wins and both results are identical.
pub struct CredentialCache {
    secret_access_key: String,
    region: String,
    service: String,

    key: RwLock<Option<Arc<SigningKey>>>,
}

impl CredentialCache {
    /// Create an empty cache. Nothing is derived until the first call to
    /// [`CredentialCache::get_signing_key`].
    pub fn new(secret_access_key: &str, region: &str, service: &str) -> Self {
        Self {
            secret_access_key: secret_access_key.to_string(),
            region: region.to_string(),
            service: service.to_string(),

            key: RwLock::new(None),
        }
    }

    /// Get the signing key valid for the UTC date of `now`.
    pub fn get_signing_key(&self, now: DateTime) -> Result<Arc<SigningKey>> {
        if let Some(key) = self.cached() {
            if is_date_of(key.scope().date(), now) {
                return Ok(key);
            }
        }

        let date = format_date(now);
        let key = Arc::new(SigningKey::derive(
            &self.secret_access_key,
            &date,
            &self.region,
            &self.service,
        )?);
        debug!("signing key refreshed for scope: {}", key.scope());

        *self.key.write().unwrap_or_else(PoisonError::into_inner) = Some(key.clone());
        Ok(key)
    }

    fn cached(&self) -> Option<Arc<SigningKey>> {
        self.key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Debug for CredentialCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("region", &self.region)
            .field("service", &self.service)
            .field("key", &self.cached())
            .finish()
    }
}
