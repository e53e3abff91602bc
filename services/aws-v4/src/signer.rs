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

use http::header::{HeaderValue, CONNECTION, HOST};
use http::request::Parts;
use http::HeaderMap;
use log::debug;
use proxysign_core::time::{format_iso8601, now};
use proxysign_core::{RequestContext, Result};

use crate::canonical::check_method;
use crate::constants::{UNSIGNED_HEADERS, UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE};
use crate::signature;
use crate::{AuthHeaders, CanonicalRequest, CredentialCache, HostPolicy, SignerConfig};

/// Signer that implements AWS SigV4 for proxied requests.
///
/// One signer is built per configured location and shared by every worker
/// handling it; the only state it mutates is its daily signing key.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug)]
pub struct Signer {
    config: SignerConfig,
    cache: CredentialCache,
}

impl Signer {
    /// Create a new signer for `config`.
    pub fn new(config: SignerConfig) -> Self {
        let cache = CredentialCache::new(
            &config.credential.secret_access_key,
            &config.region,
            &config.service,
        );

        Self { config, cache }
    }

    /// The config this signer was built with.
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign the request described by `ctx`.
    ///
    /// Returns `Ok(None)` if signing is disabled: the request should be
    /// passed through untouched. Otherwise returns the headers to add.
    ///
    /// The signed host is always the configured one, and the client's
    /// credentials and hop-by-hop headers are left out of the signature.
    pub fn sign(&self, ctx: &RequestContext) -> Result<Option<AuthHeaders>> {
        if !self.config.enabled {
            return Ok(None);
        }

        check_method(&ctx.method)?;
        self.config.validate()?;

        let key = self.cache.get_signing_key(ctx.timestamp)?;
        let scope = key.scope().as_str();
        debug!("calculated scope: {scope}");

        // The client's host names the proxy; the signed host is always the
        // one built from bucket and endpoint.
        let mut ctx = ctx.clone();
        ctx.headers.remove(HOST);
        strip_unsigned_headers(&mut ctx.headers);

        // x-amz-date and x-amz-content-sha256 are sent, so they must be signed too.
        ctx.headers.insert(
            X_AMZ_DATE,
            HeaderValue::try_from(format_iso8601(ctx.timestamp))?,
        );
        ctx.headers.insert(
            X_AMZ_CONTENT_SHA_256,
            HeaderValue::from_static(UNSIGNED_PAYLOAD),
        );

        let creq = CanonicalRequest::build(
            &ctx,
            &self.config.bucket_name,
            &self.config.endpoint,
            self.config.addressing,
        )?;
        let creq_string = creq.to_canonical_string()?;
        debug!("calculated canonical request: {creq_string}");

        let signature = signature::compute(&creq_string, key.as_bytes(), scope, ctx.timestamp)?;

        AuthHeaders::build(
            &signature,
            scope,
            &creq,
            &ctx,
            &self.config.credential.access_key_id,
        )
        .map(Some)
    }

    /// Sign `parts` at the current time and merge the resulting headers.
    ///
    /// Returns `false` if signing is disabled and `parts` were left as is.
    pub fn sign_parts(&self, parts: &mut Parts, host: HostPolicy) -> Result<bool> {
        let ctx = RequestContext::from_parts(parts, now());

        let Some(headers) = self.sign(&ctx)? else {
            return Ok(false);
        };
        headers.merge_into(&mut parts.headers, host);

        Ok(true)
    }
}

/// Remove the client's credentials and the hop-by-hop headers, including
/// those listed in `connection`.
fn strip_unsigned_headers(headers: &mut HeaderMap) {
    let listed = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>();

    for name in listed.iter().map(String::as_str).chain(UNSIGNED_HEADERS.iter().copied()) {
        headers.remove(name);
    }
}
