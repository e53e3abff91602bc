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

use http::header::{AUTHORIZATION, HOST};
use http::{HeaderMap, HeaderName, HeaderValue};
use proxysign_core::time::format_iso8601;
use proxysign_core::{RequestContext, Result};

use crate::constants::{AWS4_HMAC_SHA256, UNSIGNED_PAYLOAD, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE};
use crate::CanonicalRequest;

/// What to do with a synthesized `host` header when merging into a request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HostPolicy {
    /// Drop it: the caller's upstream routing already controls `Host`.
    #[default]
    Discard,
    /// Insert it, replacing any `host` the request carried.
    Insert,
}

/// A header produced by signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Header name, always lowercase.
    pub name: HeaderName,
    /// Header value.
    pub value: HeaderValue,
    /// `true` for a `host` header the signer made up because the request had none.
    pub synthesized: bool,
}

/// Ordered list of headers to add to a signed request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders(Vec<AuthHeader>);

impl AuthHeaders {
    /// Build the headers:
    ///
    /// ```text
    /// authorization: AWS4-HMAC-SHA256 Credential=<ak>/<scope>, SignedHeaders=<sh>, Signature=<sig>
    /// x-amz-date: 20150830T123600Z
    /// x-amz-content-sha256: UNSIGNED-PAYLOAD
    /// host: <synthesized host>
    /// ```
    pub fn build(
        signature: &str,
        scope: &str,
        canonical_request: &CanonicalRequest,
        ctx: &RequestContext,
        access_key_id: &str,
    ) -> Result<Self> {
        let mut authorization = HeaderValue::try_from(format!(
            "{AWS4_HMAC_SHA256} Credential={access_key_id}/{scope}, SignedHeaders={}, Signature={signature}",
            canonical_request.signed_headers,
        ))?;
        authorization.set_sensitive(true);

        let mut headers = vec![
            AuthHeader {
                name: AUTHORIZATION,
                value: authorization,
                synthesized: false,
            },
            AuthHeader {
                name: HeaderName::from_static(X_AMZ_DATE),
                value: HeaderValue::try_from(format_iso8601(ctx.timestamp))?,
                synthesized: false,
            },
            AuthHeader {
                name: HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
                value: HeaderValue::from_static(UNSIGNED_PAYLOAD),
                synthesized: false,
            },
        ];

        if let Some(host) = &canonical_request.synthesized_host {
            headers.push(AuthHeader {
                name: HOST,
                value: HeaderValue::try_from(host.as_str())?,
                synthesized: true,
            });
        }

        Ok(Self(headers))
    }

    /// Iterate over the headers in order.
    pub fn iter(&self) -> impl Iterator<Item = &AuthHeader> {
        self.0.iter()
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there is no header.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the value of header `name`.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.0.iter().find(|h| h.name == name).map(|h| &h.value)
    }

    /// Merge the headers into `headers`, replacing existing values.
    ///
    /// The synthesized host follows `policy`.
    pub fn merge_into(&self, headers: &mut HeaderMap, policy: HostPolicy) {
        for h in &self.0 {
            if h.synthesized && policy == HostPolicy::Discard {
                continue;
            }
            headers.insert(h.name.clone(), h.value.clone());
        }
    }
}

impl IntoIterator for AuthHeaders {
    type Item = AuthHeader;
    type IntoIter = std::vec::IntoIter<AuthHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
