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

use http::header::HOST;
use http::HeaderMap;
use http::Method;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use proxysign_core::{Error, RequestContext, Result};

use crate::constants::{AWS_URI_ENCODE_SET, UNSIGNED_PAYLOAD};
use crate::AddressingStyle;

/// CanonicalRequest is the normalized form of a request that gets hashed
/// into the string to sign.
///
/// ```text
/// GET
/// /test.txt
///
/// host:examplebucket.s3.amazonaws.com
/// x-amz-date:20150830T123600Z
///
/// host;x-amz-date
/// UNSIGNED-PAYLOAD
/// ```
///
/// - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// HTTP method.
    pub method: Method,
    /// Canonical URI.
    pub uri: String,
    /// Canonical query string.
    pub query: String,
    /// Canonical headers, one `name:value\n` line per header.
    pub headers: String,
    /// Signed header names joined by `;`.
    pub signed_headers: String,
    /// Payload hash, always `UNSIGNED-PAYLOAD`.
    pub payload_hash: &'static str,
    /// Host value added because the request carried none.
    pub synthesized_host: Option<String>,
}

impl CanonicalRequest {
    /// Build the canonical request for `ctx`.
    ///
    /// Only GET and HEAD are accepted: requests with a body would need their
    /// payload hashed, which is not supported.
    pub fn build(
        ctx: &RequestContext,
        bucket_name: &str,
        endpoint: &str,
        addressing: AddressingStyle,
    ) -> Result<Self> {
        check_method(&ctx.method)?;

        let uri = match addressing {
            AddressingStyle::VirtualHosted => canonical_uri(&ctx.path)?,
            AddressingStyle::Path => {
                let path = ctx.path.strip_prefix('/').unwrap_or(&ctx.path);
                canonical_uri(&format!("/{bucket_name}/{path}"))?
            }
        };

        let (host, synthesized_host) = match ctx.host()? {
            Some(host) => (host.to_string(), None),
            None => {
                let host = match addressing {
                    AddressingStyle::VirtualHosted => format!("{bucket_name}.{endpoint}"),
                    AddressingStyle::Path => endpoint.to_string(),
                };
                (host.clone(), Some(host))
            }
        };
        let (headers, signed_headers) = canonical_headers(&ctx.headers, &host)?;

        Ok(Self {
            method: ctx.method.clone(),
            uri,
            query: canonical_query(&ctx.query),
            headers,
            signed_headers,
            payload_hash: UNSIGNED_PAYLOAD,
            synthesized_host,
        })
    }

    /// Render the canonical request string.
    pub fn to_canonical_string(&self) -> Result<String> {
        let method = self.method.as_str();
        let size = method.len()
            + self.uri.len()
            + self.query.len()
            + self.headers.len()
            + self.signed_headers.len()
            + self.payload_hash.len()
            + 5;

        let mut f = String::new();
        f.try_reserve_exact(size)?;

        writeln!(f, "{method}")?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        writeln!(f, "{}", self.headers)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)?;

        Ok(f)
    }
}

/// Reject every method that may carry a body.
pub fn check_method(method: &Method) -> Result<()> {
    if method == Method::GET || method == Method::HEAD {
        return Ok(());
    }

    Err(Error::unsupported_method(format!(
        "{method} can't be signed, only GET and HEAD are supported"
    )))
}

/// Encode the path segment by segment.
///
/// Each segment is decoded first so that already encoded paths are not
/// encoded twice.
pub fn canonical_uri(path: &str) -> Result<String> {
    if path.is_empty() {
        return Ok("/".to_string());
    }

    let mut uri = String::with_capacity(path.len());
    if !path.starts_with('/') {
        uri.push('/');
    }
    for (idx, segment) in path.split('/').enumerate() {
        if idx > 0 {
            uri.push('/');
        }

        let segment = percent_decode_str(segment).decode_utf8().map_err(|e| {
            Error::request_invalid(format!("path {path:?} is not valid utf-8")).with_source(e)
        })?;
        uri.extend(utf8_percent_encode(&segment, &AWS_URI_ENCODE_SET));
    }

    Ok(uri)
}

/// Encode every key and value, then sort by encoded key and value.
pub fn canonical_query(query: &[(String, String)]) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut pairs = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_URI_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_URI_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort_unstable();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical headers block and the signed headers list.
///
/// `host` replaces any host header in `headers`, so it is always signed.
pub fn canonical_headers(headers: &HeaderMap, host: &str) -> Result<(String, String)> {
    let mut names = headers
        .keys()
        .filter(|k| **k != HOST)
        .map(|k| k.as_str())
        .collect::<Vec<_>>();
    names.push(HOST.as_str());
    names.sort_unstable();

    let mut block = String::new();
    for name in &names {
        block.push_str(name);
        block.push(':');
        if *name == HOST.as_str() {
            block.push_str(&normalize_header_value(host));
        } else {
            for (idx, value) in headers.get_all(*name).iter().enumerate() {
                if idx > 0 {
                    block.push(',');
                }
                let value = value.to_str().map_err(|e| {
                    Error::request_invalid(format!("header {name} is not visible ascii"))
                        .with_source(e)
                })?;
                block.push_str(&normalize_header_value(value));
            }
        }
        block.push('\n');
    }

    Ok((block, names.join(";")))
}

/// Trim the value and collapse every internal whitespace run into one space.
pub fn normalize_header_value(value: &str) -> String {
    value.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}
