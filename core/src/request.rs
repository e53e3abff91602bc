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

use http::header::HeaderName;
use http::header::HOST;
use http::uri::PathAndQuery;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;

use crate::time::{self, DateTime};
use crate::Result;

/// Snapshot of an outgoing request taken once per signing call.
///
/// The snapshot owns its data; signing never touches the original request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method.
    pub method: Method,
    /// HTTP path, as sent on the wire (may be percent encoded).
    pub path: String,
    /// HTTP query parameters, percent decoded. Keys are not necessarily unique.
    pub query: Vec<(String, String)>,
    /// HTTP headers. Names are case-insensitive.
    pub headers: HeaderMap,
    /// The instant the request is signed at.
    pub timestamp: DateTime,
}

impl RequestContext {
    /// Create a context for `method` and `path`, signed at the current time.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            timestamp: time::now(),
        }
    }

    /// Build a context from `http::request::Parts` signed at `timestamp`.
    ///
    /// The query string is percent decoded pair by pair. The headers are
    /// cloned, so the parts stay untouched.
    pub fn from_parts(parts: &http::request::Parts, timestamp: DateTime) -> Self {
        let paq = parts
            .uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        RequestContext {
            method: parts.method.clone(),
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: parts.headers.clone(),
            timestamp,
        }
    }

    /// Set the signing time.
    pub fn with_timestamp(mut self, timestamp: DateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Push a new query pair into query list.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a header, keeping any value already present under the same name.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        self.headers
            .append(HeaderName::try_from(name)?, HeaderValue::try_from(value)?);
        Ok(self)
    }

    /// The host explicitly set on this request, if any.
    pub fn host(&self) -> Result<Option<&str>> {
        match self.headers.get(HOST) {
            Some(v) => Ok(Some(v.to_str()?)),
            None => Ok(None),
        }
    }
}
