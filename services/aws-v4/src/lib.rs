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

//! AWS SigV4 signer for requests proxied to S3-compatible object stores.
//!
//! The proxy owns the credentials; clients send plain requests and the
//! [`Signer`] adds `authorization`, `x-amz-date` and `x-amz-content-sha256`
//! before the request is forwarded.
//!
//! ```
//! use http::Method;
//! use proxysign_aws_v4::{Config, Signer};
//! use proxysign_core::RequestContext;
//!
//! # fn main() -> proxysign_core::Result<()> {
//! let config = Config {
//!     access_key: Some("AKIDEXAMPLE".to_string()),
//!     secret_key: Some("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY".to_string()),
//!     region: Some("us-east-1".to_string()),
//!     bucket_name: Some("examplebucket".to_string()),
//!     enabled: Some(true),
//!     ..Default::default()
//! }
//! .build()?;
//!
//! let signer = Signer::new(config);
//! let headers = signer
//!     .sign(&RequestContext::new(Method::GET, "/test.txt"))?
//!     .expect("signing is enabled");
//! assert!(headers.get("authorization").is_some());
//! # Ok(())
//! # }
//! ```
//!
//! Only GET and HEAD are signed; the payload is never hashed and is sent as
//! `UNSIGNED-PAYLOAD`.

mod constants;

mod credential;
pub use credential::Credential;

mod config;
pub use config::AddressingStyle;
pub use config::Config;
pub use config::SignerConfig;

mod locations;
pub use locations::ConfigFile;

mod signing_key;
pub use signing_key::CredentialCache;
pub use signing_key::KeyScope;
pub use signing_key::SigningKey;

pub mod canonical;
pub use canonical::CanonicalRequest;

pub mod signature;

mod headers;
pub use headers::AuthHeader;
pub use headers::AuthHeaders;
pub use headers::HostPolicy;

mod signer;
pub use signer::Signer;
