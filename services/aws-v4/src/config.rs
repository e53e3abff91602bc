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

use std::fmt::{Debug, Formatter};

use log::debug;
use proxysign_core::utils::Redact;
use proxysign_core::{Env, Error, Result};
use serde::Deserialize;

use crate::constants::*;
use crate::Credential;

/// How the bucket is addressed on the object store.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AddressingStyle {
    /// `bucket.endpoint` as host, request path as is.
    #[default]
    VirtualHosted,
    /// `endpoint` as host, `/bucket` prefixed to the request path.
    Path,
}

/// Config for the aws v4 signer.
///
/// Every option is optional here so that configs can be layered: a
/// location-level config is merged with its parent, then unset values may
/// be filled from the environment before [`Config::build`] resolves defaults
/// and validates the result.
#[derive(Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Access key id used in the `Credential=` part of the Authorization header.
    pub access_key: Option<String>,
    /// Secret access key used to derive the signing key.
    pub secret_key: Option<String>,
    /// Region of the bucket, like `us-east-1`.
    pub region: Option<String>,
    /// Service name, default to `s3`.
    pub service: Option<String>,
    /// Endpoint used to build the host, default to `s3.amazonaws.com`.
    pub endpoint: Option<String>,
    /// Bucket the requests are proxied to.
    pub bucket_name: Option<String>,
    /// Use path-style addressing instead of virtual-hosted style.
    pub path_style: Option<bool>,
    /// Whether requests should be signed at all, default to `false`.
    pub enabled: Option<bool>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("region", &self.region)
            .field("service", &self.service)
            .field("endpoint", &self.endpoint)
            .field("bucket_name", &self.bucket_name)
            .field("path_style", &self.path_style)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Config {
    /// Parse config from a toml document.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config_invalid("failed to parse signer config").with_source(e))
    }

    /// Fill the unset fields from env.
    ///
    /// Values already present in the config always win.
    pub fn from_env(mut self, env: &dyn Env) -> Self {
        let fill = |field: &mut Option<String>, key: &str| {
            if field.is_none() {
                *field = env.var(key);
            }
        };

        fill(&mut self.access_key, AWS_ACCESS_KEY_ID);
        fill(&mut self.secret_key, AWS_SECRET_ACCESS_KEY);
        fill(&mut self.region, AWS_REGION);
        fill(&mut self.service, AWS_S3_SERVICE);
        fill(&mut self.endpoint, AWS_S3_ENDPOINT);
        fill(&mut self.bucket_name, AWS_S3_BUCKET);

        self
    }

    /// Merge this config with its parent.
    ///
    /// Values set on `self` win; unset values are inherited from `parent`.
    pub fn merge(self, parent: &Config) -> Self {
        Self {
            access_key: self.access_key.or_else(|| parent.access_key.clone()),
            secret_key: self.secret_key.or_else(|| parent.secret_key.clone()),
            region: self.region.or_else(|| parent.region.clone()),
            service: self.service.or_else(|| parent.service.clone()),
            endpoint: self.endpoint.or_else(|| parent.endpoint.clone()),
            bucket_name: self.bucket_name.or_else(|| parent.bucket_name.clone()),
            path_style: self.path_style.or(parent.path_style),
            enabled: self.enabled.or(parent.enabled),
        }
    }

    /// Resolve defaults and validate.
    ///
    /// Fails with `ConfigInvalid` if signing is enabled and a required value
    /// is missing.
    pub fn build(self) -> Result<SignerConfig> {
        let cfg = SignerConfig {
            credential: Credential::new(
                self.access_key.unwrap_or_default(),
                self.secret_key.unwrap_or_default(),
            ),
            region: self.region.unwrap_or_default(),
            service: self.service.unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            bucket_name: self.bucket_name.unwrap_or_default(),
            addressing: if self.path_style.unwrap_or_default() {
                AddressingStyle::Path
            } else {
                AddressingStyle::VirtualHosted
            },
            enabled: self.enabled.unwrap_or_default(),
        };

        if cfg.enabled {
            cfg.validate()?;
        }

        debug!("signer config resolved: {cfg:?}");
        Ok(cfg)
    }
}

/// Resolved, read-only configuration owned by one signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    /// Credential used to sign requests.
    pub credential: Credential,
    /// Region part of the key scope.
    pub region: String,
    /// Service part of the key scope.
    pub service: String,
    /// Endpoint the bucket lives on.
    pub endpoint: String,
    /// Bucket the requests are proxied to.
    pub bucket_name: String,
    /// Addressing style used for host and canonical uri.
    pub addressing: AddressingStyle,
    /// Whether requests are signed at all.
    pub enabled: bool,
}

impl SignerConfig {
    /// Check that every value needed for signing is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("access_key", self.credential.access_key_id.as_str()),
            ("secret_key", self.credential.secret_access_key.as_str()),
            ("region", self.region.as_str()),
            ("bucket_name", self.bucket_name.as_str()),
            ("service", self.service.as_str()),
            ("endpoint", self.endpoint.as_str()),
        ];

        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::config_invalid(format!(
                    "{name} is required when signing is enabled"
                )));
            }
        }

        Ok(())
    }

    /// Host the object store expects for this bucket.
    pub fn host(&self) -> String {
        match self.addressing {
            AddressingStyle::VirtualHosted => format!("{}.{}", self.bucket_name, self.endpoint),
            AddressingStyle::Path => self.endpoint.clone(),
        }
    }
}
