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

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use proxysign_core::{Env, Error, Result};
use serde::Deserialize;

use crate::{Config, Signer};

/// ConfigFile describes every proxied location in one toml document.
///
/// Top-level options are inherited by each location unless the location
/// sets them itself:
///
/// ```toml
/// access_key = "AKIDEXAMPLE"
/// secret_key = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"
/// region = "us-east-1"
/// enabled = true
///
/// [locations.assets]
/// bucket_name = "assets"
///
/// [locations.public]
/// bucket_name = "public"
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Options shared by all locations.
    #[serde(flatten)]
    pub defaults: Config,
    /// Per location overrides.
    #[serde(default)]
    pub locations: BTreeMap<String, Config>,
}

impl ConfigFile {
    /// Parse from a toml document.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config_invalid("failed to parse config file").with_source(e))
    }

    /// Read and parse the toml file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_invalid(format!("failed to read config file {}", path.display()))
                .with_source(e)
        })?;

        debug!("loading config file {}", path.display());
        Self::from_toml(&content)
    }

    /// Fill options unset at the top level from env.
    pub fn from_env(mut self, env: &dyn Env) -> Self {
        self.defaults = self.defaults.from_env(env);
        self
    }

    /// Build one signer per location.
    ///
    /// Fails on the first location whose merged config is invalid, so a
    /// broken config never reaches request handling.
    pub fn build_signers(&self) -> Result<BTreeMap<String, Signer>> {
        let mut signers = BTreeMap::new();

        for (name, location) in &self.locations {
            let config = location
                .clone()
                .merge(&self.defaults)
                .build()
                .map_err(|e| {
                    Error::config_invalid(format!("location {name}: {}", e.message()))
                        .with_source(e)
                })?;

            debug!("location {name} configured, signing enabled: {}", config.enabled);
            signers.insert(name.clone(), Signer::new(config));
        }

        Ok(signers)
    }
}
