/*
 * Licensed to the Apache Software Foundation (ASF) under one or more
 * contributor license agreements.  See the NOTICE file distributed with
 * this work for additional information regarding copyright ownership.
 * The ASF licenses this file to You under the Apache License, Version 2.0
 * (the "License"); you may not use this file except in compliance with
 * the License.  You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::{collections::HashMap, fs, path::Path};

use cqrpc_logger::tracing;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, location::get_config_location};

pub const CQRPC_KEY: &str = "cqrpc";

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:50051";

pub const DEFAULT_CONTEXTS_PER_RPC: usize = 1;

/// Root of the `cqrpc:` section of `cqrpc.yaml`.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RootConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,

    /// Number of contexts armed per registered rpc when the server is assembled.
    #[serde(default = "default_contexts_per_rpc")]
    pub contexts_per_rpc: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_contexts_per_rpc() -> usize {
    DEFAULT_CONTEXTS_PER_RPC
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            address: default_address(),
            contexts_per_rpc: default_contexts_per_rpc(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_level(),
        }
    }
}

impl ServerConfig {
    pub fn address(self, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..self
        }
    }

    pub fn contexts_per_rpc(self, contexts_per_rpc: usize) -> Self {
        Self {
            contexts_per_rpc,
            ..self
        }
    }
}

impl RootConfig {
    pub fn new() -> Self {
        RootConfig::default()
    }

    /// Loads the file found by [`get_config_location`].
    pub fn load() -> Result<Self, ConfigError> {
        RootConfig::load_from(get_config_location())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut conf: HashMap<String, RootConfig> =
            serde_yaml::from_slice(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let root_config = conf
            .remove(CQRPC_KEY)
            .ok_or_else(|| ConfigError::MissingRoot(path.to_path_buf()))?;
        root_config.validate()?;
        tracing::debug!("loaded config from {:?}: {:?}", path, root_config);
        Ok(root_config)
    }

    /// Loads the config file, or falls back to defaults when it is absent
    /// or unusable.
    pub fn load_or_default() -> Self {
        let location = get_config_location();
        if !location.is_file() {
            tracing::info!("no config file at {:?}, using defaults", location);
            return RootConfig::default();
        }
        match RootConfig::load_from(&location) {
            Ok(v) => v,
            Err(err) => {
                tracing::error!("error loading config: {}, using defaults", err);
                RootConfig::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.contexts_per_rpc == 0 {
            return Err(ConfigError::Invalid {
                key: "server.contexts_per_rpc",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.server.address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "server.address",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
