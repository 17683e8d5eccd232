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

use once_cell::sync::Lazy;

pub use config::{LoggingConfig, RootConfig, ServerConfig, CQRPC_KEY};
pub use error::ConfigError;
pub use location::{get_config_location, set_config_file_path};

pub mod config;
pub mod error;
pub mod location;

pub(crate) static CQRPC_CONFIG: Lazy<RootConfig> = Lazy::new(RootConfig::load_or_default);

/// Process-wide config, loaded from [`get_config_location`] on first use.
pub fn get_root_config() -> RootConfig {
    CQRPC_CONFIG.clone()
}
