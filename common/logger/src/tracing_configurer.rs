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

use cqrpc_utils::env_util::get_env_value;

use crate::{level::LevelWrapper, Level, ENV_CQRPC_LOG_LEVEL};

pub(crate) fn default() {
    match configured() {
        Some(level) => with_level(level),
        // enable everything
        None => with_level(Level::TRACE),
    }
}

pub(crate) fn with_level(level: Level) {
    // try_init: another collector may already be installed by the host application
    let _ = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_thread_names(false)
        .with_line_number(true)
        .try_init();
}

pub(crate) fn configured() -> Option<Level> {
    env_level().map(|v| LevelWrapper::from(v).inner)
}

pub(crate) fn env_level() -> Option<String> {
    get_env_value(ENV_CQRPC_LOG_LEVEL)
}

/// The env value wins over the configured one.
pub(crate) fn resolve(env: Option<String>, configured: &str) -> Level {
    match env {
        Some(v) => LevelWrapper::from(v).inner,
        None => LevelWrapper::from(configured).inner,
    }
}
