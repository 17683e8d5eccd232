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

#[cfg(test)]
mod tests_load {
    use std::path::PathBuf;

    use anyhow::Error;

    use cqrpc_config::{ConfigError, RootConfig};

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join(name)
    }

    #[test]
    fn test_load_from_file() -> Result<(), Error> {
        let config = RootConfig::load_from(fixture("cqrpc.yaml"))?;
        assert_eq!(config.server.address, "127.0.0.1:8001");
        assert_eq!(config.server.contexts_per_rpc, 4);
        assert_eq!(config.logging.level, "debug");
        Ok(())
    }

    #[test]
    fn test_missing_root_key() {
        let err = RootConfig::load_from(fixture("broken.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRoot(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RootConfig::load_from(fixture("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
