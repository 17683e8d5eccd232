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

use cqrpc_config::{get_root_config, ServerConfig};
use cqrpc_logger::tracing;

use crate::{
    builder::ServerBuilder,
    error::Error,
    rpc::{Rpc, RpcContext},
    service::Service,
};

/// Collects service adapters during server assembly.
pub struct Server {
    config: ServerConfig,
    services: Vec<Box<dyn Service>>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Server {
            config,
            services: Vec::new(),
        }
    }

    /// Uses the process-wide config, installing its log level first unless
    /// `CQRPC_LOG_LEVEL` overrides it.
    pub fn from_config() -> Self {
        let config = get_root_config();
        cqrpc_logger::init_with_level(&config.logging.level);
        Server::new(config.server)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn add_service(&mut self, service: impl Service + 'static) -> &mut Self {
        self.services.push(Box::new(service));
        self
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Attaches every adapter to a fresh builder in insertion order and
    /// freezes them. The first attach failure aborts assembly.
    pub fn assemble(mut self) -> Result<Assembly, Error> {
        let mut builder = ServerBuilder::from(&self.config);
        for service in self.services.iter_mut() {
            if let Err(err) = service.initialize(&mut builder) {
                tracing::error!("server assembly failed: {}", err);
                return Err(err);
            }
        }
        for service in self.services.iter_mut() {
            service.freeze();
        }

        let assembly = Assembly {
            builder,
            services: self.services,
            contexts_per_rpc: self.config.contexts_per_rpc.max(1),
        };
        tracing::info!(
            "server assembled at {:?}: {} services, {} rpcs",
            assembly.builder.addr(),
            assembly.builder.len(),
            assembly.rpc_count()
        );
        Ok(assembly)
    }
}

/// Output of [`Server::assemble`]: what the dispatch layer is handed.
pub struct Assembly {
    builder: ServerBuilder,
    services: Vec<Box<dyn Service>>,
    contexts_per_rpc: usize,
}

impl Assembly {
    pub fn builder(&self) -> &ServerBuilder {
        &self.builder
    }

    /// Every handle of every service, services in insertion order and
    /// handles in registration order.
    pub fn rpcs(&self) -> impl Iterator<Item = &dyn Rpc> + '_ {
        self.services.iter().flat_map(|s| s.rpcs())
    }

    pub fn rpc_count(&self) -> usize {
        self.services.iter().map(|s| s.len()).sum()
    }

    pub fn contexts_per_rpc(&self) -> usize {
        self.contexts_per_rpc
    }

    /// Pre-allocates `contexts_per_rpc` idle contexts for every handle.
    pub fn create_contexts(&self) -> Vec<Box<dyn RpcContext>> {
        self.rpcs()
            .flat_map(|rpc| (0..self.contexts_per_rpc).map(move |_| rpc.create_context()))
            .collect()
    }
}
