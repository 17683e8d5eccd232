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

use std::{any::Any, fmt, sync::Arc};

use cqrpc_config::ServerConfig;
use cqrpc_logger::tracing;

use crate::{
    codegen::{GeneratedService, MethodDescriptor},
    error::Error,
};

/// A generated service instance as seen by the transport's method table.
pub struct RegisteredService {
    name: &'static str,
    methods: &'static [MethodDescriptor],
    instance: Arc<dyn Any + Send + Sync>,
}

impl RegisteredService {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn methods(&self) -> &'static [MethodDescriptor] {
        self.methods
    }

    pub fn downcast<S: GeneratedService>(&self) -> Option<Arc<S>> {
        self.instance.clone().downcast::<S>().ok()
    }

    pub fn is_instance<S: GeneratedService>(&self, service: &Arc<S>) -> bool {
        self.downcast::<S>()
            .map(|s| Arc::ptr_eq(&s, service))
            .unwrap_or(false)
    }
}

impl fmt::Debug for RegisteredService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredService")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .finish()
    }
}

/// The transport's server builder: collects the advertised services before
/// the server starts.
#[derive(Debug, Default)]
pub struct ServerBuilder {
    addr: Option<String>,
    services: Vec<RegisteredService>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        ServerBuilder::default()
    }

    pub fn with_addr(self, addr: impl Into<String>) -> ServerBuilder {
        Self {
            addr: Some(addr.into()),
            ..self
        }
    }

    pub fn addr(&self) -> Option<&str> {
        self.addr.as_deref()
    }

    pub fn register_service<S: GeneratedService>(&mut self, service: Arc<S>) -> Result<(), Error> {
        if self.service(S::NAME).is_some() {
            tracing::warn!("service ({}) already registered", S::NAME);
            return Err(Error::DuplicateService { service: S::NAME });
        }
        self.services.push(RegisteredService {
            name: S::NAME,
            methods: S::METHODS,
            instance: service,
        });
        Ok(())
    }

    pub fn services(&self) -> &[RegisteredService] {
        &self.services
    }

    pub fn service(&self, name: &str) -> Option<&RegisteredService> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl From<&ServerConfig> for ServerBuilder {
    fn from(config: &ServerConfig) -> Self {
        ServerBuilder::new().with_addr(config.address.clone())
    }
}
