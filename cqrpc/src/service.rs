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

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cqrpc_logger::tracing;

use crate::{
    builder::ServerBuilder,
    codegen::{GeneratedMethod, GeneratedService},
    error::Error,
    lifecycle::{Context, LifeCycle},
    rpc::{AsyncRpc, Rpc, RpcKey},
};

static NEXT_SERVICE_ID: AtomicU64 = AtomicU64::new(1);

/// Type-erased view of an [`AsyncService`], so that adapters for different
/// generated services can be assembled into one server.
pub trait Service: Send + Sync {
    fn name(&self) -> &'static str;

    fn initialize(&mut self, builder: &mut ServerBuilder) -> Result<(), Error>;

    fn freeze(&mut self);

    fn rpcs(&self) -> Box<dyn Iterator<Item = &dyn Rpc> + '_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owns one generated service instance and the rpc handles bound to it.
///
/// Setup is two-phase: [`initialize`](Self::initialize) attaches the instance
/// to the server builder, [`register_rpc`](Self::register_rpc) creates one
/// handle per method. Both are closed once the adapter is frozen.
pub struct AsyncService<S: GeneratedService> {
    id: u64,
    service: Arc<S>,
    rpcs: Vec<Box<dyn Rpc>>,
    attached: bool,
    frozen: bool,
}

impl<S: GeneratedService> AsyncService<S> {
    pub fn new() -> Self {
        AsyncService {
            id: NEXT_SERVICE_ID.fetch_add(1, Ordering::Relaxed),
            service: Arc::new(S::default()),
            rpcs: Vec::new(),
            attached: false,
            frozen: false,
        }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub fn initialize(&mut self, builder: &mut ServerBuilder) -> Result<(), Error> {
        if self.frozen {
            return Err(Error::Frozen { service: S::NAME });
        }
        if self.attached {
            return Err(Error::AlreadyAttached { service: S::NAME });
        }
        builder.register_service(self.service.clone())?;
        self.attached = true;
        tracing::info!("service {} attached with {} rpcs", S::NAME, self.rpcs.len());
        Ok(())
    }

    /// Binds the request function of generated method `M` to the owned
    /// service instance and registers a handle driven by context `C`.
    ///
    /// The handle is named after `M::DESCRIPTOR`; a second binding of the
    /// same method is rejected.
    pub fn register_rpc<C, M>(&mut self) -> Result<RpcKey, Error>
    where
        C: Context,
        M: GeneratedMethod<S, LifeCycle = C::LifeCycle>,
    {
        if self.frozen {
            return Err(Error::Frozen { service: S::NAME });
        }
        let descriptor = S::method(M::DESCRIPTOR.name).ok_or_else(|| Error::UnknownMethod {
            service: S::NAME,
            method: M::DESCRIPTOR.name.to_string(),
        })?;
        let requested = <C::LifeCycle as LifeCycle>::KIND;
        if descriptor.kind != requested {
            return Err(Error::KindMismatch {
                service: S::NAME,
                method: descriptor.name,
                declared: descriptor.kind,
                requested,
            });
        }
        if self.rpcs.iter().any(|r| r.method_name() == descriptor.name) {
            return Err(Error::DuplicateMethod {
                service: S::NAME,
                method: descriptor.name,
            });
        }

        let queue_fn = <C::LifeCycle as LifeCycle>::bind_service_queue_fn(
            M::request_fn(),
            self.service.clone(),
        );
        let rpc: Box<dyn Rpc> = Box::new(AsyncRpc::<C>::new(S::NAME, descriptor, queue_fn));
        let key = RpcKey::new(self.id, self.rpcs.len());
        self.rpcs.push(rpc);
        tracing::debug!("registered rpc {}/{}", S::NAME, descriptor.name);
        Ok(key)
    }

    /// Resolves a key returned by [`register_rpc`](Self::register_rpc) on this
    /// adapter. Keys from other adapters resolve to `None`.
    pub fn rpc(&self, key: RpcKey) -> Option<&dyn Rpc> {
        if key.service() != self.id {
            return None;
        }
        self.rpcs.get(key.index()).map(|r| r.as_ref())
    }

    pub fn rpcs(&self) -> impl Iterator<Item = &dyn Rpc> + '_ {
        self.rpcs.iter().map(|r| r.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rpcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rpcs.is_empty()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Closes setup; the handle set is read-only from here on.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }
}

impl<S: GeneratedService> Default for AsyncService<S> {
    fn default() -> Self {
        AsyncService::new()
    }
}

impl<S: GeneratedService> Service for AsyncService<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn initialize(&mut self, builder: &mut ServerBuilder) -> Result<(), Error> {
        AsyncService::initialize(self, builder)
    }

    fn freeze(&mut self) {
        AsyncService::freeze(self)
    }

    fn rpcs(&self) -> Box<dyn Iterator<Item = &dyn Rpc> + '_> {
        Box::new(AsyncService::rpcs(self))
    }

    fn len(&self) -> usize {
        AsyncService::len(self)
    }
}
