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

use std::{marker::PhantomData, sync::Arc};

use crate::{
    codegen::{MethodDescriptor, MethodKind},
    lifecycle::{Context, LifeCycle},
    transport::{CompletionQueue, Tag},
};

/// Identity of a handle within the adapter that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RpcKey {
    service: u64,
    index: usize,
}

impl RpcKey {
    pub(crate) fn new(service: u64, index: usize) -> Self {
        RpcKey { service, index }
    }

    pub(crate) fn service(&self) -> u64 {
        self.service
    }

    /// Position in registration order.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Queued,
    Finishing,
    Done,
}

/// One registered method, as driven by the dispatch loop.
pub trait Rpc: Send + Sync {
    fn service_name(&self) -> &'static str;

    fn method_name(&self) -> &'static str;

    fn kind(&self) -> MethodKind;

    /// A fresh per-call state machine bound to this method's queue function.
    fn create_context(&self) -> Box<dyn RpcContext>;
}

/// A single in-flight call slot.
pub trait RpcContext: Send {
    /// Queue the context on `cq` to accept the next call. Completions for
    /// this context are reported with `tag`.
    fn arm(&mut self, cq: Arc<dyn CompletionQueue>, tag: Tag);

    /// Runs the next state after a completion event. Returns `false` once the
    /// context is done and must not be polled again.
    fn advance(&mut self, ok: bool) -> bool;

    fn finalize(&mut self);

    fn state(&self) -> CallState;
}

/// The handle [`AsyncService::register_rpc`] creates for a context type `C`.
///
/// [`AsyncService::register_rpc`]: crate::AsyncService::register_rpc
pub struct AsyncRpc<C: Context> {
    service: &'static str,
    method: &'static MethodDescriptor,
    queue_fn: Arc<<C::LifeCycle as LifeCycle>::QueueFn>,
    _context: PhantomData<fn() -> C>,
}

impl<C: Context> AsyncRpc<C> {
    pub fn new(
        service: &'static str,
        method: &'static MethodDescriptor,
        queue_fn: Arc<<C::LifeCycle as LifeCycle>::QueueFn>,
    ) -> Self {
        AsyncRpc {
            service,
            method,
            queue_fn,
            _context: PhantomData,
        }
    }
}

impl<C: Context> Rpc for AsyncRpc<C> {
    fn service_name(&self) -> &'static str {
        self.service
    }

    fn method_name(&self) -> &'static str {
        self.method.name
    }

    fn kind(&self) -> MethodKind {
        self.method.kind
    }

    fn create_context(&self) -> Box<dyn RpcContext> {
        <C::LifeCycle as LifeCycle>::create_call::<C>(
            self.service,
            self.method.name,
            self.queue_fn.clone(),
        )
    }
}
