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

//! Method lifecycles: how a method's request function becomes a queue
//! function, and the per-call state machine that drives it.

use std::{marker::PhantomData, sync::Arc};

use cqrpc_logger::tracing;

use crate::{
    codegen::MethodKind,
    rpc::{CallState, RpcContext},
    status::Status,
    transport::{CompletionQueue, Responder, ServerContext, Tag},
};

/// Request type of a context.
pub type Request<C> = <<C as Context>::LifeCycle as LifeCycle>::Request;

/// Response type of a context.
pub type Response<C> = <<C as Context>::LifeCycle as LifeCycle>::Response;

/// Application logic for one method. A fresh value is created per context
/// slot and reused across the calls that slot serves.
pub trait Context: Default + Send + 'static {
    type LifeCycle: LifeCycle;

    fn execute_rpc(&mut self, request: &Request<Self>, response: &mut Response<Self>) -> Status;

    /// Called before the slot is re-armed for the next call.
    fn on_reset(&mut self) {}
}

pub trait LifeCycle: Sized + Send + 'static {
    type Request: Default + Send + 'static;

    type Response: Default + Send + 'static;

    /// Signature of the generated per-method request function on service `S`.
    type RequestFn<S: Send + Sync + 'static>: Copy + Send + Sync + 'static;

    /// The request function with its service instance bound.
    type QueueFn: ?Sized + Send + Sync + 'static;

    const KIND: MethodKind;

    fn bind_service_queue_fn<S: Send + Sync + 'static>(
        request_fn: Self::RequestFn<S>,
        service: Arc<S>,
    ) -> Arc<Self::QueueFn>;

    fn create_call<C: Context<LifeCycle = Self>>(
        service: &'static str,
        method: &'static str,
        queue_fn: Arc<Self::QueueFn>,
    ) -> Box<dyn RpcContext>;
}

pub type UnaryQueueFn<Req, Resp> = dyn Fn(&mut ServerContext, &mut Req, &mut Responder<Resp>, &dyn CompletionQueue, Tag)
    + Send
    + Sync;

/// Request/response lifecycle: one request in, one response out.
pub struct Unary<Req, Resp> {
    _marker: PhantomData<fn() -> (Req, Resp)>,
}

impl<Req, Resp> LifeCycle for Unary<Req, Resp>
where
    Req: Default + Send + 'static,
    Resp: Default + Send + 'static,
{
    type Request = Req;

    type Response = Resp;

    type RequestFn<S: Send + Sync + 'static> =
        fn(&S, &mut ServerContext, &mut Req, &mut Responder<Resp>, &dyn CompletionQueue, Tag);

    type QueueFn = UnaryQueueFn<Req, Resp>;

    const KIND: MethodKind = MethodKind::Unary;

    fn bind_service_queue_fn<S: Send + Sync + 'static>(
        request_fn: Self::RequestFn<S>,
        service: Arc<S>,
    ) -> Arc<Self::QueueFn> {
        let queue_fn: Arc<UnaryQueueFn<Req, Resp>> = Arc::new(
            move |ctx: &mut ServerContext,
                  request: &mut Req,
                  responder: &mut Responder<Resp>,
                  cq: &dyn CompletionQueue,
                  tag: Tag| { request_fn(&service, ctx, request, responder, cq, tag) },
        );
        queue_fn
    }

    fn create_call<C: Context<LifeCycle = Self>>(
        service: &'static str,
        method: &'static str,
        queue_fn: Arc<Self::QueueFn>,
    ) -> Box<dyn RpcContext> {
        Box::new(UnaryCall::<C, Req, Resp>::new(service, method, queue_fn))
    }
}

/// Per-call state of a unary method.
///
/// `Idle` -arm-> `Queued` -request received-> `Finishing` -response sent->
/// `Queued` (re-armed). A failed completion moves the call to `Done`.
pub struct UnaryCall<C, Req, Resp> {
    service: &'static str,
    method: &'static str,
    queue_fn: Arc<UnaryQueueFn<Req, Resp>>,
    context: C,
    server_context: ServerContext,
    request: Req,
    response: Resp,
    responder: Responder<Resp>,
    cq: Option<Arc<dyn CompletionQueue>>,
    tag: Option<Tag>,
    state: CallState,
}

impl<C, Req, Resp> UnaryCall<C, Req, Resp>
where
    C: Context<LifeCycle = Unary<Req, Resp>>,
    Req: Default + Send + 'static,
    Resp: Default + Send + 'static,
{
    pub fn new(
        service: &'static str,
        method: &'static str,
        queue_fn: Arc<UnaryQueueFn<Req, Resp>>,
    ) -> Self {
        UnaryCall {
            service,
            method,
            queue_fn,
            context: C::default(),
            server_context: ServerContext::default(),
            request: Req::default(),
            response: Resp::default(),
            responder: Responder::new(),
            cq: None,
            tag: None,
            state: CallState::Idle,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    fn queue_request(&mut self) -> bool {
        self.server_context.reset();
        self.request = Req::default();
        self.response = Resp::default();
        self.responder.reset();
        self.context.on_reset();

        let (Some(cq), Some(tag)) = (self.cq.as_ref(), self.tag) else {
            tracing::error!("{}/{} queued without a completion queue", self.service, self.method);
            self.state = CallState::Done;
            return false;
        };
        (self.queue_fn)(
            &mut self.server_context,
            &mut self.request,
            &mut self.responder,
            &**cq,
            tag,
        );
        self.state = CallState::Queued;
        true
    }

    fn on_request_received(&mut self) -> bool {
        let status = if self.server_context.is_cancelled() {
            Status::cancelled("call cancelled before execution")
        } else {
            self.context.execute_rpc(&self.request, &mut self.response)
        };
        if !status.is_ok() {
            tracing::debug!(
                "{}/{} finished with: {}",
                self.service,
                self.method,
                status.code()
            );
        }
        let response = std::mem::take(&mut self.response);
        let Some(tag) = self.tag else {
            self.state = CallState::Done;
            return false;
        };
        match self.responder.finish(response, status, tag) {
            Ok(()) => {
                self.state = CallState::Finishing;
                true
            }
            Err(err) => {
                tracing::error!("{}/{}: {}", self.service, self.method, err);
                self.state = CallState::Done;
                false
            }
        }
    }
}

impl<C, Req, Resp> RpcContext for UnaryCall<C, Req, Resp>
where
    C: Context<LifeCycle = Unary<Req, Resp>>,
    Req: Default + Send + 'static,
    Resp: Default + Send + 'static,
{
    fn arm(&mut self, cq: Arc<dyn CompletionQueue>, tag: Tag) {
        if self.state != CallState::Idle {
            tracing::warn!(
                "{}/{} armed in state {:?}, ignored",
                self.service,
                self.method,
                self.state
            );
            return;
        }
        self.cq = Some(cq);
        self.tag = Some(tag);
        self.queue_request();
    }

    fn advance(&mut self, ok: bool) -> bool {
        match self.state {
            CallState::Idle | CallState::Done => {
                tracing::warn!(
                    "{}/{} advanced in state {:?}",
                    self.service,
                    self.method,
                    self.state
                );
                false
            }
            _ if !ok => {
                tracing::debug!("{}/{} completion failed, shutting down", self.service, self.method);
                self.state = CallState::Done;
                false
            }
            CallState::Queued => self.on_request_received(),
            CallState::Finishing => self.queue_request(),
        }
    }

    fn finalize(&mut self) {
        self.responder.reset();
        self.cq = None;
        self.state = CallState::Done;
    }

    fn state(&self) -> CallState {
        self.state
    }
}
