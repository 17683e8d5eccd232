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

#![allow(dead_code)]

//! Stand-ins for protocol-compiler output and a loopback transport.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use cqrpc::{
    CompletionQueue, Context, GeneratedMethod, GeneratedService, LifeCycle, MethodDescriptor,
    MethodKind, Responder, ResponseSink, ServerContext, Status, Tag, Unary,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HelloRequest {
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HelloReply {
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GoodbyeRequest {
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GoodbyeReply {
    pub farewell: String,
    pub visits: u32,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EchoRequest {
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EchoResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queued {
    pub method: &'static str,
    pub cq: usize,
    pub tag: Tag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub method: &'static str,
    pub body: String,
    pub status: Status,
    pub tag: Tag,
}

pub struct LoopbackQueue(pub usize);

impl CompletionQueue for LoopbackQueue {
    fn id(&self) -> usize {
        self.0
    }
}

pub fn queue(id: usize) -> Arc<dyn CompletionQueue> {
    Arc::new(LoopbackQueue(id))
}

struct HelloSink(Arc<Mutex<Vec<Sent>>>);

impl ResponseSink<HelloReply> for HelloSink {
    fn finish(&mut self, response: HelloReply, status: Status, tag: Tag) {
        self.0.lock().unwrap().push(Sent {
            method: "SayHello",
            body: response.message,
            status,
            tag,
        });
    }
}

struct GoodbyeSink(Arc<Mutex<Vec<Sent>>>);

impl ResponseSink<GoodbyeReply> for GoodbyeSink {
    fn finish(&mut self, response: GoodbyeReply, status: Status, tag: Tag) {
        self.0.lock().unwrap().push(Sent {
            method: "SayGoodbye",
            body: format!("{} ({})", response.farewell, response.visits),
            status,
            tag,
        });
    }
}

/// helloworld.Greeter as the protocol compiler would emit it, wired to an
/// in-memory transport. Inbound request names are taken from `inbox` when a
/// call is queued.
#[derive(Default)]
pub struct Greeter {
    inbox: Mutex<VecDeque<String>>,
    queued: Mutex<Vec<Queued>>,
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl GeneratedService for Greeter {
    const NAME: &'static str = "helloworld.Greeter";
    const METHODS: &'static [MethodDescriptor] = &[
        MethodDescriptor::unary("SayHello"),
        MethodDescriptor::unary("SayGoodbye"),
        MethodDescriptor::new("StreamGreetings", MethodKind::ServerStreaming),
    ];
}

impl Greeter {
    pub fn request_say_hello(
        &self,
        ctx: &mut ServerContext,
        request: &mut HelloRequest,
        responder: &mut Responder<HelloReply>,
        cq: &dyn CompletionQueue,
        tag: Tag,
    ) {
        self.record("SayHello", cq, tag);
        if let Some(name) = self.inbox.lock().unwrap().pop_front() {
            request.name = name;
        }
        ctx.set_peer("loopback");
        responder.bind(Box::new(HelloSink(self.sent.clone())));
    }

    pub fn request_say_goodbye(
        &self,
        ctx: &mut ServerContext,
        request: &mut GoodbyeRequest,
        responder: &mut Responder<GoodbyeReply>,
        cq: &dyn CompletionQueue,
        tag: Tag,
    ) {
        self.record("SayGoodbye", cq, tag);
        if let Some(name) = self.inbox.lock().unwrap().pop_front() {
            request.name = name;
        }
        ctx.set_peer("loopback");
        responder.bind(Box::new(GoodbyeSink(self.sent.clone())));
    }

    /// Queues the call but never binds a response sink.
    pub fn request_say_hello_detached(
        &self,
        _ctx: &mut ServerContext,
        _request: &mut HelloRequest,
        _responder: &mut Responder<HelloReply>,
        cq: &dyn CompletionQueue,
        tag: Tag,
    ) {
        self.record("SayHello", cq, tag);
    }

    /// Marks the call cancelled by the peer before it is executed.
    pub fn request_say_hello_cancelled(
        &self,
        ctx: &mut ServerContext,
        request: &mut HelloRequest,
        responder: &mut Responder<HelloReply>,
        cq: &dyn CompletionQueue,
        tag: Tag,
    ) {
        self.request_say_hello(ctx, request, responder, cq, tag);
        ctx.cancel();
    }

    fn record(&self, method: &'static str, cq: &dyn CompletionQueue, tag: Tag) {
        self.queued.lock().unwrap().push(Queued {
            method,
            cq: cq.id(),
            tag,
        });
    }

    pub fn push_request(&self, name: &str) {
        self.inbox.lock().unwrap().push_back(name.to_string());
    }

    pub fn queued(&self) -> Vec<Queued> {
        self.queued.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

/// Declares a generated method token binding `$request` on `$service`.
macro_rules! method {
    ($token:ident, $service:ty, $life:ty, $descriptor:expr, $request:path) => {
        pub struct $token;

        impl GeneratedMethod<$service> for $token {
            type LifeCycle = $life;

            const DESCRIPTOR: MethodDescriptor = $descriptor;

            fn request_fn() -> <Self::LifeCycle as LifeCycle>::RequestFn<$service> {
                $request
            }
        }
    };
}

type HelloUnary = Unary<HelloRequest, HelloReply>;

method!(
    SayHello,
    Greeter,
    HelloUnary,
    MethodDescriptor::unary("SayHello"),
    Greeter::request_say_hello
);
method!(
    SayGoodbye,
    Greeter,
    Unary<GoodbyeRequest, GoodbyeReply>,
    MethodDescriptor::unary("SayGoodbye"),
    Greeter::request_say_goodbye
);
method!(
    SayHelloDetached,
    Greeter,
    HelloUnary,
    MethodDescriptor::unary("SayHello"),
    Greeter::request_say_hello_detached
);
method!(
    SayHelloCancelled,
    Greeter,
    HelloUnary,
    MethodDescriptor::unary("SayHello"),
    Greeter::request_say_hello_cancelled
);
// Not part of Greeter's method table.
method!(
    SayHi,
    Greeter,
    HelloUnary,
    MethodDescriptor::unary("SayHi"),
    Greeter::request_say_hello
);
// Server-streaming in the table, bound here with a unary lifecycle.
method!(
    StreamGreetingsAsUnary,
    Greeter,
    HelloUnary,
    MethodDescriptor::unary("StreamGreetings"),
    Greeter::request_say_hello
);

#[derive(Default)]
pub struct Echo;

impl GeneratedService for Echo {
    const NAME: &'static str = "grpc.examples.echo.Echo";
    const METHODS: &'static [MethodDescriptor] = &[MethodDescriptor::unary("UnaryEcho")];
}

impl Echo {
    pub fn request_unary_echo(
        &self,
        _ctx: &mut ServerContext,
        _request: &mut EchoRequest,
        _responder: &mut Responder<EchoResponse>,
        _cq: &dyn CompletionQueue,
        _tag: Tag,
    ) {
    }
}

method!(
    UnaryEcho,
    Echo,
    Unary<EchoRequest, EchoResponse>,
    MethodDescriptor::unary("UnaryEcho"),
    Echo::request_unary_echo
);

#[derive(Default)]
pub struct SayHelloContext {
    pub served: u32,
}

impl Context for SayHelloContext {
    type LifeCycle = Unary<HelloRequest, HelloReply>;

    fn execute_rpc(&mut self, request: &HelloRequest, response: &mut HelloReply) -> Status {
        if request.name.is_empty() {
            return Status::invalid_argument("name must not be empty");
        }
        self.served += 1;
        response.message = format!("Hello {}", request.name);
        Status::ok()
    }
}

/// Counts the calls served by one context slot.
#[derive(Default)]
pub struct SayGoodbyeContext {
    visits: u32,
}

impl Context for SayGoodbyeContext {
    type LifeCycle = Unary<GoodbyeRequest, GoodbyeReply>;

    fn execute_rpc(&mut self, request: &GoodbyeRequest, response: &mut GoodbyeReply) -> Status {
        self.visits += 1;
        response.farewell = format!("Goodbye {}", request.name);
        response.visits = self.visits;
        Status::ok()
    }
}

#[derive(Default)]
pub struct UnaryEchoContext;

impl Context for UnaryEchoContext {
    type LifeCycle = Unary<EchoRequest, EchoResponse>;

    fn execute_rpc(&mut self, request: &EchoRequest, response: &mut EchoResponse) -> Status {
        response.message.clone_from(&request.message);
        Status::ok()
    }
}
