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

//! Service registration for a completion-queue driven RPC server.
//!
//! Each generated service gets an [`AsyncService`] adapter. Methods are
//! registered one at a time through their generated [`GeneratedMethod`] token
//! and a statically typed [`Context`]; the adapter binds the method's request
//! function to its service instance and keeps the resulting handle as a
//! `Box<dyn Rpc>`, so the dispatch loop sees one uniform handle type per
//! method.
//!
//! ```ignore
//! let mut greeter = AsyncService::<Greeter>::new();
//! greeter.register_rpc::<SayHelloContext, SayHello>()?;
//!
//! let mut server = Server::from_config();
//! server.add_service(greeter);
//! let assembly = server.assemble()?;
//! let contexts = assembly.create_contexts();
//! ```

pub mod builder;
pub mod codegen;
pub mod error;
pub mod lifecycle;
pub mod rpc;
pub mod server;
pub mod service;
pub mod status;
pub mod transport;

pub use builder::{RegisteredService, ServerBuilder};
pub use codegen::{GeneratedMethod, GeneratedService, MethodDescriptor, MethodKind};
pub use error::Error;
pub use lifecycle::{Context, LifeCycle, Unary, UnaryCall};
pub use rpc::{AsyncRpc, CallState, Rpc, RpcContext, RpcKey};
pub use server::{Assembly, Server};
pub use service::{AsyncService, Service};
pub use status::{Code, Status};
pub use transport::{CompletionQueue, ResponseSink, Responder, ServerContext, Tag};
