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

//! Contracts the completion-queue toolkit has to satisfy.
//!
//! Nothing in here performs I/O. A transport implements [`CompletionQueue`]
//! and [`ResponseSink`]; the generated request functions bind a sink into the
//! [`Responder`] of every call they accept.

use std::collections::HashMap;

use crate::{error::Error, status::Status};

/// Opaque token a completion event is reported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u64);

impl Tag {
    pub const fn new(value: u64) -> Self {
        Tag(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Tag {
    fn from(value: u64) -> Self {
        Tag(value)
    }
}

/// A pollable queue of completion events owned by the transport.
pub trait CompletionQueue: Send + Sync {
    fn id(&self) -> usize;
}

/// Per-call metadata, reset before the owning context is re-armed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServerContext {
    metadata: HashMap<String, String>,
    peer: Option<String>,
    cancelled: bool,
}

impl ServerContext {
    pub fn new() -> Self {
        ServerContext::default()
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    pub fn set_peer(&mut self, peer: impl Into<String>) {
        self.peer = Some(peer.into());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn reset(&mut self) {
        self.metadata.clear();
        self.peer = None;
        self.cancelled = false;
    }
}

/// Transport side of a unary response.
pub trait ResponseSink<Resp>: Send {
    fn finish(&mut self, response: Resp, status: Status, tag: Tag);
}

/// One-shot slot through which a call is finished.
///
/// The request function binds a transport sink into it when the call is
/// queued; finishing consumes the sink.
pub struct Responder<Resp> {
    sink: Option<Box<dyn ResponseSink<Resp>>>,
}

impl<Resp> Responder<Resp> {
    pub fn new() -> Self {
        Responder { sink: None }
    }

    pub fn bind(&mut self, sink: Box<dyn ResponseSink<Resp>>) {
        self.sink = Some(sink);
    }

    pub fn is_bound(&self) -> bool {
        self.sink.is_some()
    }

    pub fn finish(&mut self, response: Resp, status: Status, tag: Tag) -> Result<(), Error> {
        match self.sink.take() {
            Some(mut sink) => {
                sink.finish(response, status, tag);
                Ok(())
            }
            None => Err(Error::UnboundResponder),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.sink = None;
    }
}

impl<Resp> Default for Responder<Resp> {
    fn default() -> Self {
        Responder::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct Collect(Arc<Mutex<Vec<(String, Status, Tag)>>>);

    impl ResponseSink<String> for Collect {
        fn finish(&mut self, response: String, status: Status, tag: Tag) {
            self.0.lock().unwrap().push((response, status, tag));
        }
    }

    #[test]
    fn test_responder_is_one_shot() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let mut responder: Responder<String> = Responder::new();
        assert!(!responder.is_bound());
        responder.bind(Box::new(Collect(out.clone())));
        assert!(responder.is_bound());

        responder
            .finish("hi".to_string(), Status::ok(), Tag::new(3))
            .unwrap();
        assert_eq!(
            responder.finish("again".to_string(), Status::ok(), Tag::new(3)),
            Err(Error::UnboundResponder)
        );
        assert_eq!(
            out.lock().unwrap().as_slice(),
            &[("hi".to_string(), Status::ok(), Tag::new(3))]
        );
    }

    #[test]
    fn test_server_context_reset() {
        let mut ctx = ServerContext::new();
        ctx.insert_metadata("x-request-id", "42");
        ctx.set_peer("ipv4:127.0.0.1:5000");
        ctx.cancel();
        ctx.reset();
        assert_eq!(ctx, ServerContext::default());
    }
}
