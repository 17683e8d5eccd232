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

//! Surface the protocol compiler generates against.

use crate::lifecycle::LifeCycle;

/// Streaming mode of a method as declared in the protocol description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Unary,
    ClientStreaming,
    ServerStreaming,
    BidiStreaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub name: &'static str,
    pub kind: MethodKind,
}

impl MethodDescriptor {
    pub const fn new(name: &'static str, kind: MethodKind) -> Self {
        MethodDescriptor { name, kind }
    }

    pub const fn unary(name: &'static str) -> Self {
        MethodDescriptor::new(name, MethodKind::Unary)
    }
}

/// A generated service: its fully qualified name and method table.
///
/// The per-method request functions are inherent `fn`s on the implementing
/// type; each is exposed through a [`GeneratedMethod`] token and handed to
/// [`AsyncService::register_rpc`] one at a time.
///
/// [`AsyncService::register_rpc`]: crate::AsyncService::register_rpc
pub trait GeneratedService: Default + Send + Sync + 'static {
    const NAME: &'static str;

    const METHODS: &'static [MethodDescriptor];

    fn method(name: &str) -> Option<&'static MethodDescriptor> {
        Self::METHODS.iter().find(|m| m.name == name)
    }
}

/// One generated method of service `S`: its descriptor together with the
/// request function that queues calls for exactly that method.
///
/// The compiler emits one zero-sized type per method, so a handle's name and
/// its binding always come from the same place.
pub trait GeneratedMethod<S: GeneratedService>: 'static {
    type LifeCycle: LifeCycle;

    const DESCRIPTOR: MethodDescriptor;

    fn request_fn() -> <Self::LifeCycle as LifeCycle>::RequestFn<S>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Echo;

    impl GeneratedService for Echo {
        const NAME: &'static str = "grpc.examples.echo.Echo";
        const METHODS: &'static [MethodDescriptor] = &[
            MethodDescriptor::unary("UnaryEcho"),
            MethodDescriptor::new("BidirectionalStreamingEcho", MethodKind::BidiStreaming),
        ];
    }

    #[test]
    fn test_method_lookup() {
        assert_eq!(Echo::method("UnaryEcho").map(|m| m.kind), Some(MethodKind::Unary));
        assert_eq!(
            Echo::method("BidirectionalStreamingEcho").map(|m| m.kind),
            Some(MethodKind::BidiStreaming)
        );
        assert!(Echo::method("ServerStreamingEcho").is_none());
    }
}
