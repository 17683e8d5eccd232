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

use thiserror::Error;

use crate::codegen::MethodKind;

/// Setup-time failures of the registration layer.
///
/// Misuse that the type system cannot rule out (attaching twice, registering
/// after the server started serving, registering the same method twice) is
/// reported here instead of leaving the dispatch layer in an undefined state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("service `{service}` is already attached to a server builder")]
    AlreadyAttached { service: &'static str },

    #[error("service `{service}` is frozen, setup is closed once serving starts")]
    Frozen { service: &'static str },

    #[error("service `{service}` is already registered with the server builder")]
    DuplicateService { service: &'static str },

    #[error("method `{method}` is already registered on service `{service}`")]
    DuplicateMethod {
        service: &'static str,
        method: &'static str,
    },

    #[error("service `{service}` has no method named `{method}`")]
    UnknownMethod {
        service: &'static str,
        method: String,
    },

    #[error("method `{service}/{method}` is declared {declared:?} but its context drives a {requested:?} lifecycle")]
    KindMismatch {
        service: &'static str,
        method: &'static str,
        declared: MethodKind,
        requested: MethodKind,
    },

    #[error("no response sink was bound for this call")]
    UnboundResponder,
}
