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

use std::{error::Error, fmt};

/// error codes for grpc APIs
/// https://github.com/googleapis/googleapis/blob/master/google/rpc/code.proto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    // Not an error; returned on success
    Ok = 0,

    // The operation was cancelled, typically by the caller.
    Cancelled = 1,

    // Unknown error.
    Unknown = 2,

    // The client specified an invalid argument.
    InvalidArgument = 3,

    // The deadline expired before the operation could complete.
    DeadlineExceeded = 4,

    // Some requested entity was not found.
    NotFound = 5,

    // The entity that a client attempted to create already exists.
    AlreadyExists = 6,

    // The caller does not have permission to execute the specified operation.
    PermissionDenied = 7,

    // Some resource has been exhausted.
    ResourceExhausted = 8,

    // The system is not in a state required for the operation's execution.
    FailedPrecondition = 9,

    // The operation was aborted, typically due to a concurrency issue.
    Aborted = 10,

    // The operation was attempted past the valid range.
    OutOfRange = 11,

    // The operation is not implemented or is not supported/enabled.
    Unimplemented = 12,

    // Some invariants expected by the underlying system have been broken.
    Internal = 13,

    // The service is currently unavailable.
    Unavailable = 14,

    // Unrecoverable data loss or corruption.
    DataLoss = 15,

    // The request does not have valid authentication credentials.
    Unauthenticated = 16,
}

impl Code {
    pub fn description(&self) -> &'static str {
        match self {
            Code::Ok => "The operation completed successfully",
            Code::Cancelled => "The operation was cancelled",
            Code::Unknown => "Unknown error",
            Code::InvalidArgument => "Client specified an invalid argument",
            Code::DeadlineExceeded => "Deadline expired before operation could complete",
            Code::NotFound => "Some requested entity was not found",
            Code::AlreadyExists => "Some entity that we attempted to create already exists",
            Code::PermissionDenied => {
                "The caller does not have permission to execute the specified operation"
            }
            Code::ResourceExhausted => "Some resource has been exhausted",
            Code::FailedPrecondition => {
                "The system is not in a state required for the operation's execution"
            }
            Code::Aborted => "The operation was aborted",
            Code::OutOfRange => "Operation was attempted past the valid range",
            Code::Unimplemented => "Operation is not implemented or not supported",
            Code::Internal => "Internal error",
            Code::Unavailable => "The service is currently unavailable",
            Code::DataLoss => "Unrecoverable data loss or corruption",
            Code::Unauthenticated => "The request does not have valid authentication credentials",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.description(), f)
    }
}

/// Final status a call is finished with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Status {
            code,
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Status::new(Code::Ok, "")
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Status::new(Code::Cancelled, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Status::new(Code::InvalidArgument, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Status::new(Code::Internal, message)
    }

    pub fn unimplemented(message: impl Into<String>) -> Self {
        Status::new(Code::Unimplemented, message)
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::ok()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grpc status: code: {:?}, message: {:?}",
            self.code, self.message
        )
    }
}

impl Error for Status {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_display() {
        assert_eq!(Code::Ok.to_string(), "The operation completed successfully");
        assert_eq!(
            Code::InvalidArgument.to_string(),
            "Client specified an invalid argument"
        );
        assert_eq!(Code::Unimplemented.to_string(), Code::Unimplemented.description());
    }

    #[test]
    fn test_status() {
        let status = Status::invalid_argument("name must not be empty");
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "name must not be empty");
        assert!(!status.is_ok());
        assert!(Status::default().is_ok());
    }
}
