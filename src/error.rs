// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error and Result implementations.

use std::fmt;

/// Kind of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid or incompatible module parameters.
    ///
    /// Detected before any call to the cloud is made.
    InvalidInput,

    /// A named reference did not resolve to a resource.
    ResourceNotFound,

    /// A named reference resolved to more than one resource.
    TooManyItems,

    /// Operation has reached the specified time out.
    OperationTimedOut,

    /// Operation failed to complete.
    OperationFailed,

    /// The cloud rejected or failed a request.
    ProviderError,
}

/// Error from a module run.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: String,
}

/// Result of a module run.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Create a new error of the given kind.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            message: message.into(),
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Error message without the kind description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the error means that a named reference could not be resolved.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ResourceNotFound | ErrorKind::TooManyItems
        )
    }

    /// Helper - error of kind InvalidInput.
    pub(crate) fn invalid_input<S: Into<String>>(message: S) -> Error {
        Error::new(ErrorKind::InvalidInput, message)
    }

    /// Helper - error of kind ResourceNotFound naming the missing resource.
    pub(crate) fn not_found<D: fmt::Display>(resource: &str, name: D) -> Error {
        Error::new(
            ErrorKind::ResourceNotFound,
            format!("Could not find {} {}", resource, name),
        )
    }
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "Input value(s) are invalid or missing",
            ErrorKind::ResourceNotFound => "Requested resource was not found",
            ErrorKind::TooManyItems => "Request returned too many items",
            ErrorKind::OperationTimedOut => "Time out reached while waiting for the operation",
            ErrorKind::OperationFailed => "Requested operation has failed",
            ErrorKind::ProviderError => "Cloud request failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl ::std::error::Error for Error {}

impl From<osauth::Error> for Error {
    fn from(value: osauth::Error) -> Error {
        let kind = match value.kind() {
            osauth::ErrorKind::ResourceNotFound => ErrorKind::ResourceNotFound,
            osauth::ErrorKind::TooManyItems => ErrorKind::TooManyItems,
            osauth::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
            osauth::ErrorKind::OperationTimedOut => ErrorKind::OperationTimedOut,
            osauth::ErrorKind::OperationFailed => ErrorKind::OperationFailed,
            _ => ErrorKind::ProviderError,
        };
        Error::new(kind, value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Error {
        Error::invalid_input(value.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Error {
        Error::invalid_input(value.to_string())
    }
}
