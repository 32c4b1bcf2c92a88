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

//! Waiters for server status changes.

use std::time::Duration;

use async_trait::async_trait;
use osauth::Session;
use waiter::{Waiter, WaiterCurrentState};

use super::super::{Error, ErrorKind, Result};
use super::api;
use super::protocol::{Server, ServerStatus};

const POLL_DELAY: Duration = Duration::from_secs(2);

/// Source of fresh server descriptions.
#[async_trait]
pub(crate) trait FetchServer: Sync {
    /// Fetch the current server description by ID.
    async fn fetch_server(&self, id: &str) -> Result<Server>;
}

#[async_trait]
impl FetchServer for Session {
    async fn fetch_server(&self, id: &str) -> Result<Server> {
        api::get_server(self, id).await
    }
}

/// Wait for a server to become `ACTIVE`.
#[derive(Debug)]
pub(crate) struct ServerStatusWaiter<'s, S> {
    source: &'s S,
    server: Server,
    wait_timeout: Duration,
    delay: Duration,
}

impl<'s, S: FetchServer> ServerStatusWaiter<'s, S> {
    pub(crate) fn new(source: &'s S, server: Server, wait_timeout: Duration) -> Self {
        ServerStatusWaiter {
            source,
            server,
            wait_timeout,
            delay: POLL_DELAY,
        }
    }

    #[cfg(test)]
    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl<'s, S: FetchServer> Waiter<Server, Error> for ServerStatusWaiter<'s, S> {
    fn default_wait_timeout(&self) -> Option<Duration> {
        Some(self.wait_timeout)
    }

    fn default_delay(&self) -> Duration {
        self.delay
    }

    fn timeout_error(&self) -> Error {
        Error::new(
            ErrorKind::OperationTimedOut,
            format!(
                "Timeout waiting for server {} to become ACTIVE, current is {:?}",
                self.server.id, self.server.status
            ),
        )
    }

    async fn poll(&mut self) -> Result<Option<Server>> {
        self.server = self.source.fetch_server(&self.server.id).await?;
        match self.server.status {
            ServerStatus::Active => {
                debug!("Server {} reached state ACTIVE", self.server.id);
                Ok(Some(self.server.clone()))
            }
            ServerStatus::Error => {
                let reason = self.server.fault_message().unwrap_or("unknown fault");
                debug!(
                    "Failed to bring server {} to ACTIVE - status is ERROR",
                    self.server.id
                );
                Err(Error::new(
                    ErrorKind::OperationFailed,
                    format!("Server {} got into ERROR state: {}", self.server.id, reason),
                ))
            }
            status => {
                trace!(
                    "Still waiting for server {} to become ACTIVE, current is {:?}",
                    self.server.id,
                    status
                );
                Ok(None)
            }
        }
    }
}

impl<'s, S> WaiterCurrentState<Server> for ServerStatusWaiter<'s, S> {
    fn waiter_current_state(&self) -> &Server {
        &self.server
    }
}

/// Wait for a server to disappear.
#[derive(Debug)]
pub(crate) struct ServerDeletionWaiter<'s, S> {
    source: &'s S,
    id: String,
    wait_timeout: Duration,
    delay: Duration,
}

impl<'s, S: FetchServer> ServerDeletionWaiter<'s, S> {
    pub(crate) fn new<I: Into<String>>(source: &'s S, id: I, wait_timeout: Duration) -> Self {
        ServerDeletionWaiter {
            source,
            id: id.into(),
            wait_timeout,
            delay: POLL_DELAY,
        }
    }

    #[cfg(test)]
    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl<'s, S: FetchServer> Waiter<(), Error> for ServerDeletionWaiter<'s, S> {
    fn default_wait_timeout(&self) -> Option<Duration> {
        Some(self.wait_timeout)
    }

    fn default_delay(&self) -> Duration {
        self.delay
    }

    fn timeout_error(&self) -> Error {
        Error::new(
            ErrorKind::OperationTimedOut,
            format!("Timeout waiting for server {} to be deleted", self.id),
        )
    }

    async fn poll(&mut self) -> Result<Option<()>> {
        match self.source.fetch_server(&self.id).await {
            Ok(server) => {
                trace!(
                    "Still waiting for server {} to be deleted, current is {:?}",
                    self.id,
                    server.status
                );
                Ok(None)
            }
            Err(ref e) if e.kind() == ErrorKind::ResourceNotFound => {
                debug!("Server {} was deleted", self.id);
                Ok(Some(()))
            }
            Err(e) => {
                debug!("Failed to delete server {} - {}", self.id, e);
                Err(e)
            }
        }
    }
}

impl<'s, S> WaiterCurrentState<String> for ServerDeletionWaiter<'s, S> {
    fn waiter_current_state(&self) -> &String {
        &self.id
    }
}
