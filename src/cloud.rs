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

//! Cloud connection.

#[allow(unused_imports)]
use std::time::Duration;

use osauth::Session;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

#[cfg(feature = "image")]
use super::common::ImageRef;
#[cfg(feature = "compute")]
use super::compute::{self, ComputeApi, Flavor, ProvisionRequest, Server};
#[cfg(feature = "image")]
use super::image::{self, ImageLookup};
#[cfg(feature = "network")]
use super::network::{
    self, Network, NetworkLookup, Port, Segment, SegmentApi, SegmentCreate, SegmentFilters,
    SegmentUpdate,
};
use super::{Error, ErrorKind, Result};

/// Connection to an OpenStack cloud.
///
/// Implements every capability the modules need by blocking on the
/// asynchronous API calls. One `Cloud` serves one module invocation.
#[derive(Debug)]
pub struct Cloud {
    session: Session,
    runtime: Runtime,
}

fn new_runtime() -> Result<Runtime> {
    RuntimeBuilder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            Error::new(
                ErrorKind::ProviderError,
                format!("Could not create a runtime: {}", e),
            )
        })
}

impl Cloud {
    /// Create a cloud connection from an existing session.
    pub fn new(session: Session) -> Result<Cloud> {
        Ok(Cloud {
            session,
            runtime: new_runtime()?,
        })
    }

    /// Create a cloud connection from a `clouds.yaml` entry.
    ///
    /// ```rust,no_run
    /// # fn cloud_from_config() -> openstack_modules::Result<()> {
    /// let cloud = openstack_modules::Cloud::from_config("cloud-1")?;
    /// # Ok(()) }
    /// # fn main() { cloud_from_config().unwrap(); }
    /// ```
    pub fn from_config<S: AsRef<str>>(cloud_name: S) -> Result<Cloud> {
        let runtime = new_runtime()?;
        let session = runtime.block_on(Session::from_config(cloud_name))?;
        Ok(Cloud { session, runtime })
    }

    /// Create a cloud connection from `OS_*` environment variables.
    pub fn from_env() -> Result<Cloud> {
        let runtime = new_runtime()?;
        let session = runtime.block_on(Session::from_env())?;
        Ok(Cloud { session, runtime })
    }

    /// Underlying session.
    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl From<Cloud> for Session {
    fn from(value: Cloud) -> Session {
        value.session
    }
}

#[cfg(feature = "network")]
impl NetworkLookup for Cloud {
    fn find_network(&self, name_or_id: &str) -> Result<Option<Network>> {
        self.runtime
            .block_on(network::api::find_network(&self.session, name_or_id))
    }

    fn find_port(&self, name_or_id: &str) -> Result<Option<Port>> {
        self.runtime
            .block_on(network::api::find_port(&self.session, name_or_id))
    }
}

#[cfg(feature = "network")]
impl SegmentApi for Cloud {
    fn find_segment(&self, name: &str, filters: &SegmentFilters) -> Result<Option<Segment>> {
        self.runtime
            .block_on(network::api::find_segment(&self.session, name, filters))
    }

    fn create_segment(&self, request: SegmentCreate) -> Result<Segment> {
        self.runtime
            .block_on(network::api::create_segment(&self.session, request))
    }

    fn update_segment(&self, id: &str, update: SegmentUpdate) -> Result<Segment> {
        self.runtime
            .block_on(network::api::update_segment(&self.session, id, update))
    }

    fn delete_segment(&self, id: &str) -> Result<()> {
        self.runtime
            .block_on(network::api::delete_segment(&self.session, id))
    }
}

#[cfg(feature = "image")]
impl ImageLookup for Cloud {
    fn find_image_id(&self, name_or_id: &str, exclude: Option<&str>) -> Result<Option<ImageRef>> {
        let image = self
            .runtime
            .block_on(image::api::find_image(&self.session, name_or_id, exclude))?;
        Ok(image.map(|image| image.id.into()))
    }
}

#[cfg(feature = "compute")]
impl ComputeApi for Cloud {
    fn find_flavor(&self, name_or_id: &str) -> Result<Option<Flavor>> {
        self.runtime
            .block_on(compute::api::find_flavor(&self.session, name_or_id))
    }

    fn find_flavor_by_ram(&self, min_ram: u64, include: Option<&str>) -> Result<Option<Flavor>> {
        self.runtime.block_on(compute::api::find_flavor_by_ram(
            &self.session,
            min_ram,
            include,
        ))
    }

    fn find_server(&self, name_or_id: &str) -> Result<Option<Server>> {
        self.runtime
            .block_on(compute::api::find_server(&self.session, name_or_id))
    }

    fn create_server(&self, request: &ProvisionRequest) -> Result<Server> {
        self.runtime
            .block_on(compute::api::create_server(&self.session, request))
    }

    fn delete_server(&self, id: &str, wait: bool, timeout: Duration) -> Result<()> {
        self.runtime.block_on(compute::api::delete_server(
            &self.session,
            id,
            wait,
            timeout,
        ))
    }
}
