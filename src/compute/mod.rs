// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Compute API support, interface resolution and the server module.

pub(crate) mod api;
mod block_device_mapping;
mod nics;
mod protocol;
mod servers;
mod waiter;

use std::time::Duration;

pub use self::block_device_mapping::BlockDevice;
pub use self::nics::{
    resolve_nics, InterfaceSpec, NicDeclaration, NicMapping, NicRequest, NicResolver, NicsParam,
};
pub use self::protocol::{Flavor, Server, ServerStatus};
pub use self::servers::{
    BootVolume, MetaParam, ProvisionRequest, ServerModule, ServerParams, ServerProvisioner,
    ServerState,
};

use super::image::ImageLookup;
use super::network::NetworkLookup;
use super::Result;

/// Managing flavors and servers.
pub trait ComputeApi: NetworkLookup + ImageLookup {
    /// Find a flavor by its ID or exact name.
    fn find_flavor(&self, name_or_id: &str) -> Result<Option<Flavor>>;

    /// Find the smallest flavor with at least `min_ram` MiB of RAM.
    ///
    /// If `include` is set, the flavor name must contain it.
    fn find_flavor_by_ram(&self, min_ram: u64, include: Option<&str>) -> Result<Option<Flavor>>;

    /// Find a server by its ID or exact name.
    fn find_server(&self, name_or_id: &str) -> Result<Option<Server>>;

    /// Create a server from a resolved request.
    ///
    /// Waiting and floating IP handling follow the request.
    fn create_server(&self, request: &ProvisionRequest) -> Result<Server>;

    /// Delete a server.
    fn delete_server(&self, id: &str, wait: bool, timeout: Duration) -> Result<()>;
}
