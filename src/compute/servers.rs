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

//! Server provisioning and the server module.
//!
//! ```yaml
//! name: vm1
//! image: cirros
//! flavor: m1.tiny
//! nics:
//!   - net-name: private
//! meta: group=web,role=frontend
//! auto_ip: true
//! ```

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Map, Value};

use super::super::common::protocol::{deser_optional_scalar, deser_string_list, scalar_to_string};
use super::super::common::{FlavorRef, ImageRef};
use super::super::module::{Module, ModuleResult};
use super::super::utils;
use super::super::{Error, ErrorKind, Result};
use super::{ComputeApi, InterfaceSpec, NicResolver, NicsParam, Server};

/// Desired state of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// The server must exist.
    #[default]
    Present,
    /// The server must not exist.
    Absent,
}

/// Server metadata as written by the user.
///
/// Accepts `key=value,key2=value2`, a mapping or a list of mappings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MetaParam {
    /// Comma-separated `key=value` pairs.
    Joined(String),
    /// A mapping.
    Mapping(Map<String, Value>),
    /// A list of mappings, merged in order.
    List(Vec<Map<String, Value>>),
}

impl MetaParam {
    /// Convert into flat string metadata.
    pub fn to_metadata(&self) -> Result<HashMap<String, String>> {
        let mut result = HashMap::new();
        match self {
            MetaParam::Joined(s) => {
                for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    let (key, value) = utils::split_pair(token).ok_or_else(|| {
                        Error::invalid_input(format!("Invalid meta item {}, expected key=value", token))
                    })?;
                    let _ = result.insert(key.to_string(), value.to_string());
                }
            }
            MetaParam::Mapping(items) => insert_meta(&mut result, items)?,
            MetaParam::List(list) => {
                for items in list {
                    insert_meta(&mut result, items)?;
                }
            }
        }
        Ok(result)
    }
}

fn insert_meta(result: &mut HashMap<String, String>, items: &Map<String, Value>) -> Result<()> {
    for (key, value) in items {
        let value = scalar_to_string(value).ok_or_else(|| {
            Error::invalid_input(format!("Value of meta key {} must be a string", key))
        })?;
        let _ = result.insert(key.clone(), value);
    }
    Ok(())
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    180
}

fn default_image_exclude() -> String {
    String::from("(deprecated)")
}

fn default_security_groups() -> Vec<String> {
    vec![String::from("default")]
}

/// Parameters of the server module.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerParams {
    /// Server name.
    pub name: String,
    /// Desired state.
    #[serde(default)]
    pub state: ServerState,
    /// Image name or ID.
    #[serde(default, deserialize_with = "deser_optional_scalar")]
    pub image: Option<String>,
    /// Images whose name contains this text are ignored.
    #[serde(default = "default_image_exclude")]
    pub image_exclude: String,
    /// Flavor name or ID.
    #[serde(default, deserialize_with = "deser_optional_scalar")]
    pub flavor: Option<String>,
    /// Minimum amount of RAM (in MiB) of a flavor.
    #[serde(default)]
    pub flavor_ram: Option<u64>,
    /// Text the flavor name must contain when using `flavor_ram`.
    #[serde(default)]
    pub flavor_include: Option<String>,
    /// Key pair name.
    #[serde(default)]
    pub key_name: Option<String>,
    /// Security group names.
    #[serde(default = "default_security_groups", deserialize_with = "deser_string_list")]
    pub security_groups: Vec<String>,
    /// A single network name or ID, used when `nics` is empty.
    #[serde(default)]
    pub network: Option<String>,
    /// Network interfaces.
    #[serde(default)]
    pub nics: NicsParam,
    /// Server metadata.
    #[serde(default)]
    pub meta: Option<MetaParam>,
    /// User data passed to the server.
    #[serde(default)]
    pub userdata: Option<String>,
    /// Whether to use a configuration drive.
    #[serde(default)]
    pub config_drive: bool,
    /// Availability zone.
    #[serde(default)]
    pub availability_zone: Option<String>,
    /// Boot from a new volume created from the image.
    #[serde(default)]
    pub boot_from_volume: bool,
    /// Size of the boot volume in GiB.
    #[serde(default)]
    pub volume_size: Option<u32>,
    /// Delete the boot volume with the server.
    #[serde(default)]
    pub terminate_volume: bool,
    /// Automatically attach a floating IP from an external network.
    #[serde(default, alias = "auto_floating_ip", alias = "public_ip")]
    pub auto_ip: bool,
    /// Floating IP addresses to attach.
    #[serde(default, deserialize_with = "deser_string_list")]
    pub floating_ips: Vec<String>,
    /// Networks to allocate floating IPs from.
    #[serde(default, deserialize_with = "deser_string_list")]
    pub floating_ip_pools: Vec<String>,
    /// Wait for the operation to finish.
    #[serde(default = "default_true")]
    pub wait: bool,
    /// Time out (in seconds) for waiting.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl ServerParams {
    /// Check the parameters for incompatible or missing options.
    ///
    /// Checks run in a fixed order and the first violation is reported.
    pub fn validate(&self) -> Result<()> {
        if !self.wait {
            if self.auto_ip {
                return Err(Error::invalid_input(
                    "auto_ip requires wait to be enabled",
                ));
            }
            if !self.floating_ips.is_empty() {
                return Err(Error::invalid_input(
                    "floating_ips requires wait to be enabled",
                ));
            }
            if !self.floating_ip_pools.is_empty() {
                return Err(Error::invalid_input(
                    "floating_ip_pools requires wait to be enabled",
                ));
            }
        }

        if self.auto_ip && !(self.floating_ips.is_empty() && self.floating_ip_pools.is_empty()) {
            return Err(Error::invalid_input(
                "auto_ip cannot be combined with floating_ips or floating_ip_pools",
            ));
        }

        match (&self.flavor, self.flavor_ram) {
            (Some(..), Some(..)) => {
                return Err(Error::invalid_input(
                    "flavor and flavor_ram are mutually exclusive",
                ))
            }
            (None, None) => {
                return Err(Error::invalid_input(
                    "one of flavor or flavor_ram is required",
                ))
            }
            _ => {}
        }

        if self.image.is_none() {
            return Err(Error::invalid_input("image is required"));
        }

        if self.boot_from_volume && self.volume_size.is_none() {
            return Err(Error::invalid_input(
                "volume_size is required when boot_from_volume is set",
            ));
        }

        let _ = self.metadata()?;
        Ok(())
    }

    /// Flat server metadata.
    pub fn metadata(&self) -> Result<HashMap<String, String>> {
        match self.meta {
            Some(ref meta) => meta.to_metadata(),
            None => Ok(HashMap::new()),
        }
    }

    /// Interface declarations, taking `network` into account.
    pub fn interfaces(&self) -> NicsParam {
        match self.network {
            Some(ref network) if self.nics.is_empty() => NicsParam::network(network.clone()),
            Some(ref network) => {
                warn!("Ignoring network {} since nics are provided", network);
                self.nics.clone()
            }
            None => self.nics.clone(),
        }
    }

    /// Time out for waiting.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// A boot volume created from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootVolume {
    /// Size in GiB.
    pub size_gib: u32,
    /// Delete the volume with the server.
    pub delete_on_termination: bool,
}

/// A fully resolved request to create a server.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionRequest {
    /// Server name.
    pub name: String,
    /// Image ID.
    pub image: ImageRef,
    /// Flavor ID.
    pub flavor: FlavorRef,
    /// Network attachments in order.
    pub nics: Vec<InterfaceSpec>,
    /// Server metadata.
    pub meta: HashMap<String, String>,
    /// Key pair name.
    pub key_name: Option<String>,
    /// Security group names.
    pub security_groups: Vec<String>,
    /// User data (not encoded).
    pub userdata: Option<String>,
    /// Whether to use a configuration drive.
    pub config_drive: bool,
    /// Availability zone.
    pub availability_zone: Option<String>,
    /// Boot volume, if booting from a volume.
    pub boot_volume: Option<BootVolume>,
    /// Attach a floating IP from an external network.
    pub auto_ip: bool,
    /// Floating IP addresses to attach.
    pub floating_ips: Vec<String>,
    /// Networks to allocate floating IPs from.
    pub floating_ip_pools: Vec<String>,
    /// Wait for the server to become active.
    pub wait: bool,
    /// Time out for waiting.
    pub timeout: Duration,
}

impl ProvisionRequest {
    /// Assemble a request from parameters and resolved references.
    pub fn new(
        params: &ServerParams,
        image: ImageRef,
        flavor: FlavorRef,
        nics: Vec<InterfaceSpec>,
    ) -> Result<ProvisionRequest> {
        let boot_volume = if params.boot_from_volume {
            let size_gib = params.volume_size.ok_or_else(|| {
                Error::invalid_input("volume_size is required when boot_from_volume is set")
            })?;
            Some(BootVolume {
                size_gib,
                delete_on_termination: params.terminate_volume,
            })
        } else {
            None
        };

        Ok(ProvisionRequest {
            name: params.name.clone(),
            image,
            flavor,
            nics,
            meta: params.metadata()?,
            key_name: params.key_name.clone(),
            security_groups: params.security_groups.clone(),
            userdata: params.userdata.clone(),
            config_drive: params.config_drive,
            availability_zone: params.availability_zone.clone(),
            boot_volume,
            auto_ip: params.auto_ip,
            floating_ips: params.floating_ips.clone(),
            floating_ip_pools: params.floating_ip_pools.clone(),
            wait: params.wait,
            timeout: params.timeout(),
        })
    }
}

/// Server provisioning pipeline.
///
/// Validates the parameters, resolves the image, the flavor and the network
/// interfaces, then issues exactly one creation call. The first failure
/// stops the pipeline before anything is created.
#[derive(Debug)]
pub struct ServerProvisioner<'c, C: 'c> {
    cloud: &'c C,
}

impl<'c, C: ComputeApi> ServerProvisioner<'c, C> {
    /// Create a provisioner using the given cloud connection.
    pub fn new(cloud: &'c C) -> ServerProvisioner<'c, C> {
        ServerProvisioner { cloud }
    }

    /// Validate, resolve and create a server.
    pub fn provision(&self, params: &ServerParams) -> Result<Server> {
        let request = self.prepare(params)?;
        debug!(
            "Creating server {} from image {} with flavor {} and interfaces {:?}",
            request.name, request.image, request.flavor, request.nics
        );
        let server = self.cloud.create_server(&request)?;
        info!("Created server {} with ID {}", request.name, server.id);
        Ok(server)
    }

    /// Validate and resolve the parameters into a creation request.
    pub fn prepare(&self, params: &ServerParams) -> Result<ProvisionRequest> {
        params.validate()?;
        let image = self.resolve_image(params)?;
        let flavor = self.resolve_flavor(params)?;
        let nics = NicResolver::new(self.cloud).resolve(&params.interfaces())?;
        ProvisionRequest::new(params, image, flavor, nics)
    }

    fn resolve_image(&self, params: &ServerParams) -> Result<ImageRef> {
        let name = params
            .image
            .as_deref()
            .ok_or_else(|| Error::invalid_input("image is required"))?;
        let exclude = Some(params.image_exclude.as_str()).filter(|e| !e.is_empty());
        let image = self
            .cloud
            .find_image_id(name, exclude)?
            .ok_or_else(|| Error::not_found("image", name))?;
        debug!("Resolved image {} to {}", name, image);
        Ok(image)
    }

    fn resolve_flavor(&self, params: &ServerParams) -> Result<FlavorRef> {
        let flavor = match (params.flavor.as_deref(), params.flavor_ram) {
            (Some(name), _) => self
                .cloud
                .find_flavor(name)?
                .ok_or_else(|| Error::not_found("flavor", name))?,
            (None, Some(ram)) => self
                .cloud
                .find_flavor_by_ram(ram, params.flavor_include.as_deref())?
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::ResourceNotFound,
                        format!("Could not find any flavor with at least {} MiB of RAM", ram),
                    )
                })?,
            (None, None) => {
                return Err(Error::invalid_input(
                    "one of flavor or flavor_ram is required",
                ))
            }
        };
        debug!("Using flavor {} ({})", flavor.name, flavor.id);
        Ok(flavor.id.into())
    }
}

/// Server module.
#[derive(Debug)]
pub struct ServerModule<'c, C: 'c> {
    cloud: &'c C,
}

impl<'c, C: ComputeApi> ServerModule<'c, C> {
    /// Create the module using the given cloud connection.
    pub fn new(cloud: &'c C) -> ServerModule<'c, C> {
        ServerModule { cloud }
    }

    fn ensure_present(&self, params: &ServerParams) -> Result<ModuleResult> {
        params.validate()?;
        if let Some(server) = self.cloud.find_server(&params.name)? {
            debug!("Server {} already exists with ID {}", params.name, server.id);
            return report(&server, false);
        }

        let server = ServerProvisioner::new(self.cloud).provision(params)?;
        report(&server, true)
    }

    fn ensure_absent(&self, params: &ServerParams) -> Result<ModuleResult> {
        match self.cloud.find_server(&params.name)? {
            Some(server) => {
                self.cloud
                    .delete_server(&server.id, params.wait, params.timeout())?;
                info!("Deleted server {} with ID {}", params.name, server.id);
                Ok(ModuleResult::exit(true))
            }
            None => {
                debug!("Server {} does not exist", params.name);
                Ok(ModuleResult::exit(false))
            }
        }
    }
}

fn report(server: &Server, changed: bool) -> Result<ModuleResult> {
    Ok(ModuleResult::exit(changed)
        .with_value("id", Value::String(server.id.clone()))
        .with_value("server", serde_json::to_value(server)?))
}

impl<'c, C: ComputeApi> Module for ServerModule<'c, C> {
    type Params = ServerParams;

    const NAME: &'static str = "server";

    fn run(&self, params: ServerParams) -> Result<ModuleResult> {
        match params.state {
            ServerState::Present => self.ensure_present(&params),
            ServerState::Absent => self.ensure_absent(&params),
        }
    }
}
