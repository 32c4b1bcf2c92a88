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

//! Foundation bits exposing the Compute API.

use std::time::Duration;

use base64::Engine;
use osauth::services::COMPUTE;
use osauth::Session;
use waiter::Waiter;

use super::super::network::api as network_api;
use super::super::network::{FloatingIpCreate, Port};
use super::super::utils;
use super::super::{Error, ErrorKind, Result};
use super::protocol::*;
use super::waiter::{ServerDeletionWaiter, ServerStatusWaiter};
use super::{BlockDevice, InterfaceSpec, ProvisionRequest};

/// Find a flavor by its ID or exact name.
pub async fn find_flavor<S: AsRef<str>>(session: &Session, id_or_name: S) -> Result<Option<Flavor>> {
    let s = id_or_name.as_ref();
    let result = session
        .get(COMPUTE, &["flavors", s])
        .fetch::<FlavorRoot>()
        .await;
    match result {
        Ok(root) => Ok(Some(root.flavor)),
        Err(err) if err.kind() == osauth::ErrorKind::ResourceNotFound => {
            let found = list_flavors(session)
                .await?
                .into_iter()
                .filter(|flavor| flavor.name == s)
                .collect();
            utils::one(found, format!("Too many flavors found with name {}", s))
        }
        Err(err) => Err(err.into()),
    }
}

/// List flavors with details.
pub async fn list_flavors(session: &Session) -> Result<Vec<Flavor>> {
    trace!("Listing flavors");
    let root: FlavorsDetailRoot = session
        .get(COMPUTE, &["flavors", "detail"])
        .fetch()
        .await?;
    trace!("Received flavors: {:?}", root.flavors);
    Ok(root.flavors)
}

/// Find the smallest flavor with at least `min_ram` MiB of RAM.
///
/// If `include` is set, the flavor name must contain it.
pub async fn find_flavor_by_ram(
    session: &Session,
    min_ram: u64,
    include: Option<&str>,
) -> Result<Option<Flavor>> {
    let flavors = list_flavors(session).await?;
    Ok(select_flavor_by_ram(flavors, min_ram, include))
}

/// Pick the flavor with the least RAM satisfying the requirements.
pub fn select_flavor_by_ram(
    mut flavors: Vec<Flavor>,
    min_ram: u64,
    include: Option<&str>,
) -> Option<Flavor> {
    // Stable sort keeps the listing order among flavors of the same size.
    flavors.sort_by_key(|flavor| flavor.ram);
    flavors.into_iter().find(|flavor| {
        flavor.ram >= min_ram && include.map_or(true, |text| flavor.name.contains(text))
    })
}

/// Get a server by its ID.
pub async fn get_server<S: AsRef<str>>(session: &Session, id: S) -> Result<Server> {
    trace!("Get compute server {}", id.as_ref());
    let root: ServerRoot = session
        .get(COMPUTE, &["servers", id.as_ref()])
        .fetch()
        .await?;
    trace!("Received {:?}", root.server);
    Ok(root.server)
}

/// Find a server by its ID or exact name.
pub async fn find_server<S: AsRef<str>>(session: &Session, id_or_name: S) -> Result<Option<Server>> {
    let s = id_or_name.as_ref();
    match get_server(session, s).await {
        Ok(server) => Ok(Some(server)),
        Err(err) if err.kind() == ErrorKind::ResourceNotFound => {
            trace!("Get compute server by name {}", s);
            let pattern = name_filter(s);
            let root: ServersDetailRoot = session
                .get(COMPUTE, &["servers", "detail"])
                .query(&[("name", pattern.as_str())])
                .fetch()
                .await?;
            let found = root
                .servers
                .into_iter()
                .filter(|server| server.name == s)
                .collect();
            utils::one(found, format!("Too many servers found with name {}", s))
        }
        Err(err) => Err(err),
    }
}

/// Nova treats the `name` filter as a regular expression.
fn name_filter(name: &str) -> String {
    format!("^{}$", regex::escape(name))
}

/// Create a server, optionally wait for it and attach floating IPs.
pub async fn create_server(session: &Session, request: &ProvisionRequest) -> Result<Server> {
    let body = ServerCreateRoot {
        server: server_create_body(request),
    };
    debug!("Creating a server with {:?}", body);
    let root: CreatedServerRoot = session
        .post(COMPUTE, &["servers"])
        .json(&body)
        .fetch()
        .await?;
    let id = root.server.id;
    info!("Requested creation of server {} with ID {}", request.name, id);

    if !request.wait {
        return get_server(session, &id).await;
    }

    let building = Server::new(id.clone(), request.name.clone(), ServerStatus::Build);
    let _ = ServerStatusWaiter::new(session, building, request.timeout)
        .wait()
        .await?;
    attach_floating_ips(session, &id, request).await?;
    // Addresses have changed if floating IPs were attached.
    get_server(session, &id).await
}

/// Delete a server, optionally waiting for it to disappear.
pub async fn delete_server<S: AsRef<str>>(
    session: &Session,
    id: S,
    wait: bool,
    timeout: Duration,
) -> Result<()> {
    debug!("Deleting server {}", id.as_ref());
    let _ = session
        .delete(COMPUTE, &["servers", id.as_ref()])
        .send()
        .await?;
    debug!("Successfully requested deletion of server {}", id.as_ref());
    if wait {
        ServerDeletionWaiter::new(session, id.as_ref(), timeout)
            .wait()
            .await
    } else {
        Ok(())
    }
}

fn server_create_body(request: &ProvisionRequest) -> ServerCreate {
    let (image_ref, block_devices) = match request.boot_volume {
        Some(ref volume) => (
            None,
            vec![BlockDevice::boot_volume(
                request.image.clone(),
                volume.size_gib,
                volume.delete_on_termination,
            )],
        ),
        None => (Some(request.image.to_string()), Vec::new()),
    };

    ServerCreate {
        block_devices,
        availability_zone: request.availability_zone.clone(),
        config_drive: if request.config_drive { Some(true) } else { None },
        flavor_ref: request.flavor.to_string(),
        image_ref,
        key_name: request.key_name.clone(),
        metadata: request.meta.clone(),
        name: request.name.clone(),
        networks: request
            .nics
            .iter()
            .map(|nic| match nic {
                InterfaceSpec::Network(id) => ServerNetwork::Network { uuid: id.clone() },
                InterfaceSpec::Port(id) => ServerNetwork::Port { port: id.clone() },
            })
            .collect(),
        security_groups: request
            .security_groups
            .iter()
            .map(|name| SecurityGroupName { name: name.clone() })
            .collect(),
        user_data: request
            .userdata
            .as_ref()
            .map(|data| base64::engine::general_purpose::STANDARD.encode(data)),
    }
}

async fn attach_floating_ips(session: &Session, id: &str, request: &ProvisionRequest) -> Result<()> {
    if !request.auto_ip && request.floating_ips.is_empty() && request.floating_ip_pools.is_empty() {
        return Ok(());
    }

    let port = server_port(session, id).await?;

    for address in &request.floating_ips {
        let fip = network_api::find_floating_ip(session, address)
            .await?
            .ok_or_else(|| Error::not_found("floating IP", address))?;
        if fip.port_id.as_deref() == Some(port.id.as_str()) {
            debug!("Floating IP {} is already attached to port {}", address, port.id);
        } else {
            let _ = network_api::attach_floating_ip(session, &fip.id, port.id.clone()).await?;
            info!("Attached floating IP {} to server {}", address, id);
        }
    }

    for pool in &request.floating_ip_pools {
        let network = network_api::find_network(session, pool)
            .await?
            .ok_or_else(|| Error::not_found("network", pool))?;
        create_floating_ip(session, id, network.id, &port).await?;
    }

    if request.auto_ip {
        let network = network_api::list_external_networks(session)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::ResourceNotFound,
                    "Could not find an external network for a floating IP",
                )
            })?;
        create_floating_ip(session, id, network.id, &port).await?;
    }

    Ok(())
}

async fn server_port(session: &Session, id: &str) -> Result<Port> {
    network_api::list_device_ports(session, id)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            Error::new(
                ErrorKind::OperationFailed,
                format!("Server {} has no ports to attach floating IPs to", id),
            )
        })
}

async fn create_floating_ip(session: &Session, id: &str, network_id: String, port: &Port) -> Result<()> {
    let request = FloatingIpCreate {
        floating_network_id: network_id,
        port_id: port.id.clone(),
    };
    let fip = network_api::create_floating_ip(session, request).await?;
    info!(
        "Attached new floating IP {} to server {}",
        fip.floating_ip_address, id
    );
    Ok(())
}
