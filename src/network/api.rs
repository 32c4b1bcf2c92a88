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

//! Foundation bits exposing the Network API.

use osauth::services::NETWORK;
use osauth::{ErrorKind, Session};

use super::super::utils;
use super::super::Result;
use super::protocol::*;

/// Find a network by its ID or exact name.
pub async fn find_network<S: AsRef<str>>(session: &Session, id_or_name: S) -> Result<Option<Network>> {
    let s = id_or_name.as_ref();
    trace!("Fetching network {}", s);
    let by_id = session
        .get(NETWORK, &["networks", s])
        .fetch::<NetworkRoot>()
        .await;
    match by_id {
        Ok(root) => Ok(Some(root.network)),
        Err(err) if err.kind() == ErrorKind::ResourceNotFound => {
            let root: NetworksRoot = session
                .get(NETWORK, &["networks"])
                .query(&[("name", s)])
                .fetch()
                .await?;
            trace!("Received networks: {:?}", root.networks);
            let exact = root.networks.into_iter().filter(|n| n.name == s).collect();
            utils::one(exact, format!("Too many networks found with name {}", s))
        }
        Err(err) => Err(err.into()),
    }
}

/// List external networks.
pub async fn list_external_networks(session: &Session) -> Result<Vec<Network>> {
    trace!("Listing external networks");
    let root: NetworksRoot = session
        .get(NETWORK, &["networks"])
        .query(&[("router:external", "true")])
        .fetch()
        .await?;
    trace!("Received networks: {:?}", root.networks);
    Ok(root.networks)
}

/// Find a port by its ID or exact name.
pub async fn find_port<S: AsRef<str>>(session: &Session, id_or_name: S) -> Result<Option<Port>> {
    let s = id_or_name.as_ref();
    trace!("Fetching port {}", s);
    let by_id = session
        .get(NETWORK, &["ports", s])
        .fetch::<PortRoot>()
        .await;
    match by_id {
        Ok(root) => Ok(Some(root.port)),
        Err(err) if err.kind() == ErrorKind::ResourceNotFound => {
            let root: PortsRoot = session
                .get(NETWORK, &["ports"])
                .query(&[("name", s)])
                .fetch()
                .await?;
            trace!("Received ports: {:?}", root.ports);
            let exact = root.ports.into_iter().filter(|p| p.name == s).collect();
            utils::one(exact, format!("Too many ports found with name {}", s))
        }
        Err(err) => Err(err.into()),
    }
}

/// List ports attached to a device.
pub async fn list_device_ports<S: AsRef<str>>(session: &Session, device_id: S) -> Result<Vec<Port>> {
    trace!("Listing ports of device {}", device_id.as_ref());
    let root: PortsRoot = session
        .get(NETWORK, &["ports"])
        .query(&[("device_id", device_id.as_ref())])
        .fetch()
        .await?;
    trace!("Received ports: {:?}", root.ports);
    Ok(root.ports)
}

/// Find a segment by its exact name.
pub async fn find_segment<S: AsRef<str>>(
    session: &Session,
    name: S,
    filters: &SegmentFilters,
) -> Result<Option<Segment>> {
    let name = name.as_ref();
    let query = filters.to_query(name);
    trace!("Listing segments with {:?}", query);
    let root: SegmentsRoot = session
        .get(NETWORK, &["segments"])
        .query(&query)
        .fetch()
        .await?;
    trace!("Received segments: {:?}", root.segments);
    let exact = root
        .segments
        .into_iter()
        .filter(|s| s.name.as_deref() == Some(name) && filters.matches(s))
        .collect();
    utils::one(exact, format!("Too many segments found with name {}", name))
}

/// Create a segment.
pub async fn create_segment(session: &Session, request: SegmentCreate) -> Result<Segment> {
    debug!("Creating a new segment with {:?}", request);
    let body = SegmentCreateRoot { segment: request };
    let root: SegmentRoot = session
        .post(NETWORK, &["segments"])
        .json(&body)
        .fetch()
        .await?;
    debug!("Created segment {:?}", root.segment);
    Ok(root.segment)
}

/// Update a segment.
pub async fn update_segment<S: AsRef<str>>(
    session: &Session,
    id: S,
    update: SegmentUpdate,
) -> Result<Segment> {
    debug!("Updating segment {} with {:?}", id.as_ref(), update);
    let body = SegmentUpdateRoot { segment: update };
    let root: SegmentRoot = session
        .put(NETWORK, &["segments", id.as_ref()])
        .json(&body)
        .fetch()
        .await?;
    debug!("Updated segment {:?}", root.segment);
    Ok(root.segment)
}

/// Delete a segment.
pub async fn delete_segment<S: AsRef<str>>(session: &Session, id: S) -> Result<()> {
    debug!("Deleting segment {}", id.as_ref());
    let _ = session
        .delete(NETWORK, &["segments", id.as_ref()])
        .send()
        .await?;
    debug!("Successfully requested deletion of segment {}", id.as_ref());
    Ok(())
}

/// Find a floating IP by its address.
pub async fn find_floating_ip<S: AsRef<str>>(session: &Session, address: S) -> Result<Option<FloatingIp>> {
    trace!("Fetching floating IP {}", address.as_ref());
    let root: FloatingIpsRoot = session
        .get(NETWORK, &["floatingips"])
        .query(&[("floating_ip_address", address.as_ref())])
        .fetch()
        .await?;
    utils::one(
        root.floatingips,
        format!("Too many floating IPs found with address {}", address.as_ref()),
    )
}

/// Create a floating IP on the given network and attach it to a port.
pub async fn create_floating_ip(session: &Session, request: FloatingIpCreate) -> Result<FloatingIp> {
    debug!("Creating a new floating IP with {:?}", request);
    let body = FloatingIpCreateRoot { floatingip: request };
    let root: FloatingIpRoot = session
        .post(NETWORK, &["floatingips"])
        .json(&body)
        .fetch()
        .await?;
    debug!("Created floating IP {:?}", root.floatingip);
    Ok(root.floatingip)
}

/// Attach an existing floating IP to a port.
pub async fn attach_floating_ip<S1, S2>(session: &Session, id: S1, port_id: S2) -> Result<FloatingIp>
where
    S1: AsRef<str>,
    S2: Into<String>,
{
    let body = FloatingIpUpdateRoot {
        floatingip: FloatingIpUpdate {
            port_id: port_id.into(),
        },
    };
    debug!("Attaching floating IP {} with {:?}", id.as_ref(), body);
    let root: FloatingIpRoot = session
        .put(NETWORK, &["floatingips", id.as_ref()])
        .json(&body)
        .fetch()
        .await?;
    Ok(root.floatingip)
}
