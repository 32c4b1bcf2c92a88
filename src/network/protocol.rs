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

//! JSON structures and protocol bits for the Network API.

#![allow(missing_docs)]

use super::super::common;

/// A network.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Network {
    #[serde(rename = "router:external", default, skip_serializing_if = "Option::is_none")]
    pub external: Option<bool>,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub subnets: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkRoot {
    pub network: Network,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworksRoot {
    pub networks: Vec<Network>,
}

/// A port's IP address.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PortIpAddress {
    pub ip_address: String,
    pub subnet_id: String,
}

/// A port.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Port {
    #[serde(deserialize_with = "common::protocol::empty_as_none", default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub fixed_ips: Vec<PortIpAddress>,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub network_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortRoot {
    pub port: Port,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortsRoot {
    pub ports: Vec<Port>,
}

/// A network segment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Segment {
    #[serde(deserialize_with = "common::protocol::empty_as_none", default)]
    pub description: Option<String>,
    pub id: String,
    #[serde(deserialize_with = "common::protocol::empty_as_none", default)]
    pub name: Option<String>,
    pub network_id: String,
    pub network_type: String,
    #[serde(default)]
    pub physical_network: Option<String>,
    #[serde(default)]
    pub segmentation_id: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentRoot {
    pub segment: Segment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentsRoot {
    pub segments: Vec<Segment>,
}

/// A request to create a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segmentation_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentCreateRoot {
    pub segment: SegmentCreate,
}

/// An update to a segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SegmentUpdate {
    /// Whether the update changes anything.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentUpdateRoot {
    pub segment: SegmentUpdate,
}

/// Filters applied when looking up a segment by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentFilters {
    pub network_id: Option<String>,
    pub network_type: Option<String>,
    pub physical_network: Option<String>,
}

impl SegmentFilters {
    /// Whether the segment matches these filters.
    pub fn matches(&self, segment: &Segment) -> bool {
        self.network_id
            .as_ref()
            .map_or(true, |x| *x == segment.network_id)
            && self
                .network_type
                .as_ref()
                .map_or(true, |x| *x == segment.network_type)
            && self
                .physical_network
                .as_ref()
                .map_or(true, |x| Some(x) == segment.physical_network.as_ref())
    }

    /// Query string for the segment list call.
    pub fn to_query(&self, name: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("name", name.to_string())];
        if let Some(ref value) = self.network_id {
            query.push(("network_id", value.clone()));
        }
        if let Some(ref value) = self.network_type {
            query.push(("network_type", value.clone()));
        }
        if let Some(ref value) = self.physical_network {
            query.push(("physical_network", value.clone()));
        }
        query
    }
}

/// A floating IP.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FloatingIp {
    pub floating_ip_address: String,
    pub floating_network_id: String,
    pub id: String,
    #[serde(default)]
    pub port_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FloatingIpRoot {
    pub floatingip: FloatingIp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FloatingIpsRoot {
    pub floatingips: Vec<FloatingIp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingIpCreate {
    pub floating_network_id: String,
    pub port_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingIpCreateRoot {
    pub floatingip: FloatingIpCreate,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingIpUpdate {
    pub port_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatingIpUpdateRoot {
    pub floatingip: FloatingIpUpdate,
}
