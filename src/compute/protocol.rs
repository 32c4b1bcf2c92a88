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

//! JSON structures and protocol bits for the Compute API.

#![allow(missing_docs)]

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::super::common::{NetworkRef, PortRef};
use super::BlockDevice;

/// Possible server statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerStatus {
    Active,
    Build,
    Deleted,
    Error,
    HardReboot,
    Migrating,
    Paused,
    Reboot,
    Resize,
    RevertResize,
    Shutoff,
    Suspended,
    Rescue,
    Shelved,
    ShelvedOffloaded,
    SoftDeleted,
    VerifyResize,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A flavor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Flavor {
    #[serde(default)]
    pub disk: u64,
    pub id: String,
    pub name: String,
    pub ram: u64,
    #[serde(default)]
    pub vcpus: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorRoot {
    pub flavor: Flavor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorsDetailRoot {
    pub flavors: Vec<Flavor>,
}

/// Server description as known to the cloud.
///
/// Attributes without a dedicated field are kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Server {
    /// Create a server description with no extra attributes.
    pub fn new<S1, S2>(id: S1, name: S2, status: ServerStatus) -> Server
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Server {
            id: id.into(),
            name: name.into(),
            status,
            extra: Map::new(),
        }
    }

    /// Fault message reported for a server in the `ERROR` state.
    pub fn fault_message(&self) -> Option<&str> {
        self.extra
            .get("fault")
            .and_then(|fault| fault.get("message"))
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerRoot {
    pub server: Server,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServersDetailRoot {
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerNetwork {
    Network { uuid: NetworkRef },
    Port { port: PortRef },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityGroupName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerCreate {
    #[serde(
        rename = "block_device_mapping_v2",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub block_devices: Vec<BlockDevice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_drive: Option<bool>,
    #[serde(rename = "flavorRef")]
    pub flavor_ref: String,
    #[serde(rename = "imageRef", skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<ServerNetwork>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<SecurityGroupName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerCreateRoot {
    pub server: ServerCreate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedServer {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedServerRoot {
    pub server: CreatedServer,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_server_keeps_extra_attributes() {
        let server: Server = serde_json::from_value(json!({
            "id": "1234",
            "name": "vm1",
            "status": "ACTIVE",
            "addresses": {"private": [{"addr": "10.0.0.3"}]},
            "fault": {"message": "no valid host"}
        }))
        .unwrap();
        assert_eq!(server.status, ServerStatus::Active);
        assert!(server.extra.contains_key("addresses"));
        assert_eq!(server.fault_message(), Some("no valid host"));
        let value = serde_json::to_value(&server).unwrap();
        assert_eq!(value["status"], "ACTIVE");
        assert_eq!(value["addresses"]["private"][0]["addr"], "10.0.0.3");
    }

    #[test]
    fn test_server_status_names() {
        let status: ServerStatus = serde_json::from_value(json!("HARD_REBOOT")).unwrap();
        assert_eq!(status, ServerStatus::HardReboot);
        let status: ServerStatus = serde_json::from_value(json!("SHUTOFF")).unwrap();
        assert_eq!(status, ServerStatus::Shutoff);
        let status: ServerStatus = serde_json::from_value(json!("WHATEVER")).unwrap();
        assert_eq!(status, ServerStatus::Unknown);
    }

    #[test]
    fn test_server_create_body() {
        let body = ServerCreateRoot {
            server: ServerCreate {
                block_devices: Vec::new(),
                availability_zone: None,
                config_drive: None,
                flavor_ref: "2".into(),
                image_ref: Some("1".into()),
                key_name: None,
                metadata: HashMap::new(),
                name: "vm1".into(),
                networks: vec![
                    ServerNetwork::Network {
                        uuid: "5678".into(),
                    },
                    ServerNetwork::Port {
                        port: "4321".into(),
                    },
                ],
                security_groups: vec![SecurityGroupName {
                    name: "default".into(),
                }],
                user_data: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"server": {
                "flavorRef": "2",
                "imageRef": "1",
                "name": "vm1",
                "networks": [{"uuid": "5678"}, {"port": "4321"}],
                "security_groups": [{"name": "default"}]
            }})
        );
    }
}
