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

//! Resolving network interface declarations of a server.
//!
//! Interfaces can be declared in several shapes, all of which are accepted
//! by [NicsParam]:
//!
//! ```yaml
//! nics: net-name=private,port-id=4321
//! ```
//!
//! ```yaml
//! nics:
//!   - net-id: 1234
//!   - port-name: port1
//!   - net-name=network1,port-id=4321
//! ```
//!
//! Parsing is separated from resolution: [NicsParam::requests] turns the
//! input into an ordered list of [NicRequest] without talking to the cloud,
//! then [NicResolver] maps every request to an [InterfaceSpec].

use std::fmt;

use super::super::common::protocol::deser_optional_scalar;
use super::super::common::{NetworkRef, PortRef};
use super::super::network::NetworkLookup;
use super::super::utils;
use super::super::{Error, Result};

/// A canonical network attachment of a server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum InterfaceSpec {
    /// Attach to a network with this ID.
    #[serde(rename = "net-id")]
    Network(NetworkRef),
    /// Attach an existing port with this ID.
    #[serde(rename = "port-id")]
    Port(PortRef),
}

impl InterfaceSpec {
    /// Network ID if the attachment is to a network.
    pub fn net_id(&self) -> Option<&NetworkRef> {
        match self {
            InterfaceSpec::Network(id) => Some(id),
            InterfaceSpec::Port(..) => None,
        }
    }

    /// Port ID if the attachment is of an existing port.
    pub fn port_id(&self) -> Option<&PortRef> {
        match self {
            InterfaceSpec::Network(..) => None,
            InterfaceSpec::Port(id) => Some(id),
        }
    }
}

impl fmt::Display for InterfaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterfaceSpec::Network(id) => write!(f, "net-id={}", id),
            InterfaceSpec::Port(id) => write!(f, "port-id={}", id),
        }
    }
}

/// The `nics` parameter as written by the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NicsParam {
    /// A single comma-separated list of `key=value` pairs.
    One(String),
    /// A list of declarations.
    Many(Vec<NicDeclaration>),
}

/// One element of the `nics` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NicDeclaration {
    /// Comma-separated `key=value` pairs.
    Pairs(String),
    /// A mapping with any of the recognized keys.
    Mapping(NicMapping),
}

/// A mapping declaration of network interfaces.
///
/// Every populated key produces its own interface. Other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NicMapping {
    /// Network ID.
    #[serde(rename = "net-id", default, deserialize_with = "deser_optional_scalar")]
    pub net_id: Option<String>,
    /// Network name or ID.
    #[serde(rename = "net-name", default, deserialize_with = "deser_optional_scalar")]
    pub net_name: Option<String>,
    /// Port ID.
    #[serde(rename = "port-id", default, deserialize_with = "deser_optional_scalar")]
    pub port_id: Option<String>,
    /// Port name or ID.
    #[serde(rename = "port-name", default, deserialize_with = "deser_optional_scalar")]
    pub port_name: Option<String>,
}

/// A single parsed interface request, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NicRequest {
    /// Network ID, used verbatim.
    NetId(String),
    /// Network name to look up.
    NetName(String),
    /// Port ID, used verbatim.
    PortId(String),
    /// Port name to look up.
    PortName(String),
}

impl NicRequest {
    /// Build a request from a key and a value.
    ///
    /// Returns `None` for unrecognized keys and for empty values.
    pub fn new(key: &str, value: &str) -> Option<NicRequest> {
        if value.is_empty() {
            return None;
        }
        let value = value.to_string();
        match key {
            "net-id" => Some(NicRequest::NetId(value)),
            "net-name" => Some(NicRequest::NetName(value)),
            "port-id" => Some(NicRequest::PortId(value)),
            "port-name" => Some(NicRequest::PortName(value)),
            _ => None,
        }
    }
}

impl Default for NicsParam {
    fn default() -> NicsParam {
        NicsParam::Many(Vec::new())
    }
}

impl NicsParam {
    /// Whether no declarations were supplied.
    pub fn is_empty(&self) -> bool {
        match self {
            NicsParam::One(s) => s.trim().is_empty(),
            NicsParam::Many(items) => items.is_empty(),
        }
    }

    /// A declaration of a single network by its name or ID.
    pub fn network<S: Into<String>>(name_or_id: S) -> NicsParam {
        NicsParam::Many(vec![NicDeclaration::Mapping(NicMapping {
            net_name: Some(name_or_id.into()),
            ..NicMapping::default()
        })])
    }

    /// Flatten the declarations into an ordered list of requests.
    pub fn requests(&self) -> Vec<NicRequest> {
        match self {
            NicsParam::One(s) => parse_pairs(s),
            NicsParam::Many(items) => items.iter().flat_map(NicDeclaration::requests).collect(),
        }
    }
}

impl NicDeclaration {
    /// Requests of this declaration in order.
    pub fn requests(&self) -> Vec<NicRequest> {
        match self {
            NicDeclaration::Pairs(s) => parse_pairs(s),
            NicDeclaration::Mapping(mapping) => mapping.requests(),
        }
    }
}

impl NicMapping {
    /// Requests of this mapping in the order `net-id`, `net-name`, `port-id`, `port-name`.
    pub fn requests(&self) -> Vec<NicRequest> {
        [
            ("net-id", &self.net_id),
            ("net-name", &self.net_name),
            ("port-id", &self.port_id),
            ("port-name", &self.port_name),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().and_then(|v| NicRequest::new(key, v.trim())))
        .collect()
    }
}

fn parse_pairs(s: &str) -> Vec<NicRequest> {
    s.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match utils::split_pair(token) {
            Some((key, value)) => {
                let request = NicRequest::new(key, value);
                if request.is_none() && !value.is_empty() {
                    // Kept permissive for compatibility with existing playbooks.
                    warn!("Ignoring unrecognized interface key {} in {}", key, s);
                }
                request
            }
            None => {
                warn!("Ignoring interface token {} without a value", token);
                None
            }
        })
        .collect()
}

/// Resolver of interface declarations into canonical attachments.
#[derive(Debug)]
pub struct NicResolver<'c, C: 'c> {
    cloud: &'c C,
}

impl<'c, C: NetworkLookup> NicResolver<'c, C> {
    /// Create a resolver using the given lookup capability.
    pub fn new(cloud: &'c C) -> NicResolver<'c, C> {
        NicResolver { cloud }
    }

    /// Resolve the declarations, preserving their order.
    pub fn resolve(&self, nics: &NicsParam) -> Result<Vec<InterfaceSpec>> {
        nics.requests()
            .into_iter()
            .map(|request| self.resolve_one(request))
            .collect()
    }

    /// Resolve a single request.
    pub fn resolve_one(&self, request: NicRequest) -> Result<InterfaceSpec> {
        let spec = match request {
            NicRequest::NetId(id) => InterfaceSpec::Network(id.into()),
            NicRequest::PortId(id) => InterfaceSpec::Port(id.into()),
            NicRequest::NetName(name) => {
                let network = self
                    .cloud
                    .find_network(&name)?
                    .ok_or_else(|| Error::not_found("network", &name))?;
                debug!("Resolved network {} to {}", name, network.id);
                InterfaceSpec::Network(network.id.into())
            }
            NicRequest::PortName(name) => {
                let port = self
                    .cloud
                    .find_port(&name)?
                    .ok_or_else(|| Error::not_found("port", &name))?;
                debug!("Resolved port {} to {}", name, port.id);
                InterfaceSpec::Port(port.id.into())
            }
        };
        Ok(spec)
    }
}

/// Resolve interface declarations using the given lookup capability.
pub fn resolve_nics<C: NetworkLookup>(cloud: &C, nics: &NicsParam) -> Result<Vec<InterfaceSpec>> {
    NicResolver::new(cloud).resolve(nics)
}

#[cfg(test)]
mod test {
    use std::cell::Cell;

    use serde_json::json;

    use super::super::super::network::{Network, NetworkLookup, Port};
    use super::super::super::{ErrorKind, Result};
    use super::*;

    #[derive(Default)]
    struct Lookup {
        calls: Cell<usize>,
    }

    impl NetworkLookup for Lookup {
        fn find_network(&self, name_or_id: &str) -> Result<Option<Network>> {
            self.calls.set(self.calls.get() + 1);
            let id = match name_or_id {
                "network1" => "5678",
                "network2" => "8765",
                _ => return Ok(None),
            };
            Ok(Some(Network {
                id: id.into(),
                name: name_or_id.into(),
                ..Network::default()
            }))
        }

        fn find_port(&self, name_or_id: &str) -> Result<Option<Port>> {
            self.calls.set(self.calls.get() + 1);
            let id = match name_or_id {
                "port1" => "1234",
                "port2" => "4321",
                _ => return Ok(None),
            };
            Ok(Some(Port {
                id: id.into(),
                name: name_or_id.into(),
                ..Port::default()
            }))
        }
    }

    fn nics(value: serde_json::Value) -> NicsParam {
        serde_json::from_value(value).unwrap()
    }

    fn net(id: &str) -> InterfaceSpec {
        InterfaceSpec::Network(id.into())
    }

    fn port(id: &str) -> InterfaceSpec {
        InterfaceSpec::Port(id.into())
    }

    #[test]
    fn test_net_ids_in_order() {
        let lookup = Lookup::default();
        let result = resolve_nics(&lookup, &nics(json!("net-id=1234,net-id=4321"))).unwrap();
        assert_eq!(result, vec![net("1234"), net("4321")]);
        assert_eq!(lookup.calls.get(), 0);
    }

    #[test]
    fn test_port_id() {
        let lookup = Lookup::default();
        let result = resolve_nics(&lookup, &nics(json!(["port-id=1234"]))).unwrap();
        assert_eq!(result, vec![port("1234")]);
    }

    #[test]
    fn test_names_are_resolved() {
        let lookup = Lookup::default();
        let result = resolve_nics(&lookup, &nics(json!("net-name=network1"))).unwrap();
        assert_eq!(result, vec![net("5678")]);
        let result = resolve_nics(&lookup, &nics(json!("port-name=port1"))).unwrap();
        assert_eq!(result, vec![port("1234")]);
        assert_eq!(lookup.calls.get(), 2);
    }

    #[test]
    fn test_mixed_declarations() {
        let lookup = Lookup::default();
        let value = nics(json!([
            {"net-id": "1234"},
            {"port-name": "port1"},
            "net-name=network1,port-id=4321"
        ]));
        let result = resolve_nics(&lookup, &value).unwrap();
        assert_eq!(
            result,
            vec![net("1234"), port("1234"), net("5678"), port("4321")]
        );
    }

    #[test]
    fn test_mapping_with_several_keys() {
        let value = nics(json!([{"port-name": "port2", "net-id": 42, "foo": "bar"}]));
        assert_eq!(
            value.requests(),
            vec![
                NicRequest::NetId("42".into()),
                NicRequest::PortName("port2".into())
            ]
        );
    }

    #[test]
    fn test_unknown_keys_and_empty_values_ignored() {
        let value = nics(json!(" foo=bar , net-id= , junk , net-id = 1 "));
        assert_eq!(value.requests(), vec![NicRequest::NetId("1".into())]);
        let value = nics(json!([{"net-name": ""}, {"v4-fixed-ip": "10.0.0.1"}]));
        assert!(value.requests().is_empty());
    }

    #[test]
    fn test_empty_declarations() {
        let lookup = Lookup::default();
        assert!(NicsParam::default().is_empty());
        assert!(nics(json!([])).is_empty());
        assert!(resolve_nics(&lookup, &nics(json!([]))).unwrap().is_empty());
        assert!(resolve_nics(&lookup, &nics(json!(""))).unwrap().is_empty());
    }

    #[test]
    fn test_missing_network() {
        let lookup = Lookup::default();
        let err = resolve_nics(&lookup, &nics(json!(["net-name=nonexistent-network"])))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
        assert!(err.to_string().contains("nonexistent-network"));
    }

    #[test]
    fn test_missing_port_stops_resolution() {
        let lookup = Lookup::default();
        let err = resolve_nics(
            &lookup,
            &nics(json!("port-name=missing,net-name=network1")),
        )
        .unwrap_err();
        assert_eq!(err.message(), "Could not find port missing");
        assert_eq!(lookup.calls.get(), 1);
    }

    #[test]
    fn test_single_network() {
        let lookup = Lookup::default();
        let result = resolve_nics(&lookup, &NicsParam::network("network2")).unwrap();
        assert_eq!(result, vec![net("8765")]);
    }

    #[test]
    fn test_interface_spec_serialization() {
        assert_eq!(
            serde_json::to_value(vec![net("1234"), port("4321")]).unwrap(),
            json!([{"net-id": "1234"}, {"port-id": "4321"}])
        );
        assert_eq!(net("1").to_string(), "net-id=1");
        assert_eq!(port("2").port_id(), Some(&PortRef::from("2")));
        assert_eq!(port("2").net_id(), None);
    }
}
