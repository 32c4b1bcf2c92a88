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

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Once;
use std::time::Duration;

use openstack_modules::compute::{ComputeApi, Flavor, ProvisionRequest, Server, ServerStatus};
use openstack_modules::image::ImageLookup;
use openstack_modules::network::{
    Network, NetworkLookup, Port, Segment, SegmentApi, SegmentCreate, SegmentFilters,
    SegmentUpdate,
};
use openstack_modules::{module, Error, ErrorKind, ImageRef, Result};

static INIT: Once = Once::new();

pub fn set_up() -> FakeCloud {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
    FakeCloud::default()
}

/// Parse module arguments from a YAML task document.
pub fn args(text: &str) -> serde_json::Value {
    module::yaml_args(text).expect("Invalid test arguments")
}

/// An in-memory cloud recording every mutating call.
#[derive(Debug, Default)]
pub struct FakeCloud {
    pub created: RefCell<Vec<ProvisionRequest>>,
    pub deleted: RefCell<Vec<String>>,
    pub lookups: RefCell<Vec<String>>,
    pub servers: RefCell<Vec<Server>>,
    pub segments: RefCell<Vec<Segment>>,
    pub segment_calls: RefCell<Vec<String>>,
}

const NETWORKS: &[(&str, &str)] = &[("5678", "network1"), ("8765", "network2")];
const PORTS: &[(&str, &str)] = &[("1234", "port1"), ("4321", "port2")];
const IMAGES: &[(&str, &str)] = &[
    ("1", "cirros"),
    ("2", "fedora"),
    ("3", "fedora (deprecated)"),
];
const FLAVORS: &[(&str, &str, u64)] = &[("1", "m1.small", 1024), ("2", "m1.tiny", 512)];

fn lookup(
    items: &[(&'static str, &'static str)],
    name_or_id: &str,
) -> Option<(&'static str, &'static str)> {
    items
        .iter()
        .copied()
        .find(|&(id, name)| id == name_or_id || name == name_or_id)
}

impl FakeCloud {
    pub fn with_server(self, id: &str, name: &str) -> FakeCloud {
        self.servers
            .borrow_mut()
            .push(Server::new(id, name, ServerStatus::Active));
        self
    }

    pub fn with_segment(self, segment: Segment) -> FakeCloud {
        self.segments.borrow_mut().push(segment);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.created.borrow().len()
    }

    pub fn last_request(&self) -> ProvisionRequest {
        self.created
            .borrow()
            .last()
            .cloned()
            .expect("create_server was not called")
    }

    fn record(&self, what: String) {
        self.lookups.borrow_mut().push(what);
    }
}

impl NetworkLookup for FakeCloud {
    fn find_network(&self, name_or_id: &str) -> Result<Option<Network>> {
        self.record(format!("network:{}", name_or_id));
        Ok(lookup(NETWORKS, name_or_id).map(|(id, name)| Network {
            id: id.into(),
            name: name.into(),
            ..Network::default()
        }))
    }

    fn find_port(&self, name_or_id: &str) -> Result<Option<Port>> {
        self.record(format!("port:{}", name_or_id));
        Ok(lookup(PORTS, name_or_id).map(|(id, name)| Port {
            id: id.into(),
            name: name.into(),
            ..Port::default()
        }))
    }
}

impl ImageLookup for FakeCloud {
    fn find_image_id(&self, name_or_id: &str, exclude: Option<&str>) -> Result<Option<ImageRef>> {
        self.record(format!("image:{}", name_or_id));
        let found: Vec<_> = IMAGES
            .iter()
            .filter(|(id, name)| *id == name_or_id || *name == name_or_id)
            .filter(|(_, name)| exclude.map_or(true, |e| !name.contains(e)))
            .collect();
        match found.len() {
            0 => Ok(None),
            1 => Ok(Some(found[0].0.into())),
            _ => Err(Error::new(
                ErrorKind::TooManyItems,
                format!("Too many images found with name {}", name_or_id),
            )),
        }
    }
}

fn flavor((id, name, ram): (&str, &str, u64)) -> Flavor {
    Flavor {
        id: id.into(),
        name: name.into(),
        ram,
        ..Flavor::default()
    }
}

impl ComputeApi for FakeCloud {
    fn find_flavor(&self, name_or_id: &str) -> Result<Option<Flavor>> {
        self.record(format!("flavor:{}", name_or_id));
        Ok(FLAVORS
            .iter()
            .copied()
            .find(|&(id, name, _)| id == name_or_id || name == name_or_id)
            .map(flavor))
    }

    fn find_flavor_by_ram(&self, min_ram: u64, include: Option<&str>) -> Result<Option<Flavor>> {
        self.record(format!("flavor_ram:{}", min_ram));
        let mut flavors: Vec<_> = FLAVORS.iter().copied().map(flavor).collect();
        flavors.sort_by_key(|f| f.ram);
        Ok(flavors
            .into_iter()
            .find(|f| f.ram >= min_ram && include.map_or(true, |i| f.name.contains(i))))
    }

    fn find_server(&self, name_or_id: &str) -> Result<Option<Server>> {
        Ok(self
            .servers
            .borrow()
            .iter()
            .find(|s| s.id == name_or_id || s.name == name_or_id)
            .cloned())
    }

    fn create_server(&self, request: &ProvisionRequest) -> Result<Server> {
        self.created.borrow_mut().push(request.clone());
        if request.name == "over-quota" {
            return Err(Error::new(
                ErrorKind::ProviderError,
                "Quota exceeded for instances",
            ));
        }
        let id = format!("server-{}", self.created.borrow().len());
        let server = Server::new(id, request.name.clone(), ServerStatus::Active);
        self.servers.borrow_mut().push(server.clone());
        Ok(server)
    }

    fn delete_server(&self, id: &str, _wait: bool, _timeout: Duration) -> Result<()> {
        self.servers.borrow_mut().retain(|s| s.id != id);
        self.deleted.borrow_mut().push(id.to_string());
        Ok(())
    }
}

impl SegmentApi for FakeCloud {
    fn find_segment(&self, name: &str, filters: &SegmentFilters) -> Result<Option<Segment>> {
        Ok(self
            .segments
            .borrow()
            .iter()
            .find(|s| s.name.as_deref() == Some(name) && filters.matches(s))
            .cloned())
    }

    fn create_segment(&self, request: SegmentCreate) -> Result<Segment> {
        self.segment_calls
            .borrow_mut()
            .push(format!("create:{}", request.name));
        let segment = Segment {
            description: request.description,
            id: format!("segment-{}", self.segments.borrow().len() + 1),
            name: Some(request.name),
            network_id: request.network_id.unwrap_or_default(),
            network_type: request.network_type.unwrap_or_else(|| "flat".into()),
            physical_network: request.physical_network,
            segmentation_id: request.segmentation_id,
        };
        self.segments.borrow_mut().push(segment.clone());
        Ok(segment)
    }

    fn update_segment(&self, id: &str, update: SegmentUpdate) -> Result<Segment> {
        self.segment_calls
            .borrow_mut()
            .push(format!("update:{}", id));
        let mut segments = self.segments.borrow_mut();
        let segment = segments
            .iter_mut()
            .find(|s| s.id == id)
            .expect("update of a missing segment");
        if let Some(description) = update.description {
            segment.description = Some(description);
        }
        Ok(segment.clone())
    }

    fn delete_segment(&self, id: &str) -> Result<()> {
        self.segment_calls
            .borrow_mut()
            .push(format!("delete:{}", id));
        self.segments.borrow_mut().retain(|s| s.id != id);
        Ok(())
    }
}
