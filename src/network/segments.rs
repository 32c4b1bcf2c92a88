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

//! Network segment module.
//!
//! Creates, updates or removes a network segment. Segment names are
//! treated as unique even though Neutron does not enforce it.
//!
//! ```yaml
//! name: segment1
//! network: my_network
//! network_type: vlan
//! segmentation_id: 2000
//! physical_network: my_physnet
//! state: present
//! ```

use serde_json::Value;

use super::super::module::{Module, ModuleResult};
use super::super::{Error, Result};
use super::{SegmentApi, SegmentCreate, SegmentFilters, SegmentUpdate};

/// Desired state of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentState {
    /// The segment must exist.
    #[default]
    Present,
    /// The segment must not exist.
    Absent,
}

/// Parameters of the network segment module.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentParams {
    /// Segment name.
    pub name: String,
    /// Segment description.
    #[serde(default)]
    pub description: Option<String>,
    /// Name or ID of the network the segment belongs to.
    #[serde(default)]
    pub network: Option<String>,
    /// Type of the physical network, e.g. `vlan`.
    #[serde(default)]
    pub network_type: Option<String>,
    /// Physical network where the segment is implemented.
    #[serde(default)]
    pub physical_network: Option<String>,
    /// Segmentation ID, e.g. a VLAN ID.
    #[serde(default)]
    pub segmentation_id: Option<u32>,
    /// Desired state.
    #[serde(default)]
    pub state: SegmentState,
}

/// Network segment module.
#[derive(Debug)]
pub struct SegmentModule<'c, C: 'c> {
    cloud: &'c C,
}

impl<'c, C: SegmentApi> SegmentModule<'c, C> {
    /// Create the module using the given cloud connection.
    pub fn new(cloud: &'c C) -> SegmentModule<'c, C> {
        SegmentModule { cloud }
    }

    fn ensure_present(
        &self,
        params: SegmentParams,
        network_id: Option<String>,
        filters: &SegmentFilters,
    ) -> Result<ModuleResult> {
        let (segment, changed) = match self.cloud.find_segment(&params.name, filters)? {
            None => {
                let request = SegmentCreate {
                    description: params.description,
                    name: params.name,
                    network_id,
                    network_type: params.network_type,
                    physical_network: params.physical_network,
                    segmentation_id: params.segmentation_id,
                };
                (self.cloud.create_segment(request)?, true)
            }
            Some(segment) => {
                // Everything but the description takes part in the lookup.
                // Neutron reports an unset description as an empty string.
                let current = segment.description.as_deref().unwrap_or("");
                let update = SegmentUpdate {
                    description: params.description.filter(|d| d != current),
                };
                if update.is_empty() {
                    debug!("Segment {} is up to date", segment.id);
                    (segment, false)
                } else {
                    (self.cloud.update_segment(&segment.id, update)?, true)
                }
            }
        };

        Ok(ModuleResult::exit(changed)
            .with_value("id", Value::String(segment.id.clone()))
            .with_value("network_segment", serde_json::to_value(&segment)?))
    }

    fn ensure_absent(&self, name: &str, filters: &SegmentFilters) -> Result<ModuleResult> {
        match self.cloud.find_segment(name, filters)? {
            Some(segment) => {
                self.cloud.delete_segment(&segment.id)?;
                Ok(ModuleResult::exit(true))
            }
            None => {
                debug!("Segment {} does not exist", name);
                Ok(ModuleResult::exit(false))
            }
        }
    }
}

impl<'c, C: SegmentApi> Module for SegmentModule<'c, C> {
    type Params = SegmentParams;

    const NAME: &'static str = "network_segment";

    fn run(&self, params: SegmentParams) -> Result<ModuleResult> {
        let network_id = match params.network {
            Some(ref name) => {
                let network = self
                    .cloud
                    .find_network(name)?
                    .ok_or_else(|| Error::not_found("network", name))?;
                Some(network.id)
            }
            None => None,
        };

        let filters = SegmentFilters {
            network_id: network_id.clone(),
            network_type: params.network_type.clone(),
            physical_network: params.physical_network.clone(),
        };

        match params.state {
            SegmentState::Present => self.ensure_present(params, network_id, &filters),
            SegmentState::Absent => self.ensure_absent(&params.name, &filters),
        }
    }
}
