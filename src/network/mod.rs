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

//! Network API support and the network segment module.

pub(crate) mod api;
mod protocol;
mod segments;

pub use self::protocol::{
    FloatingIp, FloatingIpCreate, Network, Port, PortIpAddress, Segment, SegmentCreate,
    SegmentFilters, SegmentUpdate,
};
pub use self::segments::{SegmentModule, SegmentParams, SegmentState};

use super::Result;

/// Looking up networks and ports by name or ID.
///
/// Lookups match names exactly. `Ok(None)` means that nothing matched,
/// more than one match is reported as an error of kind `TooManyItems`.
pub trait NetworkLookup {
    /// Find a network by its ID or name.
    fn find_network(&self, name_or_id: &str) -> Result<Option<Network>>;

    /// Find a port by its ID or name.
    fn find_port(&self, name_or_id: &str) -> Result<Option<Port>>;
}

/// Managing network segments.
pub trait SegmentApi: NetworkLookup {
    /// Find a segment by its name, narrowed down by the filters.
    fn find_segment(&self, name: &str, filters: &SegmentFilters) -> Result<Option<Segment>>;

    /// Create a segment.
    fn create_segment(&self, request: SegmentCreate) -> Result<Segment>;

    /// Update a segment.
    fn update_segment(&self, id: &str, update: SegmentUpdate) -> Result<Segment>;

    /// Delete a segment.
    fn delete_segment(&self, id: &str) -> Result<()>;
}
