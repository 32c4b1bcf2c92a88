// Copyright 2018-2019 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Block device mapping for booting servers from volumes.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::super::common::ImageRef;

/// A volume to attach to a server.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDevice {
    /// Boot index of the device if it's intended to be bootable.
    pub boot_index: Option<u16>,

    /// Whether to delete the created volume on termination.
    pub delete_on_termination: bool,

    /// The size (in GiB) of the created volume (if any).
    pub size_gib: Option<u32>,

    /// An image to populate the device from (if any).
    pub image: Option<ImageRef>,
}

impl BlockDevice {
    /// Create a boot volume from an image.
    pub fn boot_volume<I>(image: I, size_gib: u32, delete_on_termination: bool) -> BlockDevice
    where
        I: Into<ImageRef>,
    {
        BlockDevice {
            boot_index: Some(0),
            delete_on_termination,
            size_gib: Some(size_gib),
            image: Some(image.into()),
        }
    }

    #[inline]
    fn non_null_field_count(&self) -> usize {
        let mut count = 4;
        if self.image.is_some() {
            count += 1;
        }
        if self.size_gib.is_some() {
            count += 1
        }
        count
    }
}

impl Serialize for BlockDevice {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut bd = serializer.serialize_struct("BlockDevice", self.non_null_field_count())?;
        bd.serialize_field("boot_index", &self.boot_index)?;
        bd.serialize_field("delete_on_termination", &self.delete_on_termination)?;
        bd.serialize_field("destination_type", "volume")?;
        if let Some(ref image) = self.image {
            bd.serialize_field("source_type", "image")?;
            bd.serialize_field("uuid", image)?;
        } else {
            bd.serialize_field("source_type", "blank")?;
        }
        if let Some(volume_size) = self.size_gib {
            bd.serialize_field("volume_size", &volume_size)?;
        }
        bd.end()
    }
}
