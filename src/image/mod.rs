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

//! Image API support.

pub(crate) mod api;
mod protocol;

pub use self::protocol::Image;

use super::common::ImageRef;
use super::Result;

/// Looking up images.
pub trait ImageLookup {
    /// Find an image ID by the image ID or exact name.
    ///
    /// Images whose name contains `exclude` are skipped.
    fn find_image_id(&self, name_or_id: &str, exclude: Option<&str>) -> Result<Option<ImageRef>>;
}
