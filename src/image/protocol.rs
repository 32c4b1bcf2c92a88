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

//! JSON structures and protocol bits for the Image API.

#![allow(missing_docs)]

/// An image.
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesRoot {
    pub images: Vec<Image>,
}

impl Image {
    /// Whether the image should be skipped because of the exclusion marker.
    pub fn is_excluded(&self, exclude: Option<&str>) -> bool {
        exclude.map_or(false, |marker| !marker.is_empty() && self.name.contains(marker))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{Image, ImagesRoot};

    #[test]
    fn test_image_exclusion() {
        let image: Image = serde_json::from_value(json!({
            "id": "1",
            "name": "cirros (deprecated)",
            "status": "active",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(image.is_excluded(Some("(deprecated)")));
        assert!(!image.is_excluded(Some("")));
        assert!(!image.is_excluded(None));
    }

    #[test]
    fn test_images_without_name() {
        let root: ImagesRoot =
            serde_json::from_value(json!({"images": [{"id": "1", "status": "queued"}]})).unwrap();
        assert_eq!(root.images[0].name, "");
        assert!(!root.images[0].is_excluded(Some("(deprecated)")));
    }
}
