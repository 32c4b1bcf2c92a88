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

//! Foundation bits exposing the Image API.

use osauth::services::IMAGE;
use osauth::{ErrorKind, Session};

use super::super::utils;
use super::super::Result;
use super::protocol::*;

/// Find an image by its ID or exact name, skipping excluded images.
pub async fn find_image<S: AsRef<str>>(
    session: &Session,
    id_or_name: S,
    exclude: Option<&str>,
) -> Result<Option<Image>> {
    let s = id_or_name.as_ref();
    match get_image_by_id(session, s).await {
        Ok(image) if !image.is_excluded(exclude) => Ok(Some(image)),
        Ok(image) => {
            debug!("Image {} is excluded by {:?}", image.id, exclude);
            Ok(None)
        }
        Err(err) if err.kind() == ErrorKind::ResourceNotFound => {
            let found = list_images_by_name(session, s)
                .await?
                .into_iter()
                .filter(|image| image.name == s && !image.is_excluded(exclude))
                .collect();
            utils::one(found, format!("Too many images found with name {}", s))
        }
        Err(err) => Err(err.into()),
    }
}

/// Get an image by its ID.
async fn get_image_by_id<S: AsRef<str>>(
    session: &Session,
    id: S,
) -> ::std::result::Result<Image, osauth::Error> {
    trace!("Fetching image {}", id.as_ref());
    let image = session
        .get(IMAGE, &["images", id.as_ref()])
        .fetch::<Image>()
        .await?;
    trace!("Received {:?}", image);
    Ok(image)
}

/// List images with the given name.
async fn list_images_by_name<S: AsRef<str>>(session: &Session, name: S) -> Result<Vec<Image>> {
    trace!("Get image by name {}", name.as_ref());
    let root: ImagesRoot = session
        .get(IMAGE, &["images"])
        .query(&[("name", name.as_ref())])
        .fetch()
        .await?;
    trace!("Received images: {:?}", root.images);
    Ok(root.images)
}
