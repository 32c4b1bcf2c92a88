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

//! Connection parameters shared by all modules.

use serde_json::Value;

use super::cloud::Cloud;
use super::common::protocol::scalar_to_string;
use super::{Error, Result};

/// Connection parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudConfig {
    /// Name of a `clouds.yaml` entry. Environment variables are used if unset.
    pub cloud: Option<String>,
}

impl CloudConfig {
    /// Take the connection parameters out of module arguments.
    ///
    /// The remaining arguments belong to the module itself.
    pub fn extract(args: &mut Value) -> Result<CloudConfig> {
        let map = args
            .as_object_mut()
            .ok_or_else(|| Error::invalid_input("Module arguments must be a mapping"))?;
        let cloud = match map.remove("cloud") {
            None | Some(Value::Null) => None,
            Some(value) => Some(scalar_to_string(&value).ok_or_else(|| {
                Error::invalid_input(format!("cloud must be a string, got {}", value))
            })?),
        };
        Ok(CloudConfig { cloud })
    }

    /// Connect to the cloud.
    pub fn connect(&self) -> Result<Cloud> {
        match self.cloud {
            Some(ref name) => {
                debug!("Connecting to cloud {} from clouds.yaml", name);
                Cloud::from_config(name)
            }
            None => {
                debug!("Connecting to a cloud from environment variables");
                Cloud::from_env()
            }
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::super::ErrorKind;
    use super::CloudConfig;

    #[test]
    fn test_extract() {
        let mut args = json!({"cloud": "devstack", "name": "vm1"});
        let config = CloudConfig::extract(&mut args).unwrap();
        assert_eq!(config.cloud.as_deref(), Some("devstack"));
        assert_eq!(args, json!({"name": "vm1"}));
    }

    #[test]
    fn test_extract_missing() {
        let mut args = json!({"name": "vm1", "cloud": null});
        assert_eq!(CloudConfig::extract(&mut args).unwrap(), CloudConfig::default());
        assert_eq!(args, json!({"name": "vm1"}));
    }

    #[test]
    fn test_extract_invalid() {
        let mut args = json!(["cloud"]);
        let err = CloudConfig::extract(&mut args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let mut args = json!({"cloud": {"auth": {}}});
        assert!(CloudConfig::extract(&mut args).is_err());
    }
}
