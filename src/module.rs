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

//! Running modules and reporting their outcome.
//!
//! Every module invocation produces exactly one [ModuleResult]: either a
//! success report carrying `changed` and the module payload, or a failure
//! report carrying `failed: true` and a human-readable `msg`.
//!
//! ```rust,no_run
//! use openstack_modules::config::CloudConfig;
//! use openstack_modules::module;
//! use openstack_modules::network::SegmentModule;
//!
//! let mut args = module::yaml_args("name: segment1\nnetwork: my_network\nstate: absent")
//!     .expect("Invalid arguments");
//! let cloud = CloudConfig::extract(&mut args)
//!     .and_then(|config| config.connect())
//!     .expect("Cannot connect to the cloud");
//! let result = module::execute(&SegmentModule::new(&cloud), args);
//! println!("{}", serde_json::to_string(&result).unwrap());
//! ```

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{Error, Result};

/// An automation module.
pub trait Module {
    /// Parameters accepted by the module.
    type Params: DeserializeOwned;

    /// Name of the module used in logging.
    const NAME: &'static str;

    /// Run the module with already parsed parameters.
    fn run(&self, params: Self::Params) -> Result<ModuleResult>;
}

/// Outcome of a module invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleResult {
    /// Whether the module changed anything in the cloud.
    pub changed: bool,
    /// Whether the module failed.
    #[serde(skip_serializing_if = "::std::ops::Not::not")]
    pub failed: bool,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Module-specific payload.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ModuleResult {
    /// A successful outcome.
    pub fn exit(changed: bool) -> ModuleResult {
        ModuleResult {
            changed,
            failed: false,
            msg: None,
            data: Map::new(),
        }
    }

    /// A failed outcome.
    pub fn fail(error: &Error) -> ModuleResult {
        ModuleResult {
            changed: false,
            failed: true,
            msg: Some(error.to_string()),
            data: Map::new(),
        }
    }

    /// Add a payload value.
    pub fn with_value<K: Into<String>>(mut self, key: K, value: Value) -> ModuleResult {
        let _ = self.data.insert(key.into(), value);
        self
    }

    /// Payload value by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Parse module arguments written as a YAML mapping.
pub fn yaml_args<S: AsRef<str>>(text: S) -> Result<Value> {
    let value: Value = serde_yaml::from_str(text.as_ref())?;
    match value {
        Value::Object(..) => Ok(value),
        Value::Null => Ok(Value::Object(Map::new())),
        other => Err(Error::invalid_input(format!(
            "Module arguments must be a mapping, got {}",
            other
        ))),
    }
}

/// Parse module parameters.
pub fn parse_params<P: DeserializeOwned>(args: Value) -> Result<P> {
    serde_json::from_value(args)
        .map_err(|e| Error::invalid_input(format!("Invalid module parameters: {}", e)))
}

/// Run a module and report the outcome.
pub fn execute<M: Module>(module: &M, args: Value) -> ModuleResult {
    match parse_params(args).and_then(|params| module.run(params)) {
        Ok(result) => {
            debug!("Module {} finished, changed: {}", M::NAME, result.changed);
            result
        }
        Err(err) => {
            debug!("Module {} failed: {}", M::NAME, err);
            ModuleResult::fail(&err)
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::super::{Error, ErrorKind, Result};
    use super::*;

    struct Echo;

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct EchoParams {
        value: String,
        #[serde(default)]
        fail: bool,
    }

    impl Module for Echo {
        type Params = EchoParams;

        const NAME: &'static str = "echo";

        fn run(&self, params: EchoParams) -> Result<ModuleResult> {
            if params.fail {
                return Err(Error::new(ErrorKind::ProviderError, params.value));
            }
            Ok(ModuleResult::exit(true).with_value("value", Value::String(params.value)))
        }
    }

    #[test]
    fn test_success_report() {
        let result = execute(&Echo, json!({"value": "x"}));
        assert!(!result.failed);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"changed": true, "value": "x"})
        );
    }

    #[test]
    fn test_failure_report() {
        let result = execute(&Echo, json!({"value": "boom", "fail": true}));
        assert!(result.failed);
        assert!(result.msg.as_ref().unwrap().contains("boom"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"changed": false, "failed": true, "msg": "Cloud request failed: boom"})
        );
    }

    #[test]
    fn test_invalid_params_report() {
        let result = execute(&Echo, json!({"value": "x", "typo": 1}));
        assert!(result.failed);
        assert!(result.msg.as_ref().unwrap().contains("typo"));
    }

    #[test]
    fn test_yaml_args() {
        let args = yaml_args("value: 1\nlist: [a, b]").unwrap();
        assert_eq!(args, json!({"value": 1, "list": ["a", "b"]}));
        assert!(yaml_args("- a").is_err());
    }
}
