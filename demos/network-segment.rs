// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
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

use std::env;
use std::fs;

use openstack_modules::network::SegmentModule;
use openstack_modules::{module, CloudConfig};

fn main() {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .expect("Provide a YAML file with network segment parameters");
    let text = fs::read_to_string(&path).expect("Cannot read the parameters file");
    let mut args = module::yaml_args(text).expect("Invalid parameters file");

    let cloud = CloudConfig::extract(&mut args)
        .and_then(|config| config.connect())
        .expect("Failed to connect to the cloud");

    let result = module::execute(&SegmentModule::new(&cloud), args);
    println!(
        "{}",
        serde_json::to_string_pretty(&result).expect("Cannot serialize the result")
    );
    if result.failed {
        std::process::exit(1);
    }
}
