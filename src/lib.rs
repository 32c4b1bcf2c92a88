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

//! Declarative automation modules for OpenStack clouds.
//!
//! Every module takes a flat set of parameters, brings a cloud resource to
//! the requested state and reports the outcome as a [ModuleResult].
//!
//! # Modules
//!
//! * [Server](compute/struct.ServerModule.html) with
//!   [interface resolution](compute/struct.NicResolver.html)
//! * [Network segment](network/struct.SegmentModule.html)
//!
//! # Example
//!
//! ```rust,no_run
//! use openstack_modules::compute::ServerModule;
//! use openstack_modules::{module, CloudConfig};
//!
//! let mut args = module::yaml_args(
//!     "
//! cloud: devstack
//! name: vm1
//! image: cirros
//! flavor: m1.tiny
//! nics:
//!   - net-name: private
//! ",
//! )
//! .expect("Invalid arguments");
//! let cloud = CloudConfig::extract(&mut args)
//!     .and_then(|config| config.connect())
//!     .expect("Cannot connect to the cloud");
//! let result = module::execute(&ServerModule::new(&cloud), args);
//! println!("{}", serde_json::to_string(&result).unwrap());
//! ```
//!
//! Modules only talk to the cloud through capability traits such as
//! [NetworkLookup](network/trait.NetworkLookup.html), so they can be driven
//! by anything implementing them.

// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
// Taken from https://github.com/rust-unofficial/patterns/
#![deny(
    improper_ctypes,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_import_braces,
    unused_parens,
    while_true
)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod cloud;
mod common;
#[cfg(feature = "compute")]
pub mod compute;
pub mod config;
mod error;
#[cfg(feature = "image")]
pub mod image;
pub mod module;
#[cfg(feature = "network")]
pub mod network;
mod utils;

pub use crate::cloud::Cloud;
pub use crate::common::{FlavorRef, ImageRef, NetworkRef, PortRef};
pub use crate::config::CloudConfig;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::module::{Module, ModuleResult};
