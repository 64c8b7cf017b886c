// Copyright 2024 The Kubernetes Authors.
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

//! PodNodeConstraints admission plugin.
//!
//! Workloads that pin pods to nodes, either through `spec.nodeName` or through
//! `spec.nodeSelector` keys listed in a configured blacklist, are only admitted
//! when the requesting user may `create` `pods/binding` in the target namespace.
//! The plugin covers pods and the five workload resources that embed a pod
//! template.

pub mod admission;
pub mod api;
pub mod authorization;
pub mod plugins;

// Re-export commonly used types
pub use admission::{
    AdmissionError, AdmissionResult, Attributes, AttributesRecord, Handler, Interface, Operation,
    PluginInitializer, Plugins, ValidationInterface,
};
pub use api::core::{Pod, PodSpec, PodTemplateSpec};
pub use authorization::{Authorizer, AuthorizationError, SubjectAccessReview, UserInfo};
pub use plugins::podnodeconstraints::{Plugin as PodNodeConstraints, PodNodeConstraintsConfig};
