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

//! `apps` API group types (Deployment, ReplicaSet).

use crate::api::core::{impl_api_object, PodTemplateSpec};
use std::collections::HashMap;

/// API group name.
pub const GROUP_NAME: &str = "apps";

/// DeploymentSpec is the specification of a deployment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeploymentSpec {
    pub replicas: i32,
    pub selector: HashMap<String, String>,
    pub template: PodTemplateSpec,
}

/// Deployment declares rolling updates for pods and replica sets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deployment {
    pub name: String,
    pub namespace: String,
    pub spec: DeploymentSpec,
}

impl Deployment {
    pub fn new(name: &str, namespace: &str, template: PodTemplateSpec) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            spec: DeploymentSpec {
                replicas: 1,
                selector: HashMap::new(),
                template,
            },
        }
    }
}

impl_api_object!(Deployment, "Deployment");

/// ReplicaSetSpec is the specification of a replica set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplicaSetSpec {
    pub replicas: i32,
    pub selector: HashMap<String, String>,
    pub template: PodTemplateSpec,
}

/// ReplicaSet ensures that a number of pod replicas are running.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplicaSet {
    pub name: String,
    pub namespace: String,
    pub spec: ReplicaSetSpec,
}

impl ReplicaSet {
    pub fn new(name: &str, namespace: &str, template: PodTemplateSpec) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            spec: ReplicaSetSpec {
                replicas: 1,
                selector: HashMap::new(),
                template,
            },
        }
    }
}

impl_api_object!(ReplicaSet, "ReplicaSet");
