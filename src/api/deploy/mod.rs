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

//! OpenShift `apps.openshift.io` API group types.

use crate::api::core::{impl_api_object, PodTemplateSpec};
use std::collections::HashMap;

/// API group name.
pub const GROUP_NAME: &str = "apps.openshift.io";

/// DeploymentConfigSpec is the specification of a deployment config.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeploymentConfigSpec {
    pub replicas: i32,
    pub selector: HashMap<String, String>,
    /// Template is optional on deployment configs.
    pub template: Option<PodTemplateSpec>,
}

/// DeploymentConfig describes a deployment of a pod template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeploymentConfig {
    pub name: String,
    pub namespace: String,
    pub spec: DeploymentConfigSpec,
}

impl DeploymentConfig {
    pub fn new(name: &str, namespace: &str, template: Option<PodTemplateSpec>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            spec: DeploymentConfigSpec {
                replicas: 1,
                selector: HashMap::new(),
                template,
            },
        }
    }
}

impl_api_object!(DeploymentConfig, "DeploymentConfig");
