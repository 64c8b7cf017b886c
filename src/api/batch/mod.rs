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

//! `batch` API group types.

use crate::api::core::{impl_api_object, PodTemplateSpec};

/// API group name.
pub const GROUP_NAME: &str = "batch";

/// JobSpec describes how a job runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobSpec {
    pub parallelism: Option<i32>,
    pub completions: Option<i32>,
    pub template: PodTemplateSpec,
}

/// Job runs pods until a number of them complete successfully.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Job {
    pub name: String,
    pub namespace: String,
    pub spec: JobSpec,
}

impl Job {
    pub fn new(name: &str, namespace: &str, template: PodTemplateSpec) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            spec: JobSpec {
                parallelism: None,
                completions: None,
                template,
            },
        }
    }
}

impl_api_object!(Job, "Job");
