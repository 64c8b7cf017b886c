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

//! Core Kubernetes API types (Pod, PodTemplateSpec, ReplicationController).

use std::any::Any;
use std::collections::HashMap;

/// ApiObject is a trait for Kubernetes API objects that can be used in admission.
pub trait ApiObject: Send + Sync {
    /// Returns the object as Any for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns the kind of this object.
    fn kind(&self) -> &str;
}

/// Implements [`ApiObject`] for a type with a fixed kind.
macro_rules! impl_api_object {
    ($ty:ty, $kind:literal) => {
        impl $crate::api::core::ApiObject for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn kind(&self) -> &str {
                $kind
            }
        }
    };
}
pub(crate) use impl_api_object;

// ============================================================================
// PodSpec
// ============================================================================

/// PodSpec describes the scheduling-relevant part of a pod specification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodSpec {
    /// NodeName requests scheduling onto a specific node. Empty means unset.
    pub node_name: String,
    /// NodeSelector is a selector which must be true for the pod to fit on a node.
    pub node_selector: HashMap<String, String>,
}

impl PodSpec {
    /// Create a new empty PodSpec.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_name(node_name: &str) -> Self {
        Self {
            node_name: node_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_node_selector(node_selector: HashMap<String, String>) -> Self {
        Self {
            node_selector,
            ..Self::default()
        }
    }
}

// ============================================================================
// Pod
// ============================================================================

/// Pod is a collection of containers that can run on a host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pod {
    pub name: String,
    pub namespace: String,
    pub spec: PodSpec,
}

impl Pod {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            spec: PodSpec::default(),
        }
    }
}

impl_api_object!(Pod, "Pod");

/// PodTemplateSpec describes the pods created from a template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodTemplateSpec {
    pub labels: HashMap<String, String>,
    pub spec: PodSpec,
}

impl PodTemplateSpec {
    pub fn new(spec: PodSpec) -> Self {
        Self {
            labels: HashMap::new(),
            spec,
        }
    }
}

// ============================================================================
// ReplicationController
// ============================================================================

/// ReplicationControllerSpec is the specification of a replication controller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplicationControllerSpec {
    pub replicas: i32,
    pub selector: HashMap<String, String>,
    /// Template is optional on replication controllers.
    pub template: Option<PodTemplateSpec>,
}

/// ReplicationController keeps a number of pod replicas running.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplicationController {
    pub name: String,
    pub namespace: String,
    pub spec: ReplicationControllerSpec,
}

impl ReplicationController {
    pub fn new(name: &str, namespace: &str, template: Option<PodTemplateSpec>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            spec: ReplicationControllerSpec {
                replicas: 1,
                selector: HashMap::new(),
                template,
            },
        }
    }
}

impl_api_object!(ReplicationController, "ReplicationController");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pod_as_api_object() {
        let pod = Pod::new("test", "default");
        let obj: &dyn ApiObject = &pod;
        assert_eq!(obj.kind(), "Pod");

        let downcast = obj.as_any().downcast_ref::<Pod>();
        assert_eq!(downcast.unwrap().name, "test");
        assert!(obj.as_any().downcast_ref::<ReplicationController>().is_none());
    }

    #[test]
    fn test_pod_spec_constructors() {
        assert_eq!(PodSpec::new(), PodSpec::default());

        let spec = PodSpec::with_node_name("frank");
        assert_eq!(spec.node_name, "frank");
        assert!(spec.node_selector.is_empty());

        let mut selector = HashMap::new();
        selector.insert("bogus".to_string(), "frank".to_string());
        let spec = PodSpec::with_node_selector(selector);
        assert!(spec.node_name.is_empty());
        assert_eq!(spec.node_selector.get("bogus").map(String::as_str), Some("frank"));
    }

    #[test]
    fn test_replication_controller_template_is_optional() {
        let rc = ReplicationController::new("rc", "default", None);
        assert_eq!(rc.kind(), "ReplicationController");
        assert!(rc.spec.template.is_none());
        assert_eq!(rc.spec.replicas, 1);
    }
}
