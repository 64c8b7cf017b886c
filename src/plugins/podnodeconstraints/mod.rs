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

//! PodNodeConstraints admission controller.
//!
//! Prevents objects that contain pod templates from binding to nodes by name
//! or by blacklisted node selector labels, unless the requesting user may
//! `create` `pods/binding` in the object's namespace.

mod config;

pub use config::{read_config, PodNodeConstraintsConfig, CONFIG_KIND};

use crate::admission::attributes::{GroupKind, GroupResource};
use crate::admission::{
    AdmissionError, AdmissionResult, Attributes, Handler, Interface, Operation, PluginInitializer,
    Plugins, ValidationInterface,
};
use crate::api::apps::{self, Deployment, ReplicaSet};
use crate::api::batch::{self, Job};
use crate::api::core::{ApiObject, Pod, PodSpec, PodTemplateSpec, ReplicationController};
use crate::api::deploy::{self, DeploymentConfig};
use crate::authorization::{
    AuthorizationError, Authorizer, SubjectAccessReview, SubjectAccessReviewStatus,
};
use std::borrow::Cow;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Plugin name for the PodNodeConstraints admission controller.
pub const PLUGIN_NAME: &str = "PodNodeConstraints";

/// Verb and resource that grant permission to place pods on particular nodes.
pub const BINDING_VERB: &str = "create";
pub const BINDING_RESOURCE: &str = "pods/binding";

/// Register the PodNodeConstraints plugin with the plugin registry.
pub fn register(plugins: &Plugins) {
    plugins.register(PLUGIN_NAME, new_from_config);
}

fn new_from_config(
    config: Option<&mut dyn Read>,
    initializer: &PluginInitializer,
) -> AdmissionResult<Arc<dyn ValidationInterface>> {
    let mut plugin = Plugin::new(read_config(config)?);
    if let Some(authorizer) = initializer.authorizer() {
        plugin.set_authorizer(authorizer);
    }
    plugin.validate_initialization()?;
    Ok(Arc::new(plugin))
}

// ============================================================================
// Workloads
// ============================================================================

/// Workload is one of the resources whose objects carry a pod spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workload {
    Pod,
    ReplicationController,
    Deployment,
    ReplicaSet,
    Job,
    DeploymentConfig,
}

impl Workload {
    pub const ALL: [Workload; 6] = [
        Workload::Pod,
        Workload::ReplicationController,
        Workload::Deployment,
        Workload::ReplicaSet,
        Workload::Job,
        Workload::DeploymentConfig,
    ];

    /// (group, resource, kind)
    fn coordinates(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Workload::Pod => ("", "pods", "Pod"),
            Workload::ReplicationController => {
                ("", "replicationcontrollers", "ReplicationController")
            }
            Workload::Deployment => (apps::GROUP_NAME, "deployments", "Deployment"),
            Workload::ReplicaSet => (apps::GROUP_NAME, "replicasets", "ReplicaSet"),
            Workload::Job => (batch::GROUP_NAME, "jobs", "Job"),
            Workload::DeploymentConfig => {
                (deploy::GROUP_NAME, "deploymentconfigs", "DeploymentConfig")
            }
        }
    }

    pub fn group_resource(self) -> GroupResource {
        let (group, resource, _) = self.coordinates();
        GroupResource::new(group, resource)
    }

    /// The only kind a request for this workload's resource may carry.
    pub fn group_kind(self) -> GroupKind {
        let (group, _, kind) = self.coordinates();
        GroupKind::new(group, kind)
    }

    pub fn from_group_resource(resource: &GroupResource) -> Option<Self> {
        Self::ALL.into_iter().find(|workload| {
            let (group, name, _) = workload.coordinates();
            resource.group == group && resource.resource == name
        })
    }

    /// Pods are bound to nodes through the binding subresource once they exist,
    /// so only their creation is checked. Template edits on the other workloads
    /// change node targeting of future pods and are checked on update too.
    pub fn checks(self, operation: Operation) -> bool {
        match self {
            Workload::Pod => operation == Operation::Create,
            _ => matches!(operation, Operation::Create | Operation::Update),
        }
    }

    /// Extracts the pod spec from an object of this workload.
    pub fn pod_spec<'a>(
        self,
        object: Option<&'a dyn ApiObject>,
    ) -> AdmissionResult<Cow<'a, PodSpec>> {
        let spec = object.and_then(|object| match self {
            Workload::Pod => downcast(object).map(pod_spec_of_pod),
            Workload::ReplicationController => {
                downcast(object).map(pod_spec_of_replication_controller)
            }
            Workload::Deployment => downcast(object).map(pod_spec_of_deployment),
            Workload::ReplicaSet => downcast(object).map(pod_spec_of_replica_set),
            Workload::Job => downcast(object).map(pod_spec_of_job),
            Workload::DeploymentConfig => downcast(object).map(pod_spec_of_deployment_config),
        });
        spec.ok_or_else(|| {
            AdmissionError::internal_error("No PodSpec available for supplied admission attribute")
        })
    }
}

fn downcast<T: 'static>(object: &dyn ApiObject) -> Option<&T> {
    object.as_any().downcast_ref::<T>()
}

fn pod_spec_of_pod(pod: &Pod) -> Cow<'_, PodSpec> {
    Cow::Borrowed(&pod.spec)
}

fn pod_spec_of_replication_controller(rc: &ReplicationController) -> Cow<'_, PodSpec> {
    optional_template_spec(rc.spec.template.as_ref())
}

fn pod_spec_of_deployment(deployment: &Deployment) -> Cow<'_, PodSpec> {
    Cow::Borrowed(&deployment.spec.template.spec)
}

fn pod_spec_of_replica_set(replica_set: &ReplicaSet) -> Cow<'_, PodSpec> {
    Cow::Borrowed(&replica_set.spec.template.spec)
}

fn pod_spec_of_job(job: &Job) -> Cow<'_, PodSpec> {
    Cow::Borrowed(&job.spec.template.spec)
}

fn pod_spec_of_deployment_config(dc: &DeploymentConfig) -> Cow<'_, PodSpec> {
    optional_template_spec(dc.spec.template.as_ref())
}

// A missing template targets no node.
fn optional_template_spec(template: Option<&PodTemplateSpec>) -> Cow<'_, PodSpec> {
    match template {
        Some(template) => Cow::Borrowed(&template.spec),
        None => Cow::Owned(PodSpec::default()),
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Why a request is let through without looking at its pod spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassReason {
    /// The plugin has no configuration.
    Disabled,
    /// Subresources never carry a pod spec of their own.
    Subresource,
    /// The resource is not one of the workloads.
    UnhandledResource,
    /// The operation is not checked for this workload.
    UnhandledOperation,
}

/// Outcome of classifying a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Bypass(BypassReason),
    Evaluate(Workload),
}

/// Decides whether a request must be evaluated and for which workload.
///
/// A workload resource arriving with an unexpected kind is a registration
/// inconsistency upstream and yields an internal error.
pub fn classify(attributes: &dyn Attributes) -> AdmissionResult<Classification> {
    if !attributes.get_subresource().is_empty() {
        return Ok(Classification::Bypass(BypassReason::Subresource));
    }

    let resource = attributes.get_resource().group_resource();
    let workload = match Workload::from_group_resource(&resource) {
        Some(workload) => workload,
        None => return Ok(Classification::Bypass(BypassReason::UnhandledResource)),
    };

    let kind = attributes.get_kind().group_kind();
    if kind != workload.group_kind() {
        return Err(AdmissionError::internal_error(format!(
            "Unexpected resource kind {} for resource {}",
            kind, resource
        )));
    }

    if !workload.checks(attributes.get_operation()) {
        return Ok(Classification::Bypass(BypassReason::UnhandledOperation));
    }

    Ok(Classification::Evaluate(workload))
}

// ============================================================================
// Evaluation
// ============================================================================

/// Node targeting found in a pod spec.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub has_node_name: bool,
    /// Blacklisted selector keys, in blacklist order, without duplicates.
    pub matched_labels: Vec<String>,
}

impl Evaluation {
    pub fn requires_auth(&self) -> bool {
        self.has_node_name || !self.matched_labels.is_empty()
    }
}

pub fn evaluate(spec: &PodSpec, config: &PodNodeConstraintsConfig) -> Evaluation {
    let mut matched_labels: Vec<String> = Vec::new();
    for label in config.node_selector_label_blacklist() {
        if spec.node_selector.contains_key(label) && !matched_labels.contains(label) {
            matched_labels.push(label.clone());
        }
    }

    Evaluation {
        has_node_name: !spec.node_name.is_empty(),
        matched_labels,
    }
}

// ============================================================================
// Authorization
// ============================================================================

/// Asks whether the requesting user may bind pods to nodes in the request's namespace.
pub fn check_pods_bind_access(
    authorizer: &dyn Authorizer,
    attributes: &dyn Attributes,
) -> Result<SubjectAccessReviewStatus, AuthorizationError> {
    let review = SubjectAccessReview::new(
        attributes.get_namespace(),
        BINDING_VERB,
        BINDING_RESOURCE,
        attributes.get_name(),
        attributes.get_user_info(),
    );
    authorizer.review(&review)
}

// ============================================================================
// Decision
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Empty when allowed.
    pub fn reason(&self) -> &str {
        match self {
            Decision::Allow => "",
            Decision::Deny(reason) => reason,
        }
    }
}

/// Combines an evaluation with the authorizer's answer.
pub fn decide(evaluation: &Evaluation, status: &SubjectAccessReviewStatus) -> Decision {
    if status.allowed {
        return Decision::Allow;
    }

    let labels = &evaluation.matched_labels;
    match (evaluation.has_node_name, labels.is_empty()) {
        (true, true) => Decision::Deny(
            "node selection by nodeName is prohibited by policy for your role".to_string(),
        ),
        (false, false) => Decision::Deny(format!(
            "node selection by label(s) {} is prohibited by policy for your role",
            format_labels(labels)
        )),
        (true, false) => Decision::Deny(format!(
            "node selection by nodeName and label(s) {} is prohibited by policy for your role",
            format_labels(labels)
        )),
        (false, true) => Decision::Allow,
    }
}

fn format_labels(labels: &[String]) -> String {
    format!("[{}]", labels.join(" "))
}

// ============================================================================
// Plugin
// ============================================================================

/// Plugin is an implementation of the PodNodeConstraints admission controller.
pub struct Plugin {
    handler: Handler,
    config: Option<PodNodeConstraintsConfig>,
    authorizer: Option<Arc<dyn Authorizer>>,
}

impl Plugin {
    /// Create a new PodNodeConstraints admission controller. `None` disables it.
    pub fn new(config: Option<PodNodeConstraintsConfig>) -> Self {
        Self {
            handler: Handler::new_create_update(),
            config,
            authorizer: None,
        }
    }

    /// Create a new PodNodeConstraints admission controller with an authorizer.
    pub fn with_authorizer(
        config: Option<PodNodeConstraintsConfig>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            authorizer: Some(authorizer),
            ..Self::new(config)
        }
    }

    /// Set the authorizer for the plugin.
    pub fn set_authorizer(&mut self, authorizer: Arc<dyn Authorizer>) {
        self.authorizer = Some(authorizer);
    }

    pub fn config(&self) -> Option<&PodNodeConstraintsConfig> {
        self.config.as_ref()
    }

    /// Validate that the plugin was initialized correctly.
    pub fn validate_initialization(&self) -> AdmissionResult<()> {
        if self.authorizer.is_none() {
            return Err(AdmissionError::internal_error(format!(
                "{} needs an authorizer",
                PLUGIN_NAME
            )));
        }
        Ok(())
    }

    /// Admits or denies the request. Never modifies it.
    pub fn admit(&self, attributes: &dyn Attributes) -> AdmissionResult<()> {
        let config = match &self.config {
            Some(config) => config,
            None => {
                bypass(attributes, BypassReason::Disabled);
                return Ok(());
            }
        };

        let workload = match classify(attributes)? {
            Classification::Evaluate(workload) => workload,
            Classification::Bypass(reason) => {
                bypass(attributes, reason);
                return Ok(());
            }
        };

        let spec = workload.pod_spec(attributes.get_object())?;
        let evaluation = evaluate(&spec, config);
        if !evaluation.requires_auth() {
            return Ok(());
        }
        debug!(
            ?workload,
            namespace = attributes.get_namespace(),
            name = attributes.get_name(),
            has_node_name = evaluation.has_node_name,
            matched_labels = ?evaluation.matched_labels,
            "Checking pods/binding access"
        );

        let authorizer = self.authorizer.as_ref().ok_or_else(|| {
            AdmissionError::internal_error(format!("{} needs an authorizer", PLUGIN_NAME))
        })?;
        let status = check_pods_bind_access(authorizer.as_ref(), attributes).map_err(|error| {
            warn!(
                %error,
                namespace = attributes.get_namespace(),
                name = attributes.get_name(),
                "Subject access review failed"
            );
            error
        })?;

        match decide(&evaluation, &status) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                info!(
                    namespace = attributes.get_namespace(),
                    name = attributes.get_name(),
                    user = %attributes.get_user_info().name,
                    %reason,
                    "Denying node targeting"
                );
                Err(AdmissionError::forbidden(
                    attributes.get_name(),
                    attributes.get_resource().group_resource(),
                    reason,
                ))
            }
        }
    }
}

fn bypass(attributes: &dyn Attributes, reason: BypassReason) {
    debug!(
        resource = %attributes.get_resource().group_resource(),
        subresource = attributes.get_subresource(),
        operation = %attributes.get_operation(),
        ?reason,
        "Skipping node constraints"
    );
}

impl Interface for Plugin {
    fn handles(&self, operation: Operation) -> bool {
        self.handler.handles(operation)
    }
}

impl ValidationInterface for Plugin {
    fn validate(&self, attributes: &dyn Attributes) -> AdmissionResult<()> {
        self.admit(attributes)
    }
}
