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

//! Delegated authorization.
//!
//! Plugins ask "may this user perform this verb on this resource?" through the
//! [`Authorizer`] trait. The crate never constructs an authorizer itself; the
//! component assembling the admission chain injects one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// UserInfo contains information about the user making the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    /// The name of the user.
    pub name: String,
    /// The groups the user belongs to.
    pub groups: Vec<String>,
}

impl UserInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            groups: Vec::new(),
        }
    }

    pub fn with_groups(name: &str, groups: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// SubjectAccessReview asks whether a user may perform an action in a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAccessReview {
    pub namespace: String,
    pub verb: String,
    pub resource: String,
    pub resource_name: String,
    pub user: String,
    /// Groups are deduplicated and sorted.
    pub groups: BTreeSet<String>,
}

impl SubjectAccessReview {
    pub fn new(
        namespace: &str,
        verb: &str,
        resource: &str,
        resource_name: &str,
        user: &UserInfo,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            verb: verb.to_string(),
            resource: resource.to_string(),
            resource_name: resource_name.to_string(),
            user: user.name.clone(),
            groups: user.groups.iter().cloned().collect(),
        }
    }
}

/// SubjectAccessReviewStatus is the answer to a [`SubjectAccessReview`].
///
/// `allowed == false` is an ordinary answer, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAccessReviewStatus {
    pub allowed: bool,
    #[serde(default)]
    pub reason: String,
}

impl SubjectAccessReviewStatus {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: String::new(),
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// AuthorizationError is returned when a review could not be answered at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subject access review failed: {message}")]
pub struct AuthorizationError {
    message: String,
}

impl AuthorizationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Authorizer answers subject access reviews.
///
/// Implementations are shared across concurrent admission calls and must be
/// internally thread-safe. Timeouts belong to the implementation's transport.
pub trait Authorizer: Send + Sync {
    fn review(
        &self,
        review: &SubjectAccessReview,
    ) -> Result<SubjectAccessReviewStatus, AuthorizationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_dedups_and_sorts_groups() {
        let user = UserInfo::with_groups(
            "system:serviceaccount:openshift-infra:daemonset-controller",
            &["system:serviceaccounts", "system:authenticated", "system:serviceaccounts"],
        );
        let review = SubjectAccessReview::new("default", "create", "pods/binding", "test", &user);

        assert_eq!(
            review.groups.iter().cloned().collect::<Vec<_>>(),
            vec!["system:authenticated", "system:serviceaccounts"]
        );
        assert_eq!(
            review.user,
            "system:serviceaccount:openshift-infra:daemonset-controller"
        );
    }

    #[test]
    fn test_review_wire_format() {
        let review = SubjectAccessReview::new(
            "ns",
            "create",
            "pods/binding",
            "web",
            &UserInfo::with_groups("bob", &["devs"]),
        );
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "namespace": "ns",
                "verb": "create",
                "resource": "pods/binding",
                "resourceName": "web",
                "user": "bob",
                "groups": ["devs"],
            })
        );
    }

    #[test]
    fn test_status_decodes_without_reason() {
        let status: SubjectAccessReviewStatus =
            serde_json::from_str(r#"{"allowed": true}"#).unwrap();
        assert_eq!(status, SubjectAccessReviewStatus::allowed());

        let status: SubjectAccessReviewStatus =
            serde_json::from_str(r#"{"allowed": false, "reason": "no binding"}"#).unwrap();
        assert_eq!(status, SubjectAccessReviewStatus::denied("no binding"));
    }

    #[test]
    fn test_authorization_error_display() {
        let err = AuthorizationError::new("dial tcp: connection refused");
        assert_eq!(err.message(), "dial tcp: connection refused");
        assert_eq!(
            err.to_string(),
            "subject access review failed: dial tcp: connection refused"
        );
    }
}
