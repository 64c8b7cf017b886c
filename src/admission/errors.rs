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

//! Admission error types.

use super::attributes::GroupResource;
use crate::authorization::AuthorizationError;
use std::fmt;
use thiserror::Error;

/// Result type for admission operations.
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// AdmissionError represents errors that can occur during admission.
///
/// Only [`AdmissionError::Forbidden`] is a policy decision. Every other variant
/// means the plugin could not decide, which callers must treat as blocking.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// BadRequest indicates a malformed request or plugin configuration.
    #[error("{0}")]
    BadRequest(String),

    /// Forbidden indicates the request is not allowed.
    #[error("{0}")]
    Forbidden(ForbiddenError),

    /// Internal represents an inconsistency in the admission chain itself.
    #[error("internal error: {0}")]
    Internal(String),

    /// Authorization wraps a failed subject access review.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// Config indicates the plugin configuration document could not be decoded.
    #[error("invalid admission plugin configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl AdmissionError {
    /// Create a new BadRequest error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AdmissionError::BadRequest(msg.into())
    }

    /// Create a new Forbidden error for the named object of `resource`.
    pub fn forbidden(
        name: impl Into<String>,
        resource: GroupResource,
        reason: impl Into<String>,
    ) -> Self {
        AdmissionError::Forbidden(ForbiddenError {
            name: name.into(),
            resource,
            reason: reason.into(),
        })
    }

    /// Create an Internal error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        AdmissionError::Internal(msg.into())
    }

    /// Returns true if this error is a policy denial rather than a failure to decide.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AdmissionError::Forbidden(_))
    }
}

/// ForbiddenError is a policy denial of a single object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenError {
    pub name: String,
    pub resource: GroupResource,
    pub reason: String,
}

impl fmt::Display for ForbiddenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} is forbidden: {}", self.resource, self.reason)
        } else {
            write!(
                f,
                "{} \"{}\" is forbidden: {}",
                self.resource, self.name, self.reason
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_error_display() {
        let err = AdmissionError::forbidden(
            "test",
            GroupResource::new("", "pods"),
            "node selection by nodeName is prohibited by policy for your role",
        );
        assert!(err.is_forbidden());
        assert_eq!(
            err.to_string(),
            "pods \"test\" is forbidden: node selection by nodeName is prohibited by policy for your role"
        );
    }

    #[test]
    fn test_forbidden_error_display_qualified_resource() {
        let err = AdmissionError::forbidden("web", GroupResource::new("apps", "deployments"), "nope");
        assert_eq!(err.to_string(), "deployments.apps \"web\" is forbidden: nope");
    }

    #[test]
    fn test_forbidden_error_display_without_name() {
        let err = AdmissionError::forbidden("", GroupResource::new("batch", "jobs"), "nope");
        assert_eq!(err.to_string(), "jobs.batch is forbidden: nope");
    }

    #[test]
    fn test_internal_error_is_not_forbidden() {
        let err = AdmissionError::internal_error("No PodSpec available");
        assert!(!err.is_forbidden());
        assert_eq!(err.to_string(), "internal error: No PodSpec available");
    }

    #[test]
    fn test_authorization_error_passes_through() {
        let err = AdmissionError::from(AuthorizationError::new("connection refused"));
        assert!(!err.is_forbidden());
        assert_eq!(err.to_string(), "subject access review failed: connection refused");
    }
}
