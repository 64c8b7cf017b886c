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

//! PodNodeConstraints configuration.
//!
//! The plugin is configured through the admission configuration of the API
//! server:
//!
//! ```yaml
//! apiVersion: v1
//! kind: PodNodeConstraintsConfig
//! nodeSelectorLabelBlacklist:
//!   - kubernetes.io/hostname
//! ```
//!
//! A missing or empty document leaves the plugin disabled.

use super::PLUGIN_NAME;
use crate::admission::{AdmissionError, AdmissionResult};
use serde::Deserialize;
use std::io::Read;

/// Kind expected in the configuration document.
pub const CONFIG_KIND: &str = "PodNodeConstraintsConfig";

/// PodNodeConstraintsConfig holds the node selector labels that may only be
/// targeted by users allowed to bind pods to nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodNodeConstraintsConfig {
    node_selector_label_blacklist: Vec<String>,
}

impl PodNodeConstraintsConfig {
    pub fn new<I, S>(node_selector_label_blacklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            node_selector_label_blacklist: node_selector_label_blacklist
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    /// Blacklisted label keys in declaration order. May contain duplicates.
    pub fn node_selector_label_blacklist(&self) -> &[String] {
        &self.node_selector_label_blacklist
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigDocument {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    node_selector_label_blacklist: Vec<String>,
}

/// Reads the plugin configuration. `Ok(None)` disables the plugin.
pub fn read_config(
    reader: Option<&mut dyn Read>,
) -> AdmissionResult<Option<PodNodeConstraintsConfig>> {
    let reader = match reader {
        Some(reader) => reader,
        None => return Ok(None),
    };

    let mut data = String::new();
    reader.read_to_string(&mut data).map_err(|error| {
        AdmissionError::bad_request(format!(
            "failed to read {} configuration: {}",
            PLUGIN_NAME, error
        ))
    })?;
    if data.trim().is_empty() {
        return Ok(None);
    }

    let value: serde_yaml::Value = serde_yaml::from_str(&data)?;
    if value.is_null() {
        return Ok(None);
    }

    let document: ConfigDocument = serde_yaml::from_value(value)?;
    if let Some(kind) = document.kind.as_deref() {
        if kind != CONFIG_KIND {
            return Err(AdmissionError::bad_request(format!(
                "unexpected config object: kind {:?}, expected {:?}",
                kind, CONFIG_KIND
            )));
        }
    }

    Ok(Some(PodNodeConstraintsConfig::new(
        document.node_selector_label_blacklist,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &str) -> AdmissionResult<Option<PodNodeConstraintsConfig>> {
        let mut buf = data.as_bytes();
        read_config(Some(&mut buf))
    }

    #[test]
    fn test_read_config() {
        let config = read(
            "apiVersion: v1
kind: PodNodeConstraintsConfig
nodeSelectorLabelBlacklist:
  - bogus
  - foo
",
        )
        .unwrap()
        .unwrap();
        assert_eq!(config.node_selector_label_blacklist(), ["bogus", "foo"]);
    }

    #[test]
    fn test_read_config_keeps_order_and_duplicates() {
        let config = read("nodeSelectorLabelBlacklist: [zone, bogus, zone]")
            .unwrap()
            .unwrap();
        assert_eq!(
            config.node_selector_label_blacklist(),
            ["zone", "bogus", "zone"]
        );
    }

    #[test]
    fn test_read_config_without_blacklist_is_enabled_and_empty() {
        let config = read("kind: PodNodeConstraintsConfig\n").unwrap().unwrap();
        assert!(config.node_selector_label_blacklist().is_empty());
    }

    #[test]
    fn test_read_config_absent_disables_plugin() {
        assert_eq!(read_config(None).unwrap(), None);
        assert_eq!(read("").unwrap(), None);
        assert_eq!(read("  \n").unwrap(), None);
        assert_eq!(read("null\n").unwrap(), None);
        assert_eq!(read("~").unwrap(), None);
    }

    #[test]
    fn test_read_config_unexpected_kind() {
        let err = read("kind: PodNodeSelectorConfig\nnodeSelectorLabelBlacklist: [bogus]\n")
            .unwrap_err();
        assert!(matches!(err, AdmissionError::BadRequest(_)));
        assert!(err.to_string().contains("unexpected config object"));
    }

    #[test]
    fn test_read_config_malformed() {
        let err = read("nodeSelectorLabelBlacklist: 5\n").unwrap_err();
        assert!(matches!(err, AdmissionError::Config(_)));

        let err = read("nodeSelectorLabelBlacklist: [bogus\n").unwrap_err();
        assert!(matches!(err, AdmissionError::Config(_)));
    }
}
