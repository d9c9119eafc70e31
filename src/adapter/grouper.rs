//! Resource/scope container assignment for accepted calls.
//!
//! The default behavior opens a fresh resource container per accepted call,
//! so two identical calls produce two top-level containers while all fields
//! of a single call land together. Real deployments may instead want to
//! merge by originating source; the policy seam exists for that.

use crate::core::types::{Tags, ValueKind};
use opentelemetry_proto::tonic::common::v1::InstrumentationScope;
use opentelemetry_proto::tonic::metrics::v1::{Metric, MetricsData, ResourceMetrics, ScopeMetrics};
use opentelemetry_proto::tonic::resource::v1::Resource;
use std::collections::HashMap;

/// Context describing one accepted measurement call.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    /// Measurement name of the calling ingestion
    pub measurement_name: &'a str,
    /// Tag mapping of the calling ingestion
    pub tags: &'a Tags,
    /// Value kind of the calling ingestion
    pub kind: ValueKind,
}

/// Container-assignment policy.
///
/// Decides which resource container a call's metrics land in. Returning
/// `None` opens a fresh container for the call; returning a key merges the
/// call into the container previously opened for that key.
pub trait GroupingPolicy: Send + Sync {
    /// Returns the container key for this call, or `None` for a fresh
    /// container per call
    fn group_key(&self, call: &CallContext<'_>) -> Option<String>;
}

/// Default policy: every accepted call gets its own resource container.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerCall;

impl GroupingPolicy for PerCall {
    fn group_key(&self, _call: &CallContext<'_>) -> Option<String> {
        None
    }
}

/// Merges calls sharing a measurement name into one resource container.
#[derive(Debug, Clone, Copy, Default)]
pub struct BySource;

impl GroupingPolicy for BySource {
    fn group_key(&self, call: &CallContext<'_>) -> Option<String> {
        Some(call.measurement_name.to_owned())
    }
}

/// Stateful grouper registering built metrics into the data model.
pub(crate) struct Grouper {
    policy: Box<dyn GroupingPolicy>,
    /// Container index per group key, valid for the current container list
    containers: HashMap<String, usize>,
    scope_name: String,
    scope_version: String,
}

impl Grouper {
    pub(crate) fn new(
        policy: Box<dyn GroupingPolicy>,
        scope_name: String,
        scope_version: String,
    ) -> Self {
        Self {
            policy,
            containers: HashMap::new(),
            scope_name,
            scope_version,
        }
    }

    /// Registers the metrics of one accepted call.
    ///
    /// Never touches the data model when `metrics` is empty; a call whose
    /// fields all normalized away leaves the container list untouched.
    pub(crate) fn register(
        &mut self,
        data: &mut MetricsData,
        call: &CallContext<'_>,
        mut metrics: Vec<Metric>,
    ) {
        if metrics.is_empty() {
            return;
        }

        match self.policy.group_key(call) {
            Some(key) => {
                if let Some(&index) = self.containers.get(&key) {
                    Self::scope_of(&mut data.resource_metrics[index])
                        .metrics
                        .append(&mut metrics);
                } else {
                    let index = data.resource_metrics.len();
                    data.resource_metrics.push(self.new_container(metrics));
                    self.containers.insert(key, index);
                }
            },
            None => data.resource_metrics.push(self.new_container(metrics)),
        }
    }

    /// Forgets all container assignments; call alongside clearing the data
    /// model
    pub(crate) fn reset(&mut self) {
        self.containers.clear();
    }

    fn new_container(&self, metrics: Vec<Metric>) -> ResourceMetrics {
        ResourceMetrics {
            resource: Some(Resource::default()),
            scope_metrics: vec![ScopeMetrics {
                scope: Some(InstrumentationScope {
                    name: self.scope_name.clone(),
                    version: self.scope_version.clone(),
                    attributes: vec![],
                    dropped_attributes_count: 0,
                }),
                metrics,
                schema_url: String::new(),
            }],
            schema_url: String::new(),
        }
    }

    fn scope_of(container: &mut ResourceMetrics) -> &mut ScopeMetrics {
        // Containers are created with exactly one scope
        &mut container.scope_metrics[0]
    }
}
