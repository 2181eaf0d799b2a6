//! Container status classification
//!
//! A container runtime status carries at most one of three optional
//! sub-states (waiting, running, terminated). Classification flattens it
//! into four message/reason fields that are always present, so callers
//! never branch on which sub-state is active.

use crate::models::{PodResourceSummary, STATUS_SENTINEL};
use k8s_openapi::api::core::v1::ContainerStatus;

/// Flattened view of one container's runtime status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContainerStatus {
    pub waiting_message: String,
    pub waiting_reason: String,
    pub terminated_message: String,
    pub terminated_reason: String,
    pub image: String,
    pub name: String,
    pub ready: bool,
    pub restart_count: i32,
}

impl NormalizedContainerStatus {
    /// Normalize a raw container status
    ///
    /// Fields of an absent sub-state keep [`STATUS_SENTINEL`]. Fields of a
    /// present sub-state are copied as-is, empty strings included.
    pub fn from_status(status: &ContainerStatus) -> Self {
        let mut normalized = Self {
            waiting_message: STATUS_SENTINEL.to_string(),
            waiting_reason: STATUS_SENTINEL.to_string(),
            terminated_message: STATUS_SENTINEL.to_string(),
            terminated_reason: STATUS_SENTINEL.to_string(),
            image: status.image.clone(),
            name: status.name.clone(),
            ready: status.ready,
            restart_count: status.restart_count,
        };

        let state = status.state.as_ref();

        if let Some(waiting) = state.and_then(|s| s.waiting.as_ref()) {
            normalized.waiting_message = waiting.message.clone().unwrap_or_default();
            normalized.waiting_reason = waiting.reason.clone().unwrap_or_default();
        }

        if let Some(terminated) = state.and_then(|s| s.terminated.as_ref()) {
            normalized.terminated_message = terminated.message.clone().unwrap_or_default();
            normalized.terminated_reason = terminated.reason.clone().unwrap_or_default();
        }

        normalized
    }

    /// Copy the classified fields onto a resource summary
    pub fn apply_to(&self, mut summary: PodResourceSummary) -> PodResourceSummary {
        summary.waiting_message = self.waiting_message.clone();
        summary.waiting_reason = self.waiting_reason.clone();
        summary.terminated_message = self.terminated_message.clone();
        summary.terminated_reason = self.terminated_reason.clone();
        summary.image = self.image.clone();
        summary.app_name = self.name.clone();
        summary.service_name = self.name.clone();
        summary
    }
}

/// Classify `status` onto `prior`
///
/// Pure and total: the four message/reason fields of the result depend only
/// on `status`, so applying it twice yields the same fields.
pub fn classify(prior: PodResourceSummary, status: &ContainerStatus) -> PodResourceSummary {
    NormalizedContainerStatus::from_status(status).apply_to(prior)
}
