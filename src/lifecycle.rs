//! The legal state machine for work order progress.
//!
//! Every function here is pure: it takes the current entity, returns the
//! updated entity together with the domain event to publish, and never
//! touches shared state. The caller (the service layer) persists the result
//! and fans out the event, so persistence can be batched or rolled back.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::{ProgressUpdate, WorkOrder, WorkOrderStatus};

/// Non-fatal conditions observed while applying a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleWarning {
    /// Completion timestamp preceded the start timestamp; the computed
    /// duration was clamped to zero.
    ClockSkew,
}

/// Outcome of a legal transition.
#[derive(Debug, Clone)]
pub struct Transition {
    pub order: WorkOrder,
    pub event: Event,
    pub warning: Option<LifecycleWarning>,
}

impl Transition {
    fn new(order: WorkOrder, event: Event) -> Self {
        Self {
            order,
            event,
            warning: None,
        }
    }
}

fn round_to_tenth(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Moves a pending work order into progress, stamping `started_at`.
///
/// The capture flow is expected to take a photo alongside this, but the
/// state machine does not require one; that coupling is UI policy.
pub fn start(order: &WorkOrder, now: DateTime<Utc>) -> Result<Transition, ServiceError> {
    if order.status != WorkOrderStatus::Pending {
        return Err(ServiceError::InvalidTransition {
            from: order.status,
            action: "start",
        });
    }
    let mut updated = order.clone();
    updated.status = WorkOrderStatus::InProgress;
    updated.started_at = Some(now);
    Ok(Transition::new(updated, Event::WorkOrderStarted(order.id)))
}

/// Completes an in-progress work order, stamping `completed_at` and
/// deriving `actual_time` in hours rounded to one decimal.
///
/// A completion timestamp earlier than the start clamps the duration to
/// zero and surfaces [`LifecycleWarning::ClockSkew`] instead of failing.
pub fn complete(order: &WorkOrder, now: DateTime<Utc>) -> Result<Transition, ServiceError> {
    if order.status != WorkOrderStatus::InProgress {
        return Err(ServiceError::InvalidTransition {
            from: order.status,
            action: "complete",
        });
    }
    // started_at is always set on pending -> in-progress; tolerate legacy
    // rows by treating a missing start as zero elapsed time.
    let started = order.started_at.unwrap_or(now);
    let mut elapsed = (now - started).num_milliseconds() as f64 / 3_600_000.0;
    let mut warning = None;
    if elapsed < 0.0 {
        warn!(work_order_id = %order.id, "completion precedes start; clamping actual time to zero");
        elapsed = 0.0;
        warning = Some(LifecycleWarning::ClockSkew);
    }
    let actual_time = round_to_tenth(elapsed);

    let mut updated = order.clone();
    updated.status = WorkOrderStatus::Completed;
    updated.completed_at = Some(now);
    updated.actual_time = Some(actual_time);
    Ok(Transition {
        event: Event::WorkOrderCompleted {
            work_order_id: order.id,
            actual_time,
        },
        order: updated,
        warning,
    })
}

/// Cancels a work order. Legal from `pending` or `in-progress` only;
/// terminal states stay as they are.
pub fn cancel(order: &WorkOrder) -> Result<Transition, ServiceError> {
    if order.status.is_terminal() {
        return Err(ServiceError::InvalidTransition {
            from: order.status,
            action: "cancel",
        });
    }
    let mut updated = order.clone();
    updated.status = WorkOrderStatus::Cancelled;
    Ok(Transition::new(updated, Event::WorkOrderCancelled(order.id)))
}

/// Records progress on an in-progress work order: overwrites the free-text
/// fields that were provided and appends a timestamped repair log entry if
/// `log_entry` is non-empty.
pub fn record_progress(
    order: &WorkOrder,
    update: ProgressUpdate,
    now: DateTime<Utc>,
) -> Result<Transition, ServiceError> {
    if order.status != WorkOrderStatus::InProgress {
        return Err(ServiceError::InvalidTransition {
            from: order.status,
            action: "record progress on",
        });
    }
    let mut updated = order.clone();
    if let Some(tools_used) = update.tools_used {
        updated.tools_used = Some(tools_used);
    }
    if let Some(problems_found) = update.problems_found {
        updated.problems_found = Some(problems_found);
    }
    if let Some(actions_taken) = update.actions_taken {
        updated.actions_taken = Some(actions_taken);
    }
    if let Some(entry) = update.log_entry {
        let entry = entry.trim();
        if !entry.is_empty() {
            updated
                .repair_logs
                .push(format!("{}: {}", now.format("%Y-%m-%d %H:%M"), entry));
        }
    }
    Ok(Transition::new(updated, Event::ProgressRecorded(order.id)))
}

/// Attaches a photo to a non-terminal work order, incrementing its photo
/// count. The count never decreases; removing session photos before
/// submission happens in the photo store, not here.
pub fn attach_photo(
    order: &WorkOrder,
    timestamp: DateTime<Utc>,
) -> Result<Transition, ServiceError> {
    if order.status.is_terminal() {
        return Err(ServiceError::InvalidTransition {
            from: order.status,
            action: "attach a photo to",
        });
    }
    let mut updated = order.clone();
    updated.photo_count += 1;
    Ok(Transition::new(
        updated,
        Event::PhotoAttached {
            work_order_id: order.id,
            timestamp,
        },
    ))
}
