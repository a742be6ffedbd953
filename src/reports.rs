//! Dashboard statistics derived from the work order collection.
//!
//! Everything here is a pure function of its inputs; the service layer
//! recomputes on every collection change. O(n) over the collection.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{WorkOrder, WorkOrderStatus};

/// A single photo-attachment event. "Photos today" needs per-event
/// timestamps; the per-order `photo_count` aggregate is not enough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEvent {
    pub work_order_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_work_orders: usize,
    pub pending_orders: usize,
    pub in_progress_orders: usize,
    pub completed_orders: usize,
    /// Mean of `actual_time` over completed orders that have one; 0 when
    /// none do.
    pub average_completion_time: f64,
    /// Sum of `actual_time` over completed orders.
    pub total_man_hours: f64,
    /// Distinct assignees among in-progress orders.
    pub active_teams: usize,
    /// Photo events on the same UTC calendar day as the reference time.
    pub photos_today: usize,
}

impl DashboardStats {
    pub fn compute(
        orders: &[WorkOrder],
        photo_events: &[PhotoEvent],
        now: DateTime<Utc>,
    ) -> Self {
        let mut stats = DashboardStats {
            total_work_orders: orders.len(),
            ..Default::default()
        };
        let mut completed_with_time = 0usize;
        let mut teams: HashSet<&str> = HashSet::new();

        for order in orders {
            match order.status {
                WorkOrderStatus::Pending => stats.pending_orders += 1,
                WorkOrderStatus::InProgress => {
                    stats.in_progress_orders += 1;
                    if let Some(assignee) = order.assigned_to.as_deref() {
                        teams.insert(assignee);
                    }
                }
                WorkOrderStatus::Completed => {
                    stats.completed_orders += 1;
                    // Historical rows may lack actual_time; they count as
                    // completed but contribute no hours.
                    if let Some(actual_time) = order.actual_time {
                        stats.total_man_hours += actual_time;
                        completed_with_time += 1;
                    }
                }
                WorkOrderStatus::Cancelled => {}
            }
        }

        if completed_with_time > 0 {
            stats.average_completion_time = stats.total_man_hours / completed_with_time as f64;
        }
        stats.active_teams = teams.len();

        let today = now.date_naive();
        stats.photos_today = photo_events
            .iter()
            .filter(|event| event.timestamp.date_naive() == today)
            .count();

        stats
    }

    /// Share of completed orders as a whole percentage; the dashboard's
    /// completion-rate tile.
    pub fn completion_rate_percent(&self) -> u32 {
        if self.total_work_orders == 0 {
            return 0;
        }
        ((self.completed_orders as f64 / self.total_work_orders as f64) * 100.0).round() as u32
    }

    /// Width of a status distribution bar, 0.0-100.0.
    pub fn status_ratio(&self, status: WorkOrderStatus) -> f64 {
        if self.total_work_orders == 0 {
            return 0.0;
        }
        let count = match status {
            WorkOrderStatus::Pending => self.pending_orders,
            WorkOrderStatus::InProgress => self.in_progress_orders,
            WorkOrderStatus::Completed => self.completed_orders,
            WorkOrderStatus::Cancelled => {
                self.total_work_orders
                    - self.pending_orders
                    - self.in_progress_orders
                    - self.completed_orders
            }
        };
        count as f64 / self.total_work_orders as f64 * 100.0
    }
}
