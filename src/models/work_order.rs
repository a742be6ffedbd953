use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Status of a work order. `Completed` and `Cancelled` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WorkOrderStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkOrderStatus::Completed | WorkOrderStatus::Cancelled)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WorkOrderPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// A unit of maintenance work tracked from creation through completion or
/// cancellation.
///
/// Time fields are set exactly once by the lifecycle: `started_at` on
/// pending -> in-progress, `completed_at` and `actual_time` on
/// in-progress -> completed. `repair_logs` is append-only and only grows
/// while the order is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: Uuid,
    pub work_order_no: String,
    pub job_title: String,
    pub valve_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valve_description: Option<String>,
    pub location: String,
    pub description: String,
    pub status: WorkOrderStatus,
    pub priority: WorkOrderPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Estimated effort in hours, set at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<f64>,
    /// Hours between start and completion, rounded to one decimal. Set only
    /// on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_time: Option<f64>,
    pub photo_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problems_found: Option<String>,
    #[serde(rename = "actionsTable", skip_serializing_if = "Option::is_none")]
    pub actions_taken: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repair_logs: Vec<String>,
}

impl WorkOrder {
    /// Builds a new pending work order from already-validated creation data.
    pub fn create(data: NewWorkOrder, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            work_order_no: data.work_order_no,
            job_title: data.job_title,
            valve_tag: data.valve_tag,
            valve_description: data.valve_description,
            location: data.location,
            description: data.description,
            status: WorkOrderStatus::Pending,
            priority: data.priority,
            assigned_to: data.assigned_to,
            created_at: now,
            started_at: None,
            completed_at: None,
            estimated_time: data.estimated_time,
            actual_time: None,
            photo_count: 0,
            tools_used: None,
            problems_found: None,
            actions_taken: None,
            repair_logs: Vec::new(),
        }
    }

    /// Hours elapsed since the work was started, if it has been.
    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> Option<f64> {
        self.started_at
            .map(|started| (now - started).num_milliseconds() as f64 / 3_600_000.0)
    }
}

/// Creation payload for a work order, validated before the entity is
/// constructed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkOrder {
    #[validate(length(min = 1, message = "work order number is required"))]
    pub work_order_no: String,
    #[validate(length(min = 1, message = "job title is required"))]
    pub job_title: String,
    #[validate(length(min = 1, message = "valve tag is required"))]
    pub valve_tag: String,
    pub valve_description: Option<String>,
    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default)]
    pub priority: WorkOrderPriority,
    pub assigned_to: Option<String>,
    #[validate(range(min = 0.0, message = "estimated time must be non-negative"))]
    pub estimated_time: Option<f64>,
}

/// Free-text progress fields recorded while a work order is in progress.
/// `None` leaves the corresponding field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub tools_used: Option<String>,
    pub problems_found: Option<String>,
    #[serde(rename = "actionsTable")]
    pub actions_taken: Option<String>,
    pub log_entry: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_new_order() -> NewWorkOrder {
        NewWorkOrder {
            work_order_no: "WO-2024-001".into(),
            job_title: "Control Valve Maintenance".into(),
            valve_tag: "FV-001".into(),
            location: "Unit 1, Area B".into(),
            description: "Control valve sticking during operation.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn create_yields_pending_order_with_no_timestamps() {
        let now = Utc::now();
        let order = WorkOrder::create(valid_new_order(), now);
        assert_eq!(order.status, WorkOrderStatus::Pending);
        assert_eq!(order.priority, WorkOrderPriority::Medium);
        assert_eq!(order.created_at, now);
        assert_eq!(order.photo_count, 0);
        assert!(order.started_at.is_none());
        assert!(order.completed_at.is_none());
        assert!(order.actual_time.is_none());
        assert!(order.repair_logs.is_empty());
    }

    #[test]
    fn required_fields_are_enforced() {
        let mut data = valid_new_order();
        data.valve_tag = String::new();
        assert!(data.validate().is_err());

        assert!(valid_new_order().validate().is_ok());
    }

    #[test]
    fn status_serializes_in_kebab_case() {
        let json = serde_json::to_string(&WorkOrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!(WorkOrderStatus::InProgress.to_string(), "in-progress");
    }

    #[test]
    fn status_parses_from_wire_strings() {
        use std::str::FromStr;
        assert_eq!(
            WorkOrderStatus::from_str("in-progress").unwrap(),
            WorkOrderStatus::InProgress
        );
        assert!(WorkOrderStatus::from_str("paused").is_err());
    }

    #[test]
    fn elapsed_hours_tracks_start() {
        let now = Utc::now();
        let mut order = WorkOrder::create(valid_new_order(), now);
        assert!(order.elapsed_hours(now).is_none());
        order.started_at = Some(now);
        let later = now + chrono::Duration::minutes(90);
        assert!((order.elapsed_hours(later).unwrap() - 1.5).abs() < 1e-9);
    }
}
