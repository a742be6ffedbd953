#![allow(dead_code)]

use std::sync::Arc;

use valvetrack::events::EventSender;
use valvetrack::logging::discard_logger;
use valvetrack::models::{NewWorkOrder, WorkOrderPriority};
use valvetrack::notifications::{NullNotifier, Notifier};
use valvetrack::repositories::InMemoryWorkOrderRepository;
use valvetrack::services::WorkOrderService;

/// Service backed by an in-memory repository, no events, no toasts.
pub fn quiet_service() -> WorkOrderService {
    WorkOrderService::new(
        Arc::new(InMemoryWorkOrderRepository::new()),
        None,
        Arc::new(NullNotifier),
        discard_logger(),
    )
}

/// Service wired to the given event sender and notifier.
pub fn wired_service(
    event_sender: Option<EventSender>,
    notifier: Arc<dyn Notifier>,
) -> WorkOrderService {
    WorkOrderService::new(
        Arc::new(InMemoryWorkOrderRepository::new()),
        event_sender,
        notifier,
        discard_logger(),
    )
}

pub fn control_valve_order() -> NewWorkOrder {
    NewWorkOrder {
        work_order_no: "WO-2024-001".into(),
        job_title: "Control Valve Maintenance".into(),
        valve_tag: "FV-001".into(),
        valve_description: Some("Main Control Valve Unit 1".into()),
        location: "Unit 1, Area B".into(),
        description: "Control valve sticking during operation. Requires disassembly and cleaning."
            .into(),
        priority: WorkOrderPriority::High,
        assigned_to: Some("John Smith".into()),
        estimated_time: Some(4.0),
    }
}

pub fn relief_valve_order() -> NewWorkOrder {
    NewWorkOrder {
        work_order_no: "WO-2024-002".into(),
        job_title: "Pressure Relief Valve Inspection".into(),
        valve_tag: "PV-205".into(),
        valve_description: Some("Safety Pressure Relief Valve".into()),
        location: "Unit 2, Safety System".into(),
        description: "Pressure relief valve inspection due for quarterly maintenance.".into(),
        priority: WorkOrderPriority::Medium,
        assigned_to: Some("Sarah Johnson".into()),
        estimated_time: Some(2.0),
    }
}

pub fn safety_valve_order() -> NewWorkOrder {
    NewWorkOrder {
        work_order_no: "WO-2024-003".into(),
        job_title: "Safety Valve Calibration".into(),
        valve_tag: "SV-102".into(),
        valve_description: Some("Emergency Safety Valve".into()),
        location: "Emergency System".into(),
        description: "Safety valve calibration and pressure testing required.".into(),
        priority: WorkOrderPriority::Critical,
        assigned_to: Some("Mike Wilson".into()),
        estimated_time: Some(3.0),
    }
}
