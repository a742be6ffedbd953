pub mod work_order;

pub use work_order::{
    NewWorkOrder, ProgressUpdate, WorkOrder, WorkOrderPriority, WorkOrderStatus,
};
