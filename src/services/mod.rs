pub mod work_orders;

pub use work_orders::WorkOrderService;
