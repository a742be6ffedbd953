use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::WorkOrder;

pub mod in_memory;

pub use in_memory::InMemoryWorkOrderRepository;

/// Persistence boundary for work orders. The service layer is written
/// against this trait so storage can be swapped: in-memory for tests and
/// offline sessions, a networked backend in production.
#[async_trait]
pub trait WorkOrderRepository: Send + Sync {
    async fn insert(&self, order: WorkOrder) -> Result<WorkOrder, ServiceError>;
    async fn update(&self, order: WorkOrder) -> Result<WorkOrder, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkOrder>, ServiceError>;
    async fn list(&self) -> Result<Vec<WorkOrder>, ServiceError>;
}
