use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::WorkOrder;

use super::WorkOrderRepository;

/// DashMap-backed repository for tests and single-session use.
#[derive(Debug, Default)]
pub struct InMemoryWorkOrderRepository {
    orders: DashMap<Uuid, WorkOrder>,
}

impl InMemoryWorkOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with existing records (e.g. fixture data).
    pub fn with_orders(orders: impl IntoIterator<Item = WorkOrder>) -> Self {
        let repo = Self::new();
        for order in orders {
            repo.orders.insert(order.id, order);
        }
        repo
    }
}

#[async_trait]
impl WorkOrderRepository for InMemoryWorkOrderRepository {
    async fn insert(&self, order: WorkOrder) -> Result<WorkOrder, ServiceError> {
        if self.orders.contains_key(&order.id) {
            return Err(ServiceError::InternalError(format!(
                "duplicate work order id {}",
                order.id
            )));
        }
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update(&self, order: WorkOrder) -> Result<WorkOrder, ServiceError> {
        match self.orders.get_mut(&order.id) {
            Some(mut existing) => {
                *existing = order.clone();
                Ok(order)
            }
            None => Err(ServiceError::NotFound(format!(
                "Work order {} not found",
                order.id
            ))),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WorkOrder>, ServiceError> {
        Ok(self.orders.get(&id).map(|entry| entry.clone()))
    }

    async fn list(&self) -> Result<Vec<WorkOrder>, ServiceError> {
        let mut orders: Vec<WorkOrder> =
            self.orders.iter().map(|entry| entry.value().clone()).collect();
        // DashMap iteration order is arbitrary; present oldest first.
        orders.sort_by_key(|order| order.created_at);
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewWorkOrder;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn sample() -> WorkOrder {
        WorkOrder::create(
            NewWorkOrder {
                work_order_no: "WO-2024-010".into(),
                job_title: "Gate Valve Overhaul".into(),
                valve_tag: "GV-017".into(),
                location: "Unit 3".into(),
                description: "Stem packing leak.".into(),
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let repo = InMemoryWorkOrderRepository::new();
        let order = repo.insert(sample()).await.unwrap();
        let found = repo.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(found, order);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let repo = InMemoryWorkOrderRepository::new();
        let order = repo.insert(sample()).await.unwrap();
        assert_matches!(
            repo.insert(order).await,
            Err(ServiceError::InternalError(_))
        );
    }

    #[tokio::test]
    async fn update_of_missing_order_is_not_found() {
        let repo = InMemoryWorkOrderRepository::new();
        assert_matches!(repo.update(sample()).await, Err(ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_returns_oldest_first() {
        let t0 = Utc::now();
        let mut older = sample();
        older.created_at = t0 - chrono::Duration::hours(1);
        let mut newer = sample();
        newer.created_at = t0;

        let repo = InMemoryWorkOrderRepository::with_orders([newer.clone(), older.clone()]);
        let listed = repo.list().await.unwrap();
        assert_eq!(listed, vec![older, newer]);
    }
}
