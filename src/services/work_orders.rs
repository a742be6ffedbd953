use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use metrics::counter;
use slog::Logger;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::lifecycle::{self, LifecycleWarning, Transition};
use crate::models::{NewWorkOrder, ProgressUpdate, WorkOrder, WorkOrderStatus};
use crate::notifications::{Notification, Notifier};
use crate::reports::{DashboardStats, PhotoEvent};
use crate::repositories::WorkOrderRepository;

/// Service for managing work orders
///
/// Applies pure lifecycle transitions against the repository, publishes the
/// resulting events, and fires user notifications. Overlapping transitions
/// on the same work order are rejected so the state machine invariants hold
/// under concurrent callers.
#[derive(Clone)]
pub struct WorkOrderService {
    repository: Arc<dyn WorkOrderRepository>,
    event_sender: Option<EventSender>,
    notifier: Arc<dyn Notifier>,
    logger: Logger,
    locks: Arc<Mutex<Vec<Uuid>>>,
    /// Photo-attachment events backing the "photos today" figure. Entries
    /// from earlier days are pruned on each dashboard computation.
    photo_log: Arc<RwLock<Vec<PhotoEvent>>>,
}

/// Marks a work order as having a transition in flight. Removes the id on
/// drop, so a caller that times out and drops the future cannot wedge the
/// order behind `ConcurrentModification`.
struct TransitionGuard {
    locks: Arc<Mutex<Vec<Uuid>>>,
    id: Uuid,
}

impl Drop for TransitionGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.retain(|&locked| locked != self.id);
    }
}

impl WorkOrderService {
    /// Creates a new work order service instance
    pub fn new(
        repository: Arc<dyn WorkOrderRepository>,
        event_sender: Option<EventSender>,
        notifier: Arc<dyn Notifier>,
        logger: Logger,
    ) -> Self {
        Self {
            repository,
            event_sender,
            notifier,
            logger,
            locks: Arc::new(Mutex::new(Vec::new())),
            photo_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a new work order after validating the required fields
    #[instrument(skip(self, data), fields(work_order_no = %data.work_order_no))]
    pub async fn create_work_order(&self, data: NewWorkOrder) -> Result<WorkOrder, ServiceError> {
        data.validate()?;
        let order = WorkOrder::create(data, Utc::now());
        let created = self.repository.insert(order).await?;

        counter!("work_orders.created", 1);
        self.publish(Event::WorkOrderCreated(created.id)).await;
        self.notifier
            .notify(Notification::order_submitted(&created.valve_tag));
        slog::info!(self.logger, "Work order created";
            "work_order_no" => created.work_order_no.clone(),
            "valve_tag" => created.valve_tag.clone()
        );
        Ok(created)
    }

    /// Starts a work order
    #[instrument(skip(self))]
    pub async fn start_work_order(&self, id: Uuid) -> Result<WorkOrder, ServiceError> {
        let now = Utc::now();
        let saved = self.apply(id, |order| lifecycle::start(order, now)).await?;

        counter!("work_orders.started", 1);
        self.notifier.notify(Notification::work_started());
        info!("Work Order ID: {} started at: {}", id, now);
        Ok(saved)
    }

    /// Completes a work order, deriving its actual time
    pub async fn complete_work_order(&self, id: Uuid) -> Result<WorkOrder, ServiceError> {
        self.complete_work_order_at(id, Utc::now()).await
    }

    /// Completes a work order against an explicit clock. Hosts that
    /// timestamp completion at the final photo capture pass that instant
    /// here.
    #[instrument(skip(self))]
    pub async fn complete_work_order_at(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<WorkOrder, ServiceError> {
        let saved = self
            .apply(id, |order| lifecycle::complete(order, now))
            .await?;

        counter!("work_orders.completed", 1);
        self.notifier.notify(Notification::work_completed());
        info!("Work Order ID: {} marked as completed.", id);
        Ok(saved)
    }

    /// Cancels a pending or in-progress work order
    #[instrument(skip(self))]
    pub async fn cancel_work_order(&self, id: Uuid) -> Result<WorkOrder, ServiceError> {
        let saved = self.apply(id, lifecycle::cancel).await?;

        counter!("work_orders.cancelled", 1);
        info!("Work Order ID: {} cancelled.", id);
        Ok(saved)
    }

    /// Records progress fields and an optional repair log entry
    #[instrument(skip(self, update))]
    pub async fn record_progress(
        &self,
        id: Uuid,
        update: ProgressUpdate,
    ) -> Result<WorkOrder, ServiceError> {
        let now = Utc::now();
        let saved = self
            .apply(id, |order| lifecycle::record_progress(order, update, now))
            .await?;

        self.notifier.notify(Notification::progress_updated());
        Ok(saved)
    }

    /// Attaches a photo to a work order and records the attach event for
    /// the dashboard's "photos today" figure
    #[instrument(skip(self))]
    pub async fn attach_photo(
        &self,
        id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Result<WorkOrder, ServiceError> {
        let saved = self
            .apply(id, |order| lifecycle::attach_photo(order, timestamp))
            .await?;

        self.photo_log.write().await.push(PhotoEvent {
            work_order_id: id,
            timestamp,
        });
        counter!("work_orders.photos_attached", 1);
        Ok(saved)
    }

    /// Gets a work order by ID
    #[instrument(skip(self))]
    pub async fn get_work_order(&self, id: Uuid) -> Result<Option<WorkOrder>, ServiceError> {
        self.repository.find_by_id(id).await
    }

    /// Lists all work orders, oldest first
    #[instrument(skip(self))]
    pub async fn list_work_orders(&self) -> Result<Vec<WorkOrder>, ServiceError> {
        self.repository.list().await
    }

    /// Gets work orders matching a wire-format status string such as
    /// "in-progress"
    #[instrument(skip(self))]
    pub async fn get_work_orders_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<WorkOrder>, ServiceError> {
        let status = WorkOrderStatus::from_str(status)
            .map_err(|_| ServiceError::ValidationError(format!("unknown status '{}'", status)))?;
        let orders = self.repository.list().await?;
        Ok(orders
            .into_iter()
            .filter(|order| order.status == status)
            .collect())
    }

    /// Computes the dashboard statistics for the current collection
    #[instrument(skip(self))]
    pub async fn dashboard_stats(
        &self,
        now: DateTime<Utc>,
    ) -> Result<DashboardStats, ServiceError> {
        let orders = self.repository.list().await?;
        let today = now.date_naive();
        let mut photo_log = self.photo_log.write().await;
        // Events before today can never count again; drop them so the log
        // does not grow for the life of the service.
        photo_log.retain(|event| event.timestamp.date_naive() >= today);
        Ok(DashboardStats::compute(&orders, &photo_log, now))
    }

    /// Loads, transitions, and stores one work order under its per-entity
    /// guard.
    async fn apply<F>(&self, id: Uuid, transition: F) -> Result<WorkOrder, ServiceError>
    where
        F: FnOnce(&WorkOrder) -> Result<Transition, ServiceError>,
    {
        let _guard = self.acquire(id)?;
        self.apply_inner(id, transition).await
    }

    async fn apply_inner<F>(&self, id: Uuid, transition: F) -> Result<WorkOrder, ServiceError>
    where
        F: FnOnce(&WorkOrder) -> Result<Transition, ServiceError>,
    {
        let order = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", id)))?;

        let Transition {
            order: updated,
            event,
            warning,
        } = transition(&order)?;

        let saved = self.repository.update(updated).await?;
        if let Some(LifecycleWarning::ClockSkew) = warning {
            warn!(work_order_id = %id, "clock skew detected; actual time clamped to zero");
            slog::warn!(self.logger, "Clock skew on completion"; "work_order_id" => id.to_string());
        }
        self.publish(event).await;
        Ok(saved)
    }

    fn acquire(&self, id: Uuid) -> Result<TransitionGuard, ServiceError> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if locks.contains(&id) {
            return Err(ServiceError::ConcurrentModification(id));
        }
        locks.push(id);
        Ok(TransitionGuard {
            locks: Arc::clone(&self.locks),
            id,
        })
    }

    async fn publish(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            sender.send_or_log(event).await;
        }
    }
}
