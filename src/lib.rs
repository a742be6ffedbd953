//! Valvetrack Core Library
//!
//! This crate provides the core functionality for tracking valve
//! inspection/repair work orders: the status lifecycle, photo capture
//! bookkeeping, and dashboard statistics. The UI shell holds the
//! authoritative collection through [`services::WorkOrderService`] and
//! re-renders from derived state; transitions themselves are pure and
//! storage-agnostic.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod photos;
pub mod reports;
pub mod repositories;
pub mod services;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Screens the navigation host can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Dashboard,
    WorkOrders,
    NewOrder,
    WorkOrderDetail,
}

/// Navigation state owned by the view shell: the visible page and the
/// currently selected work order, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub page: Page,
    pub selected_work_order: Option<Uuid>,
}

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub work_orders: Arc<services::WorkOrderService>,
}

impl AppState {
    pub fn work_order_service(&self) -> Arc<services::WorkOrderService> {
        self.work_orders.clone()
    }
}
