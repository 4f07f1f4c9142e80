//! Recurring background jobs. Call `spawn_all` once during startup.

use crate::services::PlanService;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Detaches every job with `tokio::spawn`; does not block
pub fn spawn_all(plan_service: PlanService, plan_expiry_interval: Duration) -> Vec<JoinHandle<()>> {
    vec![spawn_plan_expiry(plan_service, plan_expiry_interval)]
}

/// Retire ride requests whose desired time has passed
pub fn spawn_plan_expiry(plan_service: PlanService, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match plan_service.expire_plans().await {
                Ok(n) if n > 0 => log::info!("Expired passenger plans: {n}"),
                Ok(_) => {}
                Err(e) => log::error!("Failed to expire passenger plans: {e:?}"),
            }
            tokio::time::sleep(interval).await;
        }
    })
}
