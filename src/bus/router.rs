use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{Action, Bus, BusError, Reply, ServiceId};

/// Backend side of one action: decodes the payload and returns the reply.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, data: Value) -> Reply;
}

/// In-process bus dispatching each `(service, action)` pair to its handler.
#[derive(Default)]
pub struct ActionRouter {
    routes: HashMap<(ServiceId, Action), Arc<dyn ActionHandler>>,
    connected: AtomicBool,
}

impl ActionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        mut self,
        service: ServiceId,
        action: Action,
        handler: impl ActionHandler + 'static,
    ) -> Self {
        self.routes.insert((service, action), Arc::new(handler));
        self
    }
}

#[async_trait]
impl Bus for ActionRouter {
    async fn connect(&self) -> Result<(), BusError> {
        self.connected.store(true, Ordering::SeqCst);
        log::info!("Action router ready with {} routes", self.routes.len());
        Ok(())
    }

    async fn close(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn request(
        &self,
        target: ServiceId,
        action: Action,
        data: Value,
    ) -> Result<Reply, BusError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(BusError::NotConnected);
        }
        let handler = self
            .routes
            .get(&(target, action))
            .cloned()
            .ok_or(BusError::NoHandler {
                service: target,
                action,
            })?;

        log::debug!("Dispatching {action} to {target}");
        Ok(handler.handle(data).await)
    }
}
