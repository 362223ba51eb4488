pub mod coordinator;
pub mod status;

pub use coordinator::{Collaborators, Coordinator};
pub use status::{CoordinatorStatus, CoordinatorStatusHandle};

use crate::api::ApiServer;
use crate::config::Config;
use crate::device::DeviceControl;
use crate::dispatch::{CommandDispatch, HttpTransport, RemoteDispatcher};
use crate::event::Event;
use crate::registry::{LocalRole, PeerRegistry};
use crate::xapi::XapiDevice;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Events buffered between the ingress and the coordinator.
const EVENT_QUEUE_DEPTH: usize = 64;

pub async fn run_service(config_path: Option<&Path>) -> Result<()> {
    info!("Starting siminterp service");

    let config = Config::load(config_path)?;
    let registry = Arc::new(
        PeerRegistry::from_config(&config.endpoints).context("Invalid endpoint configuration")?,
    );

    let transport = HttpTransport::from_config(&config.transport)?;
    let device = Arc::new(XapiDevice::new(transport.clone(), &config.device));
    let dispatcher: Arc<dyn CommandDispatch> = Arc::new(RemoteDispatcher::new(transport));

    let serial = device
        .serial_number()
        .await
        .context("Failed to read the local serial number")?;
    let role = registry.resolve(&serial);

    match &role {
        LocalRole::Disabled => {
            warn!(
                "Serial {} is not in the endpoint list, interpretation coordination disabled",
                serial
            );
            return Ok(());
        }
        LocalRole::Floor(_) => {
            info!("Running as floor device ({} language peers)", registry.peers().len());
        }
        LocalRole::Language(endpoint) => {
            info!("Running as {} language device", endpoint.role);
            if let Some(floor) = registry.floor() {
                match dispatcher.display_name(floor).await {
                    Some(name) => info!("Floor device: {}", name),
                    None => info!("Floor device: {}", floor.address),
                }
            }
        }
    }

    let (tx, rx) = mpsc::channel::<Event>(EVENT_QUEUE_DEPTH);
    let status = CoordinatorStatusHandle::default();
    let coordinator = Coordinator::new(
        role,
        Collaborators {
            control: device.clone(),
            ui: device,
            dispatcher,
            registry,
        },
        &config,
        status.clone(),
    );

    let api_server = ApiServer::new(tx, status, &config);
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("siminterp is ready");
    coordinator.run(rx).await;

    Ok(())
}
