use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::dispatch::{CommandDispatch, HttpTransport, RemoteDispatcher};
use crate::registry::PeerRegistry;

pub async fn handle_peers_command(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let registry =
        PeerRegistry::from_config(&config.endpoints).context("Invalid endpoint configuration")?;
    let dispatcher = RemoteDispatcher::new(HttpTransport::from_config(&config.transport)?);

    println!("{} endpoint(s):\n", registry.endpoints().len());
    for endpoint in registry.endpoints() {
        let name = dispatcher
            .display_name(endpoint)
            .await
            .unwrap_or_else(|| "(unreachable)".to_string());
        println!("Role:    {}", endpoint.role);
        println!("Address: {}", endpoint.address);
        println!("Serial:  {}", endpoint.serial);
        println!("Name:    {}", name);
        println!("---");
    }

    Ok(())
}
