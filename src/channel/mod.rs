//! Language-device side: route the assigned interpretation channel to the
//! room's audio.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::device::{DeviceControl, InterpretationChannel};

pub struct ChannelBinder {
    control: Arc<dyn DeviceControl>,
    language: String,
    mixer_level: u8,
}

impl ChannelBinder {
    pub fn new(control: Arc<dyn DeviceControl>, language: impl Into<String>, mixer_level: u8) -> Self {
        Self {
            control,
            language: language.into(),
            mixer_level,
        }
    }

    /// Selects `channel` and sets the mixer when it carries our language.
    /// Repeated announcements repeat both directives.
    pub async fn on_interpretation_channel(&self, channel: &InterpretationChannel) {
        if !channel.matches(&self.language) {
            debug!("Channel {} is not ours ({})", channel.code, self.language);
            return;
        }

        info!("Binding interpretation channel {}", channel.code);
        if let Err(e) = self.control.select_interpretation_language(&channel.code).await {
            error!("Failed to select language {}: {}", channel.code, e);
        }
        if let Err(e) = self.control.set_interpretation_mixer(self.mixer_level).await {
            error!("Failed to set interpretation mixer: {}", e);
        }
    }
}
