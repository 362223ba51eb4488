//! Routes queued events to the components the local role runs.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::status::CoordinatorStatusHandle;
use crate::auth::{AuthPhase, AuthenticationCoordinator};
use crate::call::CallCoordinator;
use crate::channel::ChannelBinder;
use crate::config::Config;
use crate::device::{DeviceControl, UiSurface};
use crate::dispatch::CommandDispatch;
use crate::event::{Event, CLICKED};
use crate::registry::{LocalRole, PeerRegistry};

/// Everything the coordinators talk to.
#[derive(Clone)]
pub struct Collaborators {
    pub control: Arc<dyn DeviceControl>,
    pub ui: Arc<dyn UiSurface>,
    pub dispatcher: Arc<dyn CommandDispatch>,
    pub registry: Arc<PeerRegistry>,
}

enum Duty {
    Floor(CallCoordinator),
    Language(ChannelBinder),
    Disabled,
}

pub struct Coordinator {
    role: LocalRole,
    duty: Duty,
    auth: Option<AuthenticationCoordinator>,
    status: CoordinatorStatusHandle,
    debugging: bool,
}

impl Coordinator {
    pub fn new(
        role: LocalRole,
        collaborators: Collaborators,
        config: &Config,
        status: CoordinatorStatusHandle,
    ) -> Self {
        let settings = &config.coordinator;
        let duty = match &role {
            LocalRole::Floor(_) => Duty::Floor(CallCoordinator::new(
                Arc::clone(&collaborators.control),
                Arc::clone(&collaborators.dispatcher),
                Arc::clone(&collaborators.registry),
                &settings.panel_id,
                &settings.meeting_domain,
            )),
            LocalRole::Language(endpoint) => Duty::Language(ChannelBinder::new(
                Arc::clone(&collaborators.control),
                endpoint.role.language().unwrap_or_default(),
                settings.mixer_level,
            )),
            LocalRole::Disabled => Duty::Disabled,
        };

        let auth = (!role.is_disabled()).then(|| {
            AuthenticationCoordinator::new(
                collaborators.control,
                collaborators.ui,
                &settings.panel_id,
                config.localization.clone(),
            )
        });

        Self {
            role,
            duty,
            auth,
            status,
            debugging: settings.debugging,
        }
    }

    pub fn role(&self) -> &LocalRole {
        &self.role
    }

    pub fn auth_phase(&self) -> AuthPhase {
        self.auth.as_ref().map_or(AuthPhase::Idle, |auth| auth.phase())
    }

    /// Handles events until every sender is gone.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Event>) {
        self.status.set_role(&self.role).await;
        while let Some(event) = rx.recv().await {
            self.handle(event).await;
        }
        info!("Event queue closed, coordinator stopping");
    }

    pub async fn handle(&mut self, event: Event) {
        if self.debugging {
            info!("Event: {:?}", event);
        } else {
            debug!("Event: {:?}", event);
        }

        let Some(auth) = self.auth.as_mut() else {
            debug!("Device is not configured, dropping {}", event.name());
            return;
        };
        let name = event.name();

        match event {
            Event::CallStatus(update) => {
                if update.ghost {
                    auth.on_call_ended();
                }
                if let Duty::Floor(call) = &mut self.duty {
                    call.on_call_status(&update).await;
                }
            }
            Event::AuthenticationRequest { kind } => auth.on_request(kind).await,
            Event::PinEntered {
                authenticating,
                digits_entered,
            } => auth.on_pin_entered(authenticating, digits_entered).await,
            Event::PinError => auth.on_pin_error().await,
            Event::InterpretationLanguage(channel) => match &mut self.duty {
                Duty::Floor(call) => {
                    call.on_interpretation_channel(&channel, auth.collected_pin())
                        .await
                }
                Duty::Language(binder) => binder.on_interpretation_channel(&channel).await,
                Duty::Disabled => {}
            },
            Event::WidgetAction { widget_id, action } => {
                if action == CLICKED {
                    auth.on_widget_clicked(&widget_id).await;
                }
            }
            Event::PageClosed { page_id } => {
                if let Duty::Floor(call) = &mut self.duty {
                    call.on_prompt_closed(&page_id, auth.collected_pin()).await;
                }
            }
        }

        let session = match &self.duty {
            Duty::Floor(call) => call.session().cloned(),
            _ => None,
        };
        self.status
            .record_event(name, self.auth_phase(), session)
            .await;
    }
}
