//! Floor-side call tracking.
//!
//! The floor device follows its own meeting call and keeps the language
//! devices in step with it: they all join once an interpretation channel for
//! any of them comes up and are disconnected when the floor call ends.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::session::{CallSession, CallStatusUpdate};
use crate::auth::{AuthRequestKind, ParticipantRole};
use crate::device::{DeviceControl, InterpretationChannel, ParticipantAdd};
use crate::dispatch::{CommandDispatch, JoinMeeting, PeerCommand, PeerOutcome};
use crate::registry::PeerRegistry;

pub struct CallCoordinator {
    control: Arc<dyn DeviceControl>,
    dispatcher: Arc<dyn CommandDispatch>,
    registry: Arc<PeerRegistry>,
    panel_id: String,
    meeting_domain: String,
    session: Option<CallSession>,
}

impl CallCoordinator {
    pub fn new(
        control: Arc<dyn DeviceControl>,
        dispatcher: Arc<dyn CommandDispatch>,
        registry: Arc<PeerRegistry>,
        panel_id: impl Into<String>,
        meeting_domain: impl Into<String>,
    ) -> Self {
        Self {
            control,
            dispatcher,
            registry,
            panel_id: panel_id.into(),
            meeting_domain: meeting_domain.into(),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&CallSession> {
        self.session.as_ref()
    }

    pub async fn on_call_status(&mut self, update: &CallStatusUpdate) {
        if update.ghost {
            self.on_call_ended(update.id).await;
            return;
        }

        if !update.is_meeting_call(&self.meeting_domain) {
            return;
        }

        match &self.session {
            Some(session) if session.id == update.id => {}
            Some(session) => debug!(
                "Ignoring call {} to {}, already tracking call {}",
                update.id, update.remote_number, session.id
            ),
            None => {
                info!("Tracking meeting call {} to {}", update.id, update.remote_number);
                self.session = Some(CallSession::from_update(update));
            }
        }
    }

    async fn on_call_ended(&mut self, id: u64) {
        if let Some(session) = self.session.take() {
            info!("Meeting call {} ended", session.id);
        }

        let peers = self.registry.peers();
        if peers.is_empty() {
            return;
        }
        info!("Call {} gone, disconnecting {} peers", id, peers.len());
        if let Err(e) = self.dispatcher.send_all(&peers, &PeerCommand::Disconnect).await {
            warn!("Disconnecting peers failed: {}", e);
        }
    }

    /// An interpretation channel came up in the floor call. `pin` holds the
    /// digits collected by the authentication prompt, if any.
    pub async fn on_interpretation_channel(
        &mut self,
        channel: &InterpretationChannel,
        pin: Option<&str>,
    ) {
        let Some(peer) = self.registry.peer_for_language(&channel.code, &channel.name) else {
            debug!("No peer serves language {}", channel.code);
            return;
        };
        let Some(session_id) = self.session.as_ref().map(|s| s.id) else {
            debug!("Language {} announced with no meeting call", channel.code);
            return;
        };

        let conference = match self.control.conference_status().await {
            Ok(conference) => conference,
            Err(e) => {
                warn!("Failed to read conference capabilities: {}", e);
                return;
            }
        };
        if conference.participant_add != Some(ParticipantAdd::Unavailable) {
            debug!(
                "Participant add is {:?}, leaving {} to the meeting",
                conference.participant_add, peer.role
            );
            return;
        }

        let Some(number) = self.join_number(session_id).await else {
            return;
        };
        let join = JoinMeeting::new(&number, ParticipantRole::Guest, pin);
        self.dispatch_join(join).await;
    }

    /// Our prompt panel was closed, either by us or by the user.
    pub async fn on_prompt_closed(&mut self, page_id: &str, pin: Option<&str>) {
        if page_id != self.panel_id {
            return;
        }

        let conference = match self.control.conference_status().await {
            Ok(conference) => conference,
            Err(e) => {
                warn!("Failed to read conference after prompt close: {}", e);
                return;
            }
        };

        match conference.authentication_request {
            None => debug!("Prompt closed with no authentication status"),
            Some(AuthRequestKind::None) => {
                let Some(pin) = pin else {
                    debug!("Prompt closed without a PIN");
                    return;
                };
                let Some(session_id) = self.session.as_ref().map(|s| s.id) else {
                    debug!("Prompt closed with no meeting call");
                    return;
                };

                if conference.languages.is_empty() {
                    debug!("Prompt closed with no interpretation languages announced");
                    return;
                }

                let Some(number) = self.join_number(session_id).await else {
                    return;
                };
                let join = JoinMeeting::new(&number, ParticipantRole::Guest, Some(pin));
                self.dispatch_join(join).await;
            }
            Some(kind) if kind.role_choice().is_some() => {
                info!(
                    "Prompt dismissed while {} is still requested, leaving the meeting",
                    kind.as_str()
                );
                if let Err(e) = self.control.disconnect_call().await {
                    error!("Failed to disconnect call: {}", e);
                }
            }
            Some(kind) => debug!("Prompt closed during {}", kind.as_str()),
        }
    }

    /// Callback number of the tracked call, provided the device still reports
    /// that call as active.
    async fn join_number(&self, session_id: u64) -> Option<String> {
        let call = match self.control.active_call().await {
            Ok(Some(call)) => call,
            Ok(None) => {
                debug!("Call {} no longer active", session_id);
                return None;
            }
            Err(e) => {
                warn!("Failed to read active call: {}", e);
                return None;
            }
        };

        let session = self.session.as_ref().filter(|s| s.id == session_id)?;
        if call.id.is_some_and(|id| id != session_id) {
            debug!("Active call {:?} is not the tracked call {}", call.id, session_id);
            return None;
        }

        let number = call
            .callback_number
            .filter(|number| !number.trim().is_empty())
            .or_else(|| session.callback_number.clone());
        if number.is_none() {
            debug!("Call {} has no callback number", session_id);
        }
        number
    }

    /// Every language device joins, not only the one whose channel
    /// triggered the join.
    async fn dispatch_join(&self, join: JoinMeeting) {
        let peers = self.registry.peers();
        info!(
            "Asking {} peers to join {} (pin {})",
            peers.len(),
            join.number,
            if join.pin.is_some() { "set" } else { "none" }
        );
        let outcomes = self.dispatcher.send_each(&peers, &PeerCommand::Join(join)).await;
        log_outcomes("join", &outcomes);
    }
}

fn log_outcomes(command: &str, outcomes: &[PeerOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(_) => debug!("{} accepted by {}", command, outcome.endpoint.role),
            Err(e) => warn!("{} failed for {}: {}", command, outcome.endpoint.role, e),
        }
    }
}
