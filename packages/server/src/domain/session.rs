//! Session aggregate.
//!
//! One `Session` owns every piece of mutable chat state: the participant
//! registry (in join order), per-connection escalation and slow-mode records,
//! the global moderation flags and the in-memory history. It performs no I/O;
//! callers hold it behind a single lock and fan out the results.

use std::collections::HashMap;

use super::{
    AvatarGlyph, ChatMessage, Color, ConnectionId, EscalationOutcome, EscalationRecord,
    GlobalModerationState, ModerationCommand, Participant, ParticipantName, PresenceEntry,
    SessionConfig, SessionError, Timestamp, config::duration_millis,
};

/// How a `register` call was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A new participant joined.
    Joined,
    /// The connection was already registered; its identity was replaced.
    Reregistered { previous: ParticipantName },
}

/// A participant whose idle flag flipped during a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleTransition {
    pub name: String,
    pub idle: bool,
}

/// Sender/recipient pair resolved for a private message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateRoute {
    pub sender_display_name: String,
    pub recipient: ConnectionId,
    pub recipient_name: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    participants: Vec<Participant>,
    escalations: HashMap<ConnectionId, EscalationRecord>,
    last_message_at: HashMap<ConnectionId, Timestamp>,
    moderation: GlobalModerationState,
    history: Vec<ChatMessage>,
    escalation_window_ms: i64,
}

impl Session {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_history(config, Vec::new())
    }

    /// Create a session whose history starts from previously persisted messages.
    pub fn with_history(config: &SessionConfig, history: Vec<ChatMessage>) -> Self {
        Self {
            participants: Vec::new(),
            escalations: HashMap::new(),
            last_message_at: HashMap::new(),
            moderation: GlobalModerationState::new(
                config.slow_mode_enabled,
                duration_millis(config.slow_mode_interval),
            ),
            history,
            escalation_window_ms: duration_millis(config.escalation_window),
        }
    }

    // ========================================
    // Registry
    // ========================================

    pub fn register(
        &mut self,
        connection_id: ConnectionId,
        name: ParticipantName,
        color: Color,
        avatar: AvatarGlyph,
        now: Timestamp,
    ) -> Result<Registration, SessionError> {
        if self.name_taken(&name, Some(&connection_id)) {
            return Err(SessionError::NameCollision(name.into_string()));
        }

        if let Some(existing) = self.find_mut(&connection_id) {
            let previous = std::mem::replace(&mut existing.name, name);
            existing.color = color;
            existing.avatar = avatar;
            existing.touch(now);
            return Ok(Registration::Reregistered { previous });
        }

        self.participants
            .push(Participant::new(connection_id, name, color, avatar, now));
        Ok(Registration::Joined)
    }

    pub fn find(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| &p.connection_id == connection_id)
    }

    /// Look a participant up by canonical name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name.matches(name))
    }

    /// Change a participant's name; returns the previous one.
    pub fn rename(
        &mut self,
        connection_id: &ConnectionId,
        new_name: ParticipantName,
    ) -> Result<ParticipantName, SessionError> {
        if self.find(connection_id).is_none() {
            return Err(SessionError::NotRegistered);
        }
        if self.name_taken(&new_name, Some(connection_id)) {
            return Err(SessionError::NameCollision(new_name.into_string()));
        }
        let participant = self
            .find_mut(connection_id)
            .ok_or(SessionError::NotRegistered)?;
        Ok(std::mem::replace(&mut participant.name, new_name))
    }

    /// Remove a connection and every record keyed to it.
    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        self.escalations.remove(connection_id);
        self.last_message_at.remove(connection_id);
        let index = self
            .participants
            .iter()
            .position(|p| &p.connection_id == connection_id)?;
        Some(self.participants.remove(index))
    }

    /// Presence rows in join order.
    pub fn snapshot(&self) -> Vec<PresenceEntry> {
        self.participants.iter().map(Participant::presence).collect()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn find_mut(&mut self, connection_id: &ConnectionId) -> Option<&mut Participant> {
        self.participants
            .iter_mut()
            .find(|p| &p.connection_id == connection_id)
    }

    fn name_taken(&self, name: &ParticipantName, except: Option<&ConnectionId>) -> bool {
        let key = name.canonical_key();
        self.participants
            .iter()
            .filter(|p| Some(&p.connection_id) != except)
            .any(|p| p.name.canonical_key() == key)
    }

    // ========================================
    // Activity & idle detection
    // ========================================

    pub fn touch(&mut self, connection_id: &ConnectionId, now: Timestamp) -> Result<(), SessionError> {
        let participant = self
            .find_mut(connection_id)
            .ok_or(SessionError::NotRegistered)?;
        participant.touch(now);
        Ok(())
    }

    /// Recompute every idle flag; returns the participants that flipped.
    pub fn sweep_idle(&mut self, now: Timestamp, threshold_ms: i64) -> Vec<IdleTransition> {
        let mut transitions = Vec::new();
        for participant in &mut self.participants {
            let idle_now = now.millis_since(participant.last_activity_at) > threshold_ms;
            if idle_now != participant.is_idle {
                participant.is_idle = idle_now;
                transitions.push(IdleTransition {
                    name: participant.name.as_str().to_string(),
                    idle: idle_now,
                });
            }
        }
        transitions
    }

    // ========================================
    // Message admission
    // ========================================

    /// Run the public-chat gates in order: suspension, kick, slow mode.
    ///
    /// On success the slow-mode ledger and the sender's activity are updated
    /// and the sender is returned. Granted administrators issuing a
    /// moderation command pass the suspension gate.
    pub fn admit_chat(
        &mut self,
        connection_id: &ConnectionId,
        command: Option<&ModerationCommand>,
        now: Timestamp,
    ) -> Result<&Participant, SessionError> {
        if self.moderation.suspended && !(command.is_some() && self.is_granted(connection_id)) {
            return Err(SessionError::ChatSuspended);
        }

        let participant = self.find(connection_id).ok_or(SessionError::NotRegistered)?;
        if participant.is_kicked {
            return Err(SessionError::AlreadyKicked);
        }

        if self.moderation.slow_mode_enabled {
            if let Some(last) = self.last_message_at.get(connection_id) {
                if now.millis_since(*last) < self.moderation.slow_mode_interval_ms {
                    return Err(SessionError::RateLimited);
                }
            }
            self.last_message_at.insert(connection_id.clone(), now);
        }

        let participant = self
            .find_mut(connection_id)
            .ok_or(SessionError::NotRegistered)?;
        participant.touch(now);
        Ok(&*participant)
    }

    /// Run the private-message gates: suspension, sender and recipient lookup, kick.
    ///
    /// Private messages are exempt from slow mode.
    pub fn admit_private(
        &mut self,
        connection_id: &ConnectionId,
        recipient: &str,
        now: Timestamp,
    ) -> Result<PrivateRoute, SessionError> {
        if self.moderation.suspended {
            return Err(SessionError::ChatSuspended);
        }

        let not_found = || SessionError::RecipientNotFound(recipient.trim().to_string());
        let sender = self.find(connection_id).ok_or_else(not_found)?;
        let target = self.find_by_name(recipient).ok_or_else(not_found)?;
        if sender.is_kicked {
            return Err(SessionError::AlreadyKicked);
        }

        let route = PrivateRoute {
            sender_display_name: sender.display_name(),
            recipient: target.connection_id.clone(),
            recipient_name: target.name.as_str().to_string(),
        };
        self.touch(connection_id, now)?;
        Ok(route)
    }

    /// Display name to relay a typing indicator under, if the sender may chat.
    pub fn admit_typing(&self, connection_id: &ConnectionId) -> Option<String> {
        if self.moderation.suspended {
            return None;
        }
        self.find(connection_id)
            .filter(|p| !p.is_kicked)
            .map(Participant::display_name)
    }

    // ========================================
    // Moderation
    // ========================================

    /// Present the escalation token once for `connection_id`.
    pub fn request_escalation(
        &mut self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> EscalationOutcome {
        let current = self.escalations.get(connection_id).copied();
        let (record, outcome) = EscalationRecord::advance(current, now, self.escalation_window_ms);
        self.escalations.insert(connection_id.clone(), record);
        outcome
    }

    pub fn is_granted(&self, connection_id: &ConnectionId) -> bool {
        self.escalations
            .get(connection_id)
            .is_some_and(|record| record.granted)
    }

    pub fn escalation(&self, connection_id: &ConnectionId) -> Option<EscalationRecord> {
        self.escalations.get(connection_id).copied()
    }

    pub fn last_message_at(&self, connection_id: &ConnectionId) -> Option<Timestamp> {
        self.last_message_at.get(connection_id).copied()
    }

    pub fn moderation(&self) -> GlobalModerationState {
        self.moderation
    }

    /// Returns `true` when the flag actually changed.
    pub fn set_suspended(&mut self, suspended: bool) -> bool {
        let changed = self.moderation.suspended != suspended;
        self.moderation.suspended = suspended;
        changed
    }

    /// Returns `true` when the flag actually changed.
    pub fn set_slow_mode(&mut self, enabled: bool) -> bool {
        let changed = self.moderation.slow_mode_enabled != enabled;
        self.moderation.slow_mode_enabled = enabled;
        changed
    }

    /// Mark a participant as kicked. The flag is sticky for the connection.
    pub fn kick(&mut self, connection_id: &ConnectionId) -> Result<Participant, SessionError> {
        let participant = self
            .find_mut(connection_id)
            .ok_or(SessionError::NotRegistered)?;
        if participant.is_kicked {
            return Err(SessionError::TargetAlreadyKicked(
                participant.name.as_str().to_string(),
            ));
        }
        participant.is_kicked = true;
        Ok(participant.clone())
    }

    // ========================================
    // History
    // ========================================

    pub fn record(&mut self, message: ChatMessage) {
        self.history.push(message);
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
