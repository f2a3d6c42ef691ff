//! Message lifecycle state machine.
//!
//! Network interactions are split in two: a `begin_*` transition that returns
//! the [`Call`] to issue (or `None` when the action is not allowed), and a
//! `finish_*` transition that folds the reply. Nothing changes the message
//! list until the remote side confirmed it.

use crate::api::{Call, Error};
use crate::state::{Message, MessageCreated, MessageDeleted, MessageUpdated, User};
use leptos::logging::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Create,
    Update(u32),
    /// An update whose target was deleted before the reply came back.
    Orphaned(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing selected, empty input.
    #[default]
    Idle,
    /// Nothing selected, some input.
    Composing,
    Editing(u32),
    Sending(Pending),
}

#[derive(Debug, Clone)]
pub struct Controller {
    user: Option<User>,
    loading_user: bool,
    messages: Vec<Message>,
    input: String,
    phase: Phase,
    next_id: u32,
}

impl Default for Controller {
    fn default() -> Self {
        Controller {
            user: None,
            loading_user: false,
            messages: vec![],
            input: String::new(),
            phase: Phase::Idle,
            next_id: 1,
        }
    }
}

impl Controller {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn loading_user(&self) -> bool {
        self.loading_user
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.phase, Phase::Sending(_))
    }

    pub fn selection(&self) -> Option<u32> {
        match self.phase {
            Phase::Editing(id) | Phase::Sending(Pending::Update(id)) => Some(id),
            _ => None,
        }
    }

    fn has_content(&self) -> bool {
        !self.input.trim().is_empty()
    }

    pub fn can_send(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Composing) && self.has_content()
    }

    pub fn can_update(&self) -> bool {
        matches!(self.phase, Phase::Editing(_)) && self.has_content()
    }

    pub fn can_delete(&self) -> bool {
        self.selection().is_some()
    }

    /// Phase to fall back to when nothing is selected.
    fn resting(&self) -> Phase {
        if self.input.is_empty() {
            Phase::Idle
        } else {
            Phase::Composing
        }
    }

    fn clear(&mut self) {
        self.input.clear();
        self.phase = Phase::Idle;
    }

    pub fn begin_load(&mut self) -> Call {
        self.loading_user = true;
        Call::ListUsers
    }

    pub fn finish_load(&mut self, result: Result<Vec<User>, Error>) {
        self.loading_user = false;
        match result {
            Ok(users) => self.user = users.into_iter().next(),
            Err(err) => {
                error!("Error fetching users: {err}");
                self.user = None;
            }
        }
    }

    pub fn set_input(&mut self, input: String) {
        self.input = input;
        if matches!(self.phase, Phase::Idle | Phase::Composing) {
            self.phase = self.resting();
        }
    }

    pub fn begin_send(&mut self) -> Option<Call> {
        if !self.can_send() {
            return None;
        }
        self.phase = Phase::Sending(Pending::Create);
        Some(Call::CreateMessage {
            content: self.input.clone(),
        })
    }

    pub fn finish_send(&mut self, result: Result<MessageCreated, Error>) {
        if self.phase != Phase::Sending(Pending::Create) {
            warn!("Ignoring create reply in phase {:?}", self.phase);
            return;
        }
        match result {
            Ok(created) => {
                let id = self.next_id;
                self.next_id += 1;
                self.messages.push(Message {
                    id,
                    content: created.content,
                    created_at: created.created_at,
                    updated_at: None,
                });
                self.clear();
            }
            Err(err) => {
                error!("Error sending message: {err}");
                self.phase = self.resting();
            }
        }
    }

    /// Selects `id` for editing, or clears the selection if it is already
    /// selected.
    pub fn toggle(&mut self, id: u32) {
        if self.is_sending() {
            return;
        }
        if self.phase == Phase::Editing(id) {
            self.clear();
            return;
        }
        match self.messages.iter().find(|message| message.id == id) {
            Some(message) => {
                self.input = message.content.clone();
                self.phase = Phase::Editing(id);
            }
            None => warn!("Cannot select unknown message {id}"),
        }
    }

    pub fn begin_update(&mut self) -> Option<Call> {
        let Phase::Editing(id) = self.phase else {
            return None;
        };
        if !self.has_content() {
            return None;
        }
        self.phase = Phase::Sending(Pending::Update(id));
        Some(Call::UpdateMessage {
            id,
            content: self.input.clone(),
        })
    }

    pub fn finish_update(&mut self, result: Result<MessageUpdated, Error>) {
        let id = match self.phase {
            Phase::Sending(Pending::Update(id)) => id,
            Phase::Sending(Pending::Orphaned(id)) => {
                warn!("Message {id} was deleted during its update, discarding reply");
                self.clear();
                return;
            }
            phase => {
                warn!("Ignoring update reply in phase {phase:?}");
                return;
            }
        };
        match result {
            Ok(updated) => {
                if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
                    message.content = updated.content;
                    message.updated_at = Some(updated.updated_at);
                }
                self.clear();
            }
            Err(err) => {
                error!("Error updating message {id}: {err}");
                self.phase = Phase::Editing(id);
            }
        }
    }

    /// Deletion is available whenever something is selected, even while an
    /// update is in flight.
    pub fn begin_delete(&self) -> Option<Call> {
        self.selection().map(|id| Call::DeleteMessage { id })
    }

    pub fn finish_delete(&mut self, id: u32, result: Result<MessageDeleted, Error>) {
        if let Err(err) = result {
            error!("Error deleting message {id}: {err}");
            return;
        }
        self.messages.retain(|message| message.id != id);
        match self.phase {
            Phase::Editing(selected) if selected == id => self.clear(),
            Phase::Sending(Pending::Update(selected)) if selected == id => {
                self.input.clear();
                self.phase = Phase::Sending(Pending::Orphaned(id));
            }
            _ => {}
        }
    }
}
