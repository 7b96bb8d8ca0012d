use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    sync::{Mutex, MutexGuard},
};

use crate::{
    domain::{
        auth_form::{Credentials, Registration},
        realtime::{OutboundEvent, VisitId},
    },
    usecases::contracts::{BackendGateway, ChannelError, RealtimeChannel},
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().expect("env lock should not be poisoned")
}

#[derive(Debug, Default)]
struct ChannelLog {
    emitted: Vec<OutboundEvent>,
    closed: bool,
    failing: bool,
}

/// Channel double that records emits; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    log: Rc<RefCell<ChannelLog>>,
}

impl RecordingChannel {
    pub fn emitted(&self) -> Vec<OutboundEvent> {
        self.log.borrow().emitted.clone()
    }

    pub fn emitted_names(&self) -> Vec<&'static str> {
        self.log
            .borrow()
            .emitted
            .iter()
            .map(OutboundEvent::name)
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.log.borrow().closed
    }

    pub fn fail_emits(&self) {
        self.log.borrow_mut().failing = true;
    }

    pub fn clear(&self) {
        self.log.borrow_mut().emitted.clear();
    }
}

impl RealtimeChannel for RecordingChannel {
    fn emit(&self, event: OutboundEvent) -> Result<(), ChannelError> {
        let mut log = self.log.borrow_mut();
        if log.closed || log.failing {
            return Err(ChannelError::Closed);
        }
        log.emitted.push(event);
        Ok(())
    }

    fn close(&mut self) {
        self.log.borrow_mut().closed = true;
    }
}

/// Gateway double recording every request and handing out recording channels.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    pub logins: RefCell<Vec<Credentials>>,
    pub registrations: RefCell<Vec<Registration>>,
    pub history_requests: RefCell<Vec<(VisitId, String)>>,
    pub channels: RefCell<Vec<(VisitId, RecordingChannel)>>,
    pub refuse_channels: Cell<bool>,
}

impl RecordingGateway {
    pub fn last_channel(&self) -> RecordingChannel {
        self.channels
            .borrow()
            .last()
            .map(|(_, channel)| channel.clone())
            .expect("a channel should have been opened")
    }

    pub fn last_visit(&self) -> VisitId {
        self.channels
            .borrow()
            .last()
            .map(|(visit, _)| *visit)
            .expect("a channel should have been opened")
    }
}

impl BackendGateway for RecordingGateway {
    fn request_login(&self, credentials: Credentials) {
        self.logins.borrow_mut().push(credentials);
    }

    fn request_register(&self, registration: Registration) {
        self.registrations.borrow_mut().push(registration);
    }

    fn request_history(&self, visit: VisitId, room: &str) {
        self.history_requests
            .borrow_mut()
            .push((visit, room.to_owned()));
    }

    fn open_channel(&self, visit: VisitId) -> Result<Box<dyn RealtimeChannel>, ChannelError> {
        if self.refuse_channels.get() {
            return Err(ChannelError::MissingToken);
        }

        let channel = RecordingChannel::default();
        self.channels.borrow_mut().push((visit, channel.clone()));
        Ok(Box::new(channel))
    }
}
