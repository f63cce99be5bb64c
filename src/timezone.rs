// ============================================================================
// TIME-ZONE NOTIFICATIONS
// ============================================================================

use chrono::FixedOffset;
use log::trace;

/// Registration flag for time-zone change notifications.
///
/// Registering twice or unregistering while not registered does nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeZoneReceiver {
    registered: bool,
}

impl TimeZoneReceiver {
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Returns true if this call performed the registration.
    pub fn register(&mut self) -> bool {
        if self.registered {
            trace!("time zone receiver already registered");
            return false;
        }
        self.registered = true;
        true
    }

    /// Returns true if this call performed the unregistration.
    pub fn unregister(&mut self) -> bool {
        if !self.registered {
            trace!("time zone receiver not registered");
            return false;
        }
        self.registered = false;
        true
    }
}

/// Host-side detector that turns polled system offsets into change events.
#[derive(Debug, Clone, Copy)]
pub struct TimeZoneWatcher {
    last: FixedOffset,
}

impl TimeZoneWatcher {
    pub fn new(current: FixedOffset) -> Self {
        Self { last: current }
    }

    /// Record `current`; true when it differs from the previous poll.
    pub fn poll(&mut self, current: FixedOffset) -> bool {
        if current == self.last {
            return false;
        }
        self.last = current;
        true
    }
}
