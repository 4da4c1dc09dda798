//! Outbound reminder notifications.
//!
//! The service composes a templated reminder message per person and the
//! WhatsApp deep link carrying it. Actually delivering the link is a
//! capability injected through `NotificationSender`, so the domain stays
//! free of shell/browser calls and tests can observe what would be sent.
//! Delivery is fire-and-forget: nothing about success or failure of the
//! message itself is ever visible to this system.

use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::models::person::Person as DomainPerson;

/// Country code prefixed to every mobile number in the deep link.
pub const COUNTRY_CODE: &str = "91";

/// Capability for handing a composed deep link to the outside world.
pub trait NotificationSender: Send + Sync {
    fn send(&self, person: &DomainPerson, deep_link: &str) -> Result<()>;
}

/// Default sender: logs the deep link for the hosting shell to open.
#[derive(Debug, Clone, Default)]
pub struct DeepLinkLogger;

impl NotificationSender for DeepLinkLogger {
    fn send(&self, person: &DomainPerson, deep_link: &str) -> Result<()> {
        info!("📱 NOTIFY: WhatsApp link for {}: {}", person.name, deep_link);
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationService {
    sender: Arc<dyn NotificationSender>,
}

impl NotificationService {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self { sender }
    }

    /// The reminder message sent to people who have been missing prayers.
    pub fn reminder_message(&self, person: &DomainPerson) -> String {
        format!(
            "Assalamu Alaikum {},\nWelcome to Imli wali masjid!\nAap masjid rozana nahi aa rahe hai namaz ke liye.  Toh apni  haazri rozana dene ki koshish kre.",
            person.name
        )
    }

    /// The WhatsApp deep link carrying the url-encoded reminder message.
    pub fn whatsapp_link(&self, person: &DomainPerson) -> String {
        format!(
            "https://wa.me/{}{}?text={}",
            COUNTRY_CODE,
            person.mobile,
            encode_uri_component(&self.reminder_message(person))
        )
    }

    /// Compose and hand off one reminder.
    pub fn notify(&self, person: &DomainPerson) -> Result<()> {
        let deep_link = self.whatsapp_link(person);
        self.sender.send(person, &deep_link)
    }

    /// Bulk hand-off; individual failures are logged and skipped.
    pub fn notify_all(&self, people: &[DomainPerson]) {
        for person in people {
            if let Err(e) = self.notify(person) {
                warn!("Failed to send notification to {}: {}", person.name, e);
            }
        }
    }
}

/// Percent-encode a URL query component: ASCII letters, digits and
/// `-_.!~*'()` pass through, everything else is UTF-8 percent-escaped.
fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    out
}
