// --- File: crates/travelwish_notify/src/feed.rs ---
//! In-process provider dashboard feed.
//!
//! Deliberately non-durable: entries live in a bounded deque and are lost on
//! restart. Durable history is the in-app notification table; the feed only
//! backs the live provider dashboard.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use travelwish_common::services::{NotificationEvent, NotificationKind};
use uuid::Uuid;

/// Default feed capacity when the config does not set one.
pub const DEFAULT_FEED_CAPACITY: usize = 100;

/// A single feed entry shown on a provider's dashboard.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeedEntry {
    pub id: String,
    pub provider_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub booking_id: String,
    pub is_read: bool,
    /// RFC 3339 creation time.
    pub created_at: String,
}

/// Bounded, mutex-guarded feed of provider events, oldest dropped first.
pub struct ProviderFeed {
    entries: Mutex<VecDeque<FeedEntry>>,
    capacity: usize,
}

impl ProviderFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Appends an entry for the event's provider, evicting the oldest entry
    /// once the feed is full. Returns the stored entry.
    pub fn push(&self, provider_id: &str, event: &NotificationEvent) -> FeedEntry {
        let entry = FeedEntry {
            id: Uuid::new_v4().to_string(),
            provider_id: provider_id.to_string(),
            kind: event.kind,
            title: event.title.clone(),
            message: event.message.clone(),
            booking_id: event.booking.booking_id.clone(),
            is_read: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry.clone());
        entry
    }

    /// The provider's entries, newest first.
    pub fn for_provider(&self, provider_id: &str) -> Vec<FeedEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.provider_id == provider_id)
            .cloned()
            .collect()
    }

    /// Marks a feed entry read. Returns `false` when the entry is unknown
    /// (possibly already evicted).
    pub fn mark_read(&self, entry_id: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) => {
                entry.is_read = true;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl Default for ProviderFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travelwish_common::services::BookingSnapshot;

    fn event(booking_id: &str) -> NotificationEvent {
        NotificationEvent {
            kind: NotificationKind::NewBooking,
            recipient_user_id: "p1".to_string(),
            recipient_email: None,
            provider_id: Some("p1".to_string()),
            title: "New Booking Request".to_string(),
            message: "A new booking request arrived".to_string(),
            booking: BookingSnapshot {
                booking_id: booking_id.to_string(),
                resource_id: "r1".to_string(),
                resource_name: "Lagoon View Villa".to_string(),
                provider_id: "p1".to_string(),
                customer_user_id: "u1".to_string(),
                customer_name: "Amara Silva".to_string(),
                customer_email: "amara@example.com".to_string(),
                customer_phone: None,
                check_in_date: "2026-09-01".to_string(),
                check_out_date: "2026-09-04".to_string(),
                number_of_guests: 2,
                special_requests: None,
                status: "pending".to_string(),
            },
        }
    }

    #[test]
    fn feed_is_bounded_and_drops_oldest() {
        let feed = ProviderFeed::new(3);
        for i in 0..5 {
            feed.push("p1", &event(&format!("bk_{}", i)));
        }
        let entries = feed.for_provider("p1");
        assert_eq!(entries.len(), 3);
        // Newest first, and bk_0 / bk_1 were evicted
        assert_eq!(entries[0].booking_id, "bk_4");
        assert_eq!(entries[2].booking_id, "bk_2");
    }

    #[test]
    fn mark_read_flips_the_flag_once() {
        let feed = ProviderFeed::new(10);
        let entry = feed.push("p1", &event("bk_1"));
        assert!(feed.mark_read(&entry.id));
        assert!(feed.for_provider("p1")[0].is_read);
        assert!(!feed.mark_read("missing"));
    }

    #[test]
    fn feed_is_scoped_per_provider() {
        let feed = ProviderFeed::new(10);
        feed.push("p1", &event("bk_1"));
        feed.push("p2", &event("bk_2"));
        assert_eq!(feed.for_provider("p1").len(), 1);
        assert_eq!(feed.for_provider("p2").len(), 1);
        assert!(feed.for_provider("p3").is_empty());
    }
}
