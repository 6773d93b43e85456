//! In-memory booking store
//!
//! The single mutable booking collection, owned by the application state and
//! shared by handle. Every mutation takes the write lock for its whole
//! read-check-write, so transitions apply one at a time and never partially.

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::bookings::{
    Billing, Booking, BookingError, BookingStatus, Geo, MaterialsProvidedBy, NewBooking, Party,
    PaymentMethod, Priority, RatingPolicy, ServiceLocationType, Stars, Transition,
    DEFAULT_LANGUAGE,
};

#[derive(Clone, Default)]
pub struct BookingStore {
    bookings: Arc<RwLock<Vec<Booking>>>,
    rating_policy: RatingPolicy,
}

impl BookingStore {
    pub fn new(rating_policy: RatingPolicy) -> Self {
        Self::with_bookings(rating_policy, Vec::new())
    }

    pub fn with_bookings(rating_policy: RatingPolicy, bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Arc::new(RwLock::new(bookings)),
            rating_policy,
        }
    }

    pub fn rating_policy(&self) -> RatingPolicy {
        self.rating_policy
    }

    pub fn len(&self) -> usize {
        self.bookings.read().len()
    }

    /// Create a PENDING booking with a fresh id
    pub fn create(&self, input: NewBooking) -> Result<Booking, BookingError> {
        let booking = Booking::create(Uuid::new_v4().to_string(), input)?;
        self.bookings.write().push(booking.clone());

        tracing::info!(
            booking_id = %booking.id,
            customer_id = %booking.customer_id,
            worker_id = %booking.worker_id,
            priority = %booking.priority,
            "Booking created"
        );
        Ok(booking)
    }

    pub fn get(&self, id: &str) -> Result<Booking, BookingError> {
        self.bookings
            .read()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| BookingError::NotFound(id.to_string()))
    }

    pub fn accept(&self, id: &str) -> Result<Booking, BookingError> {
        self.transition(id, Transition::Accept)
    }

    pub fn reject(&self, id: &str) -> Result<Booking, BookingError> {
        self.transition(id, Transition::Reject)
    }

    pub fn complete(&self, id: &str) -> Result<Booking, BookingError> {
        self.transition(id, Transition::Complete)
    }

    pub fn transition(&self, id: &str, transition: Transition) -> Result<Booking, BookingError> {
        self.update(id, |booking| {
            let from = booking.status;
            booking.apply(transition).map_err(|e| {
                tracing::warn!(booking_id = %id, %from, %transition, "Illegal booking transition");
                e
            })?;
            tracing::info!(
                booking_id = %id,
                %from,
                to = %booking.status,
                terminal = booking.status.is_terminal(),
                "Booking status changed"
            );
            Ok(())
        })
    }

    pub fn rate_by_user(&self, id: &str, stars: i64) -> Result<Booking, BookingError> {
        self.rate(id, Party::Customer, stars)
    }

    pub fn rate_by_worker(&self, id: &str, stars: i64) -> Result<Booking, BookingError> {
        self.rate(id, Party::Worker, stars)
    }

    fn rate(&self, id: &str, by: Party, stars: i64) -> Result<Booking, BookingError> {
        let stars = Stars::new(stars)?;
        let policy = self.rating_policy;
        self.update(id, |booking| {
            booking.rate(by, stars, policy)?;
            tracing::info!(booking_id = %id, party = %by, stars = stars.get(), "Booking rated");
            Ok(())
        })
    }

    fn update<F>(&self, id: &str, f: F) -> Result<Booking, BookingError>
    where
        F: FnOnce(&mut Booking) -> Result<(), BookingError>,
    {
        let mut bookings = self.bookings.write();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        // Work on a copy so a failed check leaves the stored record as it was
        let mut draft = booking.clone();
        f(&mut draft)?;
        *booking = draft.clone();
        Ok(draft)
    }

    // ------------------------------------------------------------------------
    // Derived views, in insertion order
    // ------------------------------------------------------------------------

    pub fn bookings_for_customer(&self, customer_id: &str) -> Vec<Booking> {
        self.filtered(|b| b.customer_id == customer_id)
    }

    pub fn pending_requests_for_worker(&self, worker_id: &str) -> Vec<Booking> {
        self.filtered(|b| b.worker_id == worker_id && b.status == BookingStatus::Pending)
    }

    pub fn active_or_done_for_worker(&self, worker_id: &str) -> Vec<Booking> {
        self.filtered(|b| {
            b.worker_id == worker_id
                && matches!(b.status, BookingStatus::Accepted | BookingStatus::Completed)
        })
    }

    fn filtered<P>(&self, predicate: P) -> Vec<Booking>
    where
        P: Fn(&Booking) -> bool,
    {
        self.bookings
            .read()
            .iter()
            .filter(|b| predicate(b))
            .cloned()
            .collect()
    }
}

/// Demo bookings for local development
pub fn demo_bookings() -> Vec<Booking> {
    let at = |day: u32, hour: u32, minute: u32| -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(2025, 10, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .map(|naive| naive.and_utc())
    };
    let created = at(10, 12, 30).unwrap_or_else(Utc::now);
    let chennai_central = Geo {
        lat: Some(13.0827),
        lng: Some(80.2707),
    };

    let demo = |id: &str,
                customer_id: &str,
                (category, subcategory): (&str, &str),
                status: BookingStatus,
                priority: Priority,
                start: Option<DateTime<Utc>>,
                end: Option<DateTime<Utc>>| Booking {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        worker_id: "worker-1".to_string(),
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        status,
        priority,
        scheduled_start_time: start,
        scheduled_end_time: end,
        expected_duration_mins: None,
        address: String::new(),
        geo: Geo::default(),
        service_location_type: ServiceLocationType::Home,
        access_notes: String::new(),
        description: String::new(),
        photos: Vec::new(),
        materials_provided_by: MaterialsProvidedBy::Customer,
        language_pref: DEFAULT_LANGUAGE.to_string(),
        contact_phone: String::new(),
        consent_to_share_phone: true,
        alternate_contact_name: String::new(),
        alternate_contact_phone: String::new(),
        estimated_price: 0.0,
        final_price: None,
        payment_method: PaymentMethod::Cash,
        coupon_code: String::new(),
        billing: Billing::default(),
        rating_by_user: None,
        rating_by_worker: None,
        terms_accepted_at: None,
        created_at: created,
        updated_at: created,
    };

    vec![
        Booking {
            address: "12, MG Road, Chennai".to_string(),
            geo: chennai_central,
            access_notes: "4th floor, no lift. Ask for security at gate 'A'.".to_string(),
            description: "Ceiling fan wobbling and making noise.".to_string(),
            photos: vec![
                "https://via.placeholder.com/120x90?text=Fan".to_string(),
                "https://via.placeholder.com/120x90?text=Switch".to_string(),
            ],
            expected_duration_mins: Some(60),
            contact_phone: "+91 90000 11111".to_string(),
            alternate_contact_name: "Ramesh".to_string(),
            alternate_contact_phone: "+91 90000 22222".to_string(),
            terms_accepted_at: at(10, 12, 30),
            estimated_price: 500.0,
            payment_method: PaymentMethod::Upi,
            coupon_code: "DIWALI10".to_string(),
            billing: Billing {
                need_gst_invoice: true,
                gst_number: "33ABCDE1234F1Z5".to_string(),
                company_name: "Priya Ventures".to_string(),
            },
            ..demo(
                "b1",
                "user-1",
                ("Electrician", "Fan Repair"),
                BookingStatus::Pending,
                Priority::Scheduled,
                at(12, 15, 0),
                at(12, 16, 0),
            )
        },
        Booking {
            address: "12, MG Road, Chennai".to_string(),
            geo: chennai_central,
            access_notes: "Call when outside; dog at home.".to_string(),
            description: "Under-sink leak; water dripping constantly.".to_string(),
            photos: vec!["https://via.placeholder.com/120x90?text=Leak".to_string()],
            expected_duration_mins: Some(90),
            language_pref: "HI".to_string(),
            contact_phone: "+91 90000 11111".to_string(),
            terms_accepted_at: at(11, 9, 0),
            estimated_price: 700.0,
            materials_provided_by: MaterialsProvidedBy::Worker,
            ..demo(
                "b2",
                "user-1",
                ("Plumbing", "Pipe Leak"),
                BookingStatus::Accepted,
                Priority::Urgent,
                at(12, 18, 30),
                at(12, 20, 0),
            )
        },
        Booking {
            address: "22, Anna Nagar, Chennai".to_string(),
            geo: Geo {
                lat: Some(13.0878),
                lng: Some(80.2785),
            },
            access_notes: "Parking available at basement B2.".to_string(),
            description: "Grease build-up; need detailed cleaning.".to_string(),
            expected_duration_mins: Some(120),
            language_pref: "TA".to_string(),
            contact_phone: "+91 98888 33333".to_string(),
            consent_to_share_phone: false,
            alternate_contact_name: "Kavi".to_string(),
            alternate_contact_phone: "+91 98888 44444".to_string(),
            terms_accepted_at: at(11, 16, 45),
            estimated_price: 900.0,
            payment_method: PaymentMethod::Card,
            coupon_code: "NEWUSER50".to_string(),
            billing: Billing {
                need_gst_invoice: true,
                gst_number: "33ZZZAB9999L1Z1".to_string(),
                company_name: "Anita Foods".to_string(),
            },
            service_location_type: ServiceLocationType::Office,
            ..demo(
                "b3",
                "user-2",
                ("Cleaning", "Kitchen Deep Clean"),
                BookingStatus::Accepted,
                Priority::Flexible,
                at(13, 10, 0),
                at(13, 12, 0),
            )
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bookings::TransitionError;
    use std::collections::HashSet;

    fn store() -> BookingStore {
        BookingStore::with_bookings(RatingPolicy::CompletedOnly, demo_bookings())
    }

    #[test]
    fn reject_then_accept_scenario() {
        let store = store();
        assert_eq!(store.reject("b1").unwrap().status, BookingStatus::Rejected);

        let err = store.accept("b1").unwrap_err();
        assert!(matches!(
            err,
            BookingError::Transition(TransitionError::Illegal {
                from: BookingStatus::Rejected,
                transition: Transition::Accept
            })
        ));
        assert_eq!(store.get("b1").unwrap().status, BookingStatus::Rejected);
    }

    #[test]
    fn complete_requires_accepted() {
        let store = store();
        assert!(store.complete("b1").is_err());
        assert_eq!(store.get("b1").unwrap().status, BookingStatus::Pending);
        assert_eq!(store.complete("b2").unwrap().status, BookingStatus::Completed);
        assert!(store.reject("b2").is_err());
    }

    #[test]
    fn unknown_booking_is_not_found() {
        assert!(matches!(store().accept("nope"), Err(BookingError::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn rating_restricted_to_completed() {
        let store = store();
        assert!(matches!(
            store.rate_by_user("b2", 5),
            Err(BookingError::Transition(TransitionError::RatingNotAllowed(
                BookingStatus::Accepted
            )))
        ));
        assert!(store.get("b2").unwrap().rating_by_user.is_none());

        store.complete("b2").unwrap();
        let rated = store.rate_by_user("b2", 5).unwrap();
        assert_eq!(rated.rating_by_user.map(Stars::get), Some(5));
        assert!(matches!(
            store.rate_by_worker("b2", 0),
            Err(BookingError::Transition(TransitionError::InvalidRating(0)))
        ));
    }

    #[test]
    fn lenient_policy_allows_rating_any_time() {
        let store = BookingStore::with_bookings(RatingPolicy::AnyStatus, demo_bookings());
        assert_eq!(
            store.rate_by_worker("b1", 2).unwrap().rating_by_worker.map(Stars::get),
            Some(2)
        );
    }

    #[test]
    fn worker_views_partition_the_workers_bookings() {
        let store = store();
        let fresh = store
            .create(NewBooking {
                customer_id: "user-9".into(),
                worker_id: "worker-1".into(),
                ..Default::default()
            })
            .unwrap();
        let extra = store
            .create(NewBooking {
                customer_id: "user-9".into(),
                worker_id: "worker-1".into(),
                ..Default::default()
            })
            .unwrap();
        store.reject(&extra.id).unwrap();
        store.complete("b3").unwrap();

        let pending: HashSet<String> = store
            .pending_requests_for_worker("worker-1")
            .into_iter()
            .map(|b| b.id)
            .collect();
        let active: HashSet<String> = store
            .active_or_done_for_worker("worker-1")
            .into_iter()
            .map(|b| b.id)
            .collect();

        assert!(pending.is_disjoint(&active));
        assert_eq!(pending, HashSet::from(["b1".to_string(), fresh.id.clone()]));
        assert_eq!(active, HashSet::from(["b2".to_string(), "b3".to_string()]));
        // rejected bookings appear in neither view
        assert!(!pending.contains(&extra.id) && !active.contains(&extra.id));
    }

    #[test]
    fn customer_view_keeps_insertion_order() {
        let ids: Vec<String> = store()
            .bookings_for_customer("user-1")
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn demo_seed_carries_job_details() {
        let seed = demo_bookings();
        assert_eq!(seed[0].photos.len(), 2);
        assert_eq!(seed[0].alternate_contact_name, "Ramesh");
        assert_eq!(seed[1].coupon_code, "");
        assert_eq!(seed[1].language_pref, "HI");
        assert_eq!(seed[2].expected_duration_mins, Some(120));
        assert!(!seed[2].consent_to_share_phone);
        assert_eq!(seed[2].service_location_type, ServiceLocationType::Office);
        assert!(seed.iter().all(|b| b.geo.lat.is_some() && b.terms_accepted_at.is_some()));
    }

    #[test]
    fn created_bookings_start_pending() {
        let store = BookingStore::new(RatingPolicy::default());
        assert_eq!(store.len(), 0);
        let booking = store
            .create(NewBooking {
                customer_id: "user-1".into(),
                worker_id: "worker-2".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(store.len(), 1);
        assert_eq!(store.bookings_for_customer("user-1")[0].id, booking.id);
    }
}
