//! Booking domain types
//!
//! A booking is one service engagement between a customer and a worker.
//! Status moves PENDING -> ACCEPTED -> COMPLETED, or PENDING -> REJECTED;
//! COMPLETED and REJECTED are terminal. Priority is fixed at creation and
//! plays no part in the lifecycle.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub type BookingId = String;

// ============================================================================
// Status and Priority
// ============================================================================

/// Booking status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "Accepted")]
    Accepted,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Rejected")]
    Rejected,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Rejected)
    }

    /// Guarded transition. Any source state the transition does not start
    /// from is an error and the status stays as it was.
    pub fn apply(self, transition: Transition) -> Result<BookingStatus, TransitionError> {
        match (self, transition) {
            (BookingStatus::Pending, Transition::Accept) => Ok(BookingStatus::Accepted),
            (BookingStatus::Pending, Transition::Reject) => Ok(BookingStatus::Rejected),
            (BookingStatus::Accepted, Transition::Complete) => Ok(BookingStatus::Completed),
            (from, transition) => Err(TransitionError::Illegal { from, transition }),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "PENDING"),
            BookingStatus::Accepted => write!(f, "ACCEPTED"),
            BookingStatus::Completed => write!(f, "COMPLETED"),
            BookingStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "ACCEPTED" => Ok(BookingStatus::Accepted),
            "COMPLETED" => Ok(BookingStatus::Completed),
            "REJECTED" => Ok(BookingStatus::Rejected),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

/// Booking priority
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Urgent,
    #[default]
    Scheduled,
    Flexible,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Urgent => write!(f, "URGENT"),
            Priority::Scheduled => write!(f, "SCHEDULED"),
            Priority::Flexible => write!(f, "FLEXIBLE"),
        }
    }
}

/// Status-changing operations a worker can issue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Accept,
    Reject,
    Complete,
}

impl Transition {
    /// Transition that leads to `status`, as used by `PATCH .../status?status=`
    pub fn towards(status: BookingStatus) -> Option<Self> {
        match status {
            BookingStatus::Accepted => Some(Transition::Accept),
            BookingStatus::Rejected => Some(Transition::Reject),
            BookingStatus::Completed => Some(Transition::Complete),
            BookingStatus::Pending => None,
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Accept => write!(f, "accept"),
            Transition::Reject => write!(f, "reject"),
            Transition::Complete => write!(f, "complete"),
        }
    }
}

// ============================================================================
// Ratings
// ============================================================================

/// Star rating in 1..=5
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Stars(u8);

impl Stars {
    pub fn new(stars: i64) -> Result<Self, TransitionError> {
        match u8::try_from(stars) {
            Ok(n @ 1..=5) => Ok(Self(n)),
            _ => Err(TransitionError::InvalidRating(stars)),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = TransitionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Stars::new(value.into())
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.0
    }
}

/// Which party of a booking is acting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Customer,
    Worker,
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Party::Customer => write!(f, "customer"),
            Party::Worker => write!(f, "worker"),
        }
    }
}

/// When ratings may be written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingPolicy {
    #[default]
    CompletedOnly,
    AnyStatus,
}

impl RatingPolicy {
    pub fn allows(self, status: BookingStatus) -> bool {
        match self {
            RatingPolicy::CompletedOnly => status == BookingStatus::Completed,
            RatingPolicy::AnyStatus => true,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {transition} a booking that is {from}")]
    Illegal {
        from: BookingStatus,
        transition: Transition,
    },

    #[error("cannot rate a booking that is {0}")]
    RatingNotAllowed(BookingStatus),

    #[error("rating must be between 1 and 5 stars, got {0}")]
    InvalidRating(i64),
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking '{0}' not found")]
    NotFound(BookingId),

    #[error("scheduled end {end} is before scheduled start {start}")]
    InvalidSchedule {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

// ============================================================================
// Booking
// ============================================================================

/// Payment method
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Upi,
    Card,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialsProvidedBy {
    #[default]
    Customer,
    Worker,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceLocationType {
    #[default]
    Home,
    Office,
}

/// GST billing details
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Billing {
    #[serde(rename = "needGSTInvoice", deserialize_with = "null_as_default")]
    pub need_gst_invoice: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub gst_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
}

/// Job site coordinates, when known
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Geo {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

pub const DEFAULT_LANGUAGE: &str = "EN";

/// Booking record. Missing or null optional fields take their defaults when
/// read, and a 0 rating reads as "not rated", so partially filled backend
/// records still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    #[serde(alias = "userId")]
    pub customer_id: String,
    pub worker_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategory: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BookingStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    pub scheduled_start_time: Option<DateTime<Utc>>,
    pub scheduled_end_time: Option<DateTime<Utc>>,
    pub expected_duration_mins: Option<u32>,

    // Location
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub geo: Geo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_location_type: ServiceLocationType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_notes: String,

    // Job details
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub materials_provided_by: MaterialsProvidedBy,
    #[serde(default = "default_language", deserialize_with = "language_or_default")]
    pub language_pref: String,

    // Contact
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_phone: String,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub consent_to_share_phone: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternate_contact_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternate_contact_phone: String,

    // Payment
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimated_price: f64,
    pub final_price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coupon_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub billing: Billing,

    #[serde(default, deserialize_with = "unrated_as_none")]
    pub rating_by_user: Option<Stars>,
    #[serde(default, deserialize_with = "unrated_as_none")]
    pub rating_by_worker: Option<Stars>,
    pub terms_accepted_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_true() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

fn language_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_language))
}

/// 0 and null both mean the party has not rated yet
fn unrated_as_none<'de, D>(deserializer: D) -> Result<Option<Stars>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        None | Some(0) => Ok(None),
        Some(stars) => Stars::new(stars).map(Some).map_err(de::Error::custom),
    }
}

/// Input for a new booking; the booking starts out PENDING
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub customer_id: String,
    pub worker_id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub priority: Priority,
    pub scheduled_start_time: Option<DateTime<Utc>>,
    pub scheduled_end_time: Option<DateTime<Utc>>,
    pub expected_duration_mins: Option<u32>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub access_notes: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_phone: String,
    /// Blank means the default language
    #[serde(default)]
    pub language_pref: String,
    #[serde(default)]
    pub estimated_price: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub coupon_code: String,
    #[serde(default)]
    pub billing: Billing,
}

impl Booking {
    pub fn create(id: BookingId, input: NewBooking) -> Result<Self, BookingError> {
        if let (Some(start), Some(end)) = (input.scheduled_start_time, input.scheduled_end_time) {
            if end < start {
                return Err(BookingError::InvalidSchedule { start, end });
            }
        }

        let language_pref = match input.language_pref.trim() {
            "" => default_language(),
            lang => lang.to_string(),
        };

        let now = Utc::now();
        Ok(Self {
            id,
            customer_id: input.customer_id,
            worker_id: input.worker_id,
            category: input.category,
            subcategory: input.subcategory,
            status: BookingStatus::Pending,
            priority: input.priority,
            scheduled_start_time: input.scheduled_start_time,
            scheduled_end_time: input.scheduled_end_time,
            expected_duration_mins: input.expected_duration_mins,
            address: input.address,
            geo: Geo::default(),
            service_location_type: ServiceLocationType::default(),
            access_notes: input.access_notes,
            description: input.description,
            photos: Vec::new(),
            materials_provided_by: MaterialsProvidedBy::default(),
            language_pref,
            contact_phone: input.contact_phone,
            consent_to_share_phone: true,
            alternate_contact_name: String::new(),
            alternate_contact_phone: String::new(),
            estimated_price: input.estimated_price,
            final_price: None,
            payment_method: input.payment_method,
            coupon_code: input.coupon_code,
            billing: input.billing,
            rating_by_user: None,
            rating_by_worker: None,
            terms_accepted_at: Some(now),
            created_at: now,
            updated_at: now,
        })
    }

    /// "Category / Subcategory", skipping blank parts
    pub fn title(&self) -> String {
        let parts: Vec<&str> = [self.category.as_str(), self.subcategory.as_str()]
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            "Service Booking".to_string()
        } else {
            parts.join(" / ")
        }
    }

    /// Final price once settled, otherwise the estimate
    pub fn price(&self) -> f64 {
        self.final_price.unwrap_or(self.estimated_price)
    }

    pub fn apply(&mut self, transition: Transition) -> Result<(), TransitionError> {
        self.status = self.status.apply(transition)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a rating from one party. Does not change the status.
    pub fn rate(&mut self, by: Party, stars: Stars, policy: RatingPolicy) -> Result<(), TransitionError> {
        if !policy.allows(self.status) {
            return Err(TransitionError::RatingNotAllowed(self.status));
        }
        match by {
            Party::Customer => self.rating_by_user = Some(stars),
            Party::Worker => self.rating_by_worker = Some(stars),
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Actions a party's screen should offer. Advisory only: the guarded
    /// transitions are what enforce legality.
    pub fn available_actions(&self, party: Party, policy: RatingPolicy) -> Vec<BookingAction> {
        let mut actions = Vec::new();
        if party == Party::Worker {
            match self.status {
                BookingStatus::Pending => {
                    actions.push(BookingAction::Accept);
                    actions.push(BookingAction::Reject);
                }
                BookingStatus::Accepted => actions.push(BookingAction::Complete),
                BookingStatus::Completed | BookingStatus::Rejected => {}
            }
        }

        let already_rated = match party {
            Party::Customer => self.rating_by_user.is_some(),
            Party::Worker => self.rating_by_worker.is_some(),
        };
        if policy.allows(self.status) && !already_rated {
            actions.push(BookingAction::Rate);
        }
        actions
    }
}

/// Buttons a booking card may show
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Accept,
    Reject,
    Complete,
    Rate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Accepted,
        BookingStatus::Completed,
        BookingStatus::Rejected,
    ];
    const TRANSITIONS: [Transition; 3] = [Transition::Accept, Transition::Reject, Transition::Complete];

    #[test]
    fn accept_only_from_pending() {
        assert_eq!(
            BookingStatus::Pending.apply(Transition::Accept),
            Ok(BookingStatus::Accepted)
        );
        for from in [BookingStatus::Accepted, BookingStatus::Completed, BookingStatus::Rejected] {
            assert_eq!(
                from.apply(Transition::Accept),
                Err(TransitionError::Illegal {
                    from,
                    transition: Transition::Accept
                })
            );
        }
    }

    #[test]
    fn terminal_states_have_no_exit() {
        for from in ALL.into_iter().filter(|s| s.is_terminal()) {
            for t in TRANSITIONS {
                assert!(from.apply(t).is_err(), "{from} -> {t}");
            }
        }
    }

    #[test]
    fn nothing_returns_to_pending() {
        for from in ALL {
            for t in TRANSITIONS {
                assert_ne!(from.apply(t).ok(), Some(BookingStatus::Pending));
            }
        }
    }

    #[test]
    fn failed_transition_leaves_booking_untouched() {
        let mut booking = sample();
        booking.apply(Transition::Reject).unwrap();
        let before = booking.clone();
        assert!(booking.apply(Transition::Accept).is_err());
        assert_eq!(booking, before);
    }

    #[test]
    fn ratings_follow_policy() {
        let mut booking = sample();
        let five = Stars::new(5).unwrap();
        assert_eq!(
            booking.rate(Party::Customer, five, RatingPolicy::CompletedOnly),
            Err(TransitionError::RatingNotAllowed(BookingStatus::Pending))
        );
        booking.rate(Party::Customer, five, RatingPolicy::AnyStatus).unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);

        booking.apply(Transition::Accept).unwrap();
        booking.apply(Transition::Complete).unwrap();
        booking
            .rate(Party::Worker, Stars::new(3).unwrap(), RatingPolicy::CompletedOnly)
            .unwrap();
        assert_eq!(booking.rating_by_worker.map(Stars::get), Some(3));
        assert_eq!(booking.status, BookingStatus::Completed);
    }

    #[test]
    fn stars_are_bounded() {
        assert_eq!(Stars::new(0), Err(TransitionError::InvalidRating(0)));
        assert_eq!(Stars::new(6), Err(TransitionError::InvalidRating(6)));
        assert_eq!(Stars::new(300), Err(TransitionError::InvalidRating(300)));
        assert_eq!(Stars::new(-1), Err(TransitionError::InvalidRating(-1)));
        assert!(serde_json::from_value::<Stars>(json!(9)).is_err());
    }

    #[test]
    fn schedule_end_must_not_precede_start() {
        let start = "2025-10-12T15:00:00Z".parse().unwrap();
        let end = "2025-10-12T14:00:00Z".parse().unwrap();
        let input = NewBooking {
            customer_id: "user-1".into(),
            worker_id: "worker-1".into(),
            scheduled_start_time: Some(start),
            scheduled_end_time: Some(end),
            ..Default::default()
        };
        assert!(matches!(
            Booking::create("b9".into(), input),
            Err(BookingError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn worker_actions_follow_status() {
        let mut booking = sample();
        let policy = RatingPolicy::CompletedOnly;
        assert_eq!(
            booking.available_actions(Party::Worker, policy),
            vec![BookingAction::Accept, BookingAction::Reject]
        );
        assert!(booking.available_actions(Party::Customer, policy).is_empty());

        booking.apply(Transition::Accept).unwrap();
        assert_eq!(booking.available_actions(Party::Worker, policy), vec![BookingAction::Complete]);

        booking.apply(Transition::Complete).unwrap();
        assert_eq!(booking.available_actions(Party::Customer, policy), vec![BookingAction::Rate]);
        booking.rate(Party::Customer, Stars::new(4).unwrap(), policy).unwrap();
        assert!(booking.available_actions(Party::Customer, policy).is_empty());
    }

    #[test]
    fn sparse_records_fill_defaults() {
        let booking: Booking = serde_json::from_value(json!({
            "id": "b7",
            "customerId": "user-3",
            "workerId": "worker-2",
            "status": "Accepted",
            "estimatedPrice": 450.0
        }))
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Accepted);
        assert_eq!(booking.priority, Priority::Scheduled);
        assert_eq!(booking.payment_method, PaymentMethod::Cash);
        assert_eq!(booking.title(), "Service Booking");
        assert_eq!(booking.price(), 450.0);
        assert_eq!(booking.language_pref, "EN");
        assert!(booking.consent_to_share_phone);
        assert!(booking.photos.is_empty());
        assert!(booking.rating_by_user.is_none());
    }

    #[test]
    fn records_with_nulls_and_zero_ratings_normalize() {
        let booking: Booking = serde_json::from_value(json!({
            "id": "b2",
            "userId": "user-1",
            "workerId": "worker-1",
            "status": "Accepted",
            "priority": "URGENT",
            "address": "12, MG Road, Chennai",
            "contactPhone": "+91 90000 11111",
            "geo": {"lat": 13.0827, "lng": 80.2707},
            "photos": ["https://via.placeholder.com/120x90?text=Leak"],
            "paymentMethod": "CASH",
            "couponCode": null,
            "materialsProvidedBy": "WORKER",
            "expectedDurationMins": 90,
            "languagePref": "HI",
            "billing": {"needGSTInvoice": false},
            "consentToSharePhone": true,
            "alternateContactName": "",
            "serviceLocationType": "HOME",
            "termsAcceptedAt": "2025-10-11T09:00:00Z",
            "ratingByUser": 0,
            "ratingByWorker": 0
        }))
        .unwrap();

        assert_eq!(booking.customer_id, "user-1");
        assert_eq!(booking.status, BookingStatus::Accepted);
        assert_eq!(booking.coupon_code, "");
        assert_eq!(booking.expected_duration_mins, Some(90));
        assert_eq!(booking.geo.lat, Some(13.0827));
        assert_eq!(booking.language_pref, "HI");
        assert_eq!(booking.billing, Billing::default());
        assert!(booking.rating_by_user.is_none());
        assert!(booking.rating_by_worker.is_none());

        let booking: Booking = serde_json::from_value(json!({
            "id": "b8",
            "customerId": "user-4",
            "workerId": "worker-2",
            "status": null,
            "geo": null,
            "languagePref": "",
            "consentToSharePhone": null,
            "estimatedPrice": null,
            "ratingByWorker": 4
        }))
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.geo, Geo::default());
        assert_eq!(booking.language_pref, DEFAULT_LANGUAGE);
        assert!(booking.consent_to_share_phone);
        assert_eq!(booking.estimated_price, 0.0);
        assert_eq!(booking.rating_by_worker.map(Stars::get), Some(4));

        assert!(serde_json::from_value::<Booking>(json!({
            "id": "b9", "customerId": "u", "workerId": "w", "ratingByUser": 7
        }))
        .is_err());
    }

    #[test]
    fn title_joins_category_parts() {
        let mut booking = sample();
        booking.category = "Electrician".into();
        booking.subcategory = "Fan Repair".into();
        assert_eq!(booking.title(), "Electrician / Fan Repair");
        booking.subcategory.clear();
        assert_eq!(booking.title(), "Electrician");
    }

    #[test]
    fn status_parses_any_case() {
        assert_eq!("accepted".parse::<BookingStatus>(), Ok(BookingStatus::Accepted));
        assert_eq!("REJECTED".parse::<BookingStatus>(), Ok(BookingStatus::Rejected));
        assert!("cancelled".parse::<BookingStatus>().is_err());
    }

    fn sample() -> Booking {
        Booking::create(
            "b1".into(),
            NewBooking {
                customer_id: "user-1".into(),
                worker_id: "worker-1".into(),
                ..Default::default()
            },
        )
        .unwrap()
    }
}
