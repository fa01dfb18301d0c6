//! Location capability contract and event channel.
//!
//! # Responsibility
//! - Describe the device location subsystem the catalog consumes.
//! - Carry position and reverse-geocode results back to the catalog's own
//!   thread as `LocationEvent`s.
//!
//! # Invariants
//! - Capability callbacks never touch catalog state directly; they only post
//!   events into a `LocationSink`.
//! - Posting into a sink whose catalog was dropped is silently ignored.

use crate::model::coordinate::Coordinate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Failure reported by the location subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The user declined location access.
    PermissionDenied,
    /// Updates could not be started or were interrupted.
    Unavailable(String),
    /// Reverse geocoding failed for one coordinate.
    Geocode(String),
}

impl Display for LocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "location permission denied"),
            Self::Unavailable(details) => write!(f, "location unavailable: {details}"),
            Self::Geocode(details) => write!(f, "reverse geocoding failed: {details}"),
        }
    }
}

impl Error for LocationError {}

/// Message delivered from the location subsystem to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// A new device position.
    Position(Coordinate),
    /// Completion of a reverse-geocode lookup for `coordinate`.
    Address {
        coordinate: Coordinate,
        result: Result<String, LocationError>,
    },
    /// The update stream reported an error.
    Failed(LocationError),
}

/// Cloneable, thread-safe handle for posting location events.
#[derive(Debug, Clone)]
pub struct LocationSink {
    tx: Sender<LocationEvent>,
}

impl LocationSink {
    /// Posts a position update.
    pub fn position(&self, coordinate: Coordinate) {
        self.post(LocationEvent::Position(coordinate));
    }

    /// Posts a stream failure.
    pub fn failed(&self, error: LocationError) {
        self.post(LocationEvent::Failed(error));
    }

    /// Posts any event; returns `false` when the catalog is gone.
    pub fn post(&self, event: LocationEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// One-shot completion handle for a reverse-geocode request.
#[derive(Debug)]
pub struct GeocodeReply {
    coordinate: Coordinate,
    sink: LocationSink,
}

impl GeocodeReply {
    pub(crate) fn new(coordinate: Coordinate, sink: LocationSink) -> Self {
        Self { coordinate, sink }
    }

    /// Coordinate the lookup was requested for.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Delivers the lookup result back to the catalog.
    pub fn complete(self, result: Result<String, LocationError>) {
        self.sink.post(LocationEvent::Address {
            coordinate: self.coordinate,
            result,
        });
    }
}

/// Device location subsystem consumed by the catalog.
///
/// Implementations may invoke the sink and reply handles from any thread,
/// at any later time.
pub trait LocationCapability: Send + Sync {
    /// Asks the user for location access.
    fn request_permission(&self) -> Result<(), LocationError>;

    /// Starts a position stream posting into `sink` for the catalog lifetime.
    fn start_updates(&self, sink: LocationSink) -> Result<(), LocationError>;

    /// Starts a reverse-geocode lookup; must not block the caller.
    fn reverse_geocode(&self, coordinate: Coordinate, reply: GeocodeReply);
}

/// Creates a connected sink/receiver pair.
pub fn location_channel() -> (LocationSink, Receiver<LocationEvent>) {
    let (tx, rx) = channel();
    (LocationSink { tx }, rx)
}
