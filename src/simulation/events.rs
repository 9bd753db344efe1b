/*!
 * Event Table
 * The fixed set of legal transition kinds the driver samples from
 */

use crate::process::{Event, State};
use rand::Rng;

/// Legal transition kinds, sampled uniformly
pub const LEGAL_EVENTS: [Event; 12] = [
    Event::new(State::Hold, State::Ready),
    Event::new(State::Ready, State::Run),
    Event::new(State::Run, State::Blocked),
    Event::new(State::Blocked, State::Ready),
    Event::new(State::Run, State::SuspendUser),
    Event::new(State::Run, State::SuspendSystem),
    Event::new(State::Blocked, State::Done),      // System killed
    Event::new(State::SuspendUser, State::Done),  // User killed
    Event::new(State::SuspendUser, State::Ready),
    Event::new(State::SuspendSystem, State::Ready),
    Event::new(State::Run, State::Done),
    Event::new(State::Ready, State::Hold),
];

/// Whether the event appears in the legal table
pub fn is_legal(event: Event) -> bool {
    LEGAL_EVENTS.contains(&event)
}

/// Pick one legal event uniformly at random
pub fn sample_event<R: Rng + ?Sized>(rng: &mut R) -> Event {
    LEGAL_EVENTS[rng.gen_range(0..LEGAL_EVENTS.len())]
}
