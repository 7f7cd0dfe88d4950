pub mod booking;
pub mod cli;
pub mod error;
pub mod event;
pub mod server;
pub mod slug;
pub mod store;

pub use booking::{Booking, BookingDraft};
pub use error::Error;
pub use event::{Event, EventDraft, EventPatch, Mode};
pub use store::Store;
