pub mod event;
pub mod profile;

pub use event::{DistanceBucket, Event, EventRow, NewEvent};
pub use profile::{Discount, Profile, WalletSummary};
