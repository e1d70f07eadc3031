pub mod filter;
pub mod points;
pub mod wallet;

pub use filter::{filter_events, filter_events_in, parse_day, Facets, FilterCriteria};
pub use points::{compute_points, points_for};
pub use wallet::WalletService;
