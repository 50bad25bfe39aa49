//! Wire headers: the fixed 8-byte frame and the routing header that
//! extends it with an option stream.

pub mod fixed;
pub mod routing;

pub use fixed::FixedHeader;
pub use routing::RoutingHeader;
