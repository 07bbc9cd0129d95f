//! Transit network data collaborators.
//!
//! The planner only needs three read operations from the network: the stop
//! sequence of a route, the walking correspondences of a stop, and the
//! published shape of a route. `NetworkProvider` is that seam; this module
//! provides an HTTP implementation, an in-memory one, and a dispatcher the
//! server binary can choose between at startup.

mod client;
mod dto;
mod error;
mod provider;
mod source;
mod static_network;

pub use client::{NetworkClient, NetworkConfig};
pub use dto::{CorrespondenceDto, LineDto, ModeCode, ShapePointDto, StopDto};
pub use error::NetworkError;
pub use provider::NetworkProvider;
pub use source::NetworkSource;
pub use static_network::StaticNetwork;
