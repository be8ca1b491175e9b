//! Request authorization pipeline.
//!
//! Every route is wrapped in an ordered chain of stages described by the
//! [`Stage`] enum and assembled by [`compose`]. A stage either passes the
//! request to the next one or short-circuits with an error response; the
//! handler only ever sees fully vetted requests.
//!
//! - `pipeline` - the stage vocabulary and composition
//! - `stages` - logging, body-size and authentication stages
//! - `gates` - clearance and ownership authorization gates

mod gates;
mod pipeline;
mod stages;

pub use gates::{AuthenticatedUser, OwnershipKind};
pub use pipeline::{Stage, compose};
