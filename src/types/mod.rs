//! Type definitions for the gateway
//!
//! Card and status data from the upstream, request-scoped route captures,
//! and response documents.

pub mod card;
pub mod request;
pub mod response;
pub mod status;

pub use card::{BindingValue, Card, Player, Poll, PollChoice, PollEnd, TweetCard};
pub use request::{Flags, StatusParams};
pub use response::OEmbedResponse;
pub use status::{Author, Media, MediaKind, Status};
