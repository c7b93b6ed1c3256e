//! # Router & Dispatch
//!
//! Protocol-agnostic request pipeline: request descriptor assembly, route
//! lookup, the handler contract and its single-use completion handle.

pub mod front;
pub mod handler;
pub mod request;
pub mod responder;
pub mod router;

pub use front::{dispatch, dispatch_http};
pub use handler::{Handler, NotFoundHandler, PingHandler};
pub use request::RequestDescriptor;
pub use responder::{Reply, Responder};
pub use router::{RouteTable, RouteTableBuilder};
