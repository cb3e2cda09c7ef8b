//! A fake channel for exercising gRPC client code in unit tests.
//!
//! [`FakeChannel`] offers the same four call shapes a real channel does
//! (unary, server streaming, client streaming and bidirectional
//! streaming) but performs no network I/O at all. A test preloads one
//! fake response per expected call, invokes the client code under test,
//! and then drives the response side by hand, making the whole exchange
//! deterministic.
//!
//! Fake responses are queued per call path and consumed in registration
//! order, so the *n*-th call made against a path is always served by the
//! *n*-th response registered for it. Making a call against a path with
//! nothing registered is not an error at the call site; the returned call
//! object reports [`Status::unavailable`] when it is driven, which lets
//! tests assert on the failure through the ordinary response path.
//!
//! [`Status::unavailable`]: tonic::Status::unavailable
//!
//! # Example
//!
//! ```
//! use tonic_fake::{CallOptions, FakeChannel, FakeRequestPart};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut channel = FakeChannel::new();
//!
//!     // Preload a response for the path the client will hit. The closure
//!     // observes every part of the outbound request.
//!     let fake = channel.enqueue_unary_response(
//!         "/helloworld.Greeter/SayHello",
//!         |part: FakeRequestPart<String>| {
//!             if let FakeRequestPart::Message(name) = part {
//!                 assert_eq!(name, "tonic");
//!             }
//!         },
//!     );
//!
//!     let call = channel.unary::<String, String>(
//!         "/helloworld.Greeter/SayHello",
//!         "tonic".to_owned(),
//!         CallOptions::new(),
//!     );
//!
//!     fake.send_message("Hello tonic!".to_owned()).unwrap();
//!     assert_eq!(call.response().await.unwrap(), "Hello tonic!");
//! }
//! ```

#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]

pub mod call;
pub mod channel;
pub mod options;
pub mod request;
pub mod response;

mod registry;

pub use call::{
    BidirectionalStreamingCall, ClientStreamingCall, ServerStreamingCall, UnaryCall,
};
pub use channel::FakeChannel;
pub use options::{CallOptions, RequestIdProvider};
pub use request::{FakeRequestPart, RequestHead};
pub use response::{FakeStreamingResponse, FakeUnaryResponse};
