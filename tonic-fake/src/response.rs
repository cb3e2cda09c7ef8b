//! Fake responses: what tests register, and the handles used to drive
//! them.
//!
//! Registering a fake splits it into two halves. The registry-side half
//! carries the request callback and the receiving end of a response
//! channel; it sits in the channel's queue until a call dequeues it. The
//! test-side handle owns the sending end and is how the test delivers
//! the canned response once the call is in flight.

use std::fmt;

use tokio::sync::{mpsc, oneshot};
use tonic::Status;

use crate::request::FakeRequestPart;

/// Callback observing each inbound request part for one fake call.
pub(crate) type RequestCallback<Req> = Box<dyn FnMut(FakeRequestPart<Req>) + Send>;

/// Registry-side half of a unary-shaped fake response.
pub(crate) struct UnaryResponseHandler<Req, Resp> {
    pub(crate) on_request: RequestCallback<Req>,
    pub(crate) response_rx: oneshot::Receiver<Result<Resp, Status>>,
}

/// Registry-side half of a stream-shaped fake response.
pub(crate) struct StreamingResponseHandler<Req, Resp> {
    pub(crate) on_request: RequestCallback<Req>,
    pub(crate) response_rx: mpsc::UnboundedReceiver<StreamPart<Resp>>,
}

/// One part of a fake response stream. `End(None)` is a clean end of
/// stream, `End(Some(status))` a failing one.
pub(crate) enum StreamPart<Resp> {
    Message(Resp),
    End(Option<Status>),
}

pub(crate) fn unary_pair<Req, Resp>(
    on_request: RequestCallback<Req>,
) -> (UnaryResponseHandler<Req, Resp>, FakeUnaryResponse<Resp>) {
    let (tx, rx) = oneshot::channel();
    (
        UnaryResponseHandler {
            on_request,
            response_rx: rx,
        },
        FakeUnaryResponse { tx },
    )
}

pub(crate) fn streaming_pair<Req, Resp>(
    on_request: RequestCallback<Req>,
) -> (StreamingResponseHandler<Req, Resp>, FakeStreamingResponse<Resp>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        StreamingResponseHandler {
            on_request,
            response_rx: rx,
        },
        FakeStreamingResponse { tx },
    )
}

/// Handle for driving a unary-shaped fake response.
///
/// Returned by [`FakeChannel::enqueue_unary_response`]. The call served
/// by this fake stays pending until exactly one of the two methods below
/// is used.
///
/// [`FakeChannel::enqueue_unary_response`]: crate::FakeChannel::enqueue_unary_response
pub struct FakeUnaryResponse<Resp> {
    tx: oneshot::Sender<Result<Resp, Status>>,
}

impl<Resp> FakeUnaryResponse<Resp> {
    /// Completes the call with `message`.
    pub fn send_message(self, message: Resp) -> Result<(), Status> {
        self.tx.send(Ok(message)).map_err(|_| dropped_call())
    }

    /// Fails the call with `status`.
    pub fn send_error(self, status: Status) -> Result<(), Status> {
        self.tx.send(Err(status)).map_err(|_| dropped_call())
    }
}

impl<Resp> fmt::Debug for FakeUnaryResponse<Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeUnaryResponse").finish()
    }
}

/// Handle for driving a stream-shaped fake response.
///
/// Returned by [`FakeChannel::enqueue_streaming_response`]. Messages are
/// buffered until the call served by this fake drains them; the call's
/// terminal outcome is whichever of [`send_end`] or [`send_error`] closes
/// the stream.
///
/// [`FakeChannel::enqueue_streaming_response`]: crate::FakeChannel::enqueue_streaming_response
/// [`send_end`]: FakeStreamingResponse::send_end
/// [`send_error`]: FakeStreamingResponse::send_error
pub struct FakeStreamingResponse<Resp> {
    tx: mpsc::UnboundedSender<StreamPart<Resp>>,
}

impl<Resp> FakeStreamingResponse<Resp> {
    /// Sends one response message.
    pub fn send_message(&self, message: Resp) -> Result<(), Status> {
        self.tx
            .send(StreamPart::Message(message))
            .map_err(|_| dropped_call())
    }

    /// Ends the response stream; the call completes successfully.
    pub fn send_end(self) -> Result<(), Status> {
        self.tx.send(StreamPart::End(None)).map_err(|_| dropped_call())
    }

    /// Ends the response stream; the call fails with `status`.
    pub fn send_error(self, status: Status) -> Result<(), Status> {
        self.tx
            .send(StreamPart::End(Some(status)))
            .map_err(|_| dropped_call())
    }
}

impl<Resp> fmt::Debug for FakeStreamingResponse<Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeStreamingResponse").finish()
    }
}

fn dropped_call() -> Status {
    Status::cancelled("fake call was dropped before the response was delivered")
}
