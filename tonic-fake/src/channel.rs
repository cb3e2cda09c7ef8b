//! The fake channel façade.

use tonic::Status;

use crate::call::{
    BidirectionalStreamingCall, ClientStreamingCall, ServerStreamingCall, UnaryCall,
};
use crate::options::CallOptions;
use crate::registry::ResponseRegistry;
use crate::request::{FakeRequestPart, RequestHead};
use crate::response::{
    streaming_pair, unary_pair, FakeStreamingResponse, FakeUnaryResponse,
    StreamingResponseHandler, UnaryResponseHandler,
};

/// An in-process stand-in for a gRPC channel.
///
/// Tests preload fake responses with the `enqueue_*` methods and then
/// hand the channel to the code under test. Each call-shape method
/// consumes the oldest fake registered for its path and wires it into
/// the returned call object, together with a synthesized request head.
///
/// The channel is meant to be driven from a single logical thread of
/// control per test; it does no locking of its own.
#[derive(Debug, Default)]
pub struct FakeChannel {
    registry: ResponseRegistry,
}

impl FakeChannel {
    /// Creates a channel with no fake responses registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unary-shaped fake response for `path`.
    ///
    /// `on_request` observes each part of the request the served call
    /// sends: the head, the message, and the end of stream, in that
    /// order. The returned handle delivers the canned response once the
    /// call is in flight. Fakes registered for the same path serve calls
    /// in registration order.
    pub fn enqueue_unary_response<Req, Resp, F>(
        &mut self,
        path: &str,
        on_request: F,
    ) -> FakeUnaryResponse<Resp>
    where
        Req: Send + 'static,
        Resp: Send + 'static,
        F: FnMut(FakeRequestPart<Req>) + Send + 'static,
    {
        let (handler, response) = unary_pair(Box::new(on_request));
        self.registry.register(path, handler);
        response
    }

    /// Registers a stream-shaped fake response for `path`.
    ///
    /// Serves server-streaming and bidirectional calls the way
    /// [`enqueue_unary_response`] serves unary and client-streaming ones.
    ///
    /// [`enqueue_unary_response`]: FakeChannel::enqueue_unary_response
    pub fn enqueue_streaming_response<Req, Resp, F>(
        &mut self,
        path: &str,
        on_request: F,
    ) -> FakeStreamingResponse<Resp>
    where
        Req: Send + 'static,
        Resp: Send + 'static,
        F: FnMut(FakeRequestPart<Req>) + Send + 'static,
    {
        let (handler, response) = streaming_pair(Box::new(on_request));
        self.registry.register(path, handler);
        response
    }

    /// Returns true if at least one fake response is waiting for `path`.
    pub fn has_pending(&self, path: &str) -> bool {
        self.registry.has_pending(path)
    }

    /// Starts a unary call.
    ///
    /// The head, `request` and end of stream are pushed into the fake
    /// before this returns. With no fake registered for `path` the
    /// returned call reports [`Status::unavailable`] when driven.
    ///
    /// [`Status::unavailable`]: tonic::Status::unavailable
    pub fn unary<Req, Resp>(
        &mut self,
        path: &str,
        request: Req,
        options: CallOptions,
    ) -> UnaryCall<Resp>
    where
        Req: Send + 'static,
        Resp: Send + 'static,
    {
        let handler = self.dequeue::<UnaryResponseHandler<Req, Resp>>(path);
        let head = RequestHead::new(path, options);
        UnaryCall::new(handler, head, request)
    }

    /// Starts a server-streaming call.
    ///
    /// `on_response` receives each message the fake sends, in order,
    /// while the call is driven to its terminal status.
    pub fn server_streaming<Req, Resp, F>(
        &mut self,
        path: &str,
        request: Req,
        options: CallOptions,
        on_response: F,
    ) -> ServerStreamingCall<Resp>
    where
        Req: Send + 'static,
        Resp: Send + 'static,
        F: FnMut(Resp) + Send + 'static,
    {
        let handler = self.dequeue::<StreamingResponseHandler<Req, Resp>>(path);
        let head = RequestHead::new(path, options);
        ServerStreamingCall::new(handler, head, request, Box::new(on_response))
    }

    /// Starts a client-streaming call.
    ///
    /// Only the head is pushed into the fake here; request messages are
    /// sent through the returned call object.
    pub fn client_streaming<Req, Resp>(
        &mut self,
        path: &str,
        options: CallOptions,
    ) -> ClientStreamingCall<Req, Resp>
    where
        Req: Send + 'static,
        Resp: Send + 'static,
    {
        let handler = self.dequeue::<UnaryResponseHandler<Req, Resp>>(path);
        let head = RequestHead::new(path, options);
        ClientStreamingCall::new(handler, head)
    }

    /// Starts a bidirectional-streaming call.
    pub fn streaming<Req, Resp, F>(
        &mut self,
        path: &str,
        options: CallOptions,
        on_response: F,
    ) -> BidirectionalStreamingCall<Req, Resp>
    where
        Req: Send + 'static,
        Resp: Send + 'static,
        F: FnMut(Resp) + Send + 'static,
    {
        let handler = self.dequeue::<StreamingResponseHandler<Req, Resp>>(path);
        let head = RequestHead::new(path, options);
        BidirectionalStreamingCall::new(handler, head, Box::new(on_response))
    }

    /// Closes the channel.
    ///
    /// Nothing is held open by the fake, so this completes immediately.
    pub async fn close(&mut self) -> Result<(), Status> {
        Ok(())
    }

    fn dequeue<T: Send + 'static>(&mut self, path: &str) -> Result<T, Status> {
        self.registry.dequeue(path).ok_or_else(|| {
            tracing::debug!(path, "no fake response registered");
            Status::unavailable(format!("no fake response registered for path '{path}'"))
        })
    }
}
