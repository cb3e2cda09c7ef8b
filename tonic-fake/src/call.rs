//! Call-shape objects returned by the fake channel.
//!
//! One type per RPC interaction pattern. Each is built around the fake
//! response dequeued for its path, or around the status reported when
//! none was registered; that status stays inside the object and surfaces
//! when the call is driven, so the call site sees the same return type
//! either way.

use std::fmt;

use tokio::sync::{mpsc, oneshot};
use tonic::Status;

use crate::request::{FakeRequestPart, RequestHead};
use crate::response::{
    RequestCallback, StreamPart, StreamingResponseHandler, UnaryResponseHandler,
};

/// Callback receiving each response message of a streaming-response call.
pub(crate) type ResponseCallback<Resp> = Box<dyn FnMut(Resp) + Send>;

/// A unary call: one request in, one response out.
///
/// The whole request (head, message, end) is pushed into the fake when
/// the call is created; only the response remains outstanding.
pub struct UnaryCall<Resp> {
    response: Result<oneshot::Receiver<Result<Resp, Status>>, Status>,
}

impl<Resp> UnaryCall<Resp> {
    pub(crate) fn new<Req>(
        handler: Result<UnaryResponseHandler<Req, Resp>, Status>,
        head: RequestHead,
        request: Req,
    ) -> Self {
        let response = handler.map(|mut handler| {
            send_single_request(&mut handler.on_request, head, request);
            handler.response_rx
        });
        UnaryCall { response }
    }

    /// Waits for the response.
    ///
    /// Resolves to an error when no fake response was registered for the
    /// call's path, or when the fake was dropped without responding.
    pub async fn response(self) -> Result<Resp, Status> {
        match self.response {
            Ok(response_rx) => response_rx.await.unwrap_or_else(|_| Err(dropped_fake())),
            Err(status) => Err(status),
        }
    }
}

impl<Resp> fmt::Debug for UnaryCall<Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryCall").finish()
    }
}

/// A server-streaming call: one request in, a stream of responses out.
pub struct ServerStreamingCall<Resp> {
    inner: Result<StreamingResponseState<Resp>, Status>,
}

impl<Resp> ServerStreamingCall<Resp> {
    pub(crate) fn new<Req>(
        handler: Result<StreamingResponseHandler<Req, Resp>, Status>,
        head: RequestHead,
        request: Req,
        on_response: ResponseCallback<Resp>,
    ) -> Self {
        let inner = handler.map(|mut handler| {
            send_single_request(&mut handler.on_request, head, request);
            StreamingResponseState {
                response_rx: handler.response_rx,
                on_response,
            }
        });
        ServerStreamingCall { inner }
    }

    /// Drives the response side to completion.
    ///
    /// Every message the fake has sent is handed to the response callback
    /// in send order before the terminal outcome is returned.
    pub async fn status(self) -> Result<(), Status> {
        self.inner?.drain().await
    }
}

impl<Resp> fmt::Debug for ServerStreamingCall<Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerStreamingCall").finish()
    }
}

/// A client-streaming call: a stream of requests in, one response out.
///
/// Only the head is pushed into the fake at creation; request messages
/// are sent explicitly, and each reaches the fake's request callback
/// synchronously.
pub struct ClientStreamingCall<Req, Resp> {
    inner: Result<ClientStreamingState<Req, Resp>, Status>,
}

struct ClientStreamingState<Req, Resp> {
    requests: RequestStream<Req>,
    response_rx: oneshot::Receiver<Result<Resp, Status>>,
}

impl<Req, Resp> ClientStreamingCall<Req, Resp> {
    pub(crate) fn new(
        handler: Result<UnaryResponseHandler<Req, Resp>, Status>,
        head: RequestHead,
    ) -> Self {
        let inner = handler.map(|handler| ClientStreamingState {
            requests: RequestStream::open(handler.on_request, head),
            response_rx: handler.response_rx,
        });
        ClientStreamingCall { inner }
    }

    /// Sends one request message.
    pub fn send_message(&mut self, message: Req) -> Result<(), Status> {
        match &mut self.inner {
            Ok(state) => state.requests.send(message),
            Err(status) => Err(status.clone()),
        }
    }

    /// Closes the request stream.
    pub fn send_end(&mut self) -> Result<(), Status> {
        match &mut self.inner {
            Ok(state) => state.requests.end(),
            Err(status) => Err(status.clone()),
        }
    }

    /// Waits for the response, as [`UnaryCall::response`] does.
    pub async fn response(self) -> Result<Resp, Status> {
        match self.inner {
            Ok(state) => state.response_rx.await.unwrap_or_else(|_| Err(dropped_fake())),
            Err(status) => Err(status),
        }
    }
}

impl<Req, Resp> fmt::Debug for ClientStreamingCall<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientStreamingCall").finish()
    }
}

/// A bidirectional-streaming call: request and response streams are both
/// open-ended.
pub struct BidirectionalStreamingCall<Req, Resp> {
    inner: Result<BidirectionalState<Req, Resp>, Status>,
}

struct BidirectionalState<Req, Resp> {
    requests: RequestStream<Req>,
    responses: StreamingResponseState<Resp>,
}

impl<Req, Resp> BidirectionalStreamingCall<Req, Resp> {
    pub(crate) fn new(
        handler: Result<StreamingResponseHandler<Req, Resp>, Status>,
        head: RequestHead,
        on_response: ResponseCallback<Resp>,
    ) -> Self {
        let inner = handler.map(|handler| BidirectionalState {
            requests: RequestStream::open(handler.on_request, head),
            responses: StreamingResponseState {
                response_rx: handler.response_rx,
                on_response,
            },
        });
        BidirectionalStreamingCall { inner }
    }

    /// Sends one request message.
    pub fn send_message(&mut self, message: Req) -> Result<(), Status> {
        match &mut self.inner {
            Ok(state) => state.requests.send(message),
            Err(status) => Err(status.clone()),
        }
    }

    /// Closes the request stream. The response stream is unaffected.
    pub fn send_end(&mut self) -> Result<(), Status> {
        match &mut self.inner {
            Ok(state) => state.requests.end(),
            Err(status) => Err(status.clone()),
        }
    }

    /// Drives the response side to completion, as
    /// [`ServerStreamingCall::status`] does.
    pub async fn status(self) -> Result<(), Status> {
        self.inner?.responses.drain().await
    }
}

impl<Req, Resp> fmt::Debug for BidirectionalStreamingCall<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BidirectionalStreamingCall").finish()
    }
}

/// The caller-driven half of a request stream. Sends after `end` are
/// rejected.
struct RequestStream<Req> {
    on_request: RequestCallback<Req>,
    ended: bool,
}

impl<Req> RequestStream<Req> {
    fn open(mut on_request: RequestCallback<Req>, head: RequestHead) -> Self {
        on_request(FakeRequestPart::Head(head));
        RequestStream {
            on_request,
            ended: false,
        }
    }

    fn send(&mut self, message: Req) -> Result<(), Status> {
        if self.ended {
            return Err(already_closed());
        }
        (self.on_request)(FakeRequestPart::Message(message));
        Ok(())
    }

    fn end(&mut self) -> Result<(), Status> {
        if self.ended {
            return Err(already_closed());
        }
        self.ended = true;
        (self.on_request)(FakeRequestPart::End);
        Ok(())
    }
}

struct StreamingResponseState<Resp> {
    response_rx: mpsc::UnboundedReceiver<StreamPart<Resp>>,
    on_response: ResponseCallback<Resp>,
}

impl<Resp> StreamingResponseState<Resp> {
    async fn drain(mut self) -> Result<(), Status> {
        while let Some(part) = self.response_rx.recv().await {
            match part {
                StreamPart::Message(message) => (self.on_response)(message),
                StreamPart::End(None) => return Ok(()),
                StreamPart::End(Some(status)) => return Err(status),
            }
        }
        Err(dropped_fake())
    }
}

fn send_single_request<Req>(on_request: &mut RequestCallback<Req>, head: RequestHead, request: Req) {
    on_request(FakeRequestPart::Head(head));
    on_request(FakeRequestPart::Message(request));
    on_request(FakeRequestPart::End);
}

fn dropped_fake() -> Status {
    Status::cancelled("fake response was dropped without completing the call")
}

fn already_closed() -> Status {
    Status::failed_precondition("request stream already closed")
}
