//! Request-side values observed by registered fakes.

use crate::options::CallOptions;

/// The synthesized header sent ahead of the request body.
///
/// A fake head uses fixed placeholders for the parts a real transport
/// would negotiate: the scheme is always `http` and the host is always
/// `localhost`. The request id comes from the call options' id provider.
/// Heads are built per call and not retained once the call is set up.
#[derive(Clone, Debug)]
pub struct RequestHead {
    scheme: &'static str,
    path: String,
    host: &'static str,
    request_id: String,
    options: CallOptions,
}

impl RequestHead {
    pub(crate) fn new(path: &str, options: CallOptions) -> Self {
        let request_id = options.request_id_provider().request_id();
        RequestHead {
            scheme: "http",
            path: path.to_owned(),
            host: "localhost",
            request_id,
            options,
        }
    }

    /// The placeholder scheme, always `http`.
    pub fn scheme(&self) -> &str {
        self.scheme
    }

    /// The call path, e.g. `/helloworld.Greeter/SayHello`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The placeholder host, always `localhost`.
    pub fn host(&self) -> &str {
        self.host
    }

    /// The id produced for this call by the options' id provider.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The options the call was made with.
    pub fn options(&self) -> &CallOptions {
        &self.options
    }
}

/// One part of an outbound request, in the order a transport would put
/// it on the wire.
///
/// The request callback of a registered fake is invoked once per part:
/// the head first, then each message, then the end of the stream.
#[derive(Debug)]
pub enum FakeRequestPart<Req> {
    /// The synthesized request head, sent once before any message.
    Head(RequestHead),
    /// A single request message.
    Message(Req),
    /// End of the request stream.
    End,
}
