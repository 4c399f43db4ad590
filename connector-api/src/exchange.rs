//! Glue between typed requests and the UDP transport

use hub_transport::{ReplyMode, SocketFactory, UdpTransport};
use tracing::debug;

use crate::device::HubEndpoint;
use crate::error::Result;
use crate::request::Request;
use crate::response::{self, Response};

/// Send `request` and keep the replies `narrow` accepts.
///
/// Replies of another kind are treated like unparseable datagrams: dropped
/// without ending the receive loop.
pub(crate) fn exchange<F, R>(
    transport: &UdpTransport<F>,
    request: &Request,
    endpoint: HubEndpoint,
    mode: ReplyMode,
    narrow: fn(Response) -> Option<R>,
) -> Result<Vec<R>>
where
    F: SocketFactory,
{
    let payload = request.to_bytes()?;
    debug!(
        msg_type = request.msg_type(),
        msg_id = %request.msg_id(),
        %endpoint,
        "sending request"
    );

    let replies = transport.send(&payload, endpoint.socket_addr(), mode, |bytes| {
        match response::parse(bytes) {
            Ok(response) => {
                let kind = response.msg_type();
                let reply = narrow(response);
                if reply.is_none() {
                    debug!(%endpoint, kind, "ignoring reply of unexpected kind");
                }
                reply
            }
            Err(e) => {
                debug!(%endpoint, error = %e, "ignoring datagram");
                None
            }
        }
    })?;

    Ok(replies)
}
