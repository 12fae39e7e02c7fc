use crate::logging;
use crate::net::buffer::Buffer;
use crate::net::shared::{SessionError, SessionResult, Transport};
use crate::net::wire;
use std::time::Duration;

const READ_BUF_SIZE: usize = 1024;

/// Framed-message channel over a single client connection.
///
/// Reading yields one sentinel-terminated message at a time, policing the
/// per-message length ceiling in-stream, and transparently absorbs the
/// recharge interlude: the caller never observes the RECHARGING/FULL
/// POWER pair, only the deadline swings it causes. Writing pushes
/// complete command strings straight to the transport.
pub struct Channel<T: Transport> {
    transport: T,
    read_buffer: Buffer,
    recharging: bool,
    log: logging::Logger,
}

impl<T: Transport> Channel<T> {
    /// Initializes a channel over a freshly accepted transport.
    #[inline]
    pub fn new<'a, L: Into<Option<&'a logging::Logger>>>(transport: T, log: L) -> Channel<T> {
        let channel_log = match log.into() {
            Some(log) => log.new(logging::o!()),
            _ => logging::Logger::root(logging::Discard, logging::o!()),
        };

        Channel {
            transport,
            read_buffer: Buffer::new(READ_BUF_SIZE),
            recharging: false,
            log: channel_log,
        }
    }

    /// Arms the read deadline on the underlying transport.
    #[inline]
    pub fn set_deadline(&mut self, deadline: Duration) -> SessionResult<()> {
        self.transport
            .set_read_deadline(Some(deadline))
            .map_err(Into::into)
    }

    /// Writes one complete server message to the transport.
    pub fn send(&mut self, message: &[u8]) -> SessionResult<()> {
        logging::trace!(self.log, "sending message";
                        "context" => "send",
                        "message" => ?message);

        self.transport.write_all(message).map_err(Into::into)
    }

    /// Reads the next protocol message, up to `ceiling` on-wire bytes.
    ///
    /// Any read may be pre-empted by the recharge sub-dialogue: on
    /// RECHARGING the deadline is raised and the matching FULL POWER is
    /// awaited, after which the read restarts with the original ceiling.
    /// FULL POWER outside an interlude, or anything other than FULL POWER
    /// inside one, is a logic failure.
    pub fn read_message(&mut self, ceiling: usize) -> SessionResult<Vec<u8>> {
        let frame = self.read_frame(ceiling)?;

        // A recharge interlude may have raised the deadline; every framed
        // message drops it back to the normal window.
        self.transport
            .set_read_deadline(Some(wire::READ_DEADLINE))?;

        if !self.recharging && frame.as_slice() == wire::CLIENT_FULL_POWER {
            logging::debug!(self.log, "full power without prior recharging";
                            "context" => "recharge");
            return Err(SessionError::Logic);
        }

        if frame.as_slice() == wire::CLIENT_RECHARGING {
            logging::debug!(self.log, "recharge interlude started"; "context" => "recharge");

            self.transport
                .set_read_deadline(Some(wire::RECHARGE_DEADLINE))?;
            self.recharging = true;

            let ack = self.read_message(wire::CEILING_RECHARGE)?;

            if ack.as_slice() != wire::CLIENT_FULL_POWER {
                logging::debug!(self.log, "expected full power to end the interlude";
                                "context" => "recharge",
                                "message" => ?ack);
                return Err(SessionError::Logic);
            }

            self.transport
                .set_read_deadline(Some(wire::READ_DEADLINE))?;
            self.recharging = false;

            logging::debug!(self.log, "recharge interlude complete"; "context" => "recharge");

            return self.read_message(ceiling);
        }

        Ok(frame)
    }

    /// Frames one raw message off the buffer, refilling the buffer from
    /// the transport whenever it runs dry.
    ///
    /// The message is complete once it ends with the sentinel. The length
    /// check happens in-stream so a non-compliant client cannot feed the
    /// server indefinitely; the cap never drops below the recharge
    /// ceiling, since the interlude may pre-empt reads with a smaller
    /// natural ceiling.
    fn read_frame(&mut self, ceiling: usize) -> SessionResult<Vec<u8>> {
        let cap = ceiling.max(wire::CEILING_RECHARGE);
        let mut frame = Vec::with_capacity(cap);

        loop {
            match self.read_buffer.pop() {
                Some(byte) => {
                    frame.push(byte);

                    if frame.ends_with(wire::SENTINEL) {
                        break;
                    }
                    if frame.len() == cap {
                        break;
                    }
                }
                None => {
                    let received = self.read_buffer.ingress(&mut self.transport)?;

                    // EOF before the sentinel is indistinguishable from a
                    // client that stopped talking: a timeout-class failure.
                    if received == 0 {
                        logging::debug!(self.log, "connection closed mid message";
                                        "context" => "read_frame",
                                        "partial" => frame.len());
                        return Err(SessionError::Timeout);
                    }
                }
            }
        }

        if !frame.ends_with(wire::SENTINEL) {
            logging::debug!(self.log, "length cap hit without sentinel";
                            "context" => "read_frame",
                            "cap" => cap);
            return Err(SessionError::Syntax);
        }

        logging::trace!(self.log, "message framed";
                        "context" => "read_frame",
                        "message" => ?frame);

        Ok(frame)
    }
}
