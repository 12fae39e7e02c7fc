//! Per-connection session driver: the authentication handshake, the hand
//! off to the navigator, and the single outcome report that closes every
//! session.

use crate::auth;
use crate::logging;
use crate::nav::Navigator;
use crate::net::channel::Channel;
use crate::net::shared::{SessionError, SessionResult, Transport};
use crate::net::wire;
use crate::robot::Robot;

/// One client session. Owns the connection for its whole lifetime; the
/// transport is released when the session is dropped, on every exit path.
pub struct Session<T: Transport> {
    channel: Channel<T>,
    log: logging::Logger,
}

impl<T: Transport> Session<T> {
    pub fn new<'a, L: Into<Option<&'a logging::Logger>>>(transport: T, log: L) -> Session<T> {
        let session_log = match log.into() {
            Some(log) => log.new(logging::o!()),
            _ => logging::Logger::root(logging::Discard, logging::o!()),
        };

        let channel = Channel::new(transport, &session_log);

        Session {
            channel,
            log: session_log,
        }
    }

    /// Runs the session to completion: handshake, navigation, then the
    /// outcome report. Failures never propagate past this point; a broken
    /// session only takes down its own connection.
    pub fn run(mut self) {
        let result = self.drive();
        self.report(result);
    }

    fn drive(&mut self) -> SessionResult<()> {
        self.channel.set_deadline(wire::READ_DEADLINE)?;

        let robot = self.authenticate()?;

        logging::info!(self.log, "robot authenticated";
                       "context" => "handshake",
                       "username" => %robot.username,
                       "key_id" => robot.key_id);

        Navigator::new(&mut self.channel, robot, &self.log).run()
    }

    /// The fixed authentication sequence. Each read carries its own
    /// ceiling; the recharge interlude may interpose at any of them.
    fn authenticate(&mut self) -> SessionResult<Robot> {
        let frame = self.channel.read_message(wire::CEILING_USERNAME)?;
        let raw_username = wire::content(&frame);
        // The hash covers the bytes as they arrived; the lossy rendering
        // is for logs only.
        let hash = auth::username_hash(raw_username);
        let username = String::from_utf8_lossy(raw_username).into_owned();

        self.channel.send(wire::SERVER_KEY_REQUEST)?;

        let frame = self.channel.read_message(wire::CEILING_KEY_ID)?;
        let key_id = wire::parse_key_id(&frame)?;
        let keys = auth::key_pair(key_id).ok_or(SessionError::KeyOutOfRange)?;

        self.channel
            .send(&wire::confirmation_frame(auth::server_confirmation(hash, keys)))?;

        let frame = self.channel.read_message(wire::CEILING_CONFIRMATION)?;
        let confirmation = wire::parse_confirmation(&frame)?;

        if confirmation != u32::from(auth::client_confirmation(hash, keys)) {
            return Err(SessionError::LoginFailed);
        }

        self.channel.send(wire::SERVER_OK)?;

        Ok(Robot::new(username, key_id as u8))
    }

    /// Emits the wire response for the failure class, if it has one, and
    /// logs the outcome. Runs exactly once per session, so a session never
    /// sends more than one error response.
    fn report(&mut self, result: SessionResult<()>) {
        match result {
            Ok(()) => {
                logging::info!(self.log, "session complete"; "context" => "report");
            }
            Err(err) => {
                if let Some(response) = err.response() {
                    if let Err(send_err) = self.channel.send(response) {
                        logging::debug!(self.log, "error response dropped";
                                        "context" => "report",
                                        "error" => ?send_err);
                    }
                }

                logging::warn!(self.log, "session failed";
                               "context" => "report",
                               "error" => ?err);
            }
        }
    }
}
