use crate::net::wire;
use std::io;
use std::net::TcpStream;
use std::time::Duration;

pub type SessionResult<T> = Result<T, SessionError>;

/// Terminal failure of a client session. The first four classes are
/// reported on the wire before the connection is dropped; `Timeout` and
/// `Io` close the connection silently.
#[derive(Debug, Eq, PartialEq)]
pub enum SessionError {
    LoginFailed,
    Syntax,
    Logic,
    KeyOutOfRange,
    Timeout,
    Io(io::ErrorKind),
}

impl SessionError {
    /// Wire response for the failure class, if it has one.
    #[inline]
    pub fn response(&self) -> Option<&'static [u8]> {
        match self {
            SessionError::LoginFailed => Some(wire::SERVER_LOGIN_FAILED),
            SessionError::Syntax => Some(wire::SERVER_SYNTAX_ERROR),
            SessionError::Logic => Some(wire::SERVER_LOGIC_ERROR),
            SessionError::KeyOutOfRange => Some(wire::SERVER_KEY_OUT_OF_RANGE),
            SessionError::Timeout | SessionError::Io(_) => None,
        }
    }
}

impl From<io::Error> for SessionError {
    #[inline]
    fn from(io_error: io::Error) -> Self {
        match io_error.kind() {
            // A blocking read deadline surfaces as either kind, platform
            // dependent.
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => SessionError::Timeout,
            kind => SessionError::Io(kind),
        }
    }
}

/// Byte stream with an adjustable read deadline. The seam that lets tests
/// drive the protocol over a scripted in-memory stream.
pub trait Transport: io::Read + io::Write {
    fn set_read_deadline(&mut self, deadline: Option<Duration>) -> io::Result<()>;
}

impl Transport for TcpStream {
    #[inline]
    fn set_read_deadline(&mut self, deadline: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(deadline)
    }
}
