//! Steering of an authenticated robot to the grid origin. The navigator
//! owns the movement dialogue: it infers the initial heading from two
//! position reports, picks the desired heading from the current quadrant,
//! sidesteps obstacles, and fires the pickup exchange the moment a report
//! lands on the origin.

use crate::logging;
use crate::net::channel::Channel;
use crate::net::shared::{SessionResult, Transport};
use crate::net::wire;
use crate::robot::{Heading, Point, Robot};

/// Outcome of a single navigation step.
#[derive(Debug, Eq, PartialEq)]
enum Step {
    Forward,
    Goal,
}

/// Drives one robot, one command at a time, over the session's channel.
pub struct Navigator<'a, T: Transport> {
    channel: &'a mut Channel<T>,
    robot: Robot,
    log: logging::Logger,
}

impl<'a, T: Transport> Navigator<'a, T> {
    pub fn new(channel: &'a mut Channel<T>, robot: Robot, log: &logging::Logger) -> Navigator<'a, T> {
        let nav_log = log.new(logging::o!("robot" => robot.username.clone()));

        Navigator {
            channel,
            robot,
            log: nav_log,
        }
    }

    /// Steers the robot until the pickup exchange completes. Returns on
    /// delivery; any protocol failure aborts the whole session.
    pub fn run(mut self) -> SessionResult<()> {
        if self.acquire()? == Step::Goal {
            return Ok(());
        }

        loop {
            self.align()?;

            if self.advance()? == Step::Goal {
                return Ok(());
            }

            if self.robot.pos == self.robot.prev {
                logging::debug!(self.log, "obstacle hit";
                                "context" => "navigate",
                                "pos" => %self.robot.pos,
                                "heading" => %self.robot.heading);

                if self.evade()? == Step::Goal {
                    return Ok(());
                }
            }
        }
    }

    /// Infers the initial heading from two consecutive position reports,
    /// turning in place whenever the robot failed to move off its cell.
    /// The origin check fires eagerly on every report, including the very
    /// first.
    fn acquire(&mut self) -> SessionResult<Step> {
        while self.robot.heading == Heading::Unknown {
            self.robot.pos = self.move_cmd()?;

            if self.reached()? == Step::Goal {
                return Ok(Step::Goal);
            }

            if self.advance()? == Step::Goal {
                return Ok(Step::Goal);
            }

            self.robot.heading = Heading::between(self.robot.prev, self.robot.pos);

            if self.robot.heading == Heading::Unknown {
                self.turn_left()?;
            }
        }

        logging::debug!(self.log, "initial heading acquired";
                        "context" => "acquire",
                        "pos" => %self.robot.pos,
                        "heading" => %self.robot.heading);

        Ok(Step::Forward)
    }

    /// The quadrant rule: the single desired heading at a position. Turning
    /// left until it matches descends toward the origin on both axes.
    fn desired(pos: Point) -> Heading {
        if pos.x >= 0 && pos.y > 0 {
            Heading::Down
        } else if pos.x < 0 && pos.y >= 0 {
            Heading::Right
        } else if pos.x <= 0 && pos.y < 0 {
            Heading::Up
        } else {
            Heading::Left
        }
    }

    fn align(&mut self) -> SessionResult<()> {
        let desired = Self::desired(self.robot.pos);

        while self.robot.heading != desired {
            self.turn_left()?;
        }

        Ok(())
    }

    /// One step ahead: issue MOVE, shift the position pair, check the
    /// origin.
    fn advance(&mut self) -> SessionResult<Step> {
        let next = self.move_cmd()?;

        self.robot.prev = self.robot.pos;
        self.robot.pos = next;

        self.reached()
    }

    /// Sidesteps an obstacle: one cell laterally, original heading
    /// restored. The heading is tracked symbolically through the turn
    /// tables, never re-inferred from the evasion moves.
    fn evade(&mut self) -> SessionResult<Step> {
        self.turn_right()?;

        if self.advance()? == Step::Goal {
            return Ok(Step::Goal);
        }

        self.turn_left()?;

        Ok(Step::Forward)
    }

    /// Fires the pickup exchange once the robot reports the origin: the
    /// secret is requested and logged, the robot is logged out, and the
    /// session winds down.
    fn reached(&mut self) -> SessionResult<Step> {
        if !self.robot.pos.is_origin() {
            return Ok(Step::Forward);
        }

        self.channel.send(wire::SERVER_PICK_UP)?;
        let secret = self.channel.read_message(wire::CEILING_SECRET)?;

        logging::info!(self.log, "secret picked up";
                       "context" => "pickup",
                       "secret" => %String::from_utf8_lossy(wire::content(&secret)));

        self.channel.send(wire::SERVER_LOGOUT)?;

        Ok(Step::Goal)
    }

    fn move_cmd(&mut self) -> SessionResult<Point> {
        self.channel.send(wire::SERVER_MOVE)?;

        let reply = self.channel.read_message(wire::CEILING_CLIENT_OK)?;
        let (x, y) = wire::parse_client_ok(&reply)?;
        let pos = Point::new(x, y);

        logging::debug!(self.log, "position reported";
                        "context" => "move",
                        "pos" => %pos,
                        "heading" => %self.robot.heading);

        Ok(pos)
    }

    fn turn_left(&mut self) -> SessionResult<()> {
        self.channel.send(wire::SERVER_TURN_LEFT)?;

        let reply = self.channel.read_message(wire::CEILING_CLIENT_OK)?;
        wire::parse_client_ok(&reply)?;

        self.robot.heading = self.robot.heading.turn_left();

        logging::trace!(self.log, "turned left";
                        "context" => "turn",
                        "heading" => %self.robot.heading);

        Ok(())
    }

    fn turn_right(&mut self) -> SessionResult<()> {
        self.channel.send(wire::SERVER_TURN_RIGHT)?;

        let reply = self.channel.read_message(wire::CEILING_CLIENT_OK)?;
        wire::parse_client_ok(&reply)?;

        self.robot.heading = self.robot.heading.turn_right();

        logging::trace!(self.log, "turned right";
                        "context" => "turn",
                        "heading" => %self.robot.heading);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::shared::testing::MockStream;
    use crate::net::shared::SessionError;

    /// Runs the navigator over a scripted client, returning the result
    /// and everything the server wrote.
    fn pilot(replies: &[&[u8]]) -> (SessionResult<()>, Vec<u8>) {
        let incoming: Vec<u8> = replies.concat();
        let stream = MockStream::new(&incoming, 1024);
        let written = stream.written();
        let mut channel = Channel::new(stream, None);

        let robot = Robot::new("tester".to_string(), 0);
        let log = logging::Logger::root(logging::Discard, logging::o!());
        let result = Navigator::new(&mut channel, robot, &log).run();

        let bytes = written.borrow().clone();
        (result, bytes)
    }

    fn commands(sequence: &[&[u8]]) -> Vec<u8> {
        sequence.concat()
    }

    #[test]
    fn test_origin_on_first_report() {
        let (result, written) = pilot(&[b"OK 0 0\x07\x08", b"Secret note\x07\x08"]);

        assert_eq!(result, Ok(()));
        assert_eq!(
            written,
            commands(&[wire::SERVER_MOVE, wire::SERVER_PICK_UP, wire::SERVER_LOGOUT])
        );
    }

    #[test]
    fn test_origin_on_second_report() {
        let (result, written) = pilot(&[
            b"OK -1 0\x07\x08",
            b"OK 0 0\x07\x08",
            b"Secret note\x07\x08",
        ]);

        assert_eq!(result, Ok(()));
        assert_eq!(
            written,
            commands(&[
                wire::SERVER_MOVE,
                wire::SERVER_MOVE,
                wire::SERVER_PICK_UP,
                wire::SERVER_LOGOUT,
            ])
        );
    }

    #[test]
    fn test_quadrant_descent_with_obstacle() {
        // The robot starts below (0, 2) facing up, hits a wall on the way
        // down and sidesteps it, then descends to the origin.
        let (result, written) = pilot(&[
            b"OK 0 1\x07\x08",  // MOVE: first fix
            b"OK 0 2\x07\x08",  // MOVE: heading inferred UP
            b"OK 0 2\x07\x08",  // TURN LEFT ack (UP -> LEFT)
            b"OK 0 2\x07\x08",  // TURN LEFT ack (LEFT -> DOWN)
            b"OK 0 2\x07\x08",  // MOVE: blocked, no position change
            b"OK 0 2\x07\x08",  // TURN RIGHT ack (DOWN -> LEFT)
            b"OK -1 2\x07\x08", // MOVE: sidestep
            b"OK -1 2\x07\x08", // TURN LEFT ack (LEFT -> DOWN)
            b"OK -1 2\x07\x08", // TURN LEFT ack (DOWN -> RIGHT)
            b"OK 0 2\x07\x08",  // MOVE: back over the wall column
            b"OK 0 2\x07\x08",  // TURN LEFT ack (RIGHT -> UP)
            b"OK 0 2\x07\x08",  // TURN LEFT ack (UP -> LEFT)
            b"OK 0 2\x07\x08",  // TURN LEFT ack (LEFT -> DOWN)
            b"OK 0 1\x07\x08",  // MOVE
            b"OK 0 0\x07\x08",  // MOVE: origin
            b"Secret note\x07\x08",
        ]);

        assert_eq!(result, Ok(()));
        assert_eq!(
            written,
            commands(&[
                wire::SERVER_MOVE,
                wire::SERVER_MOVE,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_MOVE,
                wire::SERVER_TURN_RIGHT,
                wire::SERVER_MOVE,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_MOVE,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_MOVE,
                wire::SERVER_MOVE,
                wire::SERVER_PICK_UP,
                wire::SERVER_LOGOUT,
            ])
        );
    }

    #[test]
    fn test_blocked_at_startup_turns_and_retries() {
        // Two identical reports leave the heading unknown; the navigator
        // turns left and infers the heading from a fresh pair of moves.
        let (result, written) = pilot(&[
            b"OK 1 1\x07\x08",  // MOVE: first fix
            b"OK 1 1\x07\x08",  // MOVE: no movement, heading stays unknown
            b"OK 1 1\x07\x08",  // TURN LEFT ack
            b"OK 0 1\x07\x08",  // MOVE: first fix, take two
            b"OK -1 1\x07\x08", // MOVE: heading inferred LEFT
            b"OK -1 1\x07\x08", // TURN LEFT ack (LEFT -> DOWN)
            b"OK -1 1\x07\x08", // TURN LEFT ack (DOWN -> RIGHT)
            b"OK 0 1\x07\x08",  // MOVE
            b"OK 0 1\x07\x08",  // TURN LEFT ack (RIGHT -> UP)
            b"OK 0 1\x07\x08",  // TURN LEFT ack (UP -> LEFT)
            b"OK 0 1\x07\x08",  // TURN LEFT ack (LEFT -> DOWN)
            b"OK 0 0\x07\x08",  // MOVE: origin
            b"Secret note\x07\x08",
        ]);

        assert_eq!(result, Ok(()));
        assert_eq!(
            written,
            commands(&[
                wire::SERVER_MOVE,
                wire::SERVER_MOVE,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_MOVE,
                wire::SERVER_MOVE,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_MOVE,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_TURN_LEFT,
                wire::SERVER_MOVE,
                wire::SERVER_PICK_UP,
                wire::SERVER_LOGOUT,
            ])
        );
    }

    #[test]
    fn test_malformed_report_is_syntax() {
        let (result, written) = pilot(&[b"OK 1 a\x07\x08"]);

        assert_eq!(result, Err(SessionError::Syntax));
        assert_eq!(written, wire::SERVER_MOVE);
    }

    #[test]
    fn test_silent_client_times_out() {
        let (result, written) = pilot(&[]);

        assert_eq!(result, Err(SessionError::Timeout));
        assert_eq!(written, wire::SERVER_MOVE);
    }
}
