use slice_deque::SliceDeque;
use std::io;

type ByteDeque = SliceDeque<u8>;

/// FIFO queue of bytes received from the connection but not yet consumed
/// by the framer. Data is appended at the tail in one chunk per `ingress`
/// call and read from the head one byte at a time; the framer only refills
/// the queue once it has been drained, so it never holds more than a
/// single chunk.
pub struct Buffer {
    data: ByteDeque,
    size: usize,
}

impl Buffer {
    #[inline]
    pub fn new(size: usize) -> Buffer {
        let mut data = ByteDeque::new();
        data.reserve(size);
        Buffer { data, size }
    }

    /// The number of bytes in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true in case the buffer is empty, false otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume one byte from the head.
    #[inline]
    pub fn pop(&mut self) -> Option<u8> {
        self.data.pop_front()
    }

    #[inline]
    pub fn clear(&mut self) {
        unsafe { self.data.move_head(self.len() as isize) };
    }

    /// Read one chunk of data from the supplied reader into the tail,
    /// returning the byte count. A count of zero means the reader reached
    /// end of stream.
    #[inline]
    pub fn ingress<R: io::Read>(&mut self, mut reader: R) -> io::Result<usize> {
        let free = self.size - self.data.len();

        unsafe {
            let read_count = reader.read(&mut self.data.tail_head_slice()[..free])?;
            self.data.move_tail(read_count as isize);
            Ok(read_count)
        }
    }
}
