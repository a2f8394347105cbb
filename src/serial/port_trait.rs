//! Trait abstraction for serial port operations to enable testing

use std::io;

/// Trait for blocking serial port I/O operations
pub trait SerialPortIO: Send {
    /// Write all data to the port
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush the output buffer
    fn flush(&mut self) -> io::Result<()>;

    /// Read exactly `buf.len()` bytes, failing with `TimedOut` if the port
    /// stays silent past its timeout
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Discard bytes received but not yet read
    fn clear_input(&mut self) -> io::Result<()>;
}

/// Wrapper around a system serial port that implements SerialPortIO
pub struct SystemSerialPort {
    port: Box<dyn tokio_serial::SerialPort>,
}

impl SystemSerialPort {
    pub fn new(port: Box<dyn tokio_serial::SerialPort>) -> Self {
        Self { port }
    }
}

impl SerialPortIO for SystemSerialPort {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        use std::io::Write;
        self.port.write_all(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        use std::io::Write;
        self.port.flush()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        use std::io::Read;
        self.port.read_exact(buf)
    }

    fn clear_input(&mut self) -> io::Result<()> {
        self.port
            .clear(tokio_serial::ClearBuffer::Input)
            .map_err(io::Error::from)
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock serial port for testing
    ///
    /// Records every write and serves reads from an input buffer.
    ///
    /// Bytes given to `queue_reply` are already waiting in the input buffer.
    /// Bytes given to `queue_response` arrive only after the next successful
    /// write, the way a device answers a request.
    #[derive(Clone)]
    pub struct MockSerialPort {
        pub written_data: Arc<Mutex<Vec<Vec<u8>>>>,
        pub replies: Arc<Mutex<VecDeque<u8>>>,
        pub responses: Arc<Mutex<VecDeque<Vec<u8>>>>,
        pub write_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockSerialPort {
        pub fn new() -> Self {
            Self {
                written_data: Arc::new(Mutex::new(Vec::new())),
                replies: Arc::new(Mutex::new(VecDeque::new())),
                responses: Arc::new(Mutex::new(VecDeque::new())),
                write_error: Arc::new(Mutex::new(None)),
            }
        }

        pub fn get_written_data(&self) -> Vec<Vec<u8>> {
            self.written_data.lock().unwrap().clone()
        }

        /// Written data decoded as text, for ASCII protocols
        pub fn get_written_text(&self) -> Vec<String> {
            self.get_written_data()
                .into_iter()
                .map(|bytes| String::from_utf8(bytes).unwrap())
                .collect()
        }

        pub fn queue_reply(&self, bytes: &[u8]) {
            self.replies.lock().unwrap().extend(bytes.iter().copied());
        }

        /// Queue the answer to one future write
        pub fn queue_response(&self, bytes: &[u8]) {
            self.responses.lock().unwrap().push_back(bytes.to_vec());
        }

        pub fn set_write_error(&self, error: io::ErrorKind) {
            *self.write_error.lock().unwrap() = Some(error);
        }

        pub fn clear_write_error(&self) {
            *self.write_error.lock().unwrap() = None;
        }
    }

    impl SerialPortIO for MockSerialPort {
        fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
            if let Some(error) = *self.write_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock write error"));
            }
            self.written_data.lock().unwrap().push(data.to_vec());
            if let Some(response) = self.responses.lock().unwrap().pop_front() {
                self.replies.lock().unwrap().extend(response);
            }
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
            let mut replies = self.replies.lock().unwrap();
            if replies.len() < buf.len() {
                replies.clear();
                return Err(io::Error::new(io::ErrorKind::TimedOut, "Mock read timeout"));
            }
            for byte in buf.iter_mut() {
                *byte = replies.pop_front().unwrap();
            }
            Ok(())
        }

        fn clear_input(&mut self) -> io::Result<()> {
            self.replies.lock().unwrap().clear();
            Ok(())
        }
    }
}
