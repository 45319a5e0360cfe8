use std::io::{self, BufWriter, Write};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

enum Message {
    Line(String),
    Sync(Sender<io::Result<()>>),
}

/// Background writer that drains queued lines into a sink on its own thread.
///
/// Lines are written in the order they are queued. [`AsyncLineWriter::sync`] blocks the
/// caller until everything queued before it has been written and flushed, which is how
/// the channel waits for a batch to fully land before expecting the worker's reply.
pub struct AsyncLineWriter {
    sender: Option<Sender<Message>>,
    handle: Option<JoinHandle<io::Result<()>>>,
}

impl AsyncLineWriter {
    pub fn spawn<W: Write + Send + 'static>(sink: W) -> io::Result<Self> {
        let (sender, receiver) = unbounded();
        let handle = thread::Builder::new()
            .name("svtrain-writer".to_string())
            .spawn(move || drain(receiver, BufWriter::new(sink)))?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue one line. A newline is appended when `line` lacks one.
    pub fn write_line(&self, line: impl Into<String>) -> io::Result<()> {
        let mut line = line.into();
        if !line.ends_with('\n') {
            line.push('\n');
        }
        self.send(Message::Line(line))
    }

    pub fn write_lines<I>(&self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            self.write_line(line)?;
        }
        Ok(())
    }

    /// Wait until every line queued so far has been written and flushed.
    pub fn sync(&self) -> io::Result<()> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send(Message::Sync(reply_tx))?;
        reply_rx
            .recv()
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "stream writer exited"))?
    }

    /// Stop accepting lines, flush what is queued, and close the sink.
    pub fn close(&mut self) -> io::Result<()> {
        self.sender.take();
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("stream writer panicked"))?,
            None => Ok(()),
        }
    }

    fn send(&self, message: Message) -> io::Result<()> {
        self.sender
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stream writer is closed"))?
            .send(message)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "stream writer exited"))
    }
}

impl Drop for AsyncLineWriter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn drain<W: Write>(receiver: Receiver<Message>, mut sink: W) -> io::Result<()> {
    // first failure sticks; later lines are dropped and every sync reports it
    let mut failure: Option<io::ErrorKind> = None;

    for message in receiver {
        match message {
            Message::Line(line) => {
                if failure.is_none() {
                    if let Err(e) = sink.write_all(line.as_bytes()) {
                        failure = Some(e.kind());
                    }
                }
            }
            Message::Sync(reply) => {
                if failure.is_none() {
                    if let Err(e) = sink.flush() {
                        failure = Some(e.kind());
                    }
                }
                let status = match failure {
                    Some(kind) => Err(io::Error::new(kind, "write to worker stream failed")),
                    None => Ok(()),
                };
                let _ = reply.send(status);
            }
        }
    }

    match failure {
        Some(kind) => Err(io::Error::new(kind, "write to worker stream failed")),
        None => sink.flush(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn test_lines_land_in_order_after_sync() {
        let buffer = SharedBuffer::default();
        let writer = AsyncLineWriter::spawn(buffer.clone()).unwrap();

        writer.write_line("cmd").unwrap();
        writer
            .write_lines((0..100).map(|i| format!("line{}\n", i)))
            .unwrap();
        writer.sync().unwrap();

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 101);
        assert_eq!(lines[0], "cmd");
        assert_eq!(lines[100], "line99");
    }

    #[test]
    fn test_close_flushes_pending_lines() {
        let buffer = SharedBuffer::default();
        let mut writer = AsyncLineWriter::spawn(buffer.clone()).unwrap();
        writer.write_line("a").unwrap();
        writer.write_line("b\n").unwrap();
        writer.close().unwrap();

        assert_eq!(buffer.contents(), "a\nb\n");
        assert!(writer.write_line("c").is_err());
    }

    #[test]
    fn test_failure_reported_on_sync() {
        let writer = AsyncLineWriter::spawn(BrokenPipe).unwrap();
        writer.write_line("lost").unwrap();
        let err = writer.sync().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
