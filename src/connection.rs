use std::io::Cursor;

use crate::{cmd::Command, Error, Reply, Result};
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};

/// Send `Command` values to and receive `Reply` values from a Redis server.
///
/// To read replies, the `Connection` uses an internal buffer, which is filled
/// up until there are enough bytes to decode a full reply. Once this happens,
/// the `Connection` decodes the reply and returns it to the caller. A reply
/// may arrive in any number of reads, each as short as the transport likes.
///
/// When sending commands, the command is first encoded into a scratch buffer
/// and then written to the stream in one go.
#[derive(Debug)]
pub struct Connection<S> {
    /// The stream wrapped with a `BufWriter` for buffering writes.
    stream: BufWriter<S>,
    /// Buffer used for reading replies.
    buffer: BytesMut,
    /// Buffer used for encoding commands.
    scratch: BytesMut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(4 * 1024),
            scratch: BytesMut::with_capacity(1024),
        }
    }

    /// Read a single `Reply` from the connection.
    ///
    /// The function waits, without any timeout, until it has retrieved enough
    /// data to decode a reply. Any data remaining in the read buffer after the
    /// reply has been decoded is kept there for the next call to `read_reply`.
    ///
    /// # Returns
    ///
    /// On success, the received reply is returned. If the stream is closed in
    /// a way that doesn't break a reply in half, it returns `None`. Otherwise,
    /// an error is returned.
    pub async fn read_reply(&mut self) -> Result<Option<Reply>> {
        loop {
            // Attempt to decode a reply from the buffered data. If enough data
            // has been buffered, the reply is returned.
            if let Some(reply) = self.parse_reply()? {
                return Ok(Some(reply));
            }

            // There is not enough buffered data to read a reply. Attempt to
            // read more data from the stream.
            //
            // On success, the number of bytes is returned. `0` indicates "end
            // of stream".
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                // The remote closed the connection. For this to be a clean
                // shutdown, there should be no data in the read buffer. If
                // there is, this means that the peer closed the socket while
                // sending a reply.
                if self.buffer.is_empty() {
                    return Ok(None);
                } else {
                    return Err(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        "connection was closed mid reply",
                    )));
                }
            }
        }
    }

    fn parse_reply(&mut self) -> Result<Option<Reply>> {
        let mut buf = Cursor::new(&self.buffer[..]);

        match Reply::check(&mut buf) {
            Ok(_) => {
                // get the byte length of the reply
                let len = buf.position() as usize;
                // reset the cursor in order to call `parse`
                buf.set_position(0);
                let reply = Reply::parse(&mut buf)?;
                // discard the reply from the buffer
                self.buffer.advance(len);

                Ok(Some(reply))
            }
            // not enough data has been buffered
            Err(Error::IncompleteReply) => Ok(None),
            // an actual error has occurred
            Err(e) => Err(e),
        }
    }

    /// Write a command to the connection's underlying stream and flush it.
    pub async fn write_command(&mut self, cmd: &Command) -> Result<()> {
        self.scratch.clear();
        cmd.encode(&mut self.scratch);
        self.stream.write_all(&self.scratch).await?;
        self.stream.flush().await.map_err(Error::from)
    }

    /// Flushes pending writes and shuts down the write half of the stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await.map_err(Error::from)
    }
}
