use std::io;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::{cmd::Command, ClientConfig, Connection, Error, Reply, Result};

/// Lifecycle of a `Client`.
///
/// `Ready` is the only state commands can be sent from. Any transport or
/// protocol failure drops the connection and moves to `Disconnected`; the
/// client never reconnects on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Ready,
}

/// Established connection with a Redis server.
///
/// Backed by a single stream, `Client` provides basic network client
/// functionality (no pooling, retrying, pipelining, ...). Every request is a
/// full round trip: the command is written, then exactly one reply is read
/// before the call returns. Taking `&mut self` keeps two commands from ever
/// sharing the stream at the same time; share a client between tasks behind a
/// mutex, or open one per task.
///
/// Requests are issued using the various methods of `Client`, or with
/// [`Client::execute`] for any command that has no dedicated method.
#[derive(Debug)]
pub struct Client<S = TcpStream> {
    /// The stream decorated with the RESP encoder / decoder.
    ///
    /// `None` once the client is closed or was invalidated by an error.
    connection: Option<Connection<S>>,
    state: SessionState,
    config: ClientConfig,
    /// Database selected on the server for this connection.
    database: i64,
    authenticated: bool,
}

impl Client<TcpStream> {
    /// Establish a connection with the Redis server described by `config`.
    ///
    /// After the TCP connection is up, `AUTH` is sent if a password is
    /// configured, then `SELECT` with the configured database. If the server
    /// rejects either, no client is returned.
    #[tracing::instrument(skip_all, fields(addr = %config.addr(), db = config.database))]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let addr = config.addr();
        // This performs any asynchronous DNS lookup and attempts to establish
        // the TCP connection. An error at either step is returned as is.
        let socket = match config.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, TcpStream::connect(&addr))
                .await
                .map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("connecting to {addr} timed out"),
                    )
                })??,
            None => TcpStream::connect(&addr).await?,
        };
        info!("tcp connection established");
        Client::with_stream(socket, config).await
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Runs the connect handshake over an already open stream.
    pub async fn with_stream(stream: S, config: ClientConfig) -> Result<Self> {
        let mut client = Client {
            connection: Some(Connection::new(stream)),
            state: SessionState::Connecting,
            config,
            database: 0,
            authenticated: false,
        };

        if let Err(err) = client.handshake().await {
            warn!(%err, "connection setup failed");
            client.invalidate();
            return Err(err);
        }

        client.state = SessionState::Ready;
        debug!(database = client.database, "session ready");
        Ok(client)
    }

    async fn handshake(&mut self) -> Result<()> {
        if let Some(password) = self.config.password.clone() {
            self.setup_step(&Command::new("AUTH").arg(password)).await?;
            self.authenticated = true;
        }

        let database = self.config.database;
        self.setup_step(&Command::new("SELECT").arg(database)).await?;
        self.database = database;
        Ok(())
    }

    /// Any status reply accepts the step, anything else refuses the connection.
    async fn setup_step(&mut self, cmd: &Command) -> Result<()> {
        let verb = String::from_utf8_lossy(cmd.name()).into_owned();
        match self.round_trip(cmd).await? {
            Reply::Status(_) => Ok(()),
            Reply::Error(msg) => Err(Error::Configuration(format!("{verb} rejected: {msg}"))),
            reply => Err(Error::Configuration(format!(
                "unexpected {} reply to {verb}",
                reply.kind()
            ))),
        }
    }

    /// Send `cmd` and wait for its reply.
    ///
    /// Error replies from the server are returned as `Reply::Error` and leave
    /// the client usable. Transport and protocol failures are returned as
    /// errors and close the client, since the stream can no longer be trusted.
    #[tracing::instrument(skip_all, fields(cmd = %cmd))]
    pub async fn execute(&mut self, cmd: &Command) -> Result<Reply> {
        if self.state != SessionState::Ready {
            return Err(Error::NotConnected);
        }
        self.round_trip(cmd).await
    }

    /// Like `execute`, but error replies become `Error::Server`.
    pub(crate) async fn query(&mut self, cmd: Command) -> Result<Reply> {
        self.execute(&cmd).await?.into_result()
    }

    async fn round_trip(&mut self, cmd: &Command) -> Result<Reply> {
        let result = match self.send_command(cmd).await {
            Ok(()) => self.read_reply().await,
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            if err.is_fatal() {
                warn!(%err, "invalidating session");
                self.invalidate();
            }
        }
        result
    }

    async fn send_command(&mut self, cmd: &Command) -> Result<()> {
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;
        debug!(request = %cmd);
        // Write the full command to the stream, waiting if necessary.
        connection.write_command(cmd).await
    }

    async fn read_reply(&mut self) -> Result<Reply> {
        let connection = self.connection.as_mut().ok_or(Error::NotConnected)?;
        let response = connection.read_reply().await?;
        debug!(?response);
        match response {
            Some(reply) => Ok(reply),
            None => {
                // Receiving `None` indicates the connection has been closed by the server
                // without sending a reply. This is unexpected and treated as an `Error::Io`.
                Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by server",
                )
                .into())
            }
        }
    }

    fn invalidate(&mut self) {
        self.connection = None;
        self.state = SessionState::Disconnected;
        self.authenticated = false;
    }

    /// Close the connection. Commands sent afterwards fail with `Error::NotConnected`.
    pub async fn close(&mut self) -> Result<()> {
        self.state = SessionState::Disconnected;
        self.authenticated = false;
        if let Some(mut connection) = self.connection.take() {
            connection.shutdown().await?;
            info!("connection closed");
        }
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn database(&self) -> i64 {
        self.database
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Change the selected database for the current connection.
    pub async fn select(&mut self, database: i64) -> Result<()> {
        self.query(Command::new("SELECT").arg(database))
            .await?
            .into_ok()?;
        self.database = database;
        Ok(())
    }

    pub async fn auth(&mut self, password: &str) -> Result<()> {
        self.query(Command::new("AUTH").arg(password)).await?.into_ok()?;
        self.authenticated = true;
        Ok(())
    }
}
