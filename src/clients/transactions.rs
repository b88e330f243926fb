use tokio::io::{AsyncRead, AsyncWrite};

use crate::{cmd::ToArg, Client, Command, Reply, Result};

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Start a transaction.
    ///
    /// Until [`Client::exec`] or [`Client::discard`], the server answers every
    /// command with `+QUEUED` instead of its result, so queue commands with
    /// [`Client::execute`] rather than the typed methods.
    pub async fn multi(&mut self) -> Result<()> {
        self.query(Command::new("MULTI")).await?.into_ok()
    }

    /// Run the queued commands. Returns one reply per command, or `None` if
    /// a watched key changed and the transaction was aborted.
    pub async fn exec(&mut self) -> Result<Option<Vec<Reply>>> {
        self.query(Command::new("EXEC"))
            .await?
            .into_optional_array()
    }

    pub async fn discard(&mut self) -> Result<()> {
        self.query(Command::new("DISCARD")).await?.into_ok()
    }

    pub async fn watch<K: ToArg>(&mut self, keys: &[K]) -> Result<()> {
        self.query(Command::new("WATCH").args(keys)).await?.into_ok()
    }

    pub async fn unwatch(&mut self) -> Result<()> {
        self.query(Command::new("UNWATCH")).await?.into_ok()
    }

    /// Evaluate a Lua script. The reply is whatever the script returns.
    pub async fn eval<K: ToArg, A: ToArg>(
        &mut self,
        script: &str,
        keys: &[K],
        args: &[A],
    ) -> Result<Reply> {
        let cmd = Command::new("EVAL")
            .arg(script)
            .arg(keys.len())
            .args(keys)
            .args(args);
        self.query(cmd).await
    }

    /// Evaluate a script previously loaded with [`Client::script_load`].
    pub async fn evalsha<K: ToArg, A: ToArg>(
        &mut self,
        sha1: &str,
        keys: &[K],
        args: &[A],
    ) -> Result<Reply> {
        let cmd = Command::new("EVALSHA")
            .arg(sha1)
            .arg(keys.len())
            .args(keys)
            .args(args);
        self.query(cmd).await
    }

    /// Load a script into the script cache and return its SHA1 digest.
    pub async fn script_load(&mut self, script: &str) -> Result<String> {
        self.query(Command::new("SCRIPT").arg("LOAD").arg(script))
            .await?
            .into_string()
    }

    pub async fn script_exists(&mut self, sha1s: &[&str]) -> Result<Vec<bool>> {
        self.query(Command::new("SCRIPT").arg("EXISTS").args(sha1s))
            .await?
            .into_array()?
            .into_iter()
            .map(Reply::into_bool)
            .collect()
    }

    pub async fn script_flush(&mut self) -> Result<()> {
        self.query(Command::new("SCRIPT").arg("FLUSH"))
            .await?
            .into_ok()
    }

    /// Post `message` to `channel`. Returns the number of subscribers that
    /// received it.
    pub async fn publish(&mut self, channel: impl ToArg, message: impl ToArg) -> Result<i64> {
        self.query(Command::new("PUBLISH").arg(channel).arg(message))
            .await?
            .into_int()
    }
}
