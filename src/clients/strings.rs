use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    cmd::{BitOp, SetCmd, ToArg},
    Client, Command, Reply, Result,
};

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Get the value of key.
    ///
    /// If the key does not exist `None` is returned.
    pub async fn get(&mut self, key: impl ToArg) -> Result<Option<Bytes>> {
        // Both `Status` and `BulkString` are valid responses.
        // A null bulk string represents the key not being present.
        self.query(Command::new("GET").arg(key))
            .await?
            .into_optional_bytes()
    }

    /// Set `key` to hold the given `value`.
    ///
    /// If key already holds a value, it is overwritten. Any previous time to
    /// live associated with the key is discarded on successful SET operation.
    pub async fn set(&mut self, key: impl ToArg, value: impl ToArg) -> Result<()> {
        self.set_with(SetCmd::new(key, value)).await.map(|_| ())
    }

    /// Set `key` to hold the given `value`. The value expires after `expire`.
    pub async fn set_expires(
        &mut self,
        key: impl ToArg,
        value: impl ToArg,
        expire: Duration,
    ) -> Result<()> {
        self.set_with(SetCmd::new(key, value).expire(expire))
            .await
            .map(|_| ())
    }

    /// The full `SET`, with expiration and `NX`/`XX` conditions.
    ///
    /// Returns `false` when a condition kept the value from being set.
    pub async fn set_with(&mut self, cmd: SetCmd) -> Result<bool> {
        let conditional = cmd.is_conditional();
        match self.query(cmd.into_command()).await? {
            Reply::Status(_) => Ok(true),
            Reply::BulkString(None) if conditional => Ok(false),
            reply => Err(crate::Error::UnexpectedReply(format!(
                "expected OK, got {}",
                reply.kind()
            ))),
        }
    }

    pub async fn setex(&mut self, key: impl ToArg, seconds: u64, value: impl ToArg) -> Result<()> {
        self.query(Command::new("SETEX").arg(key).arg(seconds).arg(value))
            .await?
            .into_ok()
    }

    pub async fn psetex(
        &mut self,
        key: impl ToArg,
        milliseconds: u64,
        value: impl ToArg,
    ) -> Result<()> {
        self.query(Command::new("PSETEX").arg(key).arg(milliseconds).arg(value))
            .await?
            .into_ok()
    }

    /// Set `key` only if it does not exist yet. Returns whether it was set.
    pub async fn setnx(&mut self, key: impl ToArg, value: impl ToArg) -> Result<bool> {
        self.query(Command::new("SETNX").arg(key).arg(value))
            .await?
            .into_bool()
    }

    /// Set `key` and return its previous value.
    pub async fn getset(&mut self, key: impl ToArg, value: impl ToArg) -> Result<Option<Bytes>> {
        self.query(Command::new("GETSET").arg(key).arg(value))
            .await?
            .into_optional_bytes()
    }

    pub async fn incr(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("INCR").arg(key)).await?.into_int()
    }

    pub async fn incrby(&mut self, key: impl ToArg, increment: i64) -> Result<i64> {
        self.query(Command::new("INCRBY").arg(key).arg(increment))
            .await?
            .into_int()
    }

    pub async fn incrbyfloat(&mut self, key: impl ToArg, increment: f64) -> Result<f64> {
        self.query(Command::new("INCRBYFLOAT").arg(key).arg(increment))
            .await?
            .into_float()
    }

    pub async fn decr(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("DECR").arg(key)).await?.into_int()
    }

    pub async fn decrby(&mut self, key: impl ToArg, decrement: i64) -> Result<i64> {
        self.query(Command::new("DECRBY").arg(key).arg(decrement))
            .await?
            .into_int()
    }

    /// Values of all `keys`, in order, `None` for missing keys.
    pub async fn mget<K: ToArg>(&mut self, keys: &[K]) -> Result<Vec<Option<Bytes>>> {
        self.query(Command::new("MGET").args(keys))
            .await?
            .into_optional_bytes_vec()
    }

    pub async fn mset<K: ToArg, V: ToArg>(&mut self, pairs: &[(K, V)]) -> Result<()> {
        self.query(with_pairs(Command::new("MSET"), pairs))
            .await?
            .into_ok()
    }

    /// Set all pairs, or none of them if any key already exists.
    pub async fn msetnx<K: ToArg, V: ToArg>(&mut self, pairs: &[(K, V)]) -> Result<bool> {
        self.query(with_pairs(Command::new("MSETNX"), pairs))
            .await?
            .into_bool()
    }

    /// Returns the length of the string after the append.
    pub async fn append(&mut self, key: impl ToArg, value: impl ToArg) -> Result<i64> {
        self.query(Command::new("APPEND").arg(key).arg(value))
            .await?
            .into_int()
    }

    pub async fn getrange(&mut self, key: impl ToArg, start: i64, end: i64) -> Result<Bytes> {
        self.query(Command::new("GETRANGE").arg(key).arg(start).arg(end))
            .await?
            .into_bytes()
    }

    pub async fn setrange(
        &mut self,
        key: impl ToArg,
        offset: u64,
        value: impl ToArg,
    ) -> Result<i64> {
        self.query(Command::new("SETRANGE").arg(key).arg(offset).arg(value))
            .await?
            .into_int()
    }

    pub async fn strlen(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("STRLEN").arg(key)).await?.into_int()
    }

    pub async fn getbit(&mut self, key: impl ToArg, offset: u64) -> Result<bool> {
        self.query(Command::new("GETBIT").arg(key).arg(offset))
            .await?
            .into_bool()
    }

    /// Returns the previous value of the bit.
    pub async fn setbit(&mut self, key: impl ToArg, offset: u64, value: bool) -> Result<bool> {
        self.query(
            Command::new("SETBIT")
                .arg(key)
                .arg(offset)
                .arg(u64::from(value)),
        )
        .await?
        .into_bool()
    }

    /// Returns the length of the string stored at `destination`.
    pub async fn bitop<K: ToArg>(
        &mut self,
        op: BitOp,
        destination: impl ToArg,
        keys: &[K],
    ) -> Result<i64> {
        self.query(Command::new("BITOP").arg(op).arg(destination).args(keys))
            .await?
            .into_int()
    }

    pub async fn bitcount(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("BITCOUNT").arg(key))
            .await?
            .into_int()
    }
}

/// Flattens `(key, value)` pairs into the argument list.
pub(crate) fn with_pairs<K: ToArg, V: ToArg>(mut cmd: Command, pairs: &[(K, V)]) -> Command {
    for (key, value) in pairs {
        cmd.push_arg(key);
        cmd.push_arg(value);
    }
    cmd
}
