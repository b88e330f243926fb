use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    cmd::{Position, ToArg},
    parse::Parse,
    Client, Command, Result,
};

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Pop the head of the first non-empty list among `keys`, waiting up to
    /// `timeout_secs` (0 waits forever) for one to receive an element.
    ///
    /// Returns `(key, element)`, or `None` once the server gives up. The wait
    /// happens on the server; the client applies no timeout of its own.
    pub async fn blpop<K: ToArg>(
        &mut self,
        keys: &[K],
        timeout_secs: u64,
    ) -> Result<Option<(Bytes, Bytes)>> {
        self.blocking_pop("BLPOP", keys, timeout_secs).await
    }

    /// Like [`Client::blpop`], popping from the tail.
    pub async fn brpop<K: ToArg>(
        &mut self,
        keys: &[K],
        timeout_secs: u64,
    ) -> Result<Option<(Bytes, Bytes)>> {
        self.blocking_pop("BRPOP", keys, timeout_secs).await
    }

    async fn blocking_pop<K: ToArg>(
        &mut self,
        verb: &str,
        keys: &[K],
        timeout_secs: u64,
    ) -> Result<Option<(Bytes, Bytes)>> {
        let cmd = Command::new(verb).args(keys).arg(timeout_secs);
        let Some(mut parse) = Parse::optional(self.query(cmd).await?)? else {
            return Ok(None);
        };
        let key = parse.next_bytes()?;
        let element = parse.next_bytes()?;
        parse.finish()?;
        Ok(Some((key, element)))
    }

    /// Blocking [`Client::rpoplpush`]. `None` when the timeout expired.
    pub async fn brpoplpush(
        &mut self,
        source: impl ToArg,
        destination: impl ToArg,
        timeout_secs: u64,
    ) -> Result<Option<Bytes>> {
        let cmd = Command::new("BRPOPLPUSH")
            .arg(source)
            .arg(destination)
            .arg(timeout_secs);
        match self.query(cmd).await? {
            // a timeout is reported as a null array by some servers
            crate::Reply::Array(None) => Ok(None),
            reply => reply.into_optional_bytes(),
        }
    }

    pub async fn lindex(&mut self, key: impl ToArg, index: i64) -> Result<Option<Bytes>> {
        self.query(Command::new("LINDEX").arg(key).arg(index))
            .await?
            .into_optional_bytes()
    }

    /// Insert `element` before or after `pivot`.
    ///
    /// Returns the new length of the list, `-1` when `pivot` was not found and
    /// `0` when the list does not exist.
    pub async fn linsert(
        &mut self,
        key: impl ToArg,
        position: Position,
        pivot: impl ToArg,
        element: impl ToArg,
    ) -> Result<i64> {
        self.query(
            Command::new("LINSERT")
                .arg(key)
                .arg(position)
                .arg(pivot)
                .arg(element),
        )
        .await?
        .into_int()
    }

    pub async fn llen(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("LLEN").arg(key)).await?.into_int()
    }

    pub async fn lpop(&mut self, key: impl ToArg) -> Result<Option<Bytes>> {
        self.query(Command::new("LPOP").arg(key))
            .await?
            .into_optional_bytes()
    }

    pub async fn rpop(&mut self, key: impl ToArg) -> Result<Option<Bytes>> {
        self.query(Command::new("RPOP").arg(key))
            .await?
            .into_optional_bytes()
    }

    /// Returns the length of the list after the push.
    pub async fn lpush(&mut self, key: impl ToArg, element: impl ToArg) -> Result<i64> {
        self.query(Command::new("LPUSH").arg(key).arg(element))
            .await?
            .into_int()
    }

    /// Push only if the list already exists.
    pub async fn lpushx(&mut self, key: impl ToArg, element: impl ToArg) -> Result<i64> {
        self.query(Command::new("LPUSHX").arg(key).arg(element))
            .await?
            .into_int()
    }

    pub async fn rpush(&mut self, key: impl ToArg, element: impl ToArg) -> Result<i64> {
        self.query(Command::new("RPUSH").arg(key).arg(element))
            .await?
            .into_int()
    }

    pub async fn rpushx(&mut self, key: impl ToArg, element: impl ToArg) -> Result<i64> {
        self.query(Command::new("RPUSHX").arg(key).arg(element))
            .await?
            .into_int()
    }

    pub async fn lrange(&mut self, key: impl ToArg, start: i64, stop: i64) -> Result<Vec<Bytes>> {
        self.query(Command::new("LRANGE").arg(key).arg(start).arg(stop))
            .await?
            .into_bytes_vec()
    }

    /// Remove occurrences of `element`: the first `count` from the head when
    /// positive, from the tail when negative, all of them when zero.
    pub async fn lrem(&mut self, key: impl ToArg, count: i64, element: impl ToArg) -> Result<i64> {
        self.query(Command::new("LREM").arg(key).arg(count).arg(element))
            .await?
            .into_int()
    }

    pub async fn lset(&mut self, key: impl ToArg, index: i64, element: impl ToArg) -> Result<()> {
        self.query(Command::new("LSET").arg(key).arg(index).arg(element))
            .await?
            .into_ok()
    }

    pub async fn ltrim(&mut self, key: impl ToArg, start: i64, stop: i64) -> Result<()> {
        self.query(Command::new("LTRIM").arg(key).arg(start).arg(stop))
            .await?
            .into_ok()
    }

    pub async fn rpoplpush(
        &mut self,
        source: impl ToArg,
        destination: impl ToArg,
    ) -> Result<Option<Bytes>> {
        self.query(Command::new("RPOPLPUSH").arg(source).arg(destination))
            .await?
            .into_optional_bytes()
    }
}
