use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{cmd::ToArg, Client, Command, Result};

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Add `members` to the set. Returns how many were not already present.
    pub async fn sadd<M: ToArg>(&mut self, key: impl ToArg, members: &[M]) -> Result<i64> {
        self.query(Command::new("SADD").arg(key).args(members))
            .await?
            .into_int()
    }

    /// Cardinality of the set, 0 when it does not exist.
    pub async fn scard(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("SCARD").arg(key)).await?.into_int()
    }

    /// Members of the first set that are in none of the others.
    pub async fn sdiff<K: ToArg>(&mut self, keys: &[K]) -> Result<Vec<Bytes>> {
        self.query(Command::new("SDIFF").args(keys))
            .await?
            .into_bytes_vec()
    }

    pub async fn sdiffstore<K: ToArg>(
        &mut self,
        destination: impl ToArg,
        keys: &[K],
    ) -> Result<i64> {
        self.query(Command::new("SDIFFSTORE").arg(destination).args(keys))
            .await?
            .into_int()
    }

    pub async fn sinter<K: ToArg>(&mut self, keys: &[K]) -> Result<Vec<Bytes>> {
        self.query(Command::new("SINTER").args(keys))
            .await?
            .into_bytes_vec()
    }

    pub async fn sinterstore<K: ToArg>(
        &mut self,
        destination: impl ToArg,
        keys: &[K],
    ) -> Result<i64> {
        self.query(Command::new("SINTERSTORE").arg(destination).args(keys))
            .await?
            .into_int()
    }

    pub async fn sunion<K: ToArg>(&mut self, keys: &[K]) -> Result<Vec<Bytes>> {
        self.query(Command::new("SUNION").args(keys))
            .await?
            .into_bytes_vec()
    }

    pub async fn sunionstore<K: ToArg>(
        &mut self,
        destination: impl ToArg,
        keys: &[K],
    ) -> Result<i64> {
        self.query(Command::new("SUNIONSTORE").arg(destination).args(keys))
            .await?
            .into_int()
    }

    pub async fn sismember(&mut self, key: impl ToArg, member: impl ToArg) -> Result<bool> {
        self.query(Command::new("SISMEMBER").arg(key).arg(member))
            .await?
            .into_bool()
    }

    pub async fn smembers(&mut self, key: impl ToArg) -> Result<Vec<Bytes>> {
        self.query(Command::new("SMEMBERS").arg(key))
            .await?
            .into_bytes_vec()
    }

    /// Move `member` between sets. Returns `false` if it was not in `source`.
    pub async fn smove(
        &mut self,
        source: impl ToArg,
        destination: impl ToArg,
        member: impl ToArg,
    ) -> Result<bool> {
        self.query(
            Command::new("SMOVE")
                .arg(source)
                .arg(destination)
                .arg(member),
        )
        .await?
        .into_bool()
    }

    /// Remove and return a random member, `None` when the set is empty.
    pub async fn spop(&mut self, key: impl ToArg) -> Result<Option<Bytes>> {
        self.query(Command::new("SPOP").arg(key))
            .await?
            .into_optional_bytes()
    }

    pub async fn srandmember(&mut self, key: impl ToArg) -> Result<Option<Bytes>> {
        self.query(Command::new("SRANDMEMBER").arg(key))
            .await?
            .into_optional_bytes()
    }

    pub async fn srem<M: ToArg>(&mut self, key: impl ToArg, members: &[M]) -> Result<i64> {
        self.query(Command::new("SREM").arg(key).args(members))
            .await?
            .into_int()
    }
}
