use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    cmd::{ScoreBound, ToArg, ZStoreCmd},
    parse::Parse,
    Client, Command, Result,
};

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Add `(score, member)` pairs. Returns the number of new members.
    pub async fn zadd<M: ToArg>(&mut self, key: impl ToArg, members: &[(f64, M)]) -> Result<i64> {
        let mut cmd = Command::new("ZADD").arg(key);
        for (score, member) in members {
            cmd.push_arg(score);
            cmd.push_arg(member);
        }
        self.query(cmd).await?.into_int()
    }

    pub async fn zcard(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("ZCARD").arg(key)).await?.into_int()
    }

    /// Number of members with a score between `min` and `max`.
    pub async fn zcount(
        &mut self,
        key: impl ToArg,
        min: ScoreBound,
        max: ScoreBound,
    ) -> Result<i64> {
        self.query(Command::new("ZCOUNT").arg(key).arg(min).arg(max))
            .await?
            .into_int()
    }

    /// Returns the new score of `member`.
    pub async fn zincrby(
        &mut self,
        key: impl ToArg,
        increment: f64,
        member: impl ToArg,
    ) -> Result<f64> {
        self.query(Command::new("ZINCRBY").arg(key).arg(increment).arg(member))
            .await?
            .into_float()
    }

    /// Members ranked `start..=stop`, lowest score first.
    pub async fn zrange(&mut self, key: impl ToArg, start: i64, stop: i64) -> Result<Vec<Bytes>> {
        self.query(Command::new("ZRANGE").arg(key).arg(start).arg(stop))
            .await?
            .into_bytes_vec()
    }

    pub async fn zrange_withscores(
        &mut self,
        key: impl ToArg,
        start: i64,
        stop: i64,
    ) -> Result<Vec<(Bytes, f64)>> {
        let cmd = Command::new("ZRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .arg("WITHSCORES");
        Parse::new(self.query(cmd).await?)?.pairs(Parse::next_bytes, Parse::next_float)
    }

    /// Members ranked `start..=stop`, highest score first.
    pub async fn zrevrange(
        &mut self,
        key: impl ToArg,
        start: i64,
        stop: i64,
    ) -> Result<Vec<Bytes>> {
        self.query(Command::new("ZREVRANGE").arg(key).arg(start).arg(stop))
            .await?
            .into_bytes_vec()
    }

    pub async fn zrevrange_withscores(
        &mut self,
        key: impl ToArg,
        start: i64,
        stop: i64,
    ) -> Result<Vec<(Bytes, f64)>> {
        let cmd = Command::new("ZREVRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .arg("WITHSCORES");
        Parse::new(self.query(cmd).await?)?.pairs(Parse::next_bytes, Parse::next_float)
    }

    /// Members scored between `min` and `max`, optionally paged with
    /// `(offset, count)`.
    pub async fn zrangebyscore(
        &mut self,
        key: impl ToArg,
        min: ScoreBound,
        max: ScoreBound,
        limit: Option<(i64, i64)>,
    ) -> Result<Vec<Bytes>> {
        let cmd = with_limit(Command::new("ZRANGEBYSCORE").arg(key).arg(min).arg(max), limit);
        self.query(cmd).await?.into_bytes_vec()
    }

    /// Note the order of the bounds: `max` comes first, as on the wire.
    pub async fn zrevrangebyscore(
        &mut self,
        key: impl ToArg,
        max: ScoreBound,
        min: ScoreBound,
        limit: Option<(i64, i64)>,
    ) -> Result<Vec<Bytes>> {
        let cmd = with_limit(
            Command::new("ZREVRANGEBYSCORE").arg(key).arg(max).arg(min),
            limit,
        );
        self.query(cmd).await?.into_bytes_vec()
    }

    pub async fn zrank(&mut self, key: impl ToArg, member: impl ToArg) -> Result<Option<i64>> {
        self.query(Command::new("ZRANK").arg(key).arg(member))
            .await?
            .into_optional_int()
    }

    pub async fn zrevrank(&mut self, key: impl ToArg, member: impl ToArg) -> Result<Option<i64>> {
        self.query(Command::new("ZREVRANK").arg(key).arg(member))
            .await?
            .into_optional_int()
    }

    pub async fn zrem<M: ToArg>(&mut self, key: impl ToArg, members: &[M]) -> Result<i64> {
        self.query(Command::new("ZREM").arg(key).args(members))
            .await?
            .into_int()
    }

    pub async fn zremrangebyrank(&mut self, key: impl ToArg, start: i64, stop: i64) -> Result<i64> {
        self.query(Command::new("ZREMRANGEBYRANK").arg(key).arg(start).arg(stop))
            .await?
            .into_int()
    }

    pub async fn zremrangebyscore(
        &mut self,
        key: impl ToArg,
        min: ScoreBound,
        max: ScoreBound,
    ) -> Result<i64> {
        self.query(Command::new("ZREMRANGEBYSCORE").arg(key).arg(min).arg(max))
            .await?
            .into_int()
    }

    pub async fn zscore(&mut self, key: impl ToArg, member: impl ToArg) -> Result<Option<f64>> {
        self.query(Command::new("ZSCORE").arg(key).arg(member))
            .await?
            .into_optional_float()
    }

    pub async fn zunionstore<K: ToArg>(
        &mut self,
        destination: impl ToArg,
        keys: &[K],
    ) -> Result<i64> {
        self.zstore(ZStoreCmd::union(destination, keys)).await
    }

    pub async fn zinterstore<K: ToArg>(
        &mut self,
        destination: impl ToArg,
        keys: &[K],
    ) -> Result<i64> {
        self.zstore(ZStoreCmd::inter(destination, keys)).await
    }

    /// Run a `ZUNIONSTORE`/`ZINTERSTORE` with weights or an aggregate.
    /// Returns the size of the resulting set.
    pub async fn zstore(&mut self, cmd: ZStoreCmd) -> Result<i64> {
        self.query(cmd.into_command()).await?.into_int()
    }
}

fn with_limit(cmd: Command, limit: Option<(i64, i64)>) -> Command {
    match limit {
        Some((offset, count)) => cmd.arg("LIMIT").arg(offset).arg(count),
        None => cmd,
    }
}
