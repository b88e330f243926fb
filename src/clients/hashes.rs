use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use super::strings::with_pairs;
use crate::{cmd::ToArg, parse::Parse, Client, Command, Result};

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Remove `field` from the hash. Returns whether it existed.
    pub async fn hdel(&mut self, key: impl ToArg, field: impl ToArg) -> Result<bool> {
        self.query(Command::new("HDEL").arg(key).arg(field))
            .await?
            .into_bool()
    }

    pub async fn hexists(&mut self, key: impl ToArg, field: impl ToArg) -> Result<bool> {
        self.query(Command::new("HEXISTS").arg(key).arg(field))
            .await?
            .into_bool()
    }

    pub async fn hget(&mut self, key: impl ToArg, field: impl ToArg) -> Result<Option<Bytes>> {
        self.query(Command::new("HGET").arg(key).arg(field))
            .await?
            .into_optional_bytes()
    }

    /// All fields and values of the hash, in server order.
    pub async fn hgetall(&mut self, key: impl ToArg) -> Result<Vec<(Bytes, Bytes)>> {
        let reply = self.query(Command::new("HGETALL").arg(key)).await?;
        Parse::new(reply)?.pairs(Parse::next_bytes, Parse::next_bytes)
    }

    pub async fn hincrby(
        &mut self,
        key: impl ToArg,
        field: impl ToArg,
        increment: i64,
    ) -> Result<i64> {
        self.query(Command::new("HINCRBY").arg(key).arg(field).arg(increment))
            .await?
            .into_int()
    }

    pub async fn hincrbyfloat(
        &mut self,
        key: impl ToArg,
        field: impl ToArg,
        increment: f64,
    ) -> Result<f64> {
        self.query(
            Command::new("HINCRBYFLOAT")
                .arg(key)
                .arg(field)
                .arg(increment),
        )
        .await?
        .into_float()
    }

    pub async fn hkeys(&mut self, key: impl ToArg) -> Result<Vec<Bytes>> {
        self.query(Command::new("HKEYS").arg(key))
            .await?
            .into_bytes_vec()
    }

    pub async fn hlen(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("HLEN").arg(key)).await?.into_int()
    }

    /// Values of `fields`, in order, `None` for missing fields.
    pub async fn hmget<F: ToArg>(
        &mut self,
        key: impl ToArg,
        fields: &[F],
    ) -> Result<Vec<Option<Bytes>>> {
        self.query(Command::new("HMGET").arg(key).args(fields))
            .await?
            .into_optional_bytes_vec()
    }

    pub async fn hmset<F: ToArg, V: ToArg>(
        &mut self,
        key: impl ToArg,
        pairs: &[(F, V)],
    ) -> Result<()> {
        self.query(with_pairs(Command::new("HMSET").arg(key), pairs))
            .await?
            .into_ok()
    }

    /// Returns `true` when `field` is new, `false` when it was updated.
    pub async fn hset(
        &mut self,
        key: impl ToArg,
        field: impl ToArg,
        value: impl ToArg,
    ) -> Result<bool> {
        self.query(Command::new("HSET").arg(key).arg(field).arg(value))
            .await?
            .into_bool()
    }

    pub async fn hsetnx(
        &mut self,
        key: impl ToArg,
        field: impl ToArg,
        value: impl ToArg,
    ) -> Result<bool> {
        self.query(Command::new("HSETNX").arg(key).arg(field).arg(value))
            .await?
            .into_bool()
    }

    pub async fn hvals(&mut self, key: impl ToArg) -> Result<Vec<Bytes>> {
        self.query(Command::new("HVALS").arg(key))
            .await?
            .into_bytes_vec()
    }
}
