use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    cmd::{SortCmd, ToArg},
    Client, Command, Reply, Result,
};

/// The type of the value stored at a key, as reported by `TYPE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    String,
    List,
    Set,
    ZSet,
    Hash,
    Stream,
    /// The key does not exist.
    None,
    /// A module type the client does not know about.
    Other(String),
}

impl From<&str> for KeyType {
    fn from(name: &str) -> Self {
        match name {
            "string" => KeyType::String,
            "list" => KeyType::List,
            "set" => KeyType::Set,
            "zset" => KeyType::ZSet,
            "hash" => KeyType::Hash,
            "stream" => KeyType::Stream,
            "none" => KeyType::None,
            other => KeyType::Other(other.to_string()),
        }
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Remove the given keys. Returns how many of them existed.
    pub async fn del<K: ToArg>(&mut self, keys: &[K]) -> Result<i64> {
        self.query(Command::new("DEL").args(keys)).await?.into_int()
    }

    pub async fn exists(&mut self, key: impl ToArg) -> Result<bool> {
        self.query(Command::new("EXISTS").arg(key))
            .await?
            .into_bool()
    }

    /// A random key from the selected database, `None` when it is empty.
    pub async fn randomkey(&mut self) -> Result<Option<Bytes>> {
        self.query(Command::new("RANDOMKEY"))
            .await?
            .into_optional_bytes()
    }

    /// Move `key` to another database. `move` is a keyword, hence the name.
    pub async fn move_key(&mut self, key: impl ToArg, database: i64) -> Result<bool> {
        self.query(Command::new("MOVE").arg(key).arg(database))
            .await?
            .into_bool()
    }

    pub async fn rename(&mut self, key: impl ToArg, new_key: impl ToArg) -> Result<()> {
        self.query(Command::new("RENAME").arg(key).arg(new_key))
            .await?
            .into_ok()
    }

    /// Rename only if `new_key` does not exist. Returns whether it happened.
    pub async fn renamenx(&mut self, key: impl ToArg, new_key: impl ToArg) -> Result<bool> {
        self.query(Command::new("RENAMENX").arg(key).arg(new_key))
            .await?
            .into_bool()
    }

    pub async fn expire(&mut self, key: impl ToArg, seconds: i64) -> Result<bool> {
        self.query(Command::new("EXPIRE").arg(key).arg(seconds))
            .await?
            .into_bool()
    }

    pub async fn pexpire(&mut self, key: impl ToArg, milliseconds: i64) -> Result<bool> {
        self.query(Command::new("PEXPIRE").arg(key).arg(milliseconds))
            .await?
            .into_bool()
    }

    pub async fn expireat(&mut self, key: impl ToArg, unix_secs: i64) -> Result<bool> {
        self.query(Command::new("EXPIREAT").arg(key).arg(unix_secs))
            .await?
            .into_bool()
    }

    pub async fn pexpireat(&mut self, key: impl ToArg, unix_millis: i64) -> Result<bool> {
        self.query(Command::new("PEXPIREAT").arg(key).arg(unix_millis))
            .await?
            .into_bool()
    }

    /// Keys matching the glob `pattern`.
    pub async fn keys(&mut self, pattern: impl ToArg) -> Result<Vec<Bytes>> {
        self.query(Command::new("KEYS").arg(pattern))
            .await?
            .into_bytes_vec()
    }

    /// `OBJECT <subcommand> key`, e.g. `ENCODING` or `REFCOUNT`. The reply
    /// type depends on the subcommand and is returned as is.
    pub async fn object(&mut self, subcommand: &str, key: impl ToArg) -> Result<Reply> {
        self.query(Command::new("OBJECT").arg(subcommand).arg(key))
            .await
    }

    pub async fn key_type(&mut self, key: impl ToArg) -> Result<KeyType> {
        let name = self.query(Command::new("TYPE").arg(key)).await?.into_status()?;
        Ok(KeyType::from(name.as_str()))
    }

    /// Remaining time to live in seconds: `-1` without expiry, `-2` when the
    /// key does not exist.
    pub async fn ttl(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("TTL").arg(key)).await?.into_int()
    }

    pub async fn pttl(&mut self, key: impl ToArg) -> Result<i64> {
        self.query(Command::new("PTTL").arg(key)).await?.into_int()
    }

    pub async fn persist(&mut self, key: impl ToArg) -> Result<bool> {
        self.query(Command::new("PERSIST").arg(key))
            .await?
            .into_bool()
    }

    /// Serialized value of `key`, in the server's opaque dump format.
    pub async fn dump(&mut self, key: impl ToArg) -> Result<Option<Bytes>> {
        self.query(Command::new("DUMP").arg(key))
            .await?
            .into_optional_bytes()
    }

    pub async fn restore(
        &mut self,
        key: impl ToArg,
        ttl_millis: u64,
        serialized: impl ToArg,
    ) -> Result<()> {
        self.query(
            Command::new("RESTORE")
                .arg(key)
                .arg(ttl_millis)
                .arg(serialized),
        )
        .await?
        .into_ok()
    }

    pub async fn migrate(
        &mut self,
        host: &str,
        port: u16,
        key: impl ToArg,
        destination_db: i64,
        timeout_millis: u64,
    ) -> Result<()> {
        self.query(
            Command::new("MIGRATE")
                .arg(host)
                .arg(u64::from(port))
                .arg(key)
                .arg(destination_db)
                .arg(timeout_millis),
        )
        .await?
        .into_ok()
    }

    /// Run a `SORT`. The reply is the sorted elements, or the number of
    /// stored elements when the command has a `STORE` destination.
    pub async fn sort(&mut self, cmd: SortCmd) -> Result<Reply> {
        self.query(cmd.into_command()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_names() {
        assert_eq!(KeyType::from("zset"), KeyType::ZSet);
        assert_eq!(KeyType::from("none"), KeyType::None);
        assert_eq!(
            KeyType::from("ReJSON-RL"),
            KeyType::Other("ReJSON-RL".to_string())
        );
    }
}
