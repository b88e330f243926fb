use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{cmd::ToArg, parse::Parse, Client, Command, Reply, Result};

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Ping to the server.
    ///
    /// Returns PONG if no argument is provided, otherwise
    /// return a copy of the argument as a bulk.
    ///
    /// This command is often used to test if a connection
    /// is still alive, or to measure latency.
    pub async fn ping(&mut self, msg: Option<Bytes>) -> Result<Bytes> {
        let mut cmd = Command::new("PING");
        if let Some(msg) = msg {
            cmd.push_arg(msg);
        }
        self.query(cmd).await?.into_bytes()
    }

    pub async fn echo(&mut self, msg: impl ToArg) -> Result<Bytes> {
        self.query(Command::new("ECHO").arg(msg)).await?.into_bytes()
    }

    /// Start a background rewrite of the append-only file.
    pub async fn bgrewriteaof(&mut self) -> Result<()> {
        self.query(Command::new("BGREWRITEAOF")).await?.into_ok()
    }

    /// Save the dataset to disk in the background.
    pub async fn bgsave(&mut self) -> Result<()> {
        self.query(Command::new("BGSAVE")).await?.into_ok()
    }

    /// Synchronously save the dataset to disk.
    pub async fn save(&mut self) -> Result<()> {
        self.query(Command::new("SAVE")).await?.into_ok()
    }

    /// Unix time of the last successful save.
    pub async fn lastsave(&mut self) -> Result<i64> {
        self.query(Command::new("LASTSAVE")).await?.into_int()
    }

    /// Configuration parameters matching the glob `pattern`, as `(name, value)` pairs.
    pub async fn config_get(&mut self, pattern: &str) -> Result<Vec<(String, Bytes)>> {
        let reply = self
            .query(Command::new("CONFIG").arg("GET").arg(pattern))
            .await?;
        Parse::new(reply)?.pairs(Parse::next_string, Parse::next_bytes)
    }

    pub async fn config_set(&mut self, parameter: &str, value: impl ToArg) -> Result<()> {
        self.query(Command::new("CONFIG").arg("SET").arg(parameter).arg(value))
            .await?
            .into_ok()
    }

    /// Reset the statistics reported by `INFO`.
    pub async fn config_resetstat(&mut self) -> Result<()> {
        self.query(Command::new("CONFIG").arg("RESETSTAT"))
            .await?
            .into_ok()
    }

    /// Number of keys in the selected database.
    pub async fn dbsize(&mut self) -> Result<i64> {
        self.query(Command::new("DBSIZE")).await?.into_int()
    }

    pub async fn flushall(&mut self) -> Result<()> {
        self.query(Command::new("FLUSHALL")).await?.into_ok()
    }

    pub async fn flushdb(&mut self) -> Result<()> {
        self.query(Command::new("FLUSHDB")).await?.into_ok()
    }

    /// Server information as `(field, value)` pairs, in the order the server
    /// reports them. Section headers and blank lines are skipped.
    pub async fn info(&mut self, section: Option<&str>) -> Result<Vec<(String, String)>> {
        let mut cmd = Command::new("INFO");
        if let Some(section) = section {
            cmd.push_arg(section);
        }
        let text = self.query(cmd).await?.into_string()?;
        Ok(parse_info(&text))
    }

    /// Make the server a replica of `host:port`, or promote it back to a
    /// primary with `None`.
    pub async fn slaveof(&mut self, primary: Option<(&str, u16)>) -> Result<()> {
        let cmd = match primary {
            Some((host, port)) => Command::new("SLAVEOF").arg(host).arg(u64::from(port)),
            None => Command::new("SLAVEOF").arg("NO").arg("ONE"),
        };
        self.query(cmd).await?.into_ok()
    }

    /// Server clock as `(unix seconds, microseconds)`.
    pub async fn time(&mut self) -> Result<(i64, i64)> {
        let mut parse = Parse::new(self.query(Command::new("TIME")).await?)?;
        let secs = parse.next_int()?;
        let micros = parse.next_int()?;
        parse.finish()?;
        Ok((secs, micros))
    }

    /// Slow log entries, newest first. Each entry is left as the array the
    /// server sent, as its shape changed between server versions.
    pub async fn slowlog_get(&mut self, count: Option<u64>) -> Result<Vec<Reply>> {
        let mut cmd = Command::new("SLOWLOG").arg("GET");
        if let Some(count) = count {
            cmd.push_arg(count);
        }
        self.query(cmd).await?.into_array()
    }

    pub async fn slowlog_len(&mut self) -> Result<i64> {
        self.query(Command::new("SLOWLOG").arg("LEN"))
            .await?
            .into_int()
    }

    pub async fn slowlog_reset(&mut self) -> Result<()> {
        self.query(Command::new("SLOWLOG").arg("RESET"))
            .await?
            .into_ok()
    }
}

fn parse_info(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info() {
        let text = "# Server\r\nredis_version:7.2.4\r\nrole:master\r\n\r\n\
                    # Keyspace\r\ndb0:keys=1,expires=0\r\n";
        assert_eq!(
            parse_info(text),
            vec![
                ("redis_version".to_string(), "7.2.4".to_string()),
                ("role".to_string(), "master".to_string()),
                ("db0".to_string(), "keys=1,expires=0".to_string()),
            ]
        );
    }
}
