use std::time::Duration;

use bytes::Bytes;

use super::{Command, ToArg};

/// Time to live attached to a `SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// `EX seconds`
    Seconds(u64),
    /// `PX milliseconds`
    Milliseconds(u64),
}

impl From<Duration> for Expiration {
    /// Whole seconds are sent as `EX`, anything finer as `PX`, rounded up to
    /// the next millisecond so a non-zero duration never becomes zero.
    fn from(duration: Duration) -> Self {
        if duration.subsec_nanos() == 0 {
            return Expiration::Seconds(duration.as_secs());
        }
        let millis = duration.as_nanos().div_ceil(1_000_000);
        Expiration::Milliseconds(u64::try_from(millis).unwrap_or(u64::MAX))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCondition {
    /// `NX`: only set the key if it does not already exist.
    IfAbsent,
    /// `XX`: only set the key if it already exists.
    IfPresent,
}

/// `SET key value [EX seconds | PX milliseconds] [NX | XX]`
#[derive(Debug, Clone)]
pub struct SetCmd {
    key: Bytes,
    value: Bytes,
    expiration: Option<Expiration>,
    condition: Option<SetCondition>,
}

impl SetCmd {
    pub fn new(key: impl ToArg, value: impl ToArg) -> SetCmd {
        SetCmd {
            key: key.to_arg(),
            value: value.to_arg(),
            expiration: None,
            condition: None,
        }
    }

    pub fn key(&self) -> &Bytes {
        &self.key
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }

    pub fn expire(mut self, expiration: impl Into<Expiration>) -> SetCmd {
        self.expiration = Some(expiration.into());
        self
    }

    pub fn condition(mut self, condition: SetCondition) -> SetCmd {
        self.condition = Some(condition);
        self
    }

    /// Whether the server may answer with a null reply instead of `OK`.
    pub fn is_conditional(&self) -> bool {
        self.condition.is_some()
    }

    pub fn into_command(self) -> Command {
        let mut cmd = Command::new("SET").arg(self.key).arg(self.value);
        match self.expiration {
            Some(Expiration::Seconds(secs)) => cmd = cmd.arg("EX").arg(secs),
            Some(Expiration::Milliseconds(millis)) => cmd = cmd.arg("PX").arg(millis),
            None => {}
        }
        match self.condition {
            Some(SetCondition::IfAbsent) => cmd.arg("NX"),
            Some(SetCondition::IfPresent) => cmd.arg("XX"),
            None => cmd,
        }
    }
}
