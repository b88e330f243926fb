use bytes::Bytes;

use super::{Command, ToArg};

/// One end of a `ZRANGEBYSCORE`/`ZCOUNT` score interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBound {
    Inclusive(f64),
    Exclusive(f64),
    NegInfinity,
    PosInfinity,
}

impl ToArg for ScoreBound {
    fn to_arg(&self) -> Bytes {
        match self {
            ScoreBound::Inclusive(score) => score.to_arg(),
            ScoreBound::Exclusive(score) => Bytes::from(format!("({score}")),
            ScoreBound::NegInfinity => Bytes::from_static(b"-inf"),
            ScoreBound::PosInfinity => Bytes::from_static(b"+inf"),
        }
    }
}

/// How `ZUNIONSTORE`/`ZINTERSTORE` combine the scores of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Min,
    Max,
}

impl ToArg for Aggregate {
    fn to_arg(&self) -> Bytes {
        match self {
            Aggregate::Sum => Bytes::from_static(b"SUM"),
            Aggregate::Min => Bytes::from_static(b"MIN"),
            Aggregate::Max => Bytes::from_static(b"MAX"),
        }
    }
}

/// `ZUNIONSTORE | ZINTERSTORE destination numkeys key [key ...] [WEIGHTS weight ...]`
/// `[AGGREGATE SUM | MIN | MAX]`
#[derive(Debug, Clone)]
pub struct ZStoreCmd {
    verb: &'static str,
    destination: Bytes,
    keys: Vec<Bytes>,
    weights: Vec<f64>,
    aggregate: Option<Aggregate>,
}

impl ZStoreCmd {
    pub fn union<K: ToArg>(destination: impl ToArg, keys: &[K]) -> ZStoreCmd {
        ZStoreCmd::new("ZUNIONSTORE", destination, keys)
    }

    pub fn inter<K: ToArg>(destination: impl ToArg, keys: &[K]) -> ZStoreCmd {
        ZStoreCmd::new("ZINTERSTORE", destination, keys)
    }

    fn new<K: ToArg>(verb: &'static str, destination: impl ToArg, keys: &[K]) -> ZStoreCmd {
        ZStoreCmd {
            verb,
            destination: destination.to_arg(),
            keys: keys.iter().map(ToArg::to_arg).collect(),
            weights: Vec::new(),
            aggregate: None,
        }
    }

    /// One weight per source key, in the same order as the keys.
    pub fn weights(mut self, weights: &[f64]) -> ZStoreCmd {
        self.weights = weights.to_vec();
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> ZStoreCmd {
        self.aggregate = Some(aggregate);
        self
    }

    pub fn into_command(self) -> Command {
        let mut cmd = Command::new(self.verb)
            .arg(self.destination)
            .arg(self.keys.len())
            .args(self.keys);
        if !self.weights.is_empty() {
            cmd = cmd.arg("WEIGHTS").args(self.weights);
        }
        if let Some(aggregate) = self.aggregate {
            cmd = cmd.arg("AGGREGATE").arg(aggregate);
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert_eq!(ScoreBound::Inclusive(1.5).to_arg(), "1.5");
        assert_eq!(ScoreBound::Exclusive(2.0).to_arg(), "(2");
        assert_eq!(ScoreBound::NegInfinity.to_arg(), "-inf");
        assert_eq!(ScoreBound::PosInfinity.to_arg(), "+inf");
    }

    #[test]
    fn test_zunionstore() {
        let cmd = ZStoreCmd::union("out", &["a", "b"])
            .weights(&[1.0, 2.5])
            .aggregate(Aggregate::Max)
            .into_command();
        let expected = Command::new("ZUNIONSTORE").args([
            "out", "2", "a", "b", "WEIGHTS", "1", "2.5", "AGGREGATE", "MAX",
        ]);
        assert_eq!(cmd, expected);
    }

    #[test]
    fn test_zinterstore() {
        let cmd = ZStoreCmd::inter("out", &["a"]).into_command();
        assert_eq!(cmd, Command::new("ZINTERSTORE").args(["out", "1", "a"]));
    }
}
