use bytes::Bytes;

use super::{Command, ToArg};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// `SORT key [BY pattern] [LIMIT offset count] [GET pattern ...] [ASC | DESC] [ALPHA]`
/// `[STORE destination]`
///
/// Without `STORE` the server answers with the sorted elements, with it the
/// number of stored elements.
#[derive(Debug, Clone)]
pub struct SortCmd {
    key: Bytes,
    by: Option<Bytes>,
    limit: Option<(i64, i64)>,
    get: Vec<Bytes>,
    order: Option<SortOrder>,
    alpha: bool,
    store: Option<Bytes>,
}

impl SortCmd {
    pub fn new(key: impl ToArg) -> SortCmd {
        SortCmd {
            key: key.to_arg(),
            by: None,
            limit: None,
            get: Vec::new(),
            order: None,
            alpha: false,
            store: None,
        }
    }

    pub fn by(mut self, pattern: impl ToArg) -> SortCmd {
        self.by = Some(pattern.to_arg());
        self
    }

    pub fn limit(mut self, offset: i64, count: i64) -> SortCmd {
        self.limit = Some((offset, count));
        self
    }

    /// May be called several times, one `GET` is sent per pattern.
    pub fn get(mut self, pattern: impl ToArg) -> SortCmd {
        self.get.push(pattern.to_arg());
        self
    }

    pub fn order(mut self, order: SortOrder) -> SortCmd {
        self.order = Some(order);
        self
    }

    pub fn alpha(mut self) -> SortCmd {
        self.alpha = true;
        self
    }

    pub fn store(mut self, destination: impl ToArg) -> SortCmd {
        self.store = Some(destination.to_arg());
        self
    }

    pub fn is_store(&self) -> bool {
        self.store.is_some()
    }

    pub fn into_command(self) -> Command {
        let mut cmd = Command::new("SORT").arg(self.key);
        if let Some(pattern) = self.by {
            cmd = cmd.arg("BY").arg(pattern);
        }
        if let Some((offset, count)) = self.limit {
            cmd = cmd.arg("LIMIT").arg(offset).arg(count);
        }
        for pattern in self.get {
            cmd = cmd.arg("GET").arg(pattern);
        }
        match self.order {
            Some(SortOrder::Asc) => cmd = cmd.arg("ASC"),
            Some(SortOrder::Desc) => cmd = cmd.arg("DESC"),
            None => {}
        }
        if self.alpha {
            cmd = cmd.arg("ALPHA");
        }
        if let Some(destination) = self.store {
            cmd = cmd.arg("STORE").arg(destination);
        }
        cmd
    }
}
