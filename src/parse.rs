use crate::{reply::parse_decimal, Error, Reply, Result};
use bytes::Bytes;

/// Walks the elements of an array reply.
///
/// Used by commands whose reply is a fixed-shape array (`TIME`, `BLPOP`) or a
/// flat list of pairs (`HGETALL`, `ZRANGE ... WITHSCORES`).
#[derive(Debug)]
pub(crate) struct Parse {
    parts: std::vec::IntoIter<Reply>,
}

impl Parse {
    pub(crate) fn new(reply: Reply) -> Result<Parse> {
        let array = reply.into_array()?;

        Ok(Parse {
            parts: array.into_iter(),
        })
    }

    /// Like `new`, but a null array yields `None`.
    pub(crate) fn optional(reply: Reply) -> Result<Option<Parse>> {
        Ok(reply.into_optional_array()?.map(|array| Parse {
            parts: array.into_iter(),
        }))
    }

    fn next(&mut self) -> Result<Reply> {
        self.parts.next().ok_or(Error::EndOfStream)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.parts.len()
    }

    pub(crate) fn next_bytes(&mut self) -> Result<Bytes> {
        self.next()?.into_bytes()
    }

    pub(crate) fn next_string(&mut self) -> Result<String> {
        self.next()?.into_string()
    }

    pub(crate) fn next_float(&mut self) -> Result<f64> {
        self.next()?.into_float()
    }

    /// Integers may come as integer replies or as decimal bulk strings.
    pub(crate) fn next_int(&mut self) -> Result<i64> {
        let invalid_number_err = || Error::UnexpectedReply("invalid number".to_string());

        match self.next()? {
            Reply::Integer(v) => Ok(v),
            Reply::Status(data) => parse_decimal(data.as_bytes()).ok_or_else(invalid_number_err),
            Reply::BulkString(Some(data)) => parse_decimal(&data).ok_or_else(invalid_number_err),
            reply => Err(Error::UnexpectedReply(format!(
                "expected integer, got {}",
                reply.kind()
            ))),
        }
    }

    /// Consumes the rest of the array two elements at a time.
    pub(crate) fn pairs<A, B>(
        mut self,
        mut first: impl FnMut(&mut Parse) -> Result<A>,
        mut second: impl FnMut(&mut Parse) -> Result<B>,
    ) -> Result<Vec<(A, B)>> {
        if self.remaining() % 2 != 0 {
            return Err(Error::UnexpectedReply(format!(
                "expected an even number of elements, got {}",
                self.remaining()
            )));
        }
        let mut out = Vec::with_capacity(self.remaining() / 2);
        while self.remaining() > 0 {
            let a = first(&mut self)?;
            let b = second(&mut self)?;
            out.push((a, b));
        }
        Ok(out)
    }

    pub(crate) fn finish(&mut self) -> Result<()> {
        if self.parts.next().is_none() {
            Ok(())
        } else {
            Err(Error::UnexpectedReply(
                "expected end of array reply".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(data: &'static str) -> Reply {
        Reply::BulkString(Some(Bytes::from(data)))
    }

    #[test]
    fn test_fixed_shape() {
        let reply = Reply::Array(Some(vec![bulk("1700000000"), bulk("250")]));
        let mut parse = Parse::new(reply).unwrap();
        assert_eq!(parse.next_int().unwrap(), 1_700_000_000);
        assert_eq!(parse.next_int().unwrap(), 250);
        parse.finish().unwrap();
        assert!(matches!(parse.next_bytes(), Err(Error::EndOfStream)));
    }

    #[test]
    fn test_pairs() {
        let reply = Reply::Array(Some(vec![bulk("a"), bulk("1"), bulk("b"), bulk("2.5")]));
        let pairs = Parse::new(reply)
            .unwrap()
            .pairs(Parse::next_bytes, Parse::next_float)
            .unwrap();
        assert_eq!(
            pairs,
            vec![(Bytes::from("a"), 1.0), (Bytes::from("b"), 2.5)]
        );

        let odd = Reply::Array(Some(vec![bulk("a")]));
        assert!(Parse::new(odd)
            .unwrap()
            .pairs(Parse::next_bytes, Parse::next_bytes)
            .is_err());
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(
            Parse::new(Reply::Integer(1)),
            Err(Error::UnexpectedReply(_))
        ));
        assert!(Parse::optional(Reply::Array(None)).unwrap().is_none());
    }

    #[test]
    fn test_invalid_number() {
        let reply = Reply::Array(Some(vec![bulk("12x")]));
        assert!(Parse::new(reply).unwrap().next_int().is_err());
    }
}
