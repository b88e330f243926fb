use crate::{Error, Result};
use atoi::FromRadix10SignedChecked;
use bytes::{Buf, Bytes};
use std::fmt;
use std::io::Cursor;

/// The five RESP 2 reply types, identified by the first byte of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    Status,
    Error,
    Integer,
    BulkString,
    Array,
}

impl ReplyKind {
    pub fn from_tag(tag: u8) -> Option<ReplyKind> {
        match tag {
            b'+' => Some(ReplyKind::Status),
            b'-' => Some(ReplyKind::Error),
            b':' => Some(ReplyKind::Integer),
            b'$' => Some(ReplyKind::BulkString),
            b'*' => Some(ReplyKind::Array),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            ReplyKind::Status => b'+',
            ReplyKind::Error => b'-',
            ReplyKind::Integer => b':',
            ReplyKind::BulkString => b'$',
            ReplyKind::Array => b'*',
        }
    }
}

impl fmt::Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyKind::Status => "status",
            ReplyKind::Error => "error",
            ReplyKind::Integer => "integer",
            ReplyKind::BulkString => "bulk string",
            ReplyKind::Array => "array",
        };
        f.write_str(name)
    }
}

/// A reply in the Redis Serialization Protocol (RESP).
///
/// `BulkString(None)` and `Array(None)` are the protocol's null replies, e.g.
/// `GET` on a missing key or a blocking pop that timed out.
///
/// See: <https://redis.io/docs/latest/develop/reference/protocol-spec/>
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Status(String),
    Error(String),
    Integer(i64),
    BulkString(Option<Bytes>),
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// Checks if an entire reply can be decoded from `src`.
    ///
    /// On success the cursor is left right after the reply, so its position is
    /// the reply's length in bytes. Returns `Error::IncompleteReply` when more
    /// bytes are needed.
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<()> {
        match get_u8(src)? {
            b'+' | b'-' => {
                get_line(src)?;
                Ok(())
            }
            b':' => {
                get_decimal(src)?;
                Ok(())
            }
            b'$' => match get_length(src)? {
                None => Ok(()),
                Some(len) => {
                    skip(src, len)?;
                    get_terminator(src)
                }
            },
            b'*' => {
                if let Some(count) = get_length(src)? {
                    for _ in 0..count {
                        Reply::check(src)?;
                    }
                }
                Ok(())
            }
            actual => Err(Error::Protocol(format!(
                "invalid reply type byte `{}`",
                actual.escape_ascii()
            ))),
        }
    }

    /// Decodes one reply from `src`, recursing into array elements.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Reply> {
        // The first byte of the reply indicates the data type.
        match get_u8(src)? {
            b'+' => {
                let line = get_line(src)?;
                Ok(Reply::Status(String::from_utf8_lossy(line).into_owned()))
            }
            b'-' => {
                let line = get_line(src)?;
                Ok(Reply::Error(String::from_utf8_lossy(line).into_owned()))
            }
            b':' => Ok(Reply::Integer(get_decimal(src)?)),
            b'$' => match get_length(src)? {
                None => Ok(Reply::BulkString(None)),
                Some(len) => {
                    if src.remaining() < len {
                        return Err(Error::IncompleteReply);
                    }
                    // Length prefixed, so embedded `\r\n` and NUL bytes are kept.
                    let data = Bytes::copy_from_slice(&src.chunk()[..len]);
                    src.advance(len);
                    get_terminator(src)?;
                    Ok(Reply::BulkString(Some(data)))
                }
            },
            b'*' => match get_length(src)? {
                None => Ok(Reply::Array(None)),
                Some(count) => {
                    let mut out = Vec::with_capacity(count);
                    for _ in 0..count {
                        out.push(Reply::parse(src)?);
                    }
                    Ok(Reply::Array(Some(out)))
                }
            },
            first_byte => Err(Error::Protocol(format!(
                "first byte was not a valid RESP type `{}`",
                first_byte.escape_ascii()
            ))),
        }
    }

    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Status(_) => ReplyKind::Status,
            Reply::Error(_) => ReplyKind::Error,
            Reply::Integer(_) => ReplyKind::Integer,
            Reply::BulkString(_) => ReplyKind::BulkString,
            Reply::Array(_) => ReplyKind::Array,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Turns an `Error` reply into `Error::Server`, passing every other reply through.
    pub fn into_result(self) -> Result<Reply> {
        match self {
            Reply::Error(msg) => Err(Error::Server(msg)),
            reply => Ok(reply),
        }
    }

    /// Accepts any status reply (`+OK`, `+QUEUED`, ...).
    pub fn into_ok(self) -> Result<()> {
        match self {
            Reply::Status(_) => Ok(()),
            reply => Err(reply.mismatch("status")),
        }
    }

    pub fn into_status(self) -> Result<String> {
        match self {
            Reply::Status(status) => Ok(status),
            reply => Err(reply.mismatch("status")),
        }
    }

    pub fn into_int(self) -> Result<i64> {
        match self {
            Reply::Integer(n) => Ok(n),
            reply => Err(reply.mismatch("integer")),
        }
    }

    /// `ZRANK` and friends answer with an integer or a null bulk string.
    pub fn into_optional_int(self) -> Result<Option<i64>> {
        match self {
            Reply::Integer(n) => Ok(Some(n)),
            Reply::BulkString(None) => Ok(None),
            reply => Err(reply.mismatch("integer or null")),
        }
    }

    /// Integer replies are true when non-zero, status replies are always true.
    pub fn into_bool(self) -> Result<bool> {
        match self {
            Reply::Integer(n) => Ok(n != 0),
            Reply::Status(_) => Ok(true),
            reply => Err(reply.mismatch("integer")),
        }
    }

    pub fn into_optional_bytes(self) -> Result<Option<Bytes>> {
        match self {
            Reply::BulkString(data) => Ok(data),
            Reply::Status(status) => Ok(Some(status.into())),
            reply => Err(reply.mismatch("bulk string")),
        }
    }

    pub fn into_bytes(self) -> Result<Bytes> {
        self.into_optional_bytes()?
            .ok_or_else(|| Error::UnexpectedReply("expected bulk string, got null".into()))
    }

    pub fn into_string(self) -> Result<String> {
        Ok(String::from_utf8(self.into_bytes()?.to_vec())?)
    }

    pub fn into_float(self) -> Result<f64> {
        let data = self.into_bytes()?;
        Ok(String::from_utf8(data.to_vec())?.parse()?)
    }

    pub fn into_optional_float(self) -> Result<Option<f64>> {
        match self.into_optional_bytes()? {
            Some(data) => Ok(Some(String::from_utf8(data.to_vec())?.parse()?)),
            None => Ok(None),
        }
    }

    pub fn into_optional_array(self) -> Result<Option<Vec<Reply>>> {
        match self {
            Reply::Array(items) => Ok(items),
            reply => Err(reply.mismatch("array")),
        }
    }

    pub fn into_array(self) -> Result<Vec<Reply>> {
        self.into_optional_array()?
            .ok_or_else(|| Error::UnexpectedReply("expected array, got null".into()))
    }

    /// An array whose elements are all (possibly null) bulk strings.
    pub fn into_optional_bytes_vec(self) -> Result<Vec<Option<Bytes>>> {
        self.into_array()?
            .into_iter()
            .map(Reply::into_optional_bytes)
            .collect()
    }

    /// An array whose elements are all non-null bulk strings.
    pub fn into_bytes_vec(self) -> Result<Vec<Bytes>> {
        self.into_array()?
            .into_iter()
            .map(Reply::into_bytes)
            .collect()
    }

    fn mismatch(self, expected: &str) -> Error {
        match self {
            Reply::Error(msg) => Error::Server(msg),
            reply => Error::UnexpectedReply(format!("expected {expected}, got {}", reply.kind())),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(status) => write!(f, "{status}"),
            Reply::Error(msg) => write!(f, "(error) {msg}"),
            Reply::Integer(n) => write!(f, "(integer) {n}"),
            Reply::BulkString(Some(data)) => write!(f, "\"{}\"", data.escape_ascii()),
            Reply::BulkString(None) | Reply::Array(None) => write!(f, "(nil)"),
            Reply::Array(Some(items)) if items.is_empty() => write!(f, "(empty array)"),
            Reply::Array(Some(items)) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {item}", i + 1)?;
                }
                Ok(())
            }
        }
    }
}

fn get_u8(src: &mut Cursor<&[u8]>) -> Result<u8> {
    if !src.has_remaining() {
        return Err(Error::IncompleteReply);
    }
    Ok(src.get_u8())
}

fn skip(src: &mut Cursor<&[u8]>, n: usize) -> Result<()> {
    if src.remaining() < n {
        return Err(Error::IncompleteReply);
    }
    src.advance(n);
    Ok(())
}

/// Consumes the `\r\n` that must follow a bulk string payload.
fn get_terminator(src: &mut Cursor<&[u8]>) -> Result<()> {
    if src.remaining() < 2 {
        return Err(Error::IncompleteReply);
    }
    if &src.chunk()[..2] != b"\r\n" {
        return Err(Error::Protocol(
            "bulk string payload is not terminated by CRLF".into(),
        ));
    }
    src.advance(2);
    Ok(())
}

fn get_decimal(src: &mut Cursor<&[u8]>) -> Result<i64> {
    let line = get_line(src)?;
    parse_decimal(line).ok_or_else(|| {
        Error::Protocol(format!("invalid decimal `{}`", line.escape_ascii()))
    })
}

/// Reads a bulk string length or an array count, `-1` meaning null.
fn get_length(src: &mut Cursor<&[u8]>) -> Result<Option<usize>> {
    match get_decimal(src)? {
        -1 => Ok(None),
        len if len < 0 => Err(Error::Protocol(format!(
            "only valid negative length is -1, got `{len}`"
        ))),
        len => usize::try_from(len)
            .map(Some)
            .map_err(|_| Error::Protocol(format!("length `{len}` does not fit in memory"))),
    }
}

/// Parses the whole line as a signed 64-bit decimal.
///
/// A leading `+` is tolerated, trailing garbage is not.
pub(crate) fn parse_decimal(line: &[u8]) -> Option<i64> {
    if !line.last().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    match i64::from_radix_10_signed_checked(line) {
        (Some(n), used) if used == line.len() => Some(n),
        _ => None,
    }
}

fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8]> {
    let buf: &'a [u8] = *src.get_ref();
    let start = src.position() as usize;
    let rest = buf.get(start..).unwrap_or_default();

    match rest.windows(2).position(|w| w == b"\r\n") {
        Some(end) => {
            src.set_position((start + end + 2) as u64);
            Ok(&rest[..end])
        }
        None => Err(Error::IncompleteReply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &[u8]) -> Result<Reply> {
        let mut buf = Cursor::new(src);
        Reply::check(&mut buf)?;
        let len = buf.position();
        buf.set_position(0);
        let reply = Reply::parse(&mut buf)?;
        assert_eq!(len, buf.position(), "check and parse disagree on length");
        Ok(reply)
    }

    #[test]
    fn test_all_reply_types() {
        let replies: &[&[u8]] = &[
            b"+OK\r\n",
            b"-ERR unknown command 'foobar'\r\n",
            b":1000\r\n",
            b"$6\r\nfoobar\r\n",
            b"$-1\r\n",
            b"*1\r\n+OK\r\n",
            b"*-1\r\n",
        ];
        for reply in replies {
            match_reply(reply);
        }
    }

    /// This function is used to ensure that parse contains every variant of [`Reply`].
    fn match_reply(src: &[u8]) {
        let reply = parse(src).unwrap();
        assert_eq!(reply.kind().tag(), src[0]);
        assert_eq!(ReplyKind::from_tag(src[0]), Some(reply.kind()));
        // A match statement without a catch-all arm will fail to compile if a variant is missing.
        match reply {
            Reply::Status(_) => (),
            Reply::Error(_) => (),
            Reply::Integer(_) => (),
            Reply::BulkString(_) => (),
            Reply::Array(_) => (),
        }
    }

    #[test]
    fn test_status() {
        assert_eq!(parse(b"+OK\r\n").unwrap(), Reply::Status("OK".to_string()));
        assert_eq!(
            parse(b"+this is a long string\r\n").unwrap(),
            Reply::Status("this is a long string".to_string())
        );
        assert_eq!(parse(b"+\r\n").unwrap(), Reply::Status(String::new()));
    }

    #[test]
    fn test_error() {
        let reply = parse(b"-ERR wrong type\r\n").unwrap();
        assert_eq!(reply, Reply::Error("ERR wrong type".to_string()));
        assert!(reply.is_error());
    }

    #[test]
    fn test_integer() {
        assert_eq!(parse(b":1000\r\n").unwrap(), Reply::Integer(1000));
        assert_eq!(parse(b":000001\r\n").unwrap(), Reply::Integer(1));
        assert_eq!(parse(b":-0\r\n").unwrap(), Reply::Integer(0));
        assert_eq!(parse(b":+1\r\n").unwrap(), Reply::Integer(1));
        assert_eq!(parse(b":-1\r\n").unwrap(), Reply::Integer(-1));
        assert_eq!(
            parse(b":+9223372036854775807\r\n").unwrap(),
            Reply::Integer(i64::MAX)
        );
        assert_eq!(
            parse(b":-9223372036854775808\r\n").unwrap(),
            Reply::Integer(i64::MIN)
        );
    }

    #[test]
    fn test_invalid_integer() {
        for src in [
            &b":12abc\r\n"[..],
            b":\r\n",
            b":+\r\n",
            b":9223372036854775808\r\n",
        ] {
            assert!(matches!(parse(src), Err(Error::Protocol(_))), "{src:?}");
        }
    }

    #[test]
    fn test_bulk_string() {
        assert_eq!(
            parse(b"$6\r\nfoobar\r\n").unwrap(),
            Reply::BulkString(Some(Bytes::from("foobar")))
        );
        assert_eq!(
            parse(b"$0\r\n\r\n").unwrap(),
            Reply::BulkString(Some(Bytes::new()))
        );
        assert_eq!(
            parse(b"$+2\r\nOK\r\n").unwrap(),
            Reply::BulkString(Some(Bytes::from("OK")))
        );
    }

    #[test]
    fn test_binary_bulk_string() {
        let reply = parse(b"$8\r\na\r\nb\0c\r\n\r\n").unwrap();
        assert_eq!(
            reply,
            Reply::BulkString(Some(Bytes::from_static(b"a\r\nb\0c\r\n")))
        );
    }

    #[test]
    fn test_null_bulk_string() {
        assert_eq!(parse(b"$-1\r\n").unwrap(), Reply::BulkString(None));
    }

    #[test]
    fn test_invalid_bulk_string() {
        assert!(matches!(parse(b"$-2\r\n"), Err(Error::Protocol(_))));
        assert!(matches!(parse(b"$3\r\nfoobar\r\n"), Err(Error::Protocol(_))));
        assert!(matches!(parse(b"$x\r\nfoo\r\n"), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_array() {
        assert_eq!(
            parse(b"*2\r\n+OK\r\n$6\r\nfoobar\r\n").unwrap(),
            Reply::Array(Some(vec![
                Reply::Status("OK".to_string()),
                Reply::BulkString(Some(Bytes::from("foobar"))),
            ]))
        );
        assert_eq!(
            parse(b"*3\r\n:1\r\n$-1\r\n-ERR nope\r\n").unwrap(),
            Reply::Array(Some(vec![
                Reply::Integer(1),
                Reply::BulkString(None),
                Reply::Error("ERR nope".to_string()),
            ]))
        );
        assert!(matches!(
            parse(b"*3\r\n+OK\r\n"),
            Err(Error::IncompleteReply)
        ));
    }

    #[test]
    fn test_null_and_empty_array() {
        assert_eq!(parse(b"*-1\r\n").unwrap(), Reply::Array(None));
        assert_eq!(parse(b"*0\r\n").unwrap(), Reply::Array(Some(vec![])));
        assert!(matches!(parse(b"*-3\r\n"), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_nested_array() {
        assert_eq!(
            parse(b"*2\r\n*1\r\n:1\r\n$1\r\na\r\n").unwrap(),
            Reply::Array(Some(vec![
                Reply::Array(Some(vec![Reply::Integer(1)])),
                Reply::BulkString(Some(Bytes::from("a"))),
            ]))
        );
    }

    #[test]
    fn test_incomplete() {
        for src in [
            &b""[..],
            b"+OK",
            b"+OK\r",
            b":12",
            b"$6\r\nfoo",
            b"$6\r\nfoobar",
            b"$6\r\nfoobar\r",
            b"*2\r\n:1\r\n",
        ] {
            assert!(matches!(parse(src), Err(Error::IncompleteReply)), "{src:?}");
        }
    }

    #[test]
    fn test_invalid_type_byte() {
        assert!(matches!(parse(b"invalid reply\r\n"), Err(Error::Protocol(_))));
        assert!(matches!(parse(b"_\r\n"), Err(Error::Protocol(_))));
        assert!(matches!(parse(b"\r\n"), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_conversions() {
        assert!(!Reply::Integer(0).into_bool().unwrap());
        assert!(Reply::Integer(3).into_bool().unwrap());
        assert_eq!(Reply::BulkString(None).into_optional_bytes().unwrap(), None);
        assert_eq!(
            Reply::BulkString(Some(Bytes::from("3.5"))).into_float().unwrap(),
            3.5
        );
        assert!(matches!(
            Reply::Error("ERR no".into()).into_int(),
            Err(Error::Server(msg)) if msg == "ERR no"
        ));
        assert!(matches!(
            Reply::Status("OK".into()).into_int(),
            Err(Error::UnexpectedReply(_))
        ));
        assert!(matches!(
            Reply::Array(None).into_array(),
            Err(Error::UnexpectedReply(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Reply::Integer(7).to_string(), "(integer) 7");
        assert_eq!(Reply::BulkString(None).to_string(), "(nil)");
        assert_eq!(
            Reply::Array(Some(vec![
                Reply::BulkString(Some(Bytes::from("a"))),
                Reply::Status("OK".into()),
            ]))
            .to_string(),
            "1) \"a\"\n2) OK"
        );
    }
}
