use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

pub mod set;
pub use set::{Expiration, SetCmd, SetCondition};

pub mod sort;
pub use sort::{SortCmd, SortOrder};

pub mod zset;
pub use zset::{Aggregate, ScoreBound, ZStoreCmd};

/// Conversion of a value into one binary-safe command argument.
///
/// Strings and byte slices are sent as-is, numbers in their decimal form.
pub trait ToArg {
    fn to_arg(&self) -> Bytes;
}

impl ToArg for str {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }
}

impl ToArg for String {
    fn to_arg(&self) -> Bytes {
        self.as_str().to_arg()
    }
}

impl ToArg for [u8] {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl<const N: usize> ToArg for [u8; N] {
    fn to_arg(&self) -> Bytes {
        Bytes::copy_from_slice(self)
    }
}

impl ToArg for Vec<u8> {
    fn to_arg(&self) -> Bytes {
        self.as_slice().to_arg()
    }
}

impl ToArg for Bytes {
    fn to_arg(&self) -> Bytes {
        self.clone()
    }
}

impl<T: ToArg + ?Sized> ToArg for &T {
    fn to_arg(&self) -> Bytes {
        (**self).to_arg()
    }
}

macro_rules! decimal_to_arg {
    ($($ty:ty),*) => {
        $(
            impl ToArg for $ty {
                fn to_arg(&self) -> Bytes {
                    Bytes::from(self.to_string())
                }
            }
        )*
    };
}

decimal_to_arg!(i32, i64, u32, u64, usize, f64);

/// A command ready to be sent: the verb followed by its arguments.
///
/// Encodes to a RESP array of bulk strings. Arguments are never inspected or
/// modified, so they may hold any bytes, `\r\n` and NUL included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    parts: Vec<Bytes>,
}

impl Command {
    /// Creates a command with no arguments. The verb is uppercased.
    pub fn new(verb: &str) -> Command {
        Command {
            parts: vec![Bytes::from(verb.to_ascii_uppercase())],
        }
    }

    pub fn arg(mut self, arg: impl ToArg) -> Command {
        self.push_arg(arg);
        self
    }

    pub fn args<I>(mut self, args: I) -> Command
    where
        I: IntoIterator,
        I::Item: ToArg,
    {
        self.parts.extend(args.into_iter().map(|arg| arg.to_arg()));
        self
    }

    pub fn push_arg(&mut self, arg: impl ToArg) {
        self.parts.push(arg.to_arg());
    }

    pub fn name(&self) -> &[u8] {
        &self.parts[0]
    }

    /// The arguments following the verb.
    pub fn arguments(&self) -> &[Bytes] {
        &self.parts[1..]
    }

    /// Number of elements on the wire, verb included.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always `false`: a command holds at least its verb.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Appends the wire form of the command to `dst`.
    ///
    /// ```text
    /// *<N>\r\n
    /// $<len(arg0)>\r\n<arg0>\r\n
    /// ...
    /// ```
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(b'*');
        put_decimal(dst, self.parts.len());
        for part in &self.parts {
            dst.reserve(part.len() + 16);
            dst.put_u8(b'$');
            put_decimal(dst, part.len());
            dst.put_slice(part);
            dst.put_slice(b"\r\n");
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::new();
        self.encode(&mut dst);
        dst.freeze()
    }
}

impl Command {
    /// Index of the first argument that may carry a credential.
    fn secret_from(&self) -> Option<usize> {
        let args = self.arguments();
        match self.name() {
            b"AUTH" => Some(0),
            // CONFIG SET requirepass <pw>, masterauth <pw>, ...
            b"CONFIG" if args.first().is_some_and(|sub| sub.eq_ignore_ascii_case(b"SET")) => {
                Some(2)
            }
            // MIGRATE ... AUTH <pw> | AUTH2 <user> <pw>
            b"MIGRATE" => args
                .iter()
                .position(|arg| {
                    arg.eq_ignore_ascii_case(b"AUTH") || arg.eq_ignore_ascii_case(b"AUTH2")
                })
                .map(|at| at + 1),
            _ => None,
        }
    }
}

/// Renders the command for logs. Arguments that may hold a credential are
/// replaced by a single `<redacted>`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().escape_ascii())?;
        let secret_from = self.secret_from();
        for (i, arg) in self.arguments().iter().enumerate() {
            if secret_from.is_some_and(|from| i >= from) {
                return write!(f, " <redacted>");
            }
            write!(f, " \"{}\"", arg.escape_ascii())?;
        }
        Ok(())
    }
}

fn put_decimal(dst: &mut BytesMut, val: usize) {
    dst.put_slice(val.to_string().as_bytes());
    dst.put_slice(b"\r\n");
}

/// Where `LINSERT` places the new element relative to the pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}

impl ToArg for Position {
    fn to_arg(&self) -> Bytes {
        match self {
            Position::Before => Bytes::from_static(b"BEFORE"),
            Position::After => Bytes::from_static(b"AFTER"),
        }
    }
}

/// Bitwise operation performed by `BITOP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
    Not,
}

impl ToArg for BitOp {
    fn to_arg(&self) -> Bytes {
        match self {
            BitOp::And => Bytes::from_static(b"AND"),
            BitOp::Or => Bytes::from_static(b"OR"),
            BitOp::Xor => Bytes::from_static(b"XOR"),
            BitOp::Not => Bytes::from_static(b"NOT"),
        }
    }
}
