//! Command responses
//!
//! Result shapes produced by executing a command, with redis-cli style display.

use bytes::Bytes;

/// Response to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Simple OK response
    Ok,

    /// Nil/null response (key, field or element not found)
    Nil,

    /// String/bytes value
    Value(Bytes),

    /// Integer value (also used for booleans as 0/1)
    Integer(i64),

    /// Error response
    Error(String),

    /// Pong response (for PING)
    Pong,

    /// Field/value pairs, sorted by field
    Map(Vec<(Bytes, Bytes)>),
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }
}

impl From<bool> for Response {
    fn from(b: bool) -> Self {
        Response::Integer(i64::from(b))
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Response::Ok => write!(f, "OK"),
            Response::Nil => write!(f, "(nil)"),
            Response::Value(data) => {
                let s = String::from_utf8_lossy(data);
                write!(f, "\"{}\"", s)
            }
            Response::Integer(n) => write!(f, "(integer) {}", n),
            Response::Error(msg) => write!(f, "(error) {}", msg),
            Response::Pong => write!(f, "PONG"),
            Response::Map(pairs) => {
                if pairs.is_empty() {
                    return write!(f, "(empty hash)");
                }
                for (i, (field, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "{}) \"{}\" => \"{}\"",
                        i + 1,
                        String::from_utf8_lossy(field),
                        String::from_utf8_lossy(value)
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Response::Ok.to_string(), "OK");
        assert_eq!(Response::Nil.to_string(), "(nil)");
        assert_eq!(Response::Value(Bytes::from_static(b"hi")).to_string(), "\"hi\"");
        assert_eq!(Response::from(true).to_string(), "(integer) 1");
        assert_eq!(Response::Error("boom".into()).to_string(), "(error) boom");
    }

    #[test]
    fn test_map_display() {
        let map = Response::Map(vec![
            (Bytes::from_static(b"a"), Bytes::from_static(b"1")),
            (Bytes::from_static(b"b"), Bytes::from_static(b"2")),
        ]);
        assert_eq!(map.to_string(), "1) \"a\" => \"1\"\n2) \"b\" => \"2\"");
        assert_eq!(Response::Map(Vec::new()).to_string(), "(empty hash)");
    }
}
