use std::fmt;

// ---------------------------------------------------------------------------
// KeyValue – a value to be written to a header
// ---------------------------------------------------------------------------

/// Value of a header keyword on the write side.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Str(s) => write!(f, "'{s}'"),
            KeyValue::Int(i) => write!(f, "{i}"),
            KeyValue::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        KeyValue::Str(s.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(s: String) -> Self {
        KeyValue::Str(s)
    }
}

impl From<i64> for KeyValue {
    fn from(i: i64) -> Self {
        KeyValue::Int(i)
    }
}

impl From<u32> for KeyValue {
    fn from(i: u32) -> Self {
        KeyValue::Int(i64::from(i))
    }
}

impl From<f64> for KeyValue {
    fn from(x: f64) -> Self {
        KeyValue::Float(x)
    }
}

// ---------------------------------------------------------------------------
// Card
// ---------------------------------------------------------------------------

/// One keyword card to write: keyword, value and optional comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub value: KeyValue,
    pub comment: Option<String>,
}

impl Card {
    pub fn new(keyword: &str, value: impl Into<KeyValue>) -> Self {
        Card {
            keyword: keyword.to_string(),
            value: value.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8}= {}", self.keyword, self.value)?;
        if let Some(comment) = &self.comment {
            write!(f, " / {comment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_convert_from_rust_types() {
        assert_eq!(KeyValue::from("STAR"), KeyValue::Str("STAR".into()));
        assert_eq!(KeyValue::from(7u32), KeyValue::Int(7));
        assert_eq!(KeyValue::from(1i64), KeyValue::Int(1));
        assert_eq!(KeyValue::from(1e-4), KeyValue::Float(1e-4));
    }

    #[test]
    fn display_reads_like_a_header_line() {
        let card = Card::new("INDOUSID", 127u32).with_comment("Indo-US id");
        assert_eq!(card.to_string(), "INDOUSID= 127 / Indo-US id");
        assert_eq!(Card::new("RRTYPE", "STAR").to_string(), "RRTYPE  = 'STAR'");
    }
}
