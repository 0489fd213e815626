use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseNumError {
    #[error("empty number")]
    Empty,

    #[error("invalid base-{radix} number \"{text}\"")]
    Invalid { text: String, radix: u32 },
}

// Accepts 0x (hex), 0o (octal), 0b (binary) or plain decimal, with optional
// '_' separators.
pub fn parse_num(s: &str) -> Result<u64, ParseNumError> {
    let s = s.trim();
    let (digits, radix) = match s.get(..2) {
        Some("0x" | "0X") => (&s[2..], 16),
        Some("0o" | "0O") => (&s[2..], 8),
        Some("0b" | "0B") => (&s[2..], 2),
        _ => (s, 10),
    };

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() {
        return Err(ParseNumError::Empty);
    }

    u64::from_str_radix(&digits, radix).map_err(|_| ParseNumError::Invalid {
        text: s.to_owned(),
        radix,
    })
}

////////////////////////////////////////////////////////////////////////////////

// A non-panicking version of `as usize` for byte counts.
pub trait ToUsize {
    fn to_usize(self) -> Option<usize>;
}

impl ToUsize for u64 {
    fn to_usize(self) -> Option<usize> {
        usize::try_from(self).ok()
    }
}

////////////////////////////////////////////////////////////////////////////////
