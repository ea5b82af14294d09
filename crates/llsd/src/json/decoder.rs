//! `JsonDecoder` — parses JSON text into a [`Value`] tree, applying the
//! llsd string/number detection rules.

use std::collections::HashMap;

use crate::value::parse_date;
use crate::{LlsdError, Value};

pub struct JsonDecoder {
    pub data: Vec<u8>,
    pub x: usize,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonDecoder {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            x: 0,
        }
    }

    /// Parses one root value; anything but whitespace after it is an
    /// error.
    pub fn decode(&mut self, input: &[u8]) -> Result<Value, LlsdError> {
        self.data = input.to_vec();
        self.x = 0;
        let value = self.read_any()?;
        self.skip_whitespace();
        if self.x < self.data.len() {
            return Err(LlsdError::Syntax(self.x));
        }
        Ok(value)
    }

    pub fn read_any(&mut self) -> Result<Value, LlsdError> {
        self.skip_whitespace();
        let x = self.x;
        let ch = *self.data.get(x).ok_or(LlsdError::EndOfInput)?;
        match ch {
            b'"' => {
                let text = self.read_str()?;
                Ok(classify_string(text))
            }
            b'[' => self.read_arr(),
            b'{' => self.read_obj(),
            b'n' => self.read_literal(b"null", Value::Undefined),
            b't' => self.read_literal(b"true", Value::Boolean(true)),
            b'f' => self.read_literal(b"false", Value::Boolean(false)),
            // Extension tokens for the reals JSON cannot express
            b'N' => self.read_literal(b"NaN", Value::Real(f64::NAN)),
            b'I' => self.read_literal(b"Infinity", Value::Real(f64::INFINITY)),
            b'-' if self.data.get(x + 1) == Some(&b'I') => {
                self.read_literal(b"-Infinity", Value::Real(f64::NEG_INFINITY))
            }
            b'-' | b'0'..=b'9' => self.read_num(),
            _ => Err(LlsdError::Syntax(x)),
        }
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(
            self.data.get(self.x),
            Some(b' ' | b'\t' | b'\n' | b'\r')
        ) {
            self.x += 1;
        }
    }

    fn read_literal(&mut self, literal: &[u8], value: Value) -> Result<Value, LlsdError> {
        let end = self.x + literal.len();
        if end > self.data.len() || &self.data[self.x..end] != literal {
            return Err(LlsdError::Syntax(self.x));
        }
        self.x = end;
        Ok(value)
    }

    /// A number without `.` or exponent is an Integer (when it fits
    /// i32), everything else a Real.
    pub fn read_num(&mut self) -> Result<Value, LlsdError> {
        let start = self.x;
        if self.data.get(self.x) == Some(&b'-') {
            self.x += 1;
        }
        let mut fractional = false;
        while let Some(&b) = self.data.get(self.x) {
            match b {
                b'0'..=b'9' => {}
                b'.' | b'e' | b'E' => fractional = true,
                b'+' | b'-' => {}
                _ => break,
            }
            self.x += 1;
        }
        let text =
            std::str::from_utf8(&self.data[start..self.x]).map_err(|_| LlsdError::InvalidUtf8)?;
        if !fractional {
            if let Ok(i) = text.parse::<i64>() {
                if let Ok(narrow) = i32::try_from(i) {
                    return Ok(Value::Integer(narrow));
                }
                return Ok(Value::Real(i as f64));
            }
        }
        let real: f64 = text.parse().map_err(|_| LlsdError::Syntax(start))?;
        Ok(Value::Real(real))
    }

    /// Reads a quoted JSON string, resolving all escapes including
    /// `\uXXXX` surrogate pairs.
    pub fn read_str(&mut self) -> Result<String, LlsdError> {
        if self.data.get(self.x) != Some(&b'"') {
            return Err(LlsdError::Syntax(self.x));
        }
        self.x += 1;
        let mut out = String::new();
        loop {
            let x = self.x;
            let byte = *self.data.get(x).ok_or(LlsdError::EndOfInput)?;
            match byte {
                b'"' => {
                    self.x += 1;
                    return Ok(out);
                }
                b'\\' => {
                    let esc = *self.data.get(x + 1).ok_or(LlsdError::EndOfInput)?;
                    self.x += 2;
                    match esc {
                        b'"' => out.push('"'),
                        b'\\' => out.push('\\'),
                        b'/' => out.push('/'),
                        b'b' => out.push('\u{8}'),
                        b'f' => out.push('\u{c}'),
                        b'n' => out.push('\n'),
                        b'r' => out.push('\r'),
                        b't' => out.push('\t'),
                        b'u' => {
                            let cp = self.read_hex4()?;
                            let ch = if (0xd800..0xdc00).contains(&cp) {
                                // High surrogate: a \uXXXX low half must follow
                                if self.data.get(self.x) != Some(&b'\\')
                                    || self.data.get(self.x + 1) != Some(&b'u')
                                {
                                    return Err(LlsdError::Syntax(self.x));
                                }
                                self.x += 2;
                                let low = self.read_hex4()?;
                                if !(0xdc00..0xe000).contains(&low) {
                                    return Err(LlsdError::Syntax(self.x));
                                }
                                let combined =
                                    0x10000 + ((cp - 0xd800) << 10) + (low - 0xdc00);
                                char::from_u32(combined).ok_or(LlsdError::Syntax(self.x))?
                            } else {
                                char::from_u32(cp).ok_or(LlsdError::Syntax(self.x))?
                            };
                            out.push(ch);
                        }
                        _ => return Err(LlsdError::Syntax(x + 1)),
                    }
                }
                _ => {
                    // Copy one UTF-8 sequence verbatim
                    let len = utf8_len(byte).ok_or(LlsdError::InvalidUtf8)?;
                    let end = x + len;
                    if end > self.data.len() {
                        return Err(LlsdError::EndOfInput);
                    }
                    let s = std::str::from_utf8(&self.data[x..end])
                        .map_err(|_| LlsdError::InvalidUtf8)?;
                    out.push_str(s);
                    self.x = end;
                }
            }
        }
    }

    fn read_hex4(&mut self) -> Result<u32, LlsdError> {
        let end = self.x + 4;
        if end > self.data.len() {
            return Err(LlsdError::EndOfInput);
        }
        let mut cp = 0u32;
        for &b in &self.data[self.x..end] {
            let digit = (b as char).to_digit(16).ok_or(LlsdError::Syntax(self.x))?;
            cp = cp * 16 + digit;
        }
        self.x = end;
        Ok(cp)
    }

    fn read_arr(&mut self) -> Result<Value, LlsdError> {
        self.x += 1; // '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.data.get(self.x) == Some(&b']') {
            self.x += 1;
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.read_any()?);
            self.skip_whitespace();
            match self.data.get(self.x) {
                Some(b',') => self.x += 1,
                Some(b']') => {
                    self.x += 1;
                    return Ok(Value::Array(items));
                }
                Some(_) => return Err(LlsdError::Syntax(self.x)),
                None => return Err(LlsdError::EndOfInput),
            }
        }
    }

    fn read_obj(&mut self) -> Result<Value, LlsdError> {
        self.x += 1; // '{'
        let mut entries = HashMap::new();
        self.skip_whitespace();
        if self.data.get(self.x) == Some(&b'}') {
            self.x += 1;
            return Ok(Value::Map(entries));
        }
        loop {
            self.skip_whitespace();
            // Keys stay strings; detection rules apply to values only
            let key = self.read_str()?;
            self.skip_whitespace();
            if self.data.get(self.x) != Some(&b':') {
                return Err(LlsdError::Syntax(self.x));
            }
            self.x += 1;
            let value = self.read_any()?;
            entries.insert(key, value);
            self.skip_whitespace();
            match self.data.get(self.x) {
                Some(b',') => self.x += 1,
                Some(b'}') => {
                    self.x += 1;
                    return Ok(Value::Map(entries));
                }
                Some(_) => return Err(LlsdError::Syntax(self.x)),
                None => return Err(LlsdError::EndOfInput),
            }
        }
    }
}

/// UUID and date shapes promote to their kinds; everything else —
/// including URI-looking text — stays a String.
fn classify_string(text: String) -> Value {
    if is_uuid_string(&text) {
        if let Ok(uuid) = uuid::Uuid::parse_str(&text) {
            return Value::Uuid(uuid);
        }
    }
    if is_date_string(&text) {
        if let Some(date) = parse_date(&text) {
            return Value::Date(date);
        }
    }
    Value::String(text)
}

/// Canonical `8-4-4-4-12` hyphenated hex.
fn is_uuid_string(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    for (i, &b) in bytes.iter().enumerate() {
        match i {
            8 | 13 | 18 | 23 => {
                if b != b'-' {
                    return false;
                }
            }
            _ => {
                if !b.is_ascii_hexdigit() {
                    return false;
                }
            }
        }
    }
    true
}

/// `YYYY-MM-DDThh:mm:ss[.fff]Z`.
fn is_date_string(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 20 || bytes[bytes.len() - 1] != b'Z' {
        return false;
    }
    let structure_ok = bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes[10] == b'T'
        && bytes[13] == b':'
        && bytes[16] == b':';
    if !structure_ok {
        return false;
    }
    let digits = [0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18];
    if digits.iter().any(|&i| !bytes[i].is_ascii_digit()) {
        return false;
    }
    let rest = &bytes[19..bytes.len() - 1];
    match rest {
        [] => true,
        [b'.', fraction @ ..] => {
            !fraction.is_empty() && fraction.iter().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

fn utf8_len(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7f => Some(1),
        0xc0..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf7 => Some(4),
        _ => None,
    }
}
