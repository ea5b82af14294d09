//! `NotationDecoder` — parses the ASCII token form.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::value::parse_date;
use crate::{LlsdError, Value};

/// Internal cursor used during decoding.
struct Cur<'a> {
    data: &'a [u8],
    x: usize,
}

impl<'a> Cur<'a> {
    fn peek(&self) -> Option<u8> {
        self.data.get(self.x).copied()
    }

    fn next(&mut self) -> Result<u8, LlsdError> {
        let byte = self.peek().ok_or(LlsdError::EndOfInput)?;
        self.x += 1;
        Ok(byte)
    }

    fn expect(&mut self, byte: u8) -> Result<(), LlsdError> {
        if self.next()? != byte {
            return Err(LlsdError::Syntax(self.x - 1));
        }
        Ok(())
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.x += 1;
        }
    }

    /// Case-insensitive match against an ASCII word; consumes on match.
    fn eat_word(&mut self, word: &[u8]) -> bool {
        let end = self.x + word.len();
        if end > self.data.len() {
            return false;
        }
        if self.data[self.x..end].eq_ignore_ascii_case(word) {
            self.x = end;
            return true;
        }
        false
    }
}

#[derive(Default)]
pub struct NotationDecoder;

impl NotationDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Parses one root value; anything but whitespace after it is an
    /// error.
    pub fn decode(&self, input: &[u8]) -> Result<Value, LlsdError> {
        let mut c = Cur { data: input, x: 0 };
        let value = self.read_any(&mut c)?;
        c.skip_ws();
        if c.x < c.data.len() {
            return Err(LlsdError::Syntax(c.x));
        }
        Ok(value)
    }

    fn read_any(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        c.skip_ws();
        let lead = c.peek().ok_or(LlsdError::EndOfInput)?;
        match lead {
            b'!' => {
                c.x += 1;
                Ok(Value::Undefined)
            }
            b'1' => {
                c.x += 1;
                Ok(Value::Boolean(true))
            }
            b'0' => {
                c.x += 1;
                Ok(Value::Boolean(false))
            }
            b't' | b'T' | b'f' | b'F' => self.read_bool_word(c),
            b'i' => {
                c.x += 1;
                self.read_integer(c)
            }
            b'r' => {
                c.x += 1;
                self.read_real(c)
            }
            b'u' => {
                c.x += 1;
                self.read_uuid(c)
            }
            b'\'' | b'"' => {
                let quote = c.next()?;
                Ok(Value::String(self.read_quoted(c, quote)?))
            }
            b's' => {
                c.x += 1;
                Ok(Value::String(self.read_sized_string(c)?))
            }
            b'l' => {
                c.x += 1;
                let quote = c.next()?;
                if quote != b'\'' && quote != b'"' {
                    return Err(LlsdError::Syntax(c.x - 1));
                }
                Ok(Value::Uri(self.read_quoted(c, quote)?))
            }
            b'd' => {
                c.x += 1;
                self.read_date(c)
            }
            b'b' => {
                c.x += 1;
                self.read_binary(c)
            }
            b'[' => {
                c.x += 1;
                self.read_array(c)
            }
            b'{' => {
                c.x += 1;
                self.read_map(c)
            }
            _ => Err(LlsdError::Syntax(c.x)),
        }
    }

    fn read_bool_word(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        // Word forms first so that a lone 't'/'f' does not shadow them.
        if c.eat_word(b"true") {
            return Ok(Value::Boolean(true));
        }
        if c.eat_word(b"false") {
            return Ok(Value::Boolean(false));
        }
        match c.next()? {
            b't' | b'T' => Ok(Value::Boolean(true)),
            b'f' | b'F' => Ok(Value::Boolean(false)),
            _ => Err(LlsdError::Syntax(c.x - 1)),
        }
    }

    fn read_integer(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        let start = c.x;
        if c.peek() == Some(b'-') {
            c.x += 1;
        }
        while matches!(c.peek(), Some(b'0'..=b'9')) {
            c.x += 1;
        }
        let text = std::str::from_utf8(&c.data[start..c.x]).map_err(|_| LlsdError::InvalidUtf8)?;
        let wide: i64 = text.parse().map_err(|_| LlsdError::Syntax(start))?;
        Ok(Value::Integer(
            wide.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
        ))
    }

    fn read_real(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        if c.eat_word(b"nan") {
            return Ok(Value::Real(f64::NAN));
        }
        if c.eat_word(b"inf") {
            return Ok(Value::Real(f64::INFINITY));
        }
        if c.eat_word(b"-inf") {
            return Ok(Value::Real(f64::NEG_INFINITY));
        }
        let start = c.x;
        while matches!(
            c.peek(),
            Some(b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
        ) {
            c.x += 1;
        }
        let text = std::str::from_utf8(&c.data[start..c.x]).map_err(|_| LlsdError::InvalidUtf8)?;
        let real: f64 = text.parse().map_err(|_| LlsdError::Syntax(start))?;
        Ok(Value::Real(real))
    }

    fn read_uuid(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        let start = c.x;
        if c.x + 36 > c.data.len() {
            return Err(LlsdError::EndOfInput);
        }
        let text =
            std::str::from_utf8(&c.data[start..start + 36]).map_err(|_| LlsdError::InvalidUtf8)?;
        let uuid = uuid::Uuid::parse_str(text).map_err(|_| LlsdError::Syntax(start))?;
        c.x += 36;
        Ok(Value::Uuid(uuid))
    }

    /// Quoted text with backslash escaping. `\n`, `\t`, `\r` map to
    /// their control characters; any other escaped byte stands for
    /// itself.
    fn read_quoted(&self, c: &mut Cur, quote: u8) -> Result<String, LlsdError> {
        let mut bytes = Vec::new();
        loop {
            let byte = c.next()?;
            if byte == quote {
                break;
            }
            if byte == b'\\' {
                let escaped = c.next()?;
                bytes.push(match escaped {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    other => other,
                });
                continue;
            }
            bytes.push(byte);
        }
        String::from_utf8(bytes).map_err(|_| LlsdError::InvalidUtf8)
    }

    /// `s(N)"raw"` — N counts bytes of the unescaped payload.
    fn read_sized_string(&self, c: &mut Cur) -> Result<String, LlsdError> {
        let size = self.read_paren_size(c)?;
        let quote = c.next()?;
        if quote != b'\'' && quote != b'"' {
            return Err(LlsdError::Syntax(c.x - 1));
        }
        let raw = self.read_raw(c, size)?;
        c.expect(quote)?;
        String::from_utf8(raw).map_err(|_| LlsdError::InvalidUtf8)
    }

    fn read_date(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        let quote = c.next()?;
        if quote != b'\'' && quote != b'"' {
            return Err(LlsdError::Syntax(c.x - 1));
        }
        let start = c.x;
        let text = self.read_quoted(c, quote)?;
        let date = parse_date(&text).ok_or(LlsdError::Syntax(start))?;
        Ok(Value::Date(date))
    }

    fn read_binary(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        match c.peek() {
            Some(b'6') => {
                c.expect(b'6')?;
                c.expect(b'4')?;
                let quote = c.next()?;
                if quote != b'\'' && quote != b'"' {
                    return Err(LlsdError::Syntax(c.x - 1));
                }
                let start = c.x;
                let text = self.read_quoted(c, quote)?;
                let cleaned: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
                let bytes = STANDARD
                    .decode(cleaned)
                    .map_err(|_| LlsdError::Syntax(start))?;
                Ok(Value::Binary(bytes))
            }
            Some(b'1') => {
                c.expect(b'1')?;
                c.expect(b'6')?;
                let quote = c.next()?;
                if quote != b'\'' && quote != b'"' {
                    return Err(LlsdError::Syntax(c.x - 1));
                }
                let start = c.x;
                let text = self.read_quoted(c, quote)?;
                let bytes = hex_decode(&text).ok_or(LlsdError::Syntax(start))?;
                Ok(Value::Binary(bytes))
            }
            Some(b'(') => {
                let size = self.read_paren_size(c)?;
                let quote = c.next()?;
                if quote != b'\'' && quote != b'"' {
                    return Err(LlsdError::Syntax(c.x - 1));
                }
                let raw = self.read_raw(c, size)?;
                c.expect(quote)?;
                Ok(Value::Binary(raw))
            }
            _ => Err(LlsdError::Syntax(c.x)),
        }
    }

    fn read_array(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        let mut items = Vec::new();
        c.skip_ws();
        if c.peek() == Some(b']') {
            c.x += 1;
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.read_any(c)?);
            c.skip_ws();
            match c.next()? {
                b',' => continue,
                b']' => break,
                _ => return Err(LlsdError::Syntax(c.x - 1)),
            }
        }
        Ok(Value::Array(items))
    }

    fn read_map(&self, c: &mut Cur) -> Result<Value, LlsdError> {
        let mut entries = HashMap::new();
        c.skip_ws();
        if c.peek() == Some(b'}') {
            c.x += 1;
            return Ok(Value::Map(entries));
        }
        loop {
            c.skip_ws();
            let quote = c.next()?;
            if quote != b'\'' && quote != b'"' {
                return Err(LlsdError::Syntax(c.x - 1));
            }
            let key = self.read_quoted(c, quote)?;
            c.skip_ws();
            c.expect(b':')?;
            let value = self.read_any(c)?;
            entries.insert(key, value);
            c.skip_ws();
            match c.next()? {
                b',' => continue,
                b'}' => break,
                _ => return Err(LlsdError::Syntax(c.x - 1)),
            }
        }
        Ok(Value::Map(entries))
    }

    /// `(N)` — a parenthesized decimal byte count.
    fn read_paren_size(&self, c: &mut Cur) -> Result<usize, LlsdError> {
        c.expect(b'(')?;
        let start = c.x;
        while matches!(c.peek(), Some(b'0'..=b'9')) {
            c.x += 1;
        }
        if c.x == start {
            return Err(LlsdError::Syntax(start));
        }
        let text = std::str::from_utf8(&c.data[start..c.x]).map_err(|_| LlsdError::InvalidUtf8)?;
        let size: usize = text.parse().map_err(|_| LlsdError::Syntax(start))?;
        c.expect(b')')?;
        Ok(size)
    }

    fn read_raw(&self, c: &mut Cur, size: usize) -> Result<Vec<u8>, LlsdError> {
        if c.x + size > c.data.len() {
            return Err(LlsdError::EndOfInput);
        }
        let raw = c.data[c.x..c.x + size].to_vec();
        c.x += size;
        Ok(raw)
    }
}

fn hex_decode(text: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        out.push((hi * 16 + lo) as u8);
    }
    Some(out)
}
