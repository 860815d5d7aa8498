//! Parser for the textual shape grammar.
//!
//! ```text
//! shape  := prim | "[" shape "]" | "[" shape ";" number "]"
//!         | "map" "<" shape "," shape ">" | name? "{" fields? "}"
//! prim   := u8 | u16 | u32 | u64 | i8 | i16 | i32 | i64 | string | str
//! fields := field ("," field)* ","?
//! field  := word ":" shape
//! ```

use std::str::FromStr;

use super::{RecordShape, Shape};
use crate::defaults;
use crate::err::{Error, Result};

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parser = Parser {
            src: s,
            pos: 0,
            depth: 0,
        };

        let shape = parser.shape()?;
        parser.skip_ws();

        match parser.pos == s.len() {
            true => Ok(shape),
            false => Err(parser.malformed("end of input")),
        }
    }
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    depth: usize,
}

impl<'s> Parser<'s> {
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    /// Consumes `c` if it is the next non-whitespace char
    fn eat(&mut self, c: char) -> bool {
        match self.peek() == Some(c) {
            true => {
                self.pos += c.len_utf8();
                true
            }
            false => false,
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        match self.eat(c) {
            true => Ok(()),
            false => Err(self.malformed(&format!("`{}`", c))),
        }
    }

    /// Consumes a run of alphanumerics and underscores
    fn word(&mut self) -> &'s str {
        self.skip_ws();
        let rest = self.rest();
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += end;

        &rest[..end]
    }

    fn malformed(&self, expected: &str) -> Error {
        Error::MalformedShape(format!("expected {} at offset {}", expected, self.pos))
    }

    fn shape(&mut self) -> Result<Shape> {
        self.depth += 1;
        if self.depth > defaults::MAX_DEPTH {
            return Err(Error::DepthLimitExceeded(defaults::MAX_DEPTH));
        }

        let shape = match self.peek() {
            Some('[') => self.sequence(),
            Some('{') => self.record(String::new()).map(Shape::Record),
            Some(_) => self.named(),
            None => Err(self.malformed("a shape")),
        };

        self.depth -= 1;
        shape
    }

    fn sequence(&mut self) -> Result<Shape> {
        self.expect('[')?;
        let element = self.shape()?;

        let shape = match self.eat(';') {
            true => {
                let digits = self.word();
                let len = digits
                    .parse::<usize>()
                    .map_err(|_| self.malformed("an array length"))?;
                Shape::array(element, len)
            }
            false => Shape::list(element),
        };

        self.expect(']')?;
        Ok(shape)
    }

    fn named(&mut self) -> Result<Shape> {
        let name = self.word();

        // a body makes it a record, whatever the name
        if !name.is_empty() && self.peek() == Some('{') {
            return self.record(name.to_owned()).map(Shape::Record);
        }

        let shape = match name {
            "" => return Err(self.malformed("a shape")),
            "i8" => Shape::I8,
            "i16" => Shape::I16,
            "i32" => Shape::I32,
            "i64" => Shape::I64,
            "u8" => Shape::U8,
            "u16" => Shape::U16,
            "u32" => Shape::U32,
            "u64" => Shape::U64,
            "string" | "str" => Shape::String,
            "map" => {
                self.expect('<')?;
                let key = self.shape()?;
                self.expect(',')?;
                let value = self.shape()?;
                self.expect('>')?;
                Shape::map(key, value)
            }
            unsupported => return Err(Error::UnsupportedShape(unsupported.to_owned())),
        };

        Ok(shape)
    }

    fn record(&mut self, name: String) -> Result<RecordShape> {
        self.expect('{')?;
        let mut record = RecordShape::new(name);

        while !self.eat('}') {
            let field = self.word();
            if field.is_empty() {
                return Err(self.malformed("a field name or `}`"));
            }
            self.expect(':')?;
            record = record.field(field, self.shape()?);

            if !self.eat(',') {
                self.expect('}')?;
                break;
            }
        }

        Ok(record)
    }
}
