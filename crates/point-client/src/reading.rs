//! Line-oriented temperature readings
//!
//! Thermometers attached over a serial line report one reading per line,
//! usually terminated by `\r\n`.

use std::io::{self, BufRead};

#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Temperature(f32),
    /// A line that is not a finite number
    Malformed(String),
}

pub fn parse_reading(line: &str) -> Reading {
    match line.trim().parse::<f32>() {
        Ok(temp) if temp.is_finite() => Reading::Temperature(temp),
        _ => Reading::Malformed(line.to_string()),
    }
}

pub struct ReadingParser<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> ReadingParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(32),
        }
    }

    /// Returns the next non-blank reading, or `None` at end of input.
    pub fn next_reading(&mut self) -> io::Result<Option<Reading>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }

            let line: String = String::from_utf8_lossy(&self.buf)
                .chars()
                .filter(|&c| c != '\r' && c != '\n')
                .collect();
            if line.trim().is_empty() {
                continue;
            }
            return Ok(Some(parse_reading(&line)));
        }
    }
}

impl<R: BufRead> Iterator for ReadingParser<R> {
    type Item = io::Result<Reading>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_reading().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_serial_lines() {
        let input = Cursor::new("21.50\r\n22.00\r\n\r\nERR\r\n23");
        let readings: Vec<Reading> = ReadingParser::new(input).map(|r| r.unwrap()).collect();
        assert_eq!(
            readings,
            vec![
                Reading::Temperature(21.5),
                Reading::Temperature(22.0),
                Reading::Malformed("ERR".to_string()),
                Reading::Temperature(23.0),
            ]
        );
    }

    #[test]
    fn test_non_finite_is_malformed() {
        assert_eq!(parse_reading("NaN"), Reading::Malformed("NaN".to_string()));
        assert_eq!(parse_reading(" -3.5 "), Reading::Temperature(-3.5));
    }

    #[test]
    fn test_invalid_utf8_does_not_abort() {
        let input = Cursor::new(b"\xff\xfe\n20.0\n".to_vec());
        let mut parser = ReadingParser::new(input);
        assert!(matches!(
            parser.next_reading().unwrap(),
            Some(Reading::Malformed(_))
        ));
        assert_eq!(
            parser.next_reading().unwrap(),
            Some(Reading::Temperature(20.0))
        );
        assert_eq!(parser.next_reading().unwrap(), None);
    }
}
