//! Text formats of the acme file tree: window event messages, `log` lines
//! and `index` lines.

use std::io::{self, BufRead, Read};

/// Flag bit: an expansion message follows.
const FLAG_EXPANDED: u32 = 2;
/// Flag bit: argument and location messages follow.
const FLAG_HAS_ARG: u32 = 8;

/// One decoded event from a window's `event` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEvent {
    /// Origin: `K` keyboard, `M` mouse, `E` file, `F` other.
    pub c1: char,
    /// Kind: `I`/`i` insert, `D`/`d` delete, `X`/`x` execute, `L`/`l` look.
    /// Uppercase kinds refer to the body, lowercase to the tag.
    pub c2: char,
    pub q0: usize,
    pub q1: usize,
    /// Addresses as acme sent them, before any expansion; used when writing back.
    pub orig_q0: usize,
    pub orig_q1: usize,
    pub flag: u32,
    pub text: String,
    /// Chorded argument, if any.
    pub arg: String,
}

impl RawEvent {
    /// True for execute events in the body (`X`) or tag (`x`).
    pub fn is_execute(&self) -> bool {
        matches!(self.c2, 'x' | 'X')
    }

    /// True for look events, which acme expects back for default handling.
    pub fn is_look(&self) -> bool {
        matches!(self.c2, 'l' | 'L')
    }

    /// The first word of an execute event's text.
    pub fn command(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    /// The message that hands this event back to acme.
    pub fn encode(&self) -> String {
        format!("{}{}{} {} \n", self.c1, self.c2, self.orig_q0, self.orig_q1)
    }
}

struct Message {
    c1: char,
    c2: char,
    q0: usize,
    q1: usize,
    flag: u32,
    text: String,
}

/// Decodes the stream read from a window's `event` file.
pub struct EventReader<R> {
    inner: R,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read one event with its follow-up messages. `Ok(None)` at a clean end of stream.
    pub fn read_event(&mut self) -> io::Result<Option<RawEvent>> {
        let Some(msg) = self.read_message()? else {
            return Ok(None);
        };
        let mut event = RawEvent {
            c1: msg.c1,
            c2: msg.c2,
            q0: msg.q0,
            q1: msg.q1,
            orig_q0: msg.q0,
            orig_q1: msg.q1,
            flag: msg.flag,
            text: msg.text,
            arg: String::new(),
        };

        if event.flag & FLAG_EXPANDED != 0 {
            let expansion = self.expect_message()?;
            if event.q0 == event.q1 {
                event.q0 = expansion.q0;
                event.q1 = expansion.q1;
                event.text = expansion.text;
            }
        }
        if event.flag & FLAG_HAS_ARG != 0 {
            event.arg = self.expect_message()?.text;
            // chord origin, unused
            self.expect_message()?;
        }
        Ok(Some(event))
    }

    fn expect_message(&mut self) -> io::Result<Message> {
        self.read_message()?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "truncated acme event"))
    }

    fn read_message(&mut self) -> io::Result<Option<Message>> {
        let Some(c1) = self.read_rune()? else {
            return Ok(None);
        };
        let c2 = self.expect_rune()?;
        let q0 = self.read_number()?;
        let q1 = self.read_number()?;
        let flag = self.read_number()? as u32;
        let nr = self.read_number()?;

        let mut text = String::new();
        for _ in 0..nr {
            text.push(self.expect_rune()?);
        }
        if self.expect_rune()? != '\n' {
            return Err(invalid("missing newline after acme event"));
        }
        Ok(Some(Message { c1, c2, q0, q1, flag, text }))
    }

    fn read_number(&mut self) -> io::Result<usize> {
        let mut digits = String::new();
        loop {
            match self.expect_rune()? {
                ' ' => break,
                c if c.is_ascii_digit() => digits.push(c),
                c => return Err(invalid(&format!("unexpected {c:?} in acme event number"))),
            }
        }
        digits
            .parse()
            .map_err(|_| invalid(&format!("bad acme event number {digits:?}")))
    }

    fn expect_rune(&mut self) -> io::Result<char> {
        self.read_rune()?
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "truncated acme event"))
    }

    fn read_rune(&mut self) -> io::Result<Option<char>> {
        let mut buf = [0u8; 4];
        if self.inner.read(&mut buf[..1])? == 0 {
            return Ok(None);
        }
        let len = match buf[0] {
            b if b < 0x80 => 1,
            b if b >> 5 == 0b110 => 2,
            b if b >> 4 == 0b1110 => 3,
            b if b >> 3 == 0b11110 => 4,
            _ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
        };
        self.inner.read_exact(&mut buf[1..len])?;
        Ok(Some(
            std::str::from_utf8(&buf[..len])
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        ))
    }
}

fn invalid(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}

/// One line of acme's `log` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: usize,
    pub op: String,
    pub name: String,
}

/// Parse `"<id> <op> <name>"`; the name may be empty.
pub fn parse_log_line(line: &str) -> Option<LogEntry> {
    let mut parts = line.trim_end_matches('\n').splitn(3, ' ');
    let id = parts.next()?.parse().ok()?;
    let op = parts.next()?.to_string();
    let name = parts.next().unwrap_or("").to_string();
    Some(LogEntry { id, op, name })
}

/// Parse one line of acme's `index` file into window id and file name.
///
/// Lines hold five numeric columns (id, tag length, body length, is-dir,
/// is-dirty) followed by the tag, whose first word is the file name.
pub fn parse_index_line(line: &str) -> Option<(usize, String)> {
    let mut fields = line.split_whitespace();
    let id = fields.next()?.parse().ok()?;
    let name = fields.nth(4).unwrap_or("").to_string();
    Some((id, name))
}

/// The file name shown in a window tag.
pub fn tag_file_name(tag: &str) -> &str {
    tag.split_whitespace().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read_all(input: &str) -> Vec<RawEvent> {
        let mut reader = EventReader::new(input.as_bytes());
        let mut events = Vec::new();
        while let Some(e) = reader.read_event().unwrap() {
            events.push(e);
        }
        events
    }

    #[test]
    fn test_keyboard_insert() {
        let events = read_all("KI12 13 0 1 \t\n");
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!((e.c1, e.c2, e.q0, e.q1), ('K', 'I', 12, 13));
        assert_eq!(e.text, "\t");
    }

    #[test]
    fn test_multibyte_text() {
        let events = read_all("KI0 1 0 1 é\nKD4 5 0 0 \n");
        assert_eq!(events[0].text, "é");
        assert_eq!((events[1].c2, events[1].q0, events[1].q1), ('D', 4, 5));
        assert_eq!(events[1].text, "");
    }

    #[test]
    fn test_expansion_replaces_null_selection() {
        let events = read_all("Mx5 5 2 0 \nMx3 6 0 3 Put\n");
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!((e.q0, e.q1), (3, 6));
        assert_eq!((e.orig_q0, e.orig_q1), (5, 5));
        assert_eq!(e.command(), "Put");
        assert!(e.is_execute());
        assert_eq!(e.encode(), "Mx5 5 \n");
    }

    #[test]
    fn test_argument_messages() {
        let events = read_all("MX0 4 8 4 Edit\nMX0 0 0 5 ,x/a/\nMX0 0 0 3 x:1\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].command(), "Edit");
        assert_eq!(events[0].arg, ",x/a/");
    }

    #[test]
    fn test_truncated_event_is_error() {
        let mut reader = EventReader::new("MX0 4 2 3 Put\n".as_bytes());
        let err = reader.read_event().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_bad_number_is_error() {
        let mut reader = EventReader::new("KIx 1 0 0 \n".as_bytes());
        assert_eq!(reader.read_event().unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_parse_log_line() {
        assert_eq!(
            parse_log_line("7 new /home/glenda/lib/profile\n"),
            Some(LogEntry {
                id: 7,
                op: "new".to_string(),
                name: "/home/glenda/lib/profile".to_string(),
            })
        );
        assert_eq!(parse_log_line("12 del").map(|e| e.name), Some(String::new()));
        assert_eq!(parse_log_line("9 put /tmp/a b.txt").unwrap().name, "/tmp/a b.txt");
        assert_eq!(parse_log_line("garbage"), None);
    }

    #[test]
    fn test_parse_index_line() {
        let line = "          3          38         120           0           1 /src/main.go Del Snarf | Look ";
        assert_eq!(parse_index_line(line), Some((3, "/src/main.go".to_string())));
        assert_eq!(parse_index_line(""), None);
    }

    #[test]
    fn test_tag_file_name() {
        assert_eq!(tag_file_name("/src/main.go Del Snarf Undo | Look"), "/src/main.go");
        assert_eq!(tag_file_name(""), "");
    }
}
