//! Shared fakes for integration tests: an in-memory window that records
//! every write, and a lookup over a set of them.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use acmefmt::event::{Window, WindowLookup};

/// One call made against a [`FakeWindow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Tag(String),
    Exec(String, Vec<String>),
    Addr(String),
    Data(Vec<u8>),
}

/// In-memory window. `set_data` at `,` replaces the whole body; `#q0,#q1`
/// addresses are applied on runes.
#[derive(Default)]
pub struct FakeWindow {
    body: Mutex<String>,
    addr: Mutex<Option<(usize, usize)>>,
    calls: Mutex<Vec<Call>>,
    fail_reads: bool,
}

impl FakeWindow {
    pub fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: Mutex::new(body.to_string()),
            ..Default::default()
        })
    }

    pub fn unreadable() -> Arc<Self> {
        Arc::new(Self {
            fail_reads: true,
            ..Default::default()
        })
    }

    pub fn body(&self) -> String {
        self.body.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn data_writes(&self) -> Vec<Vec<u8>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Data(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn tag_text(&self) -> String {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Tag(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

fn parse_rune_range(addr: &str, len: usize) -> io::Result<(usize, usize)> {
    if addr == "," {
        return Ok((0, len));
    }
    let bad = || io::Error::new(io::ErrorKind::InvalidInput, format!("bad address {addr:?}"));
    let (a, b) = addr.split_once(',').ok_or_else(bad)?;
    let num = |s: &str| s.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()).ok_or_else(bad);
    let (q0, q1) = (num(a)?, num(b)?);
    if q0 > q1 || q1 > len {
        return Err(bad());
    }
    Ok((q0, q1))
}

impl Window for FakeWindow {
    fn read_body(&self) -> io::Result<Vec<u8>> {
        if self.fail_reads {
            return Err(io::Error::other("body unreadable"));
        }
        Ok(self.body().into_bytes())
    }

    fn write_to_tag(&self, text: &str) -> io::Result<()> {
        self.calls.lock().unwrap().push(Call::Tag(text.to_string()));
        Ok(())
    }

    fn exec_in_tag(&self, cmd: &str, args: &[&str]) -> io::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Exec(cmd.to_string(), args.iter().map(|a| a.to_string()).collect()));
        Ok(())
    }

    fn set_addr(&self, addr: &str) -> io::Result<()> {
        let len = self.body().chars().count();
        *self.addr.lock().unwrap() = Some(parse_rune_range(addr, len)?);
        self.calls.lock().unwrap().push(Call::Addr(addr.to_string()));
        Ok(())
    }

    fn set_data(&self, data: &[u8]) -> io::Result<()> {
        let (q0, q1) = self.addr.lock().unwrap().unwrap_or((0, 0));
        let mut body = self.body.lock().unwrap();
        let chars: Vec<char> = body.chars().collect();
        let mut next: String = chars[..q0].iter().collect();
        next.push_str(&String::from_utf8_lossy(data));
        next.extend(&chars[q1..]);
        *body = next;
        self.calls.lock().unwrap().push(Call::Data(data.to_vec()));
        Ok(())
    }
}

/// Lookup over a fixed set of windows; windows can be closed mid-test.
#[derive(Default)]
pub struct FakeWindows {
    windows: Mutex<HashMap<usize, Arc<FakeWindow>>>,
}

impl FakeWindows {
    pub fn with(id: usize, win: Arc<FakeWindow>) -> Arc<Self> {
        let windows = Arc::new(Self::default());
        windows.insert(id, win);
        windows
    }

    pub fn insert(&self, id: usize, win: Arc<FakeWindow>) {
        self.windows.lock().unwrap().insert(id, win);
    }

    pub fn close(&self, id: usize) {
        self.windows.lock().unwrap().remove(&id);
    }
}

impl WindowLookup for FakeWindows {
    fn window(&self, id: usize) -> Option<Arc<dyn Window>> {
        self.windows
            .lock()
            .unwrap()
            .get(&id)
            .map(|w| w.clone() as Arc<dyn Window>)
    }
}

/// A `sh -c` command that receives the temp file path as `$1`.
pub fn sh(script: &str, prints_to_stdout: bool) -> acmefmt::formatting::Command {
    acmefmt::formatting::Command {
        executable: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
            "$NAME".to_string(),
        ],
        prints_to_stdout,
        stdout_only: false,
    }
}
