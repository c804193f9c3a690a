use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::codec::{RawEvent, tag_file_name};
use crate::event::Window;

/// A window directory `<root>/<id>` of the acme file tree.
pub struct AcmeWindow {
    id: usize,
    dir: PathBuf,
    files: Mutex<WinFiles>,
}

/// Files kept open for the window lifetime. acme forgets the address once
/// `addr` is closed, so `addr` and `data` stay open together.
#[derive(Default)]
struct WinFiles {
    addr: Option<File>,
    data: Option<File>,
    event: Option<File>,
}

impl AcmeWindow {
    /// Open window `id` and its event file. The returned file is the read side
    /// of the event stream; the window keeps a duplicate for writing events back.
    pub fn open(root: &Path, id: usize) -> io::Result<(Self, File)> {
        let dir = root.join(id.to_string());
        let events = OpenOptions::new().read(true).write(true).open(dir.join("event"))?;
        let writer = events.try_clone()?;
        let win = Self {
            id,
            dir,
            files: Mutex::new(WinFiles {
                event: Some(writer),
                ..Default::default()
            }),
        };
        Ok((win, events))
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// First word of the tag, which acme keeps as the window's file name.
    pub fn file_name(&self) -> String {
        match fs::read_to_string(self.dir.join("tag")) {
            Ok(tag) => tag_file_name(&tag).to_string(),
            Err(e) => {
                log::debug!("Failed to read tag of window {}: {e}", self.id);
                String::new()
            }
        }
    }

    /// Hand an event back to acme for default handling.
    pub fn write_event(&self, event: &RawEvent) -> io::Result<()> {
        self.write_event_message(&event.encode())
    }

    fn write_event_message(&self, message: &str) -> io::Result<()> {
        let mut files = self.files();
        let event = files
            .event
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "event file not open"))?;
        event.write_all(message.as_bytes())
    }

    fn files(&self) -> MutexGuard<'_, WinFiles> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn open_write(&self, name: &str) -> io::Result<File> {
        OpenOptions::new().write(true).open(self.dir.join(name))
    }
}

impl Window for AcmeWindow {
    fn read_body(&self) -> io::Result<Vec<u8>> {
        fs::read(self.dir.join("body"))
    }

    fn write_to_tag(&self, text: &str) -> io::Result<()> {
        self.open_write("tag")?.write_all(text.as_bytes())
    }

    fn exec_in_tag(&self, cmd: &str, args: &[&str]) -> io::Result<()> {
        let start = fs::read_to_string(self.dir.join("tag"))?.chars().count();
        let text = std::iter::once(cmd).chain(args.iter().copied()).collect::<Vec<_>>().join(" ");
        self.write_to_tag(&format!(" {text}"))?;

        // Execute the text just appended, as if middle-clicked in the tag.
        // A lowercase kind addresses the tag; uppercase would run body text.
        let q0 = start + 1;
        let q1 = q0 + text.chars().count();
        self.write_event_message(&format!("Mx{q0} {q1} \n"))
    }

    fn set_addr(&self, addr: &str) -> io::Result<()> {
        let mut files = self.files();
        if files.addr.is_none() {
            files.addr = Some(self.open_write("addr")?);
        }
        match files.addr.as_mut() {
            Some(file) => file.write_all(addr.as_bytes()),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "addr file not open")),
        }
    }

    fn set_data(&self, data: &[u8]) -> io::Result<()> {
        let mut files = self.files();
        if files.data.is_none() {
            files.data = Some(self.open_write("data")?);
        }
        match files.data.as_mut() {
            Some(file) => file.write_all(data),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "data file not open")),
        }
    }
}
