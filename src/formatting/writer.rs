use std::io;

use crate::event::Window;

/// Address selecting the whole body.
pub const WHOLE_BODY: &str = ",";

/// Replace the whole body with each update in turn.
///
/// Best effort: the first failure stops the remaining writes, so earlier
/// updates may already have landed.
pub fn write_updates(win: &dyn Window, updates: &[Vec<u8>]) -> io::Result<()> {
    for update in updates {
        win.set_addr(WHOLE_BODY)?;
        win.set_data(update)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail_data_after: Option<usize>,
    }

    impl Window for Recorder {
        fn read_body(&self) -> io::Result<Vec<u8>> {
            Ok(Vec::new())
        }
        fn write_to_tag(&self, _text: &str) -> io::Result<()> {
            Ok(())
        }
        fn exec_in_tag(&self, _cmd: &str, _args: &[&str]) -> io::Result<()> {
            Ok(())
        }
        fn set_addr(&self, addr: &str) -> io::Result<()> {
            self.calls.lock().unwrap().push(format!("addr {addr}"));
            Ok(())
        }
        fn set_data(&self, data: &[u8]) -> io::Result<()> {
            let mut calls = self.calls.lock().unwrap();
            let writes = calls.iter().filter(|c| c.starts_with("data")).count();
            if self.fail_data_after.is_some_and(|n| writes >= n) {
                return Err(io::Error::other("window gone"));
            }
            calls.push(format!("data {}", String::from_utf8_lossy(data)));
            Ok(())
        }
    }

    #[test]
    fn test_writes_in_order() {
        let win = Recorder::default();
        write_updates(&win, &[b"one".to_vec(), b"two".to_vec()]).unwrap();
        assert_eq!(
            *win.calls.lock().unwrap(),
            vec!["addr ,", "data one", "addr ,", "data two"]
        );
    }

    #[test]
    fn test_no_updates_no_writes() {
        let win = Recorder::default();
        write_updates(&win, &[]).unwrap();
        assert!(win.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_stops_on_first_failure() {
        let win = Recorder {
            fail_data_after: Some(1),
            ..Default::default()
        };
        let err = write_updates(&win, &[b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]).unwrap_err();
        assert_eq!(err.to_string(), "window gone");
        assert_eq!(*win.calls.lock().unwrap(), vec!["addr ,", "data one", "addr ,"]);
    }
}
