use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;

use super::codec::{EventReader, RawEvent, parse_index_line, parse_log_line};
use super::shadow::BodyShadow;
use super::window::AcmeWindow;
use crate::event::{
    Event, KeyDirection, KeyHook, KeyOutcome, Keystroke, Listener, ListenerError, OpenHook, PutHook, Window,
    WindowLookup,
};

/// Execute command that saves a window.
const PUT_COMMAND: &str = "Put";

/// Live acme windows by id.
#[derive(Default)]
pub struct WindowRegistry {
    windows: RwLock<HashMap<usize, Arc<AcmeWindow>>>,
}

impl WindowRegistry {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<usize, Arc<AcmeWindow>>> {
        self.windows.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<usize, Arc<AcmeWindow>>> {
        self.windows.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contains(&self, id: usize) -> bool {
        self.read().contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn insert(&self, win: Arc<AcmeWindow>) {
        self.write().insert(win.id(), win);
    }

    fn remove(&self, id: usize) {
        if self.write().remove(&id).is_some() {
            log::debug!("Detached window {id}");
        }
    }
}

impl WindowLookup for WindowRegistry {
    fn window(&self, id: usize) -> Option<Arc<dyn Window>> {
        self.read().get(&id).map(|w| w.clone() as Arc<dyn Window>)
    }
}

#[derive(Default)]
struct HookSet {
    open: Vec<Arc<dyn OpenHook>>,
    put: Vec<Arc<dyn PutHook>>,
    key: Vec<Arc<dyn KeyHook>>,
}

/// Listener over acme's file tree mounted at `root`.
pub struct AcmeListener {
    root: PathBuf,
    registry: Arc<WindowRegistry>,
    hooks: Arc<RwLock<HookSet>>,
}

impl AcmeListener {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            registry: Arc::new(WindowRegistry::default()),
            hooks: Arc::new(RwLock::new(HookSet::default())),
        }
    }

    fn hooks_mut(&self) -> RwLockWriteGuard<'_, HookSet> {
        self.hooks.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Attach to every window already listed in `index`.
    fn attach_existing(&self) {
        let index = match fs::read_to_string(self.root.join("index")) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Failed to read acme index: {e}");
                return;
            }
        };
        for (id, _) in index.lines().filter_map(parse_index_line) {
            self.attach(id);
        }
    }

    /// Open the window's event file and start its event loop.
    fn attach(&self, id: usize) {
        if self.registry.contains(id) {
            return;
        }
        let (win, events) = match AcmeWindow::open(&self.root, id) {
            Ok(opened) => opened,
            Err(e) => {
                log::warn!("Failed to attach to window {id}: {e}");
                return;
            }
        };
        let win = Arc::new(win);
        self.registry.insert(win.clone());
        log::debug!("Attached window {id}");

        let dispatcher = Dispatcher::new(win, self.hooks.clone(), self.registry.clone());
        let spawned = thread::Builder::new()
            .name(format!("acme-win-{id}"))
            .spawn(move || dispatcher.run(events));
        if let Err(e) = spawned {
            log::error!("Failed to start event loop for window {id}: {e}");
            self.registry.remove(id);
        }
    }
}

impl WindowLookup for AcmeListener {
    fn window(&self, id: usize) -> Option<Arc<dyn Window>> {
        self.registry.window(id)
    }
}

impl Listener for AcmeListener {
    fn register_open_hook(&self, hook: Arc<dyn OpenHook>) {
        self.hooks_mut().open.push(hook);
    }

    fn register_put_hook(&self, hook: Arc<dyn PutHook>) {
        self.hooks_mut().put.push(hook);
    }

    fn register_key_hook(&self, hook: Arc<dyn KeyHook>) {
        self.hooks_mut().key.push(hook);
    }

    fn windows(&self) -> Arc<dyn WindowLookup> {
        self.registry.clone()
    }

    fn listen(&self) -> Result<(), ListenerError> {
        let log_path = self.root.join("log");
        let log = File::open(&log_path).map_err(|source| ListenerError::Attach {
            path: log_path.clone(),
            source,
        })?;
        log::info!("Listening for acme events at {}", self.root.display());

        self.attach_existing();

        for line in BufReader::new(log).lines() {
            let line = line?;
            let Some(entry) = parse_log_line(&line) else {
                log::debug!("Ignoring log line {line:?}");
                continue;
            };
            match entry.op.as_str() {
                "new" | "zerox" => {
                    log::debug!("Window {} opened: {}", entry.id, entry.name);
                    self.attach(entry.id);
                }
                "del" => self.registry.remove(entry.id),
                _ => {}
            }
        }
        Err(ListenerError::Closed)
    }
}

/// Event loop of one window.
struct Dispatcher {
    win: Arc<AcmeWindow>,
    hooks: Arc<RwLock<HookSet>>,
    registry: Arc<WindowRegistry>,
    body: BodyShadow,
}

impl Dispatcher {
    fn new(win: Arc<AcmeWindow>, hooks: Arc<RwLock<HookSet>>, registry: Arc<WindowRegistry>) -> Self {
        Self {
            win,
            hooks,
            registry,
            body: BodyShadow::default(),
        }
    }

    fn run(mut self, events: File) {
        let id = self.win.id();
        self.resync();
        let event = Event::new(id, self.win.file_name());
        for hook in self.open_hooks() {
            hook.on_open(self.win.as_ref(), &event);
        }

        let mut reader = EventReader::new(BufReader::new(events));
        loop {
            match reader.read_event() {
                Ok(Some(raw)) => self.dispatch(raw),
                Ok(None) => break,
                Err(e) => {
                    log::debug!("Event stream of window {id} failed: {e}");
                    break;
                }
            }
        }
        self.registry.remove(id);
    }

    fn dispatch(&mut self, raw: RawEvent) {
        let removed = self.track_body(&raw);
        match (raw.c1, raw.c2) {
            ('K', 'I') if raw.text == "\t" => self.keystroke(&raw, KeyDirection::Forward, raw.text.clone()),
            ('K', 'D') if raw.q1 == raw.q0 + 1 => {
                self.keystroke(&raw, KeyDirection::Backward, removed.unwrap_or_default())
            }
            _ if raw.is_execute() => {
                if raw.command() == PUT_COMMAND {
                    self.put();
                }
                self.write_back(&raw);
            }
            _ if raw.is_look() => self.write_back(&raw),
            _ => {}
        }
    }

    /// Replay a body insert or delete on the shadow copy. Returns the text a
    /// delete removed when the copy knew it.
    fn track_body(&mut self, raw: &RawEvent) -> Option<String> {
        let removed = match raw.c2 {
            'I' => {
                self.body.insert(raw.q0, raw.q1, &raw.text);
                None
            }
            'D' => self.body.delete(raw.q0, raw.q1),
            _ => return None,
        };
        if !self.body.is_known() {
            self.resync();
        }
        removed
    }

    fn resync(&mut self) {
        match self.win.read_body() {
            Ok(body) => self.body.reset(&body),
            Err(e) => log::debug!("Failed to read body of window {}: {e}", self.win.id()),
        }
    }

    fn keystroke(&self, raw: &RawEvent, direction: KeyDirection, text: String) {
        let key = Keystroke {
            event: Event::new(self.win.id(), self.win.file_name()),
            direction,
            q0: raw.q0,
            q1: raw.q1,
            text,
        };
        for hook in self.key_hooks('\t') {
            if hook.on_key(&key) == KeyOutcome::Handled {
                break;
            }
        }
    }

    fn put(&self) {
        let mut event = Event::new(self.win.id(), self.win.file_name());
        for hook in self.put_hooks() {
            event = hook.on_put(event);
        }
    }

    fn write_back(&self, raw: &RawEvent) {
        if let Err(e) = self.win.write_event(raw) {
            log::warn!("Failed to hand event back to window {}: {e}", self.win.id());
        }
    }

    fn open_hooks(&self) -> Vec<Arc<dyn OpenHook>> {
        self.hooks.read().unwrap_or_else(|e| e.into_inner()).open.clone()
    }

    fn put_hooks(&self) -> Vec<Arc<dyn PutHook>> {
        self.hooks.read().unwrap_or_else(|e| e.into_inner()).put.clone()
    }

    fn key_hooks(&self, key: char) -> Vec<Arc<dyn KeyHook>> {
        let hooks = self.hooks.read().unwrap_or_else(|e| e.into_inner());
        hooks.key.iter().filter(|h| h.key() == key).cloned().collect()
    }
}
