//! Hook orchestration: decides, per event, whether and how a buffer is formatted.

use std::io;
use std::sync::Arc;

use super::error::FormatError;
use super::executor::CommandRunner;
use super::keymap::{DEFAULT_INDENT, Keymap, KeymapPolicy};
use super::resolver::{Command, ExtensionTable, Spec};
use super::writer::write_updates;
use crate::config::Config;
use crate::event::{Event, Listener, OpenHook, PutHook, Window, WindowLookup};

/// Menu items every window gets ahead of the configured ones.
pub const BUILTIN_MENU: &[&str] = &["Get", "Undo", "Redo"];

/// Separates built-in from configured menu items.
pub const MENU_SEPARATOR: &str = "|";

/// Control command setting the tab width of a window.
const TAB_WIDTH_COMMAND: &str = "Tab";

/// Control command switching tab expansion on.
const TAB_EXPAND_COMMAND: &str = "Spaces";

/// Formats buffers on put and decorates them on open.
pub struct Formatter {
    table: Arc<ExtensionTable>,
    menu: Vec<String>,
    runner: CommandRunner,
    windows: Arc<dyn WindowLookup>,
}

impl Formatter {
    /// Build a formatter from the rule file.
    pub fn new(config: &Config, windows: Arc<dyn WindowLookup>) -> Self {
        Self::with_table(
            ExtensionTable::from_config(config),
            config.tag.menu.clone(),
            CommandRunner::new(config.timeout),
            windows,
        )
    }

    pub fn with_table(
        table: ExtensionTable,
        menu: Vec<String>,
        runner: CommandRunner,
        windows: Arc<dyn WindowLookup>,
    ) -> Self {
        Self {
            table: Arc::new(table),
            menu,
            runner,
            windows,
        }
    }

    pub fn table(&self) -> &ExtensionTable {
        &self.table
    }

    /// Register the open, put and tab hooks with `listener`.
    pub fn attach(self: &Arc<Self>, listener: &dyn Listener) {
        listener.register_open_hook(self.clone());
        listener.register_put_hook(self.clone());
        listener.register_key_hook(Arc::new(Keymap::new(FormatPolicy {
            table: self.table.clone(),
            windows: self.windows.clone(),
        })));
    }

    /// Run every command against the live buffer, then write all results back.
    ///
    /// Each command sees the buffer as it is now, not the previous command's
    /// output. Nothing is written unless every command succeeds.
    pub fn exec_cmds(&self, event: &Event, commands: &[Command], ext: &str) -> Result<(), FormatError> {
        let mut updates = Vec::with_capacity(commands.len());
        for (index, command) in commands.iter().enumerate() {
            updates.push(self.refmt(event, index, command, ext)?);
        }

        let win = self.window(event.id)?;
        write_updates(win.as_ref(), &updates).map_err(|source| FormatError::Buffer { id: event.id, source })
    }

    /// Run one command against the current content of the event's buffer.
    fn refmt(&self, event: &Event, index: usize, command: &Command, ext: &str) -> Result<Vec<u8>, FormatError> {
        let win = self.window(event.id)?;
        let old = win
            .read_body()
            .map_err(|source| FormatError::Buffer { id: event.id, source })?;
        self.runner
            .run(&old, command, ext)
            .map_err(|source| FormatError::Command {
                index,
                program: command.executable.clone(),
                source,
            })
    }

    /// Write the built-in and configured menu entries to the tag.
    pub fn write_menu(&self, win: &dyn Window) -> io::Result<()> {
        win.write_to_tag(&self.menu_text())
    }

    /// The text [`Formatter::write_menu`] appends to a tag.
    pub fn menu_text(&self) -> String {
        let mut text = String::new();
        for item in BUILTIN_MENU {
            text.push(' ');
            text.push_str(item);
        }
        text.push(' ');
        text.push_str(MENU_SEPARATOR);
        for item in &self.menu {
            text.push(' ');
            if item.contains(' ') {
                text.push('(');
                text.push_str(item);
                text.push(')');
            } else {
                text.push_str(item);
            }
        }
        text
    }

    /// Apply the spec's indent width, and tab expansion if asked, to the window.
    pub fn setup_formatting(&self, win: &dyn Window, spec: &Spec) -> io::Result<()> {
        if !spec.is_configured() {
            return Ok(());
        }
        win.write_to_tag("\n")?;
        win.exec_in_tag(TAB_WIDTH_COMMAND, &[&spec.indent.to_string()])?;
        if spec.tab_expand {
            win.exec_in_tag(TAB_EXPAND_COMMAND, &["on"])?;
        }
        Ok(())
    }

    fn window(&self, id: usize) -> Result<Arc<dyn Window>, FormatError> {
        self.windows.window(id).ok_or(FormatError::StaleBuffer { id })
    }
}

impl OpenHook for Formatter {
    fn on_open(&self, win: &dyn Window, event: &Event) {
        let resolved = self.table.resolve(&event.file);
        if resolved.spec.is_configured() {
            log::debug!("Setting up {} as {}", event.file, resolved.key);
            if let Err(e) = self.setup_formatting(win, resolved.spec) {
                log::error!("Failed to set up formatting for {}: {e}", event.file);
            }
        }
        if let Err(e) = self.write_menu(win) {
            log::error!("Failed to write menu for {}: {e}", event.file);
        }
    }
}

impl PutHook for Formatter {
    fn on_put(&self, event: Event) -> Event {
        let resolved = self.table.resolve(&event.file);
        if !resolved.spec.is_configured() {
            return event;
        }
        log::debug!(
            "Formatting {} with {} command(s) for {}",
            event.file,
            resolved.spec.commands.len(),
            resolved.key
        );
        if let Err(e) = self.exec_cmds(&event, &resolved.spec.commands, resolved.key) {
            log::error!("Formatting {} failed: {e}", event.file);
        }
        event
    }
}

/// Keymap decisions backed by the extension table.
struct FormatPolicy {
    table: Arc<ExtensionTable>,
    windows: Arc<dyn WindowLookup>,
}

impl KeymapPolicy for FormatPolicy {
    fn resolve_window(&self, id: usize) -> Option<Arc<dyn Window>> {
        self.windows.window(id)
    }

    fn resolve_indent(&self, event: &Event) -> usize {
        let spec = self.table.resolve(&event.file).spec;
        if spec.is_configured() { spec.indent } else { DEFAULT_INDENT }
    }

    fn tab_expand_enabled(&self, event: &Event) -> bool {
        self.table.resolve(&event.file).spec.tab_expand
    }
}
