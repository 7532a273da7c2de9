//! Command definitions and dispatch collaborators.
//!
//! Commands are declared as [`CommandSpec`] values collected into
//! [`CommandTable`]s. The client registers one table of builtin commands
//! and one of protocol commands; plugins stay behind the [`PluginHost`]
//! trait. This keeps the metadata declarative, which enables:
//! - Auto-generated help text
//! - Consistent arity validation before a handler runs
//! - Command discovery for tab completion

use std::fmt;
use std::rc::Rc;

/// How a command wants its arguments delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgMode {
    /// The raw argument string, untouched.
    #[default]
    RawString,
    /// Whitespace-split argument vector.
    ArgVector,
}

/// Arguments handed to a handler, shaped per the command's [`ArgMode`].
#[derive(Debug, Clone, Copy)]
pub enum Args<'a> {
    /// Raw argument string (may be empty).
    Raw(&'a str),
    /// Split argument vector.
    Vector(&'a [String]),
}

/// Opaque failure returned by a handler.
///
/// Handlers do their own detailed reporting; the dispatcher only records
/// that the command failed.
#[derive(Debug, Clone, Default)]
pub struct HandlerError;

/// Result type for command handlers.
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Handler invoked when a command dispatches.
pub type Handler = Rc<dyn Fn(&Scope, Args<'_>) -> HandlerResult>;

/// Where a command line came from.
///
/// Passed through to handlers untouched; the dispatcher only reads the
/// connection and DCC flags for protocol command preconditions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Server the active buffer belongs to, if any.
    pub server: Option<String>,
    /// Channel the active buffer shows, if any.
    pub channel: Option<String>,
    /// Whether the server connection is up.
    pub connected: bool,
    /// Whether the active buffer is a DCC conversation.
    pub dcc: bool,
}

impl Scope {
    /// Scope for a connected channel buffer.
    pub fn channel(server: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            channel: Some(channel.into()),
            connected: true,
            dcc: false,
        }
    }

    /// Scope for a disconnected server buffer.
    pub fn offline(server: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
            channel: None,
            connected: false,
            dcc: false,
        }
    }
}

/// Definition of a command.
#[derive(Clone)]
pub struct CommandSpec {
    /// Primary command name (without leading /).
    pub name: String,
    /// Short description shown in help.
    pub description: String,
    /// Detailed usage information.
    pub usage: String,
    /// Minimum accepted argument count.
    pub min_args: usize,
    /// Maximum accepted argument count, `None` for unbounded.
    pub max_args: Option<usize>,
    /// How arguments are delivered to the handler.
    pub arg_mode: ArgMode,
    /// Whether arguments pass through the charset encoder before dispatch.
    pub charset_sensitive: bool,
    /// Completion template, one group per argument index.
    pub completion_template: Option<String>,
    /// Whether the command requires a live server connection.
    pub connection_required: bool,
    /// Whether the command is rejected in DCC conversations.
    pub forbidden_on_dcc: bool,
    /// Handler to invoke; `None` for metadata-only entries.
    pub handler: Option<Handler>,
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .field("arg_mode", &self.arg_mode)
            .field("completion_template", &self.completion_template)
            .finish()
    }
}

impl CommandSpec {
    /// Creates a spec with no arguments and no handler.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            usage: format!("/{name}"),
            name,
            description: description.into(),
            min_args: 0,
            max_args: Some(0),
            arg_mode: ArgMode::RawString,
            charset_sensitive: false,
            completion_template: None,
            connection_required: false,
            forbidden_on_dcc: false,
            handler: None,
        }
    }

    /// Sets the accepted argument count range (`None` max = unbounded).
    pub fn arity(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_args = min;
        self.max_args = max;
        self
    }

    /// Sets the usage line.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Delivers arguments as a whitespace-split vector.
    pub fn arg_vector(mut self) -> Self {
        self.arg_mode = ArgMode::ArgVector;
        self
    }

    /// Routes the argument string through the charset encoder.
    pub fn charset_sensitive(mut self) -> Self {
        self.charset_sensitive = true;
        self
    }

    /// Sets the completion template.
    pub fn completion(mut self, template: impl Into<String>) -> Self {
        self.completion_template = Some(template.into());
        self
    }

    /// Requires a live server connection.
    pub fn needs_connection(mut self) -> Self {
        self.connection_required = true;
        self
    }

    /// Rejects the command in DCC conversations.
    pub fn no_dcc(mut self) -> Self {
        self.forbidden_on_dcc = true;
        self
    }

    /// Sets the handler.
    pub fn handler(mut self, f: impl Fn(&Scope, Args<'_>) -> HandlerResult + 'static) -> Self {
        self.handler = Some(Rc::new(f));
        self
    }
}

/// Ordered collection of command specs.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: Vec<CommandSpec>,
}

impl CommandTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from a list of specs.
    pub fn from_specs(specs: Vec<CommandSpec>) -> Self {
        Self { entries: specs }
    }

    /// Adds a spec to the table.
    pub fn insert(&mut self, spec: CommandSpec) {
        self.entries.push(spec);
    }

    /// Finds a command by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&CommandSpec> {
        let name_lower = name.to_lowercase();
        self.entries.iter().find(|c| c.name.to_lowercase() == name_lower)
    }

    /// Iterates over command names in table order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name.as_str())
    }

    /// Iterates over specs in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.entries.iter()
    }

    /// Number of commands in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Generates help text for the table.
    pub fn generate_help_text(&self, title: &str) -> String {
        let command_lines = self
            .entries
            .iter()
            .map(|cmd| format!("  {:<24} - {}\n", cmd.usage, cmd.description))
            .collect::<Vec<_>>()
            .join("");
        format!("{title}:\n{command_lines}")
    }
}

/// Result of asking the plugin layer to run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginDispatch {
    /// A plugin recognized and ran the command.
    Handled,
    /// A plugin recognized the command but it failed.
    HandledWithError,
    /// No plugin claims this command.
    NotFound,
}

/// Interface to the plugin layer.
pub trait PluginHost {
    /// Offers a command to the plugins.
    fn run_command(&self, name: &str, args: Option<&str>, scope: &Scope) -> PluginDispatch;

    /// Names of all plugin-declared commands.
    fn command_names(&self) -> Vec<String>;

    /// Completion template a plugin declared for one of its commands.
    fn completion_template(&self, name: &str) -> Option<String>;

    /// Candidates for a plugin-defined named completion (`%(name)`).
    fn custom_candidates(&self, name: &str) -> Vec<String>;
}

/// Plugin host that knows no commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlugins;

impl PluginHost for NoPlugins {
    fn run_command(&self, _name: &str, _args: Option<&str>, _scope: &Scope) -> PluginDispatch {
        PluginDispatch::NotFound
    }

    fn command_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn completion_template(&self, _name: &str) -> Option<String> {
        None
    }

    fn custom_candidates(&self, _name: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Re-encodes outgoing text for charset-sensitive commands.
pub trait CharsetEncoder {
    /// Converts `text` to the wire encoding for the scope's target.
    fn encode(&self, scope: &Scope, text: &str) -> String;
}

/// Encoder that passes text through unchanged (UTF-8 everywhere).
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityEncoder;

impl CharsetEncoder for IdentityEncoder {
    fn encode(&self, _scope: &Scope, text: &str) -> String {
        text.to_string()
    }
}
