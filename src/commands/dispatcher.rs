//! Command routing.
//!
//! A line typed by the user is routed through up to four layers, in
//! priority order: plugins, aliases, the builtin table, the protocol
//! table. The first layer that claims the name wins; nothing matching
//! anywhere is an unknown command.

use tracing::{debug, info, trace};

use crate::commands::aliases::{expand_args, AliasRegistry};
use crate::commands::definitions::{
    ArgMode, Args, CharsetEncoder, CommandSpec, CommandTable, IdentityEncoder, NoPlugins,
    PluginDispatch, PluginHost, Scope,
};
use crate::commands::splitter::{split_top_level, tokenize};
use crate::error::{CommandError, Result};

/// Character that opens a command line.
pub const COMMAND_MARKER: char = '/';

/// Whether a line is a command.
///
/// A line is a command when it starts with the marker and the marker is
/// not doubled; `//hello` is chat text that renders as `/hello`.
pub fn is_command(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(COMMAND_MARKER) && chars.next() != Some(COMMAND_MARKER)
}

/// Routes command lines to plugins, aliases and command tables.
///
/// Constructed once per client session and borrowed wherever input is
/// handled. The dispatcher owns the alias registry so alias management
/// commands and alias routing stay consistent.
pub struct CommandDispatcher {
    builtin: CommandTable,
    protocol: CommandTable,
    aliases: AliasRegistry,
    plugin_host: Box<dyn PluginHost>,
    encoder: Box<dyn CharsetEncoder>,
}

impl CommandDispatcher {
    /// Creates a dispatcher over the given command tables.
    ///
    /// The alias management commands (`/alias`, `/unalias`, `/builtin`)
    /// are appended to the builtin table so help and completion see
    /// them; their behavior is implemented by the dispatcher itself.
    pub fn new(mut builtin: CommandTable, protocol: CommandTable) -> Self {
        for spec in management_specs() {
            if builtin.find(&spec.name).is_none() {
                builtin.insert(spec);
            }
        }
        Self {
            builtin,
            protocol,
            aliases: AliasRegistry::new(),
            plugin_host: Box::new(NoPlugins),
            encoder: Box::new(IdentityEncoder),
        }
    }

    /// Replaces the plugin host.
    pub fn with_plugin_host(mut self, host: impl PluginHost + 'static) -> Self {
        self.plugin_host = Box::new(host);
        self
    }

    /// Replaces the charset encoder.
    pub fn with_encoder(mut self, encoder: impl CharsetEncoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    /// The builtin command table.
    pub fn builtin(&self) -> &CommandTable {
        &self.builtin
    }

    /// The protocol command table.
    pub fn protocol(&self) -> &CommandTable {
        &self.protocol
    }

    /// The alias registry.
    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Mutable access to the alias registry.
    pub fn aliases_mut(&mut self) -> &mut AliasRegistry {
        &mut self.aliases
    }

    /// The plugin host.
    pub fn plugin_host(&self) -> &dyn PluginHost {
        self.plugin_host.as_ref()
    }

    /// Routes one command line through all layers.
    pub fn dispatch(&mut self, scope: &Scope, line: &str) -> Result<()> {
        self.dispatch_inner(scope, line, false)
    }

    /// Routes one command line directly to the builtin and protocol
    /// tables, skipping plugins and aliases.
    pub fn dispatch_builtin(&mut self, scope: &Scope, line: &str) -> Result<()> {
        self.dispatch_inner(scope, line, true)
    }

    fn dispatch_inner(&mut self, scope: &Scope, line: &str, only_builtin: bool) -> Result<()> {
        let body = line.strip_prefix(COMMAND_MARKER).unwrap_or(line);
        let mut parts = body.splitn(2, ' ');
        let name = parts.next().unwrap_or("").to_lowercase();
        let args = parts.next().map(str::trim).filter(|s| !s.is_empty());

        if name.is_empty() {
            return Err(CommandError::UnknownCommand(name));
        }
        debug!(command = %name, only_builtin, "dispatching");

        if !only_builtin {
            match self.plugin_host.run_command(&name, args, scope) {
                PluginDispatch::Handled => return Ok(()),
                PluginDispatch::HandledWithError => {
                    return Err(CommandError::HandlerFailed(name));
                }
                PluginDispatch::NotFound => {}
            }

            if self.aliases.get(&name).is_some() {
                return self.dispatch_alias(scope, &name, args);
            }
        }

        // Alias management is implemented here rather than as handlers
        // so it can mutate the registry the dispatcher owns.
        match name.as_str() {
            "alias" => return self.run_alias_command(args),
            "unalias" => return self.run_unalias_command(args),
            "builtin" => {
                let rest = args.ok_or(CommandError::Arity {
                    command: name,
                    min: 1,
                    max: None,
                    given: 0,
                })?;
                let sub = with_marker(rest);
                return self.dispatch_inner(scope, &sub, true);
            }
            _ => {}
        }

        if let Some(spec) = self.builtin.find(&name).cloned() {
            return self.run_spec(&spec, scope, args);
        }

        // Protocol entries without a handler describe server-to-client
        // messages only; typing one is not a command.
        if let Some(spec) = self
            .protocol
            .find(&name)
            .filter(|spec| spec.handler.is_some())
            .cloned()
        {
            if spec.connection_required && !scope.connected {
                return Err(CommandError::precondition(
                    spec.name,
                    "not connected to server",
                ));
            }
            if spec.forbidden_on_dcc && scope.dcc {
                return Err(CommandError::precondition(
                    spec.name,
                    "not available in DCC conversations",
                ));
            }
            return self.run_spec(&spec, scope, args);
        }

        Err(CommandError::UnknownCommand(name))
    }

    /// Expands an alias and dispatches its sub-commands.
    ///
    /// Only the last sub-command inherits the invocation's trailing
    /// arguments; the others run exactly as registered. The entry stays
    /// flagged `in_progress` over the whole expansion so loops through
    /// any depth of indirection are caught, and the flag is cleared even
    /// when a sub-command fails.
    fn dispatch_alias(&mut self, scope: &Scope, name: &str, args: Option<&str>) -> Result<()> {
        let (alias_name, expansion) = {
            let entry = self.aliases.get(name).expect("alias checked by caller");
            if entry.in_progress() {
                return Err(CommandError::CircularReference(entry.name().to_string()));
            }
            (entry.name().to_string(), entry.expansion().to_string())
        };
        debug!(alias = %alias_name, "expanding alias");

        let sub_commands = split_top_level(&expansion, ';');
        if let Some(entry) = self.aliases.get(name) {
            entry.set_in_progress(true);
        }

        let mut result = Ok(());
        let last = sub_commands.len().saturating_sub(1);
        for (i, sub) in sub_commands.iter().enumerate() {
            let expanded = if i == last {
                expand_args(sub, args.unwrap_or(""))
            } else {
                sub.clone()
            };
            result = self.dispatch_inner(scope, &with_marker(&expanded), false);
            if result.is_err() {
                break;
            }
        }

        if let Some(entry) = self.aliases.get(name) {
            entry.set_in_progress(false);
        }
        result
    }

    /// Runs a table command: arity check, charset conversion, handler.
    fn run_spec(&self, spec: &CommandSpec, scope: &Scope, args: Option<&str>) -> Result<()> {
        let raw = args.unwrap_or("");
        let given = tokenize(raw, " ", 0).len();
        if given < spec.min_args || spec.max_args.is_some_and(|max| given > max) {
            return Err(CommandError::Arity {
                command: spec.name.clone(),
                min: spec.min_args,
                max: spec.max_args,
                given,
            });
        }

        let encoded;
        let raw = if spec.charset_sensitive {
            encoded = self.encoder.encode(scope, raw);
            encoded.as_str()
        } else {
            raw
        };

        let handler = match &spec.handler {
            Some(handler) => handler,
            None => {
                trace!(command = %spec.name, "metadata-only command, nothing to run");
                return Ok(());
            }
        };

        let outcome = match spec.arg_mode {
            ArgMode::RawString => handler(scope, Args::Raw(raw)),
            ArgMode::ArgVector => {
                let argv = tokenize(raw, " ", 0);
                handler(scope, Args::Vector(&argv))
            }
        };
        outcome.map_err(|_| CommandError::HandlerFailed(spec.name.clone()))
    }

    fn run_alias_command(&mut self, args: Option<&str>) -> Result<()> {
        let tokens = tokenize(args.unwrap_or(""), " ", 2);
        match tokens.as_slice() {
            [] => {
                if self.aliases.is_empty() {
                    info!("no aliases defined");
                } else {
                    for entry in self.aliases.iter() {
                        info!(alias = entry.name(), expansion = entry.expansion());
                    }
                }
                Ok(())
            }
            [name] => match self.aliases.get(name) {
                Some(entry) => {
                    info!(alias = entry.name(), expansion = entry.expansion());
                    Ok(())
                }
                None => Err(CommandError::HandlerFailed("alias".to_string())),
            },
            [name, expansion] => {
                self.aliases.register(name, &with_marker(expansion))?;
                info!(alias = %name, "alias registered");
                Ok(())
            }
            _ => unreachable!("tokenize called with max_tokens = 2"),
        }
    }

    fn run_unalias_command(&mut self, args: Option<&str>) -> Result<()> {
        let tokens = tokenize(args.unwrap_or(""), " ", 0);
        let [name] = tokens.as_slice() else {
            return Err(CommandError::Arity {
                command: "unalias".to_string(),
                min: 1,
                max: Some(1),
                given: tokens.len(),
            });
        };
        if self.aliases.remove(name) {
            info!(alias = %name, "alias removed");
            Ok(())
        } else {
            Err(CommandError::HandlerFailed("unalias".to_string()))
        }
    }
}

fn with_marker(text: &str) -> String {
    if text.starts_with(COMMAND_MARKER) {
        text.to_string()
    } else {
        format!("{COMMAND_MARKER}{text}")
    }
}

/// Metadata for the commands the dispatcher implements itself.
fn management_specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("alias", "List aliases or register one")
            .usage("/alias [name [command]]")
            .arity(0, None)
            .completion("%a"),
        CommandSpec::new("unalias", "Remove an alias")
            .usage("/unalias <name>")
            .arity(1, Some(1))
            .completion("%a"),
        CommandSpec::new("builtin", "Run a command, skipping plugins and aliases")
            .usage("/builtin <command> [args]")
            .arity(1, None)
            .completion("%w"),
    ]
}
