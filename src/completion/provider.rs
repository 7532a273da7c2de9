//! Candidate list construction.
//!
//! Each command declares a completion template: one group per argument
//! index, `|`-separated alternatives inside a group, `%` escapes for
//! dynamic sources. The provider resolves the command under completion
//! (through aliases first), picks the template group for the cursor's
//! argument index and materializes a candidate list from it.

use tracing::{trace, warn};

use crate::commands::dispatcher::CommandDispatcher;
use crate::commands::splitter::tokenize;
use crate::completion::candidates::{Candidate, CandidateList};
use crate::completion::context::{Context, ContextKind};
use crate::completion::sources::CompletionSources;
use crate::config::CompletionConfig;
use crate::error::Result;

/// Builds candidate lists for a completion context.
pub struct CandidateProvider<'a> {
    dispatcher: &'a CommandDispatcher,
    sources: &'a dyn CompletionSources,
    config: &'a CompletionConfig,
}

impl<'a> CandidateProvider<'a> {
    /// Creates a provider over the dispatcher's command knowledge and
    /// the client's data sources.
    pub fn new(
        dispatcher: &'a CommandDispatcher,
        sources: &'a dyn CompletionSources,
        config: &'a CompletionConfig,
    ) -> Self {
        Self {
            dispatcher,
            sources,
            config,
        }
    }

    /// The completion look options.
    pub fn config(&self) -> &CompletionConfig {
        self.config
    }

    /// Builds candidates for a context, also returning the effective
    /// context kind (an argument of an unknown command degrades to nick
    /// completion). `None` means completion is off for this position.
    pub(crate) fn candidates_for(&self, ctx: &Context) -> Option<(CandidateList, ContextKind)> {
        let built = match ctx.kind {
            ContextKind::None => return None,
            ContextKind::Command => self.command_index().map(|l| (l, ContextKind::Command)),
            ContextKind::CommandArg => return self.command_arg_candidates(ctx),
            ContextKind::Auto => return self.auto_candidates(ctx),
            ContextKind::Nick => self.nick_candidates().map(|l| (l, ContextKind::Nick)),
        };
        match built {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!(error = %e, "failed to build candidate list");
                None
            }
        }
    }

    fn command_arg_candidates(&self, ctx: &Context) -> Option<(CandidateList, ContextKind)> {
        let typed = ctx.base_command.as_deref()?;
        // a looping alias disables completion, it is not a dispatch error
        let resolved = self.dispatcher.aliases().resolve_final(typed).ok()?;
        let name = resolved.split(' ').next().unwrap_or(&resolved).to_string();

        let template = self.lookup_template(&name);
        let template = match template {
            TemplateLookup::NotFound => {
                trace!(command = %name, "no spec found, falling back to nicks");
                return match self.nick_candidates() {
                    Ok(list) => Some((list, ContextKind::Nick)),
                    Err(_) => None,
                };
            }
            TemplateLookup::Missing => return None,
            TemplateLookup::Template(t) => t,
        };

        match self.build_from_template(&template, ctx) {
            Ok(Some(list)) => Some((list, ContextKind::CommandArg)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to build candidate list");
                None
            }
        }
    }

    fn lookup_template(&self, name: &str) -> TemplateLookup {
        let host = self.dispatcher.plugin_host();
        if host
            .command_names()
            .iter()
            .any(|c| c.eq_ignore_ascii_case(name))
        {
            return match host.completion_template(name) {
                Some(t) => TemplateLookup::Template(t),
                None => TemplateLookup::Missing,
            };
        }
        for table in [self.dispatcher.builtin(), self.dispatcher.protocol()] {
            if let Some(spec) = table.find(name) {
                return match &spec.completion_template {
                    Some(t) => TemplateLookup::Template(t.clone()),
                    None => TemplateLookup::Missing,
                };
            }
        }
        TemplateLookup::NotFound
    }

    /// Interprets the template group for the context's argument index.
    ///
    /// `Ok(None)` means completion is explicitly off here: the whole
    /// template is `-`, the argument index is past the last group, or
    /// the group contains `%-`.
    fn build_from_template(
        &self,
        template: &str,
        ctx: &Context,
    ) -> Result<Option<CandidateList>> {
        let template = template.trim();
        if template == "-" {
            return Ok(None);
        }
        let groups: Vec<&str> = template.split(' ').filter(|g| !g.is_empty()).collect();
        if ctx.arg_index == 0 || ctx.arg_index > groups.len() {
            return Ok(None);
        }

        let mut list = CandidateList::new();
        for alternative in groups[ctx.arg_index - 1].split('|') {
            match alternative.strip_prefix('%') {
                Some(escape) if escape.starts_with('-') => return Ok(None),
                Some(escape) => {
                    self.add_escape(&mut list, escape, ctx)?;
                }
                None if alternative.is_empty() => {}
                None => list.insert_sorted(Candidate::word(alternative))?,
            }
        }
        Ok(Some(list))
    }

    fn add_escape(&self, list: &mut CandidateList, escape: &str, ctx: &Context) -> Result<()> {
        if let Some(name) = escape.strip_prefix('(').and_then(|e| e.strip_suffix(')')) {
            for word in self.dispatcher.plugin_host().custom_candidates(name) {
                list.insert_sorted(Candidate::word(word))?;
            }
            return Ok(());
        }

        match escape {
            "n" => self.add_nicks(list)?,
            "m" => {
                // own nick goes last, like in the full roster
                if let Some(nick) = self.sources.own_nick() {
                    list.push_back(Candidate::nick(nick))?;
                }
            }
            "s" => {
                for server in self.sources.server_names() {
                    list.insert_sorted(Candidate::word(server))?;
                }
            }
            "C" => {
                for channel in self.sources.channel_names() {
                    list.insert_sorted(Candidate::word(channel))?;
                }
            }
            "c" => {
                if let Some(channel) = self.sources.current_channel() {
                    list.insert_sorted(Candidate::word(channel))?;
                }
            }
            "f" => {
                for entry in self.sources.file_entries(&ctx.base_word) {
                    list.insert_sorted(Candidate::word(entry))?;
                }
            }
            "p" => {
                if !self.config.default_part_message.is_empty() {
                    list.insert_sorted(Candidate::word(&self.config.default_part_message))?;
                }
            }
            "q" => {
                if !self.config.default_quit_message.is_empty() {
                    list.insert_sorted(Candidate::word(&self.config.default_quit_message))?;
                }
            }
            "t" => {
                if let Some(topic) = self.sources.topic() {
                    list.insert_sorted(Candidate::word(topic))?;
                }
            }
            "o" => {
                for name in self.sources.option_names() {
                    list.insert_sorted(Candidate::word(name))?;
                }
            }
            "v" => {
                if let Some(value) = self.previous_arg_option_value(ctx) {
                    list.insert_sorted(Candidate::word(value))?;
                }
            }
            "w" => {
                for name in self.all_command_names() {
                    list.insert_sorted(Candidate::word(name))?;
                }
            }
            "i" => {
                for name in self.dispatcher.protocol().names() {
                    list.insert_sorted(Candidate::word(name))?;
                }
            }
            "k" => {
                for name in self.sources.key_function_names() {
                    list.insert_sorted(Candidate::word(name))?;
                }
            }
            "P" => {
                for name in self.sources.plugin_names() {
                    list.insert_sorted(Candidate::word(name))?;
                }
            }
            "x" => {
                for name in self.dispatcher.plugin_host().command_names() {
                    list.insert_sorted(Candidate::word(name))?;
                }
            }
            "a" => {
                for entry in self.dispatcher.aliases().iter() {
                    list.insert_sorted(Candidate::word(entry.name()))?;
                }
            }
            "%" => list.insert_sorted(Candidate::word("%"))?,
            other => trace!(escape = other, "unknown template escape ignored"),
        }
        Ok(())
    }

    /// Value of the option named by the argument before the cursor's.
    fn previous_arg_option_value(&self, ctx: &Context) -> Option<String> {
        let args = ctx.args.as_deref()?;
        let tokens = tokenize(args, " ", 0);
        let option = tokens.get(ctx.arg_index.checked_sub(2)?)?;
        self.sources.option_value(option)
    }

    fn auto_candidates(&self, ctx: &Context) -> Option<(CandidateList, ContextKind)> {
        if ctx.base_word.starts_with('~') || ctx.base_word.contains('/') {
            let mut list = CandidateList::new();
            for entry in self.sources.file_entries(&ctx.base_word) {
                if list.insert_sorted(Candidate::word(entry)).is_err() {
                    return None;
                }
            }
            return Some((list, ContextKind::Auto));
        }
        if self.config.nick_first_only && ctx.base_word_start != 0 {
            return None;
        }
        match self.nick_candidates() {
            Ok(list) => Some((list, ContextKind::Nick)),
            Err(_) => None,
        }
    }

    /// Roster sorted, recent speakers pinned first, own nick last.
    fn nick_candidates(&self) -> Result<CandidateList> {
        let mut list = CandidateList::new();
        let own = self.sources.own_nick();
        for nick in self.sources.channel_nicks() {
            if own.as_deref() == Some(nick.as_str()) {
                continue;
            }
            list.insert_sorted(Candidate::nick(nick))?;
        }
        for speaker in self.sources.recent_speakers().into_iter().rev() {
            list.push_front(Candidate::nick(speaker))?;
        }
        if let Some(nick) = own {
            list.push_back(Candidate::nick(nick))?;
        }
        Ok(list)
    }

    fn add_nicks(&self, list: &mut CandidateList) -> Result<()> {
        for candidate in self.nick_candidates()?.items() {
            list.push_back(candidate.clone())?;
        }
        Ok(())
    }

    fn command_index(&self) -> Result<CandidateList> {
        let mut list = CandidateList::new();
        for name in self.all_command_names() {
            list.insert_sorted(Candidate::word(name))?;
        }
        Ok(list)
    }

    fn all_command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .dispatcher
            .builtin()
            .names()
            .chain(self.dispatcher.protocol().names())
            .map(str::to_string)
            .collect();
        names.extend(self.dispatcher.aliases().iter().map(|e| e.name().to_string()));
        names.extend(self.dispatcher.plugin_host().command_names());
        names
    }
}

enum TemplateLookup {
    /// Command not declared anywhere.
    NotFound,
    /// Command exists but declares no template.
    Missing,
    /// Command declares this template.
    Template(String),
}
