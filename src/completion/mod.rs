//! Tab completion.
//!
//! Split into four stages: context detection (what is under the
//! cursor), candidate sources (where words come from), the template
//! provider (which words apply here) and the cycler (which word comes
//! next on each tab press).

pub mod candidates;
pub mod context;
pub mod cycler;
pub mod provider;
pub mod sources;

pub use candidates::{Candidate, CandidateList};
pub use context::{find_context, Context, ContextKind};
pub use cycler::{CompletionSession, Direction, Replacement};
pub use provider::CandidateProvider;
pub use sources::{list_directory, CompletionSources, StaticSources};
