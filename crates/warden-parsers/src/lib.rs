//! Source parsing and call-graph extraction for warden.
//!
//! Both consumers of a contract need the same facts about source code: which names a
//! function calls and which modules it imports. The runtime guard asks for one function
//! at a time ([`extract::extract_function`], memoized by [`cache::CallGraphCache`]); the
//! static validator asks for the whole module ([`extract::outline`]).

pub mod cache;
pub mod extract;
pub mod python;
pub mod rust_lang;
pub mod source;
pub mod treesitter;
pub mod walker;
