//! Draw sources: the adapter trait, the orchestrator that runs them in
//! precedence order, and the HTTP-backed adapters (`http` feature).

mod adapter;
mod error;
pub mod orchestrator;

pub use adapter::{digits_from_tokens, SourceAdapter, SourceKind};
pub use error::SourceError;
pub use orchestrator::{Collected, FetchStatus, Orchestrator, SourceReport};

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
mod markup;

#[cfg(feature = "http")]
pub mod cwl;
#[cfg(feature = "http")]
pub mod data17500;
#[cfg(feature = "http")]
pub mod five_hundred;
#[cfg(feature = "http")]
pub mod zhcw;

#[cfg(feature = "http")]
pub use http::{build_adapters, HttpSettings};
