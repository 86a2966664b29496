//! Waymark Core Library
//!
//! Maps content tree paths to friendly public URLs and back.
//! The content tree, URL base generation and decoding are reached through
//! traits; no HTTP, pure logic only.
//!

pub mod config;
pub mod decode;
pub mod error;
pub mod link;
pub mod model;
pub mod normalize;
pub mod redirect;
pub mod resolver;
pub mod store;


pub use config::{LinkProviderConfig, WaymarkConfig};
pub use error::ConfigError;
pub use link::{BaseUrlGenerator, LinkProvider, SiteUrlBuilder};
pub use model::{ContentNode, RenderMode, RequestContext, SiteContext, UrlOptions};
pub use normalize::{normalize, to_relative_url};
pub use redirect::{Redirect, RedirectPolicy, RequestOutcome};
pub use resolver::PathResolver;
pub use store::{ContentStore, MemoryStore};
