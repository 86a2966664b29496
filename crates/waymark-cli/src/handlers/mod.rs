mod normalize;
mod request;
mod resolve;
mod url;

pub use normalize::*;
pub use request::*;
pub use resolve::*;
pub use url::*;
