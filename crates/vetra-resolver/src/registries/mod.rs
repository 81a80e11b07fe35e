//! Package-registry clients, one per runtime.
//!
//! Every registry response is deserialized into a typed struct
//! before any field is read: a malformed upstream payload fails
//! loudly instead of producing a wrong version silently.

mod node;
mod php;
mod python;
mod ruby;

pub use node::NpmClient;
pub use php::PackagistClient;
pub use python::PypiClient;
pub use ruby::{parse_gem_search, GemClient};
