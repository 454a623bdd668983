pub mod examiner;
pub mod http;
pub mod memory;
pub mod types;
pub mod wire;

pub use http::{Credentials, ReceptorClient};
pub use memory::MemoryClusterApi;
pub use types::{ApiCall, ClusterApi};
