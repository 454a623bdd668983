pub mod application;
pub mod cell;
pub mod desired_lrp;
pub mod error;
pub mod instance;
pub mod routes;

pub use application::{ApplicationInfo, EnvironmentVariable, RouteTable};
pub use cell::CellInfo;
pub use desired_lrp::DesiredLrpCreateRequest;
pub use error::{Error, Result};
pub use instance::{InstanceInfo, InstanceState, PortMapping};
pub use routes::{RouteMapping, Routes, ROUTER_KEY};

pub mod telemetry;
