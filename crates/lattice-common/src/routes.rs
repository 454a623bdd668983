use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::RouteTable;
use crate::error::Result;

/// Router whose payload carries the public hostnames of an application.
pub const ROUTER_KEY: &str = "cf-router";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteMapping {
    pub hostnames: Vec<String>,
    pub port: u16,
}

impl RouteMapping {
    pub fn new<I, S>(port: u16, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hostnames: hostnames.into_iter().map(Into::into).collect(),
            port,
        }
    }
}

/// Per-router route payloads, keyed by router name, in the scheduler's
/// `{"cf-router": [{"hostnames": [..], "port": 8080}]}` shape.
///
/// Payloads of other routers are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Routes(BTreeMap<String, Value>);

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mappings(mappings: Vec<RouteMapping>) -> Result<Self> {
        let mut routes = Self::new();
        routes.set_mappings(mappings)?;
        Ok(routes)
    }

    pub fn set_mappings(&mut self, mappings: Vec<RouteMapping>) -> Result<()> {
        self.0
            .insert(ROUTER_KEY.to_string(), serde_json::to_value(mappings)?);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `cf-router` mappings; empty when that router has no payload.
    pub fn mappings(&self) -> Result<Vec<RouteMapping>> {
        match self.0.get(ROUTER_KEY) {
            Some(payload) => Ok(Vec::<RouteMapping>::deserialize(payload)?),
            None => Ok(Vec::new()),
        }
    }

    /// Hostnames grouped by port. Mappings for the same port are concatenated.
    pub fn table(&self) -> Result<RouteTable> {
        let mut table = RouteTable::new();
        for mapping in self.mappings()? {
            table
                .entry(mapping.port)
                .or_default()
                .extend(mapping.hostnames);
        }
        Ok(table)
    }
}
