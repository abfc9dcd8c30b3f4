//! Requirement values and the bucket decision table.
//!
//! The client requirement is the primary axis: a file is routed by its client
//! requirement when that is known, and by the server requirement otherwise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Necessity of a mod on one side (client or server).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Required,
    Optional,
    Invalid,
    #[default]
    Unknown,
}

impl Requirement {
    pub fn is_known(self) -> bool {
        self != Requirement::Unknown
    }
}

/// Client/server requirement scraped from a catalog page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequirementPair {
    pub client: Requirement,
    pub server: Requirement,
}

impl RequirementPair {
    pub fn new(client: Requirement, server: Requirement) -> Self {
        Self { client, server }
    }

    /// True when neither side carries information.
    pub fn is_unknown(&self) -> bool {
        !self.client.is_known() && !self.server.is_known()
    }
}

/// Final routing decision for one archive file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    ClientRequired,
    ClientOptional,
    ClientInvalid,
    ServerRequired,
    ServerOptional,
    ServerInvalid,
    Unknown,
}

impl Classification {
    /// Every bucket, in output-directory order.
    pub const ALL: [Classification; 7] = [
        Classification::ClientRequired,
        Classification::ClientOptional,
        Classification::ClientInvalid,
        Classification::ServerRequired,
        Classification::ServerOptional,
        Classification::ServerInvalid,
        Classification::Unknown,
    ];

    /// Name of the bucket directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Classification::ClientRequired => "ClientRequired",
            Classification::ClientOptional => "ClientOptional",
            Classification::ClientInvalid => "ClientInvalid",
            Classification::ServerRequired => "ServerRequired",
            Classification::ServerOptional => "ServerOptional",
            Classification::ServerInvalid => "ServerInvalid",
            Classification::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Map a requirement pair to its bucket. Total and deterministic.
pub fn classify(pair: RequirementPair) -> Classification {
    match pair.client {
        Requirement::Required => return Classification::ClientRequired,
        Requirement::Optional => return Classification::ClientOptional,
        Requirement::Invalid => return Classification::ClientInvalid,
        Requirement::Unknown => {}
    }
    match pair.server {
        Requirement::Required => Classification::ServerRequired,
        Requirement::Optional => Classification::ServerOptional,
        Requirement::Invalid => Classification::ServerInvalid,
        Requirement::Unknown => Classification::Unknown,
    }
}
