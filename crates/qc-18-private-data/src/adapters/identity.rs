//! Serialized Identity Adapter
//!
//! Implements `IdentityDeserializer` for bincode-encoded `SerializedIdentity`.

use crate::domain::{IdentityError, MspRole, PeerIdentity, SerializedIdentity};
use crate::ports::outbound::IdentityDeserializer;
use std::collections::{HashMap, HashSet};

/// Encode an identity the way peers put it in `SignedData::identity`.
pub fn serialize_identity(identity: &SerializedIdentity) -> Result<Vec<u8>, IdentityError> {
    bincode::serialize(identity).map_err(|e| IdentityError::Malformed(e.to_string()))
}

/// Deserializer for bincode-encoded identities.
///
/// Identities default to the `Peer` role; role overrides are keyed by the
/// identity bytes. Optionally restricted to a set of channel MSPs.
#[derive(Clone, Debug, Default)]
pub struct SerializedIdentityDeserializer {
    known_msps: Option<HashSet<String>>,
    roles: HashMap<Vec<u8>, MspRole>,
}

impl SerializedIdentityDeserializer {
    /// Accept identities of any MSP.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept only identities of the given MSPs.
    pub fn restricted_to<I, S>(msps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_msps: Some(msps.into_iter().map(Into::into).collect()),
            roles: HashMap::new(),
        }
    }

    /// Assign a role to the identity with these bytes.
    pub fn with_role(mut self, id_bytes: impl Into<Vec<u8>>, role: MspRole) -> Self {
        self.roles.insert(id_bytes.into(), role);
        self
    }
}

impl IdentityDeserializer for SerializedIdentityDeserializer {
    fn deserialize(&self, identity: &[u8]) -> Result<PeerIdentity, IdentityError> {
        let decoded: SerializedIdentity =
            bincode::deserialize(identity).map_err(|e| IdentityError::Malformed(e.to_string()))?;

        if decoded.msp_id.is_empty() {
            return Err(IdentityError::EmptyMspId);
        }
        if let Some(known) = &self.known_msps {
            if !known.contains(&decoded.msp_id) {
                return Err(IdentityError::UnknownMsp(decoded.msp_id));
            }
        }

        let role = self
            .roles
            .get(&decoded.id_bytes)
            .copied()
            .unwrap_or(MspRole::Peer);

        Ok(PeerIdentity {
            msp_id: decoded.msp_id,
            role,
        })
    }
}
