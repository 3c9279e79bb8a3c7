//! # Signature Policies
//!
//! Member-org policies attached to a collection and their compiled form.
//!
//! A policy is a tree of `SignedBy` leaves (pointing into a principal list)
//! and `NOutOf` thresholds. Compilation validates the tree once; evaluation
//! afterwards is pure and allocation-light, so compiled policies are shared
//! behind an `Arc` by every filter built from them.

use super::errors::PolicyError;
use super::value_objects::{MspRole, PeerIdentity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Deepest `NOutOf` nesting accepted by [`CompiledPolicy::compile`].
pub const MAX_POLICY_DEPTH: usize = 32;

/// Principal a `SignedBy` leaf refers to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MspPrincipal {
    /// MSP the principal belongs to.
    pub msp_id: String,
    /// Required role.
    pub role: MspRole,
}

impl MspPrincipal {
    /// Member principal of an MSP.
    pub fn member(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            role: MspRole::Member,
        }
    }

    /// Principal with a specific role.
    pub fn with_role(msp_id: impl Into<String>, role: MspRole) -> Self {
        Self {
            msp_id: msp_id.into(),
            role,
        }
    }

    /// `Member` accepts every role of the same MSP; other roles must match.
    pub fn is_satisfied_by(&self, identity: &PeerIdentity) -> bool {
        if self.msp_id != identity.msp_id {
            return false;
        }
        self.role == MspRole::Member || self.role == identity.role
    }
}

/// Policy expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignaturePolicy {
    /// Satisfied by an identity matching principal `index`.
    SignedBy(usize),
    /// Satisfied when at least `n` sub-rules are.
    NOutOf {
        /// Threshold.
        n: usize,
        /// Sub-rules.
        rules: Vec<SignaturePolicy>,
    },
}

/// Policy plus the principals it refers to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePolicyEnvelope {
    /// Envelope format version.
    pub version: u32,
    /// Root rule.
    pub rule: SignaturePolicy,
    /// Principals referenced by `SignedBy`.
    pub identities: Vec<MspPrincipal>,
}

impl SignaturePolicyEnvelope {
    /// 1-of-N policy accepting any member of the given orgs.
    pub fn signed_by_any_member<I, S>(orgs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identities: Vec<MspPrincipal> = orgs.into_iter().map(MspPrincipal::member).collect();
        let rules = (0..identities.len()).map(SignaturePolicy::SignedBy).collect();
        Self {
            version: 0,
            rule: SignaturePolicy::NOutOf { n: 1, rules },
            identities,
        }
    }
}

/// Validated, immutable policy ready for evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledPolicy {
    rule: SignaturePolicy,
    principals: Vec<MspPrincipal>,
    member_orgs: Vec<String>,
}

impl CompiledPolicy {
    /// Validate an envelope and derive its member orgs.
    pub fn compile(envelope: &SignaturePolicyEnvelope) -> Result<Self, PolicyError> {
        if envelope.identities.is_empty() {
            return Err(PolicyError::NoIdentities);
        }
        for (i, principal) in envelope.identities.iter().enumerate() {
            if principal.msp_id.is_empty() {
                return Err(PolicyError::EmptyMspId(i));
            }
        }
        check_rule(&envelope.rule, envelope.identities.len(), 0)?;

        let member_orgs: BTreeSet<&str> = envelope
            .identities
            .iter()
            .map(|p| p.msp_id.as_str())
            .collect();

        Ok(Self {
            rule: envelope.rule.clone(),
            principals: envelope.identities.clone(),
            member_orgs: member_orgs.into_iter().map(str::to_string).collect(),
        })
    }

    /// Sorted, de-duplicated MSP ids named by the policy.
    pub fn member_orgs(&self) -> &[String] {
        &self.member_orgs
    }

    /// Evaluate against a set of signer identities.
    ///
    /// Each identity counts towards at most one `SignedBy` leaf.
    pub fn evaluate(&self, identities: &[PeerIdentity]) -> bool {
        let mut used = vec![false; identities.len()];
        self.eval_rule(&self.rule, identities, &mut used)
    }

    fn eval_rule(
        &self,
        rule: &SignaturePolicy,
        identities: &[PeerIdentity],
        used: &mut [bool],
    ) -> bool {
        match rule {
            SignaturePolicy::SignedBy(index) => {
                let principal = &self.principals[*index];
                for (slot, identity) in used.iter_mut().zip(identities) {
                    if !*slot && principal.is_satisfied_by(identity) {
                        *slot = true;
                        return true;
                    }
                }
                false
            }
            SignaturePolicy::NOutOf { n, rules } => {
                let mut verified = 0;
                for sub in rules {
                    // Consume identities only when the sub-rule holds.
                    let mut scratch = used.to_vec();
                    if self.eval_rule(sub, identities, &mut scratch) {
                        used.copy_from_slice(&scratch);
                        verified += 1;
                    }
                }
                verified >= *n
            }
        }
    }
}

fn check_rule(rule: &SignaturePolicy, len: usize, depth: usize) -> Result<(), PolicyError> {
    if depth >= MAX_POLICY_DEPTH {
        return Err(PolicyError::TooDeep(MAX_POLICY_DEPTH));
    }
    match rule {
        SignaturePolicy::SignedBy(index) if *index >= len => Err(PolicyError::IndexOutOfRange {
            index: *index,
            len,
        }),
        SignaturePolicy::SignedBy(_) => Ok(()),
        SignaturePolicy::NOutOf { n, rules } => {
            // A zero threshold holds for every signer set.
            if *n == 0 {
                return Err(PolicyError::Vacuous);
            }
            if *n > rules.len() {
                return Err(PolicyError::Unsatisfiable {
                    n: *n,
                    rules: rules.len(),
                });
            }
            rules
                .iter()
                .try_for_each(|sub| check_rule(sub, len, depth + 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(msp: &str) -> PeerIdentity {
        PeerIdentity::new(msp, MspRole::Peer)
    }

    #[test]
    fn test_any_member_policy() {
        let env = SignaturePolicyEnvelope::signed_by_any_member(["Org1MSP", "Org2MSP"]);
        let policy = CompiledPolicy::compile(&env).unwrap();

        assert!(policy.evaluate(&[peer("Org1MSP")]));
        assert!(policy.evaluate(&[peer("Org2MSP")]));
        assert!(!policy.evaluate(&[peer("Org3MSP")]));
        assert!(!policy.evaluate(&[]));
    }

    #[test]
    fn test_member_orgs_sorted_and_deduplicated() {
        let env = SignaturePolicyEnvelope::signed_by_any_member(["Org2MSP", "Org1MSP", "Org2MSP"]);
        let policy = CompiledPolicy::compile(&env).unwrap();
        assert_eq!(policy.member_orgs(), ["Org1MSP", "Org2MSP"]);
    }

    #[test]
    fn test_role_principal_requires_exact_role() {
        let env = SignaturePolicyEnvelope {
            version: 0,
            rule: SignaturePolicy::SignedBy(0),
            identities: vec![MspPrincipal::with_role("Org1MSP", MspRole::Admin)],
        };
        let policy = CompiledPolicy::compile(&env).unwrap();

        assert!(!policy.evaluate(&[peer("Org1MSP")]));
        assert!(policy.evaluate(&[PeerIdentity::new("Org1MSP", MspRole::Admin)]));
    }

    #[test]
    fn test_identity_not_counted_twice() {
        // 2-of-2 over the same org needs two distinct signers
        let env = SignaturePolicyEnvelope {
            version: 0,
            rule: SignaturePolicy::NOutOf {
                n: 2,
                rules: vec![SignaturePolicy::SignedBy(0), SignaturePolicy::SignedBy(0)],
            },
            identities: vec![MspPrincipal::member("Org1MSP")],
        };
        let policy = CompiledPolicy::compile(&env).unwrap();

        assert!(!policy.evaluate(&[peer("Org1MSP")]));
        assert!(policy.evaluate(&[peer("Org1MSP"), peer("Org1MSP")]));
    }

    #[test]
    fn test_nested_threshold() {
        // Org1 AND (Org2 OR Org3)
        let env = SignaturePolicyEnvelope {
            version: 0,
            rule: SignaturePolicy::NOutOf {
                n: 2,
                rules: vec![
                    SignaturePolicy::SignedBy(0),
                    SignaturePolicy::NOutOf {
                        n: 1,
                        rules: vec![SignaturePolicy::SignedBy(1), SignaturePolicy::SignedBy(2)],
                    },
                ],
            },
            identities: vec![
                MspPrincipal::member("Org1MSP"),
                MspPrincipal::member("Org2MSP"),
                MspPrincipal::member("Org3MSP"),
            ],
        };
        let policy = CompiledPolicy::compile(&env).unwrap();

        assert!(policy.evaluate(&[peer("Org1MSP"), peer("Org3MSP")]));
        assert!(!policy.evaluate(&[peer("Org1MSP")]));
        assert!(!policy.evaluate(&[peer("Org2MSP"), peer("Org3MSP")]));
    }

    #[test]
    fn test_compile_rejects_empty_identities() {
        let env = SignaturePolicyEnvelope::signed_by_any_member(Vec::<String>::new());
        assert_eq!(CompiledPolicy::compile(&env), Err(PolicyError::NoIdentities));
    }

    #[test]
    fn test_compile_rejects_out_of_range_index() {
        let env = SignaturePolicyEnvelope {
            version: 0,
            rule: SignaturePolicy::SignedBy(1),
            identities: vec![MspPrincipal::member("Org1MSP")],
        };
        assert!(matches!(
            CompiledPolicy::compile(&env),
            Err(PolicyError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_compile_rejects_unsatisfiable_threshold() {
        let env = SignaturePolicyEnvelope {
            version: 0,
            rule: SignaturePolicy::NOutOf {
                n: 3,
                rules: vec![SignaturePolicy::SignedBy(0)],
            },
            identities: vec![MspPrincipal::member("Org1MSP")],
        };
        assert!(matches!(
            CompiledPolicy::compile(&env),
            Err(PolicyError::Unsatisfiable { n: 3, rules: 1 })
        ));
    }

    #[test]
    fn test_compile_rejects_zero_threshold() {
        let env = SignaturePolicyEnvelope {
            version: 0,
            rule: SignaturePolicy::NOutOf {
                n: 0,
                rules: vec![],
            },
            identities: vec![MspPrincipal::member("Org1MSP")],
        };
        assert_eq!(CompiledPolicy::compile(&env), Err(PolicyError::Vacuous));

        // Nested zero thresholds are caught too
        let nested = SignaturePolicyEnvelope {
            version: 0,
            rule: SignaturePolicy::NOutOf {
                n: 1,
                rules: vec![SignaturePolicy::NOutOf {
                    n: 0,
                    rules: vec![SignaturePolicy::SignedBy(0)],
                }],
            },
            identities: vec![MspPrincipal::member("Org1MSP")],
        };
        assert_eq!(CompiledPolicy::compile(&nested), Err(PolicyError::Vacuous));
    }

    fn nested(depth: usize) -> SignaturePolicy {
        let mut rule = SignaturePolicy::SignedBy(0);
        for _ in 0..depth {
            rule = SignaturePolicy::NOutOf {
                n: 1,
                rules: vec![rule],
            };
        }
        rule
    }

    #[test]
    fn test_compile_bounds_nesting_depth() {
        let env = |depth| SignaturePolicyEnvelope {
            version: 0,
            rule: nested(depth),
            identities: vec![MspPrincipal::member("Org1MSP")],
        };

        let deepest = CompiledPolicy::compile(&env(MAX_POLICY_DEPTH - 1)).unwrap();
        assert!(deepest.evaluate(&[peer("Org1MSP")]));

        assert_eq!(
            CompiledPolicy::compile(&env(MAX_POLICY_DEPTH)),
            Err(PolicyError::TooDeep(MAX_POLICY_DEPTH))
        );
        assert_eq!(
            CompiledPolicy::compile(&env(1_000)),
            Err(PolicyError::TooDeep(MAX_POLICY_DEPTH))
        );
    }

    #[test]
    fn test_compile_rejects_empty_msp_id() {
        let env = SignaturePolicyEnvelope::signed_by_any_member(["Org1MSP", ""]);
        assert_eq!(CompiledPolicy::compile(&env), Err(PolicyError::EmptyMspId(1)));
    }
}
