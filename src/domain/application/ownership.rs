//! Ownership proofs: callers show they own a record by presenting its email
//! and/or public wallet.

use super::ApplicationRecord;

/// At least one identifying field supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipProof {
    email: Option<String>,
    public_wallet: Option<String>,
}

impl OwnershipProof {
    /// Returns `None` when neither field is supplied.
    pub fn new(email: Option<String>, public_wallet: Option<String>) -> Option<Self> {
        if email.is_none() && public_wallet.is_none() {
            return None;
        }
        Some(Self {
            email,
            public_wallet,
        })
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn public_wallet(&self) -> Option<&str> {
        self.public_wallet.as_deref()
    }

    /// Read and delete: every supplied field must equal the stored one.
    pub fn verifies_exactly(&self, record: &ApplicationRecord) -> bool {
        let email_ok = self.email.as_deref().map_or(true, |e| e == record.email);
        let wallet_ok = self
            .public_wallet
            .as_deref()
            .map_or(true, |w| record.public_wallet.as_deref() == Some(w));
        email_ok && wallet_ok
    }

    /// Update: one matching field is enough, so the other one may carry a new value.
    pub fn verifies_any(&self, record: &ApplicationRecord) -> bool {
        let email_ok = self.email.as_deref() == Some(record.email.as_str());
        let wallet_ok = self.public_wallet.is_some()
            && self.public_wallet.as_deref() == record.public_wallet.as_deref();
        email_ok || wallet_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::application::AppId;

    const WALLET: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    const OTHER_WALLET: &str = "GBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB";

    fn record(wallet: Option<&str>) -> ApplicationRecord {
        ApplicationRecord {
            id: AppId::parse("aB3x").unwrap(),
            email: "a@b.com".into(),
            name: "Al".into(),
            app_name: "App1".into(),
            public_wallet: wallet.map(str::to_string),
        }
    }

    fn proof(email: Option<&str>, wallet: Option<&str>) -> OwnershipProof {
        OwnershipProof::new(email.map(str::to_string), wallet.map(str::to_string)).unwrap()
    }

    #[test]
    fn empty_proof_is_not_a_proof() {
        assert!(OwnershipProof::new(None, None).is_none());
    }

    #[test]
    fn exact_match_accepts_any_supplied_subset() {
        let r = record(Some(WALLET));
        assert!(proof(Some("a@b.com"), None).verifies_exactly(&r));
        assert!(proof(None, Some(WALLET)).verifies_exactly(&r));
        assert!(proof(Some("a@b.com"), Some(WALLET)).verifies_exactly(&r));
    }

    #[test]
    fn exact_match_rejects_any_mismatch() {
        let r = record(Some(WALLET));
        assert!(!proof(Some("A@b.com"), None).verifies_exactly(&r));
        assert!(!proof(Some("a@b.com"), Some(OTHER_WALLET)).verifies_exactly(&r));
        assert!(!proof(None, Some(WALLET)).verifies_exactly(&record(None)));
    }

    #[test]
    fn loose_match_needs_one_hit() {
        let r = record(Some(WALLET));
        assert!(proof(Some("new@b.com"), Some(WALLET)).verifies_any(&r));
        assert!(proof(Some("a@b.com"), Some(OTHER_WALLET)).verifies_any(&r));
        assert!(!proof(Some("new@b.com"), Some(OTHER_WALLET)).verifies_any(&r));
        assert!(!proof(None, Some(WALLET)).verifies_any(&record(None)));
        assert!(proof(Some("a@b.com"), Some(WALLET)).verifies_any(&record(None)));
    }
}
