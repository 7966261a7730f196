//! Signer capability and signature assembly.
//!
//! Obtaining a signature is the only suspension point in the core. Dropping the returned
//! future abandons the request; nothing is stored or sent until the caller applies the
//! signature it gets back.

use alloy_primitives::{keccak256, Address, Bytes, FixedBytes};
use async_trait::async_trait;
use delegation_types::Delegation;
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;

use crate::errors::{DelegationError, Result};
use crate::hashing::{delegation_hash, delegation_signing_digest, DelegationDomain};

/// Anything able to sign a 32-byte typed-data digest on behalf of one account.
///
/// Implementations may be slow or never resolve (hardware wallets, remote approval).
#[async_trait]
pub trait DelegationSigner: Send + Sync {
    fn address(&self) -> Address;

    async fn sign_digest(&self, digest: FixedBytes<32>) -> Result<Bytes>;
}

/// In-process secp256k1 key producing 65-byte `r || s || v` signatures, `v` in {27, 28}.
#[derive(Clone)]
pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    pub fn from_slice(secret: &[u8]) -> Result<Self> {
        let key = SigningKey::from_slice(secret).map_err(|err| DelegationError::Signing(err.to_string()))?;
        Ok(Self::from_signing_key(key))
    }

    pub fn from_signing_key(key: SigningKey) -> Self {
        let address = address_of(&key);
        Self { key, address }
    }

    pub fn sign_digest_sync(&self, digest: FixedBytes<32>) -> Result<Bytes> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|err| DelegationError::Signing(err.to_string()))?;
        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&signature.to_bytes());
        out.push(27 + recovery_id.to_byte());
        Ok(out.into())
    }
}

impl core::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LocalSigner").field("address", &self.address).finish_non_exhaustive()
    }
}

#[async_trait]
impl DelegationSigner for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_digest(&self, digest: FixedBytes<32>) -> Result<Bytes> {
        self.sign_digest_sync(digest)
    }
}

/// Ethereum address of a secp256k1 key: last 20 bytes of keccak256 of the uncompressed point.
pub fn address_of(key: &SigningKey) -> Address {
    let point = key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// One signer's contribution to a multi-signer account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialSignature {
    pub signer: Address,
    pub signature: Bytes,
}

/// Order partial signatures by signer address and concatenate them.
///
/// Threshold rules belong to the account contract; this only orders and joins. Each signer
/// may contribute once.
pub fn aggregate_signatures(mut partials: Vec<PartialSignature>) -> Result<Bytes> {
    if partials.is_empty() {
        return Err(DelegationError::EmptyCollection { field: "signatures" });
    }
    partials.sort_by(|a, b| a.signer.cmp(&b.signer));
    ensure_distinct(partials.iter().map(|partial| partial.signer))?;
    let mut out = Vec::with_capacity(partials.iter().map(|p| p.signature.len()).sum());
    for partial in &partials {
        out.extend_from_slice(&partial.signature);
    }
    Ok(out.into())
}

// Expects `signers` in ascending order.
fn ensure_distinct(signers: impl Iterator<Item = Address>) -> Result<()> {
    let mut previous = None;
    for signer in signers {
        if previous == Some(signer) {
            return Err(DelegationError::DuplicateSigner { signer });
        }
        previous = Some(signer);
    }
    Ok(())
}

/// Sign `delegation` for `domain` and return the signature.
///
/// Refuses delegations without caveats unless `allow_unrestricted` is set. The signature
/// field of the input is ignored; apply the result with [`Delegation::with_signature`].
pub async fn sign_delegation<S>(
    delegation: &Delegation,
    signer: &S,
    domain: &DelegationDomain,
    allow_unrestricted: bool,
) -> Result<Bytes>
where
    S: DelegationSigner + ?Sized,
{
    if delegation.caveats.is_empty() {
        if !allow_unrestricted {
            return Err(DelegationError::UnrestrictedDelegationGuard);
        }
        tracing::warn!(delegator = %delegation.delegator, "signing unrestricted delegation");
    }
    let unsigned = Delegation { signature: Bytes::new(), ..delegation.clone() };
    let digest = delegation_signing_digest(&unsigned, domain);
    tracing::debug!(
        delegator = %unsigned.delegator,
        chain_id = domain.chain_id,
        hash = %delegation_hash(&unsigned),
        "requesting delegation signature"
    );
    let signature = signer.sign_digest(digest).await?;
    tracing::debug!(signer = %signer.address(), len = signature.len(), "delegation signed");
    Ok(signature)
}

/// Collect one signature per signer and aggregate them in signer-address order.
///
/// The signer set is checked before any signer is asked.
pub async fn sign_delegation_multisig(
    delegation: &Delegation,
    signers: &[&dyn DelegationSigner],
    domain: &DelegationDomain,
    allow_unrestricted: bool,
) -> Result<Bytes> {
    if signers.is_empty() {
        return Err(DelegationError::EmptyCollection { field: "signers" });
    }
    let mut addresses: Vec<Address> = signers.iter().map(|signer| signer.address()).collect();
    addresses.sort();
    ensure_distinct(addresses.into_iter())?;

    let mut partials = Vec::with_capacity(signers.len());
    for signer in signers {
        let signature = sign_delegation(delegation, *signer, domain, allow_unrestricted).await?;
        partials.push(PartialSignature { signer: signer.address(), signature });
    }
    aggregate_signatures(partials)
}
