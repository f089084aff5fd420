//! # Module Cuts
//!
//! A cut adds, replaces or removes selector → module routes on the
//! account. Cuts finalize as soon as they are authorized: immediately for
//! the owner when no guardians exist, on guardian majority otherwise.
//!
//! Before any approval is recorded a cut must pass, in order:
//! 1. the route check for the current guardian count
//! 2. the facet registry (Add/Replace entries only)
//! 3. a dry run against the installed selector table

use super::entities::{ActionStatus, ApprovalChannel, Principal, Workflow, WorkflowKind};
use super::ledger::{ApprovalReceipt, SignatureBatch};
use super::nonces::NonceSlot;
use super::quorum::{require_direct_route, require_guardian_route};
use super::state::AccountGovernanceState;
use crate::config::GovernanceConfig;
use crate::errors::{GovernanceError, GovernanceResult, Role};
use crate::events::GovernanceEvent;
use serde::{Deserialize, Serialize};
use shared_crypto::keccak256_concat;
use shared_types::{u64_to_word, Address, Hash, Selector, Timestamp};
use std::collections::BTreeMap;

/// Facet registry lookup: is `module` approved for exactly these selectors?
pub type RegistrationCheck<'a> = &'a dyn Fn(Address, &[Selector]) -> bool;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutAction {
    Add,
    Replace,
    Remove,
}

impl CutAction {
    fn code(self) -> u64 {
        match self {
            Self::Add => 0,
            Self::Replace => 1,
            Self::Remove => 2,
        }
    }
}

/// Routes for one module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCut {
    pub module: Address,
    pub action: CutAction,
    pub selectors: Vec<Selector>,
}

/// An ordered list of facet cuts applied atomically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCut {
    pub facets: Vec<FacetCut>,
}

impl ModuleCut {
    pub fn new(facets: Vec<FacetCut>) -> Self {
        Self { facets }
    }

    /// Descriptor hash signed as the cut payload.
    pub fn hash(&self) -> Hash {
        let mut encoded = Vec::with_capacity(32 + self.facets.len() * 128);
        encoded.extend_from_slice(&u64_to_word(self.facets.len() as u64));
        for facet in &self.facets {
            encoded.extend_from_slice(&facet.module.to_word());
            encoded.extend_from_slice(&u64_to_word(facet.action.code()));
            encoded.extend_from_slice(&u64_to_word(facet.selectors.len() as u64));
            for selector in &facet.selectors {
                let mut word = [0u8; 32];
                word[..4].copy_from_slice(selector.as_bytes());
                encoded.extend_from_slice(&word);
            }
        }
        keccak256_concat(&[encoded.as_slice()])
    }

}

// =============================================================================
// SELECTOR TABLE
// =============================================================================

/// Installed selector → module routes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleTable {
    routes: BTreeMap<Selector, Address>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-populated with routes, e.g. the account's bootstrap modules.
    pub fn with_routes(routes: impl IntoIterator<Item = (Selector, Address)>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
        }
    }

    pub fn module_of(&self, selector: &Selector) -> Option<Address> {
        self.routes.get(selector).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Check that `cut` would apply cleanly without touching the table.
    pub fn validate(&self, cut: &ModuleCut) -> GovernanceResult<()> {
        self.clone().apply(cut)
    }

    /// Apply every entry of `cut` or none of them.
    pub fn apply(&mut self, cut: &ModuleCut) -> GovernanceResult<()> {
        if cut.facets.is_empty() {
            return Err(GovernanceError::EmptySelectors(Address::ZERO));
        }

        let mut routes = self.routes.clone();
        for facet in &cut.facets {
            if facet.selectors.is_empty() {
                return Err(GovernanceError::EmptySelectors(facet.module));
            }
            match facet.action {
                CutAction::Add => {
                    if facet.module.is_zero() {
                        return Err(GovernanceError::ZeroAddress);
                    }
                    for selector in &facet.selectors {
                        if routes.contains_key(selector) {
                            return Err(GovernanceError::SelectorAlreadyInstalled(*selector));
                        }
                        routes.insert(*selector, facet.module);
                    }
                }
                CutAction::Replace => {
                    if facet.module.is_zero() {
                        return Err(GovernanceError::ZeroAddress);
                    }
                    for selector in &facet.selectors {
                        match routes.get_mut(selector) {
                            Some(module) => *module = facet.module,
                            None => return Err(GovernanceError::SelectorNotInstalled(*selector)),
                        }
                    }
                }
                CutAction::Remove => {
                    for selector in &facet.selectors {
                        if routes.remove(selector).is_none() {
                            return Err(GovernanceError::SelectorNotInstalled(*selector));
                        }
                    }
                }
            }
        }
        self.routes = routes;
        Ok(())
    }
}

// =============================================================================
// ACCOUNT OPERATIONS
// =============================================================================

impl AccountGovernanceState {
    /// Owner applies a cut directly. Only valid while no guardians exist.
    pub fn module_cut(
        &mut self,
        caller: Address,
        cut: &ModuleCut,
        is_registered: RegistrationCheck<'_>,
        now: Timestamp,
    ) -> GovernanceResult<()> {
        self.require_owner(caller)?;
        require_direct_route(self.guardians.count())?;
        self.require_unlocked(now)?;
        self.check_cut(cut, is_registered)?;

        let action_hash = self.action_hash(&Workflow::Cut(cut.clone()));
        self.finalize_cut(cut, action_hash)
    }

    /// A guardian approves a cut from its own account.
    pub fn approve_module_cut(
        &mut self,
        caller: Address,
        cut: &ModuleCut,
        is_registered: RegistrationCheck<'_>,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<ApprovalReceipt> {
        require_guardian_route(self.guardians.count())?;
        let guardian = self.require_guardian(caller)?;
        self.require_unlocked(now)?;
        self.check_cut(cut, is_registered)?;

        let workflow = Workflow::Cut(cut.clone());
        let receipt =
            self.record_approvals(&workflow, &[guardian], ApprovalChannel::OnChain, now, config)?;
        self.settle_cut(cut, receipt)
    }

    /// A relayer submits guardian signatures over the cut.
    pub fn module_cut_with_guardians(
        &mut self,
        cut: &ModuleCut,
        batch: &SignatureBatch,
        is_registered: RegistrationCheck<'_>,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<ApprovalReceipt> {
        require_guardian_route(self.guardians.count())?;
        self.require_unlocked(now)?;
        self.check_cut(cut, is_registered)?;
        let approvers = batch.authorize_guardians(&self.guardians)?;

        let workflow = Workflow::Cut(cut.clone());
        let receipt =
            self.record_approvals(&workflow, &approvers, ApprovalChannel::OffChain, now, config)?;
        self.settle_cut(cut, receipt)
    }

    fn check_cut(&self, cut: &ModuleCut, is_registered: RegistrationCheck<'_>) -> GovernanceResult<()> {
        for facet in &cut.facets {
            if facet.action != CutAction::Remove && !is_registered(facet.module, &facet.selectors) {
                return Err(GovernanceError::UnregisteredFacetAndSelectors {
                    module: facet.module,
                });
            }
        }
        self.modules.validate(cut)
    }

    fn settle_cut(
        &mut self,
        cut: &ModuleCut,
        receipt: ApprovalReceipt,
    ) -> GovernanceResult<ApprovalReceipt> {
        if receipt.finalized {
            self.resolve_action(WorkflowKind::Cut, ActionStatus::Finalized);
            self.finalize_cut(cut, receipt.action_hash)?;
        }
        Ok(receipt)
    }

    fn finalize_cut(&mut self, cut: &ModuleCut, action_hash: Hash) -> GovernanceResult<()> {
        self.modules.apply(cut)?;
        let nonce = self.consume_nonce(NonceSlot::Cut);
        self.emit(GovernanceEvent::ModuleCutApplied {
            cut_hash: cut.hash(),
            action_hash,
            nonce,
        });
        Ok(())
    }

    /// Resolve a caller that must be a current guardian.
    pub(crate) fn require_guardian(&self, caller: Address) -> GovernanceResult<Address> {
        match self.resolve_principal(caller) {
            Some(Principal::Guardian(guardian)) => Ok(guardian),
            _ => Err(GovernanceError::Unauthorized {
                required: Role::Guardian,
            }),
        }
    }
}
