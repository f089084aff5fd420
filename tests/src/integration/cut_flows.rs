//! # Module Cut Flows
//!
//! Route selection by guardian count, registry gating, quorum snapshots and
//! the cut nonce.

#[cfg(test)]
mod tests {
    use crate::harness::Wallet;
    use gw_01_guardian_governance::{
        CutAction, FacetCut, GovernanceApi, GovernanceError, ModuleCut, ModuleTable, Workflow,
        WorkflowKind,
    };
    use shared_types::{Address, Selector};

    const MODULE_A: Address = Address::new([0xA0; 20]);
    const MODULE_B: Address = Address::new([0xB0; 20]);

    fn selector(n: u8) -> Selector {
        Selector::new([0xCA, 0xFE, 0x00, n])
    }

    fn cut(module: Address, action: CutAction, selectors: &[Selector]) -> ModuleCut {
        ModuleCut::new(vec![FacetCut {
            module,
            action,
            selectors: selectors.to_vec(),
        }])
    }

    // =============================================================================
    // ROUTES
    // =============================================================================

    #[test]
    fn test_direct_removal_blocked_with_guardians_then_quorum_applies() {
        let installed = ModuleTable::with_routes([(selector(1), MODULE_A)]);
        let wallet = Wallet::build(2, installed);
        let removal = cut(MODULE_A, CutAction::Remove, &[selector(1)]);

        assert_eq!(
            wallet.service.module_cut(wallet.owner_address(), &removal),
            Err(GovernanceError::InvalidRouteWithGuardian)
        );

        let (approvers, signatures) =
            wallet.guardian_batch(&[0, 1], &Workflow::Cut(removal.clone()));
        let receipt = wallet
            .service
            .module_cut_with_guardians(&removal, &approvers, &signatures)
            .unwrap();

        assert!(receipt.finalized);
        assert_eq!(receipt.required, 2);
        assert_eq!(wallet.service.snapshot().modules().module_of(&selector(1)), None);
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Cut), 1);
    }

    #[test]
    fn test_guardian_route_requires_guardians() {
        let wallet = Wallet::with_guardians(0);
        let add = cut(MODULE_A, CutAction::Add, &[selector(1)]);
        wallet.registry.register(MODULE_A, [selector(1)]);

        let result = wallet.service.module_cut_with_guardians(&add, &[], &[]);
        assert_eq!(result, Err(GovernanceError::InvalidRouteWithoutGuardian));
        assert!(!result.unwrap_err().is_retryable());

        let new_owner = Address::new([0xEE; 20]);
        assert_eq!(
            wallet.service.execute_recovery(new_owner, &[], &[]),
            Err(GovernanceError::InvalidRouteWithoutGuardian)
        );

        let stranger = Address::new([0x77; 20]);
        assert_eq!(
            wallet.service.approve_module_cut(stranger, &add),
            Err(GovernanceError::InvalidRouteWithoutGuardian)
        );
    }

    #[test]
    fn test_direct_cuts_consume_cut_nonce() {
        let wallet = Wallet::with_guardians(0);
        wallet.registry.register(MODULE_A, [selector(1), selector(2)]);
        wallet.registry.register(MODULE_B, [selector(1)]);

        let add = cut(MODULE_A, CutAction::Add, &[selector(1), selector(2)]);
        wallet.service.module_cut(wallet.owner_address(), &add).unwrap();
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Cut), 1);

        let replace = cut(MODULE_B, CutAction::Replace, &[selector(1)]);
        wallet
            .service
            .module_cut(wallet.owner_address(), &replace)
            .unwrap();
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Cut), 2);

        let modules = wallet.service.snapshot().modules().clone();
        assert_eq!(modules.module_of(&selector(1)), Some(MODULE_B));
        assert_eq!(modules.module_of(&selector(2)), Some(MODULE_A));
    }

    #[test]
    fn test_failed_cut_consumes_no_nonce() {
        let wallet = Wallet::with_guardians(0);
        wallet.registry.register(MODULE_A, [selector(1)]);
        let add = cut(MODULE_A, CutAction::Add, &[selector(1)]);
        wallet.service.module_cut(wallet.owner_address(), &add).unwrap();

        assert_eq!(
            wallet.service.module_cut(wallet.owner_address(), &add),
            Err(GovernanceError::SelectorAlreadyInstalled(selector(1)))
        );
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Cut), 1);
    }

    #[test]
    fn test_guardian_cut_refused_during_recovery() {
        let wallet = Wallet::with_guardians(2);
        wallet.registry.register(MODULE_A, [selector(1)]);
        let add = cut(MODULE_A, CutAction::Add, &[selector(1)]);

        let new_owner = Address::new([0xEE; 20]);
        let (approvers, signatures) =
            wallet.guardian_batch(&[0, 1], &Workflow::Recovery { new_owner });
        wallet
            .service
            .execute_recovery(new_owner, &approvers, &signatures)
            .unwrap();
        assert!(wallet.service.is_locked());

        let (approvers, signatures) = wallet.guardian_batch(&[0, 1], &Workflow::Cut(add.clone()));
        assert_eq!(
            wallet
                .service
                .module_cut_with_guardians(&add, &approvers, &signatures),
            Err(GovernanceError::AccountLocked)
        );
        assert_eq!(
            wallet.service.approve_module_cut(wallet.guardian(0), &add),
            Err(GovernanceError::AccountLocked)
        );
        assert_eq!(wallet.service.snapshot().modules().module_of(&selector(1)), None);
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Cut), 0);
    }

    // =============================================================================
    // REGISTRY
    // =============================================================================

    #[test]
    fn test_unregistered_cut_rejected_before_approval() {
        let wallet = Wallet::with_guardians(3);
        let add = cut(MODULE_A, CutAction::Add, &[selector(9)]);

        assert_eq!(
            wallet.service.approve_module_cut(wallet.guardian(0), &add),
            Err(GovernanceError::UnregisteredFacetAndSelectors { module: MODULE_A })
        );
        assert_eq!(wallet.service.approval_count(&Workflow::Cut(add)), 0);
    }

    // =============================================================================
    // QUORUM
    // =============================================================================

    #[test]
    fn test_removed_guardian_approval_stops_counting() {
        let wallet = Wallet::with_guardians(3);
        wallet.registry.register(MODULE_A, [selector(1)]);
        let add = cut(MODULE_A, CutAction::Add, &[selector(1)]);
        let workflow = Workflow::Cut(add.clone());

        wallet
            .service
            .approve_module_cut(wallet.guardian(0), &add)
            .unwrap();
        wallet
            .service
            .remove_guardian(wallet.owner_address(), wallet.guardian(0))
            .unwrap();
        assert_eq!(wallet.service.approval_count(&workflow), 0);

        // Threshold stays at the snapshot taken with three guardians
        let receipt = wallet
            .service
            .approve_module_cut(wallet.guardian(1), &add)
            .unwrap();
        assert_eq!((receipt.approvals, receipt.required), (1, 2));
        assert!(!receipt.finalized);

        let receipt = wallet
            .service
            .approve_module_cut(wallet.guardian(2), &add)
            .unwrap();
        assert!(receipt.finalized);
        assert_eq!(
            wallet.service.snapshot().modules().module_of(&selector(1)),
            Some(MODULE_A)
        );
    }

    #[test]
    fn test_competing_cut_rejected_while_first_is_live() {
        let wallet = Wallet::with_guardians(3);
        wallet.registry.register(MODULE_A, [selector(1)]);
        wallet.registry.register(MODULE_B, [selector(1)]);
        let first = cut(MODULE_A, CutAction::Add, &[selector(1)]);
        let second = cut(MODULE_B, CutAction::Add, &[selector(1)]);

        wallet
            .service
            .approve_module_cut(wallet.guardian(0), &first)
            .unwrap();
        assert_eq!(
            wallet.service.approve_module_cut(wallet.guardian(1), &second),
            Err(GovernanceError::ConflictingPendingAction {
                workflow: WorkflowKind::Cut
            })
        );

        wallet
            .clock
            .advance(wallet.service.config().approval_validity_period);
        let receipt = wallet
            .service
            .approve_module_cut(wallet.guardian(1), &second)
            .unwrap();
        assert_eq!(receipt.approvals, 1);
    }

    #[test]
    fn test_revocation_rules() {
        let wallet = Wallet::with_guardians(5);
        wallet.registry.register(MODULE_A, [selector(1)]);
        let add = cut(MODULE_A, CutAction::Add, &[selector(1)]);

        for i in 0..2 {
            wallet
                .service
                .approve_module_cut(wallet.guardian(i), &add)
                .unwrap();
        }

        assert!(matches!(
            wallet
                .service
                .revoke_module_cut_approval(wallet.guardian(2), &add, wallet.guardian(0)),
            Err(GovernanceError::Unauthorized { .. })
        ));
        assert_eq!(
            wallet
                .service
                .revoke_module_cut_approval(wallet.guardian(0), &add, wallet.guardian(0)),
            Ok(1)
        );
        assert_eq!(
            wallet
                .service
                .revoke_module_cut_approval(wallet.owner_address(), &add, wallet.guardian(1)),
            Ok(0)
        );
        assert_eq!(
            wallet
                .service
                .revoke_module_cut_approval(wallet.owner_address(), &add, wallet.guardian(1)),
            Err(GovernanceError::NonExistentApproval)
        );
    }
}
