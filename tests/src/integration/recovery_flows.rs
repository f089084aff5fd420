//! # Recovery Flows
//!
//! Execution across both channels, maturation, finalization, cancellation
//! and replay of stale signatures.

#[cfg(test)]
mod tests {
    use crate::harness::{sign, Wallet};
    use gw_01_guardian_governance::{
        GovernanceApi, GovernanceError, GovernanceEvent, PendingRecovery, Workflow, WorkflowKind,
    };
    use shared_crypto::Secp256k1KeyPair;

    fn recovery_to(new_owner: &Secp256k1KeyPair) -> Workflow {
        Workflow::Recovery {
            new_owner: new_owner.address(),
        }
    }

    // =============================================================================
    // EXECUTION
    // =============================================================================

    /// G1 signs off-chain, G2 approves on-chain: majority of 3 reached
    #[test]
    fn test_mixed_channel_recovery_executes_and_locks() {
        let wallet = Wallet::with_guardians(3);
        let new_owner = Secp256k1KeyPair::generate();
        let workflow = recovery_to(&new_owner);

        let (approvers, signatures) = wallet.guardian_batch(&[0], &workflow);
        let receipt = wallet
            .service
            .execute_recovery(new_owner.address(), &approvers, &signatures)
            .unwrap();
        assert_eq!(receipt.approvals, 1);
        assert_eq!(receipt.required, 2);
        assert!(!receipt.finalized);
        assert!(wallet.service.is_locked(), "first live approval locks");

        let receipt = wallet
            .service
            .approve_account_recovery(wallet.guardian(1), new_owner.address())
            .unwrap();
        assert!(receipt.finalized);
        assert_eq!(receipt.nonce, 0);

        let events = wallet.service.take_events();
        assert!(events.iter().any(|event| matches!(
            event,
            GovernanceEvent::RecoveryExecuted { new_owner: owner, nonce: 0, .. }
                if *owner == new_owner.address()
        )));
        assert!(wallet.service.is_locked());
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Recovery), 1);
        assert_eq!(
            wallet.service.get_pending_recovery().new_owner,
            new_owner.address()
        );
    }

    /// Guardians {G1, G2}: G1 off-chain plus G2 on-chain meets the majority of 2
    #[test]
    fn test_two_guardian_recovery_then_stale_unlock() {
        let wallet = Wallet::with_guardians(2);
        let new_owner = Secp256k1KeyPair::generate();
        let workflow = recovery_to(&new_owner);

        let (approvers, signatures) = wallet.guardian_batch(&[0], &workflow);
        let first = wallet
            .service
            .execute_recovery(new_owner.address(), &approvers, &signatures)
            .unwrap();
        assert_eq!((first.approvals, first.required), (1, 2));
        assert!(!first.finalized);

        let second = wallet
            .service
            .approve_account_recovery(wallet.guardian(1), new_owner.address())
            .unwrap();
        assert!(second.finalized);

        let events = wallet.service.take_events();
        assert!(events.iter().any(|event| matches!(
            event,
            GovernanceEvent::RecoveryExecuted { nonce: 0, .. }
        )));
        assert!(wallet.service.is_locked());
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Lock), 0);

        // Unlock signed for lockNonce = 1 while the lock nonce is still 0
        let ahead = wallet.hash_at(&Workflow::Unlock, 1);
        for (approver, key) in [
            (wallet.owner_address(), &wallet.owner),
            (wallet.guardian(0), &wallet.guardians[0]),
        ] {
            assert_eq!(
                wallet.service.unlock(approver, &sign(key, &ahead)),
                Err(GovernanceError::InvalidSignature)
            );
        }
        assert!(wallet.service.is_locked());
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Lock), 0);
    }

    #[test]
    fn test_cross_channel_duplicate_approval() {
        let wallet = Wallet::with_guardians(3);
        let new_owner = Secp256k1KeyPair::generate();
        let workflow = recovery_to(&new_owner);

        wallet
            .service
            .approve_account_recovery(wallet.guardian(0), new_owner.address())
            .unwrap();

        let (approvers, signatures) = wallet.guardian_batch(&[1, 0], &workflow);
        let result = wallet
            .service
            .execute_recovery(new_owner.address(), &approvers, &signatures);

        assert_eq!(
            result,
            Err(GovernanceError::DuplicateApproval(wallet.guardian(0)))
        );
        // G2's signature in the rejected batch was not recorded either
        assert_eq!(wallet.service.approval_count(&workflow), 1);
        assert!(!wallet.service.is_approved(&workflow, wallet.guardian(1)));
    }

    #[test]
    fn test_non_guardian_in_batch_rejected() {
        let wallet = Wallet::with_guardians(2);
        let new_owner = Secp256k1KeyPair::generate();
        let outsider = Secp256k1KeyPair::generate();
        let workflow = recovery_to(&new_owner);

        let hash = wallet.service.action_hash(&workflow);
        let result = wallet.service.execute_recovery(
            new_owner.address(),
            &[outsider.address()],
            &[sign(&outsider, &hash)],
        );

        assert_eq!(
            result,
            Err(GovernanceError::InvalidGuardian(outsider.address()))
        );
    }

    // =============================================================================
    // MATURATION AND FINALIZATION
    // =============================================================================

    #[test]
    fn test_finalize_only_after_maturity_and_only_once() {
        let wallet = Wallet::with_guardians(3);
        let new_owner = Secp256k1KeyPair::generate();
        let (approvers, signatures) = wallet.guardian_batch(&[0, 2], &recovery_to(&new_owner));
        wallet
            .service
            .execute_recovery(new_owner.address(), &approvers, &signatures)
            .unwrap();
        let matures_at = wallet.service.get_pending_recovery().matures_at;

        wallet.clock.set(matures_at - 1);
        assert_eq!(
            wallet.service.finalize_recovery(),
            Err(GovernanceError::NonexistentRecovery)
        );

        wallet.clock.set(matures_at);
        assert_eq!(
            wallet.service.finalize_recovery(),
            Ok(new_owner.address())
        );
        assert_eq!(wallet.service.current_owner(), new_owner.address());
        assert!(!wallet.service.is_locked());
        assert_eq!(
            wallet.service.get_pending_recovery(),
            PendingRecovery::default()
        );

        assert_eq!(
            wallet.service.finalize_recovery(),
            Err(GovernanceError::NonexistentRecovery)
        );
        // Finalization consumes no nonce
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Recovery), 1);
    }

    #[test]
    fn test_recovery_to_guardian_purges_it() {
        let wallet = Wallet::with_guardians(3);
        let promoted = wallet.guardian(2);
        let workflow = Workflow::Recovery { new_owner: promoted };

        let (approvers, signatures) = wallet.guardian_batch(&[0, 1], &workflow);
        wallet
            .service
            .execute_recovery(promoted, &approvers, &signatures)
            .unwrap();
        wallet
            .clock
            .advance(wallet.service.config().recovery_period);
        wallet.service.finalize_recovery().unwrap();

        assert_eq!(wallet.service.current_owner(), promoted);
        assert!(!wallet.service.is_guardian(promoted));
        assert_eq!(wallet.service.guardian_count(), 2);
    }

    // =============================================================================
    // CANCELLATION AND REPLAY
    // =============================================================================

    #[test]
    fn test_pending_recovery_idempotent_and_cleared_by_cancel() {
        let wallet = Wallet::with_guardians(3);
        let new_owner = Secp256k1KeyPair::generate();
        let workflow = recovery_to(&new_owner);
        let (approvers, signatures) = wallet.guardian_batch(&[0, 1], &workflow);
        wallet
            .service
            .execute_recovery(new_owner.address(), &approvers, &signatures)
            .unwrap();

        let first = wallet.service.get_pending_recovery();
        let second = wallet.service.get_pending_recovery();
        assert_eq!(first, second);
        assert_ne!(first, PendingRecovery::default());

        let cancel = wallet
            .service
            .approve_cancel_recovery(wallet.guardian(0), new_owner.address())
            .unwrap();
        assert!(!cancel.finalized);
        let (approvers, signatures) = wallet.guardian_batch(
            &[2],
            &Workflow::RecoveryCancel {
                new_owner: new_owner.address(),
            },
        );
        let cancel = wallet
            .service
            .cancel_recovery(new_owner.address(), &approvers, &signatures)
            .unwrap();
        assert!(cancel.finalized);

        assert_eq!(
            wallet.service.get_pending_recovery(),
            PendingRecovery::default()
        );
        assert!(!wallet.service.is_locked());
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Recovery), 2);

        // Signatures bound to recovery nonce 0 no longer verify
        let stale = wallet.hash_at(&workflow, 0);
        let replayed = vec![
            sign(&wallet.guardians[0], &stale),
            sign(&wallet.guardians[1], &stale),
        ];
        let result = wallet.service.execute_recovery(
            new_owner.address(),
            &[wallet.guardian(0), wallet.guardian(1)],
            &replayed,
        );
        assert!(matches!(
            result,
            Err(GovernanceError::InvalidGuardianSignature(_))
        ));
    }

    #[test]
    fn test_cancel_for_wrong_owner_rejected() {
        let wallet = Wallet::with_guardians(1);
        let new_owner = Secp256k1KeyPair::generate();
        let other = Secp256k1KeyPair::generate();
        wallet
            .service
            .approve_account_recovery(wallet.guardian(0), new_owner.address())
            .unwrap();

        assert_eq!(
            wallet
                .service
                .approve_cancel_recovery(wallet.guardian(0), other.address()),
            Err(GovernanceError::RecoveryPayloadMismatch {
                expected: new_owner.address(),
                actual: other.address(),
            })
        );
    }

    #[test]
    fn test_expired_approval_no_longer_locks() {
        let wallet = Wallet::with_guardians(3);
        let new_owner = Secp256k1KeyPair::generate();
        let workflow = recovery_to(&new_owner);

        wallet
            .service
            .approve_account_recovery(wallet.guardian(0), new_owner.address())
            .unwrap();
        assert!(wallet.service.is_locked());

        wallet
            .clock
            .advance(wallet.service.config().approval_validity_period);
        assert_eq!(wallet.service.approval_count(&workflow), 0);
        assert!(!wallet.service.is_locked());
    }

    #[test]
    fn test_hardstop_pending_recovery() {
        let wallet = Wallet::with_guardians(3);
        let new_owner = Secp256k1KeyPair::generate();
        wallet
            .service
            .approve_account_recovery(wallet.guardian(0), new_owner.address())
            .unwrap();

        let hash = wallet.service.action_hash(&Workflow::Hardstop);
        let signature = sign(&wallet.owner, &hash);
        wallet.service.hardstop_recovery(&signature).unwrap();

        assert!(!wallet.service.is_locked());
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Recovery), 1);
        assert_eq!(
            wallet.service.approval_count(&recovery_to(&new_owner)),
            0
        );
        assert_eq!(
            wallet.service.hardstop_recovery(&signature),
            Err(GovernanceError::NonexistentRecovery)
        );
    }
}
