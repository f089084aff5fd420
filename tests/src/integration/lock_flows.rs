//! # Lock Flows
//!
//! Explicit locks, signed unlocks bound to the lock nonce, and which owner
//! operations a lock blocks.

#[cfg(test)]
mod tests {
    use crate::harness::{sign, Wallet};
    use gw_01_guardian_governance::{
        GovernanceApi, GovernanceError, PendingLock, Role, Workflow, WorkflowKind,
    };
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{Address, Selector};

    const TRANSFER: Selector = Selector::new([0xa9, 0x05, 0x9c, 0xbb]);

    #[test]
    fn test_unlock_signature_bound_to_lock_nonce() {
        let wallet = Wallet::with_guardians(2);
        let release_at = wallet
            .service
            .lock(wallet.guardian(0), TRANSFER)
            .unwrap();
        assert!(wallet.service.is_locked());
        assert_eq!(
            wallet.service.get_pending_lock(),
            PendingLock {
                release_at,
                selector: TRANSFER,
            }
        );

        // Signed for lockNonce = 1 while the current lock nonce is 0
        let ahead = wallet.hash_at(&Workflow::Unlock, 1);
        assert_eq!(
            wallet
                .service
                .unlock(wallet.guardian(0), &sign(&wallet.guardians[0], &ahead)),
            Err(GovernanceError::InvalidSignature)
        );
        assert!(wallet.service.is_locked());

        let current = wallet.service.action_hash(&Workflow::Unlock);
        wallet
            .service
            .unlock(wallet.guardian(0), &sign(&wallet.guardians[0], &current))
            .unwrap();

        assert!(!wallet.service.is_locked());
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Lock), 1);
        assert_eq!(wallet.service.get_pending_lock(), PendingLock::default());

        // The same signature cannot be replayed once the nonce moved
        wallet.service.lock(wallet.owner_address(), TRANSFER).unwrap();
        assert_eq!(
            wallet
                .service
                .unlock(wallet.guardian(0), &sign(&wallet.guardians[0], &current)),
            Err(GovernanceError::InvalidSignature)
        );
    }

    #[test]
    fn test_lock_blocks_owner_mutations() {
        let wallet = Wallet::with_guardians(1);
        let pending = Secp256k1KeyPair::generate();
        wallet
            .service
            .propose_guardian(wallet.owner_address(), pending.address())
            .unwrap();

        wallet.service.lock(wallet.guardian(0), TRANSFER).unwrap();

        let another = Address::new([0x42; 20]);
        assert_eq!(
            wallet
                .service
                .propose_guardian(wallet.owner_address(), another),
            Err(GovernanceError::AccountLocked)
        );
        assert_eq!(
            wallet
                .service
                .remove_guardian(wallet.owner_address(), wallet.guardian(0)),
            Err(GovernanceError::AccountLocked)
        );
        // Withdrawing a pending addition stays possible
        wallet
            .service
            .cancel_guardian_addition(wallet.owner_address(), pending.address())
            .unwrap();
    }

    #[test]
    fn test_lock_expires_and_can_be_renewed() {
        let wallet = Wallet::with_guardians(1);
        wallet.service.lock(wallet.guardian(0), TRANSFER).unwrap();

        let release_at = wallet.service.get_pending_lock().release_at;
        assert_eq!(
            wallet.service.lock(wallet.owner_address(), TRANSFER),
            Err(GovernanceError::AccountAlreadyLocked { release_at })
        );

        wallet.clock.set(release_at);
        assert!(!wallet.service.is_locked());
        wallet.service.lock(wallet.owner_address(), TRANSFER).unwrap();
        assert!(wallet.service.is_locked());
    }

    #[test]
    fn test_lock_requires_principal() {
        let wallet = Wallet::with_guardians(1);
        let stranger = Address::new([0x55; 20]);

        assert_eq!(
            wallet.service.lock(stranger, TRANSFER),
            Err(GovernanceError::Unauthorized {
                required: Role::OwnerOrGuardian
            })
        );

        wallet.service.lock(wallet.guardian(0), TRANSFER).unwrap();
        let hash = wallet.service.action_hash(&Workflow::Unlock);
        let outsider = Secp256k1KeyPair::generate();
        assert_eq!(
            wallet
                .service
                .unlock(outsider.address(), &sign(&outsider, &hash)),
            Err(GovernanceError::InvalidApprover(outsider.address()))
        );
    }

    #[test]
    fn test_unlock_cannot_lift_recovery_lock() {
        let wallet = Wallet::with_guardians(3);
        let new_owner = Secp256k1KeyPair::generate();
        wallet
            .service
            .approve_account_recovery(wallet.guardian(0), new_owner.address())
            .unwrap();
        assert!(wallet.service.is_locked());
        assert_eq!(wallet.service.get_pending_lock(), PendingLock::default());

        let hash = wallet.service.action_hash(&Workflow::Unlock);
        assert_eq!(
            wallet
                .service
                .unlock(wallet.owner_address(), &sign(&wallet.owner, &hash)),
            Err(GovernanceError::CannotUnlock)
        );
        assert_eq!(wallet.service.current_nonce(WorkflowKind::Lock), 0);
    }

    #[test]
    fn test_unlock_when_unlocked() {
        let wallet = Wallet::with_guardians(0);
        let hash = wallet.service.action_hash(&Workflow::Unlock);
        assert_eq!(
            wallet
                .service
                .unlock(wallet.owner_address(), &sign(&wallet.owner, &hash)),
            Err(GovernanceError::CannotUnlock)
        );
    }
}
