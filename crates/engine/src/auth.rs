//! Protection and claim-transition decisions.
//!
//! These are state-free functions over registry/flat state. The host's
//! event glue calls [`resolve_at`] for every protected action (block
//! break, entity damage, interaction) and cancels the action on
//! [`Decision::Deny`]; the command layer composes [`check_claimable`]
//! in front of registry creation and uses the transition functions for
//! claim, unclaim and trust changes.

use uuid::Uuid;

use crate::error::FlatError;
use crate::flat::Flat;
use crate::registry::FlatRegistry;
use crate::volume::{AreaVolume, Location};

/// The acting entity as seen by protection checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    /// Administrative bypass: allowed everywhere and exempt from claim
    /// limits.
    pub admin_bypass: bool,
}

impl Actor {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            admin_bypass: false,
        }
    }

    pub fn admin(id: Uuid) -> Self {
        Self {
            id,
            admin_bypass: true,
        }
    }
}

/// Outcome of a protection check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Decide whether `actor` may act inside `flat` (or anywhere, when the
/// location resolved to no flat at all).
pub fn resolve_authorization(flat: Option<&Flat>, actor: &Actor) -> Decision {
    let Some(flat) = flat else {
        return Decision::Allow;
    };
    if actor.admin_bypass || flat.is_owner(actor.id) || flat.is_trusted(actor.id) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Resolve the flat at `loc` through the registry and decide. This is
/// the single entry point event handlers call per protected action.
pub fn resolve_at(registry: &FlatRegistry, actor: &Actor, loc: &Location) -> Decision {
    resolve_authorization(registry.get_by_location(loc), actor)
}

/// Reject a candidate area that intersects any existing area, naming
/// the conflicting flat and area for user feedback.
pub fn check_claimable(registry: &FlatRegistry, candidate: &AreaVolume) -> Result<(), FlatError> {
    match registry.find_conflict(candidate) {
        Some(conflict) => Err(FlatError::Overlap {
            flat: conflict.flat,
            area: conflict.area,
        }),
        None => Ok(()),
    }
}

/// Claim an unowned flat for `actor`.
pub fn claim(flat: &mut Flat, actor: &Actor) -> Result<(), FlatError> {
    match flat.owner() {
        Some(owner) if owner == actor.id => Err(FlatError::AlreadyYours),
        Some(owner) => Err(FlatError::AlreadyOwned { owner }),
        None => {
            flat.set_owner(actor.id);
            Ok(())
        }
    }
}

/// Release ownership. Owner only; clears the owner and the entire
/// trusted set atomically.
pub fn unclaim(flat: &mut Flat, actor: &Actor) -> Result<(), FlatError> {
    if !flat.is_owner(actor.id) {
        return Err(FlatError::NotOwner);
    }
    flat.clear_owner();
    Ok(())
}

/// Grant `target` access to the actor's flat.
pub fn trust(flat: &mut Flat, actor: &Actor, target: Uuid) -> Result<(), FlatError> {
    if !flat.is_owner(actor.id) {
        return Err(FlatError::NotOwner);
    }
    if flat.is_owner(target) {
        return Err(FlatError::CannotTrustOwner);
    }
    if !flat.add_trusted(target) {
        return Err(FlatError::AlreadyTrusted(target));
    }
    Ok(())
}

/// Revoke `target`'s access to the actor's flat.
pub fn untrust(flat: &mut Flat, actor: &Actor, target: Uuid) -> Result<(), FlatError> {
    if !flat.is_owner(actor.id) {
        return Err(FlatError::NotOwner);
    }
    if !flat.remove_trusted(target) {
        return Err(FlatError::NotTrusted(target));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::{BlockPos, WorldCatalog, WorldId};

    fn setup() -> (WorldId, FlatRegistry) {
        let mut catalog = WorldCatalog::new();
        let w = catalog.register("world");
        let mut reg = FlatRegistry::new();
        reg.create(
            "home",
            AreaVolume::new(w.clone(), BlockPos::new(0, 0, 0), BlockPos::new(10, 10, 10)),
        )
        .unwrap();
        (w, reg)
    }

    #[test]
    fn no_flat_means_allow() {
        let (w, reg) = setup();
        let stranger = Actor::new(Uuid::from_u128(9));
        let wild = Location::new(w, 500, 5, 500);
        assert!(resolve_at(&reg, &stranger, &wild).is_allowed());
    }

    #[test]
    fn owner_trusted_and_admin_are_allowed_strangers_denied() {
        let (w, mut reg) = setup();
        let owner = Actor::new(Uuid::from_u128(1));
        let friend = Actor::new(Uuid::from_u128(2));
        let stranger = Actor::new(Uuid::from_u128(3));
        let admin = Actor::admin(Uuid::from_u128(4));

        let flat = reg.flat_mut("home").unwrap();
        claim(flat, &owner).unwrap();
        trust(flat, &owner, friend.id).unwrap();

        let inside = Location::new(w, 5, 5, 5);
        assert!(resolve_at(&reg, &owner, &inside).is_allowed());
        assert!(resolve_at(&reg, &friend, &inside).is_allowed());
        assert!(resolve_at(&reg, &admin, &inside).is_allowed());
        assert_eq!(resolve_at(&reg, &stranger, &inside), Decision::Deny);
    }

    #[test]
    fn claim_transitions() {
        let (_, mut reg) = setup();
        let alice = Actor::new(Uuid::from_u128(1));
        let bob = Actor::new(Uuid::from_u128(2));

        let flat = reg.flat_mut("home").unwrap();
        claim(flat, &alice).unwrap();
        assert_eq!(flat.owner(), Some(alice.id));
        assert_eq!(claim(flat, &alice), Err(FlatError::AlreadyYours));
        assert_eq!(claim(flat, &bob), Err(FlatError::AlreadyOwned { owner: alice.id }));
    }

    #[test]
    fn unclaim_requires_owner_and_clears_trust() {
        let (_, mut reg) = setup();
        let alice = Actor::new(Uuid::from_u128(1));
        let bob = Actor::new(Uuid::from_u128(2));

        let flat = reg.flat_mut("home").unwrap();
        claim(flat, &alice).unwrap();
        trust(flat, &alice, bob.id).unwrap();

        assert_eq!(unclaim(flat, &bob), Err(FlatError::NotOwner));
        unclaim(flat, &alice).unwrap();
        assert_eq!(flat.owner(), None);
        assert!(flat.trusted().is_empty());
    }

    #[test]
    fn trust_preconditions() {
        let (_, mut reg) = setup();
        let alice = Actor::new(Uuid::from_u128(1));
        let bob = Uuid::from_u128(2);

        let flat = reg.flat_mut("home").unwrap();
        assert_eq!(trust(flat, &alice, bob), Err(FlatError::NotOwner));

        claim(flat, &alice).unwrap();
        assert_eq!(trust(flat, &alice, alice.id), Err(FlatError::CannotTrustOwner));
        trust(flat, &alice, bob).unwrap();
        assert_eq!(trust(flat, &alice, bob), Err(FlatError::AlreadyTrusted(bob)));

        untrust(flat, &alice, bob).unwrap();
        assert_eq!(untrust(flat, &alice, bob), Err(FlatError::NotTrusted(bob)));
    }

    #[test]
    fn overlap_is_rejected_and_existing_flat_untouched() {
        let (w, mut reg) = setup();
        let before = reg.get("home").unwrap().clone();
        let candidate =
            AreaVolume::new(w.clone(), BlockPos::new(5, 5, 5), BlockPos::new(20, 20, 20));
        let err = check_claimable(&reg, &candidate).unwrap_err();
        assert!(matches!(err, FlatError::Overlap { ref flat, .. } if flat == "home"));
        assert_eq!(reg.get("home").unwrap(), &before);

        let free = AreaVolume::new(w, BlockPos::new(50, 0, 50), BlockPos::new(60, 10, 60));
        check_claimable(&reg, &free).unwrap();
        reg.create("second", free).unwrap();
        assert_eq!(reg.len(), 2);
    }
}
