//! End-to-end exercise of the claim lifecycle: create, claim, deny,
//! unclaim, delete, with the spatial index consulted throughout.

use flats_engine::auth::{self, Actor, Decision};
use flats_engine::error::FlatError;
use flats_engine::flat::Flat;
use flats_engine::registry::FlatRegistry;
use flats_engine::volume::{AreaVolume, BlockPos, Location, WorldCatalog};
use uuid::Uuid;

#[test]
fn claim_lifecycle() {
    let mut catalog = WorldCatalog::new();
    let w = catalog.register("world");

    let mut registry = FlatRegistry::new();
    let area = AreaVolume::new(w.clone(), BlockPos::new(1, 1, 1), BlockPos::new(10, 10, 10));
    assert_eq!(area.volume(), 1000);

    auth::check_claimable(&registry, &area).unwrap();
    registry.create("testFlat", area).unwrap();

    let inside = Location::new(w.clone(), 5, 5, 5);
    assert_eq!(registry.get_by_location(&inside).unwrap().name(), "testFlat");

    let alice = Actor::new(Uuid::from_u128(0xA));
    let bob = Actor::new(Uuid::from_u128(0xB));

    // A claims the unowned flat.
    auth::claim(registry.flat_mut("testFlat").unwrap(), &alice).unwrap();
    assert_eq!(registry.get("testFlat").unwrap().owner(), Some(alice.id));

    // B's attempt is denied and reports the current owner.
    assert_eq!(
        auth::claim(registry.flat_mut("testFlat").unwrap(), &bob),
        Err(FlatError::AlreadyOwned { owner: alice.id }),
    );

    // Protection: owner allowed, stranger denied, outside allowed.
    assert!(auth::resolve_at(&registry, &alice, &inside).is_allowed());
    assert_eq!(auth::resolve_at(&registry, &bob, &inside), Decision::Deny);
    let outside = Location::new(w.clone(), 50, 5, 50);
    assert!(auth::resolve_at(&registry, &bob, &outside).is_allowed());

    // Unclaiming by a non-owner is denied; by the owner it clears
    // owner and trust together.
    auth::trust(registry.flat_mut("testFlat").unwrap(), &alice, bob.id).unwrap();
    assert_eq!(
        auth::unclaim(registry.flat_mut("testFlat").unwrap(), &bob),
        Err(FlatError::NotOwner),
    );
    auth::unclaim(registry.flat_mut("testFlat").unwrap(), &alice).unwrap();
    let flat = registry.get("testFlat").unwrap();
    assert_eq!(flat.owner(), None);
    assert!(flat.trusted().is_empty());

    registry.delete("testFlat").unwrap();
    assert!(registry.get_by_location(&inside).is_none());
}

#[test]
fn overlapping_claim_is_rejected_and_nothing_changes() {
    let mut catalog = WorldCatalog::new();
    let w = catalog.register("world");

    let mut registry = FlatRegistry::new();
    registry
        .create(
            "first",
            AreaVolume::new(w.clone(), BlockPos::new(0, 0, 0), BlockPos::new(15, 15, 15)),
        )
        .unwrap();
    let snapshot = registry.snapshot();

    let candidate = AreaVolume::new(w, BlockPos::new(10, 10, 10), BlockPos::new(30, 30, 30));
    let err = auth::check_claimable(&registry, &candidate).unwrap_err();
    match err {
        FlatError::Overlap { flat, area } => {
            assert_eq!(flat, "first");
            assert_eq!(area, "world:0,0,0;15,15,15");
        }
        other => panic!("expected Overlap, got {other:?}"),
    }

    assert_eq!(registry.snapshot(), snapshot);
}

#[test]
fn index_query_agrees_with_brute_force_everywhere() {
    let mut catalog = WorldCatalog::new();
    let w = catalog.register("world");
    let nether = catalog.register("nether");

    let mut registry = FlatRegistry::new();
    registry
        .create(
            "plaza",
            AreaVolume::new(w.clone(), BlockPos::new(-20, 0, -20), BlockPos::new(12, 30, 12)),
        )
        .unwrap();
    registry
        .create(
            "tower",
            AreaVolume::new(w.clone(), BlockPos::new(40, -10, 40), BlockPos::new(47, 90, 47)),
        )
        .unwrap();
    registry
        .add_area(
            "plaza",
            AreaVolume::new(w.clone(), BlockPos::new(13, 0, 13), BlockPos::new(33, 30, 33)),
        )
        .unwrap();
    registry
        .create(
            "fortress",
            AreaVolume::new(nether.clone(), BlockPos::new(0, 0, 0), BlockPos::new(10, 10, 10)),
        )
        .unwrap();

    let worlds = [w, nether];
    for world in &worlds {
        for x in (-40..80).step_by(3) {
            for y in [-15, 0, 15, 95] {
                for z in (-40..80).step_by(3) {
                    let loc = Location::new(world.clone(), x, y, z);
                    let indexed = registry.get_by_location(&loc).map(Flat::name);
                    let brute = registry.iter().find(|f| f.contains(&loc)).map(Flat::name);
                    assert_eq!(indexed, brute, "divergence at {world} ({x}, {y}, {z})");
                }
            }
        }
    }
}
