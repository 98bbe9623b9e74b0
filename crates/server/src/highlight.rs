//! Boundary highlighting for nearby claim areas.
//!
//! Showing a claim means sending every block on its outer shell to the
//! viewer. That can be tens of thousands of blocks, so the work is
//! never done in one unbroken operation: planning collects the shell
//! blocks of all areas near the viewer, and a spawned task streams them
//! in bounded batches on successive ticks. The task ends itself once
//! the batch index reaches the end of the work list.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use flats_engine::registry::FlatRegistry;
use flats_engine::volume::{BlockPos, Location, WorldId};

/// Only areas with a corner within this many blocks of the viewer are
/// highlighted.
pub const MAX_DISTANCE: i64 = 100;

/// Cap on blocks delivered per tick, bounding worst-case tick latency.
pub const MAX_UPDATES_PER_TICK: usize = 100;

/// One scheduler tick.
pub const TICK: Duration = Duration::from_millis(50);

/// One tick's worth of boundary blocks for a viewer. `Arc<[...]>` keeps
/// the per-send clone cheap.
#[derive(Clone, Debug)]
pub struct HighlightBatch {
    pub viewer: Uuid,
    pub world: WorldId,
    pub blocks: Arc<[BlockPos]>,
}

/// Collect the boundary blocks of every area within `range` of the
/// viewer, in registry order.
pub fn plan(registry: &FlatRegistry, viewer: &Location, range: i64) -> Vec<BlockPos> {
    let mut blocks = Vec::new();
    for flat in registry.iter() {
        for area in flat.areas() {
            if area.within_distance(viewer, range) {
                blocks.extend(area.boundary_cells());
            }
        }
    }
    blocks
}

/// Stream `blocks` to `tx` in batches of at most
/// [`MAX_UPDATES_PER_TICK`], one batch per tick. The task stops early
/// if the receiver goes away (viewer disconnected).
pub fn start(
    viewer: Uuid,
    world: WorldId,
    blocks: Vec<BlockPos>,
    tx: mpsc::Sender<HighlightBatch>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK);
        let mut index = 0;
        while index < blocks.len() {
            interval.tick().await;
            let end = (index + MAX_UPDATES_PER_TICK).min(blocks.len());
            let batch = HighlightBatch {
                viewer,
                world: world.clone(),
                blocks: blocks[index..end].into(),
            };
            if tx.send(batch).await.is_err() {
                break;
            }
            index = end;
        }
    })
}
