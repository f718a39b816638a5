//! The authority boundary: applying track changes to the map and treasury.
//!
//! Ghost placement calls [`execute_place`] and [`execute_remove`] directly
//! and never touches money. Authoritative commits go through
//! [`TrackCommitService`], which either applies them immediately (local play)
//! or parks them in a pending slot until the authority answers (remote play).

use bevy::prelude::*;
use thiserror::Error;

use crate::constants::{Money, STARTING_TREASURY};
use crate::geometry::footprint::FootprintTiles;
use crate::geometry::{CoordsXYZ, PieceDirection};
use crate::map::{MapError, TrackMap, TrackTileElement};
use crate::track::{CatalogError, TrackElement, TrackPieceCatalog};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("not enough cash: need {needed}, have {available}")]
    InsufficientFunds { needed: Money, available: Money },
    #[error("another commit is still awaiting confirmation")]
    CommitPending,
    #[error("no commit awaiting confirmation")]
    NothingPending,
    #[error("no track piece there to remove")]
    NothingToRemove,
}

impl PlacementError {
    /// Whether a bounded height search may still find a placement.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlacementError::Map(
                MapError::Obstructed(_) | MapError::Underground(_) | MapError::TooLow(_)
            )
        )
    }
}

/// Park cash available for construction.
#[derive(Resource, Debug, Clone)]
pub struct ParkTreasury {
    balance: Money,
}

impl Default for ParkTreasury {
    fn default() -> Self {
        Self { balance: STARTING_TREASURY }
    }
}

impl ParkTreasury {
    pub fn new(balance: Money) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn debit(&mut self, amount: Money) -> Result<(), PlacementError> {
        if amount > self.balance {
            return Err(PlacementError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn credit(&mut self, amount: Money) {
        self.balance += amount;
    }
}

/// One fully resolved placement, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceRequest {
    pub ride: Entity,
    pub element: TrackElement,
    pub origin: CoordsXYZ,
    pub direction: PieceDirection,
    pub is_ghost: bool,
    pub has_lift: bool,
    pub properties: u16,
}

/// Validate and apply a placement. Ghost placements compute the cost but
/// never charge it.
pub fn execute_place(
    map: &mut TrackMap,
    catalog: &TrackPieceCatalog,
    treasury: &mut ParkTreasury,
    request: &PlaceRequest,
) -> Result<Money, PlacementError> {
    let definition = catalog.lookup(request.element)?;
    let origin = request.origin;
    let direction = request.direction.direction;

    let mut footprint = FootprintTiles::new(&definition.blocks, origin, direction);
    map.can_place(footprint.by_ref(), true)?;

    let cost = definition.base_price;
    if !request.is_ghost {
        treasury.debit(cost)?;
    }

    footprint.restart();
    for tile in footprint {
        let record = TrackTileElement {
            ride: request.ride,
            element: request.element,
            origin,
            direction: request.direction,
            base_z: tile.base_z,
            clearance_z: tile.clearance_z,
            is_ghost: request.is_ghost,
            has_lift: request.has_lift,
            properties: request.properties,
            maze_quadrants: 0,
        };
        map.insert(tile.tile, record)?;
    }
    Ok(cost)
}

/// Remove a piece and refund part of its price. Ghost pieces refund nothing.
pub fn execute_remove(
    map: &mut TrackMap,
    catalog: &TrackPieceCatalog,
    treasury: &mut ParkTreasury,
    ride: Entity,
    element: TrackElement,
    origin: CoordsXYZ,
    is_ghost: bool,
) -> Result<Money, PlacementError> {
    if !map.remove_piece(ride, element, origin) {
        return Err(PlacementError::NothingToRemove);
    }
    if is_ghost {
        return Ok(0);
    }
    let definition = catalog.lookup(element)?;
    let refund = definition.base_price * 7 / 10;
    treasury.credit(refund);
    Ok(refund)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitMode {
    /// Apply commits immediately.
    #[default]
    Local,
    /// Park commits until the authority confirms or rejects them.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCommit {
    pub request: PlaceRequest,
}

#[derive(Resource, Debug, Default)]
pub struct TrackCommitService {
    pub mode: CommitMode,
    pending: Option<PendingCommit>,
}

impl TrackCommitService {
    pub fn remote() -> Self {
        Self { mode: CommitMode::Remote, pending: None }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Submit an authoritative placement. Returns the charged cost when it
    /// was applied immediately, `None` when it is awaiting confirmation.
    pub fn submit(
        &mut self,
        map: &mut TrackMap,
        catalog: &TrackPieceCatalog,
        treasury: &mut ParkTreasury,
        request: PlaceRequest,
    ) -> Result<Option<Money>, PlacementError> {
        debug_assert!(!request.is_ghost);
        match self.mode {
            CommitMode::Local => {
                let cost = execute_place(map, catalog, treasury, &request)?;
                Ok(Some(cost))
            }
            CommitMode::Remote => {
                if self.pending.is_some() {
                    return Err(PlacementError::CommitPending);
                }
                // Validate locally before parking so obvious failures are
                // reported without a round trip.
                let mut probe = treasury.clone();
                let definition = catalog.lookup(request.element)?;
                let footprint = FootprintTiles::new(
                    &definition.blocks,
                    request.origin,
                    request.direction.direction,
                );
                map.can_place(footprint, true)?;
                probe.debit(definition.base_price)?;
                self.pending = Some(PendingCommit { request });
                Ok(None)
            }
        }
    }

    /// The authority confirmed the pending commit; apply it and hand the
    /// request back so the session can advance past the new piece.
    pub fn confirm(
        &mut self,
        map: &mut TrackMap,
        catalog: &TrackPieceCatalog,
        treasury: &mut ParkTreasury,
    ) -> Result<(Money, PlaceRequest), PlacementError> {
        let pending = self.pending.take().ok_or(PlacementError::NothingPending)?;
        let cost = execute_place(map, catalog, treasury, &pending.request)?;
        Ok((cost, pending.request))
    }

    /// The authority rejected the pending commit; drop it.
    pub fn reject(&mut self) -> Option<PendingCommit> {
        self.pending.take()
    }
}
