//! `create_schematic` and `place_schematic`.

use std::collections::BTreeMap;
use std::path::Path;

use glam::IVec3;
use mapgen_features::FeatureId;
use mapgen_schematic::{PlaceStats, RotationSpec, Schematic};
use mapgen_voxel::{ContentTable, NodeResolver, VoxelRegion, sort_box_vertices};
use rand::Rng;

use crate::desc::SchematicSource;
use crate::error::SessionError;
use crate::session::MapgenSession;

impl<C: ContentTable> MapgenSession<C> {
    /// Captures the box between `p1` and `p2` from `region`, applies the
    /// probability overrides and writes the result to `path` (relative paths
    /// go to the schematic directory).
    ///
    /// Override positions and slice levels are world coordinates.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFinalized`] before [`finalize`](Self::finalize);
    /// otherwise capture and I/O failures.
    pub fn create_schematic(
        &self,
        region: &dyn VoxelRegion,
        p1: IVec3,
        p2: IVec3,
        point_probs: &[(IVec3, u8)],
        slice_probs: &[(i32, u8)],
        path: &Path,
    ) -> Result<Schematic, SessionError> {
        self.require_finalized()?;
        let (min, max) = sort_box_vertices(p1, p2);

        let mut schematic = Schematic::from_region(region, &self.table, min, max)?;
        schematic.apply_probabilities(min, point_probs, slice_probs);

        let path = self.config.schematic_path(path);
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|source| {
                mapgen_schematic::SchematicError::Io {
                    path: dir.to_path_buf(),
                    source,
                }
            })?;
        }
        schematic.save_to_file(&path)?;
        tracing::info!("create_schematic: saved schematic file '{}'", path.display());
        Ok(schematic)
    }

    /// Loads a schematic, substitutes node names, resolves them against the
    /// content table and places it with its minimum corner at `pos`.
    ///
    /// `force` defaults to the configured `force_placement`. A random
    /// rotation is drawn from `rng`.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFinalized`] before [`finalize`](Self::finalize);
    /// load failures; [`SessionError::Place`] if the rotated footprint is
    /// not inside `region`.
    pub fn place_schematic<R: Rng + ?Sized>(
        &self,
        region: &mut dyn VoxelRegion,
        pos: IVec3,
        source: &SchematicSource,
        rotation: RotationSpec,
        replacements: &BTreeMap<String, String>,
        force: Option<bool>,
        rng: &mut R,
    ) -> Result<PlaceStats, SessionError> {
        self.require_finalized()?;

        let mut schematic = self.load_schematic(source)?;
        schematic.apply_replacements(replacements);

        let mut resolver = NodeResolver::new();
        schematic.request_content_ids(&mut resolver);
        resolver.flush(&self.table);
        let remap = schematic.content_remap(&self.table);

        let rotation = rotation.resolve(rng);
        let force = force.unwrap_or(self.config.schematics.force_placement);
        Ok(schematic.place(region, pos, rotation, force, &remap, rng)?)
    }

    /// Places a registered schematic decoration at surface position `pos`,
    /// honouring its rotation and centering flags. Existing nodes are kept.
    ///
    /// Returns `Ok(None)` if `id` is not a schematic decoration.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFinalized`] before [`finalize`](Self::finalize);
    /// [`SessionError::Place`] if the footprint is not inside `region`.
    pub fn place_decoration_schematic<R: Rng + ?Sized>(
        &self,
        id: FeatureId,
        region: &mut dyn VoxelRegion,
        pos: IVec3,
        rng: &mut R,
    ) -> Result<Option<PlaceStats>, SessionError> {
        self.require_finalized()?;
        let Some(deco) = self.decorations.get(id).and_then(|d| d.as_schematic()) else {
            return Ok(None);
        };

        let rotation = deco.rotation.resolve(rng);
        let origin = deco.placement_origin(pos, rotation);
        let remap = deco.schematic.content_remap(&self.table);
        let stats = deco
            .schematic
            .place(region, origin, rotation, false, &remap, rng)?;
        Ok(Some(stats))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
