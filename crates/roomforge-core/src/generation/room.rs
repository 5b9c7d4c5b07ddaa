//! Room builder - the hollow wall box (floor, four walls, no ceiling).

use super::bounds::RoomBounds;
use super::layout::Placement;
use crate::components::ObjectKind;
use crate::config::Compat;
use crate::scene::PlacementSink;

/// Wall cells of a built room
#[derive(Debug, Clone, Default)]
pub struct RoomShell {
    pub walls: Vec<Placement>,
    /// Indices into `walls`, in lattice-scan order
    pub floor: Vec<usize>,
}

/// Emit one wall cell per shell coordinate of the outer lattice.
///
/// Scan order is x-major, then y, then z. Cells on the bottom layer that sit
/// under the inner footprint are also recorded as floor cells.
pub fn build_room<S: PlacementSink + ?Sized>(
    sink: &mut S,
    bounds: &RoomBounds,
    compat: &Compat,
) -> RoomShell {
    let mut shell = RoomShell::default();

    for x in 0..bounds.outer_length {
        for y in 0..bounds.outer_height {
            for z in 0..bounds.outer_width {
                if !bounds.is_shell(x, y, z) {
                    continue;
                }

                let position = bounds.cell_position(x, y, z);
                let handle = sink.place(ObjectKind::Wall, position);

                if is_floor_cell(bounds, compat, x, y, z) {
                    shell.floor.push(shell.walls.len());
                }
                shell.walls.push(Placement {
                    handle,
                    kind: ObjectKind::Wall,
                    position,
                });
            }
        }
    }

    log::info!(
        "Room shell built: {} wall cells ({} floor) over a {}x{}x{} lattice",
        shell.walls.len(),
        shell.floor.len(),
        bounds.outer_length,
        bounds.outer_height,
        bounds.outer_width
    );

    shell
}

/// Floor test for a bottom-layer cell.
///
/// With `lattice_floor_classification` the integer lattice coordinate is
/// compared against the inner bounds, which are in world units. That only
/// matches the interior when the cell size is 1 on x and z.
pub fn is_floor_cell(bounds: &RoomBounds, compat: &Compat, x: u32, y: u32, z: u32) -> bool {
    if y != 0 {
        return false;
    }
    let (fx, fz) = if compat.lattice_floor_classification {
        (x as f32, z as f32)
    } else {
        let p = bounds.cell_position(x, y, z);
        (p.x, p.z)
    };
    let inner = &bounds.inner;
    fx >= inner.min.x && fx <= inner.max.x && fz >= inner.min.z && fz <= inner.max.z
}
