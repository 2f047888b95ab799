//! Mesh export sinks (spec §6 names OBJ/PLY/STL/OFF/SVG as covered formats; these are
//! out of core scope per spec §1 but kept as a minimal ambient interface, framed as
//! "sinks taking a `MeshData`").
//!
//! Only [`write_obj`] is implemented; the rest exist so callers can match on format
//! without the crate silently dropping support, and report [`SylvesError::NotImplemented`].

use std::io::{self, Write};

use crate::error::{SylvesError, SylvesResult};
use crate::mesh::MeshData;

/// A destination format for a [`MeshData`].
pub trait MeshSink {
    fn write(&self, mesh: &MeshData, out: &mut dyn Write) -> SylvesResult<()>;
}

/// Writes `mesh` as a Wavefront OBJ, one `v` line per vertex, one `f` line per face
/// (OBJ face indices are 1-based).
pub fn write_obj(mesh: &MeshData, out: &mut dyn Write) -> SylvesResult<()> {
    for v in mesh.vertices() {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z).map_err(io_err)?;
    }
    for (_, _, face) in mesh.faces() {
        write!(out, "f").map_err(io_err)?;
        for index in face {
            write!(out, " {}", index + 1).map_err(io_err)?;
        }
        writeln!(out).map_err(io_err)?;
    }
    Ok(())
}

/// An [`MeshSink`] wrapping [`write_obj`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjSink;

impl MeshSink for ObjSink {
    fn write(&self, mesh: &MeshData, out: &mut dyn Write) -> SylvesResult<()> {
        write_obj(mesh, out)
    }
}

fn io_err(_: io::Error) -> SylvesError {
    SylvesError::Io
}

/// Stanford PLY. Not yet implemented.
pub fn write_ply(_mesh: &MeshData, _out: &mut dyn Write) -> SylvesResult<()> {
    Err(SylvesError::NotImplemented)
}

/// Binary/ASCII STL. Not yet implemented; would additionally require triangulating
/// non-triangle faces first, since STL has no native n-gon support.
pub fn write_stl(_mesh: &MeshData, _out: &mut dyn Write) -> SylvesResult<()> {
    Err(SylvesError::NotImplemented)
}

/// Object File Format. Not yet implemented.
pub fn write_off(_mesh: &MeshData, _out: &mut dyn Write) -> SylvesResult<()> {
    Err(SylvesError::NotImplemented)
}

/// SVG, for 2D grids. Not yet implemented.
pub fn write_svg(_mesh: &MeshData, _out: &mut dyn Write) -> SylvesResult<()> {
    Err(SylvesError::NotImplemented)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::V3;

    #[test]
    fn writes_a_single_triangle() {
        let mut mesh = MeshData::new(vec![
            V3::new(0.0, 0.0, 0.0),
            V3::new(1.0, 0.0, 0.0),
            V3::new(0.0, 1.0, 0.0),
        ]);
        mesh.add_submesh(&[0, 1, 2], crate::mesh::MeshTopology::Triangles).unwrap();

        let mut buf = Vec::new();
        write_obj(&mesh, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("v 0 0 0"));
        assert!(text.contains("f 1 2 3"));
    }

    #[test]
    fn unimplemented_sinks_report_not_implemented() {
        let mesh = MeshData::new(vec![]);
        let mut buf = Vec::new();
        assert_eq!(write_ply(&mesh, &mut buf), Err(SylvesError::NotImplemented));
        assert_eq!(write_stl(&mesh, &mut buf), Err(SylvesError::NotImplemented));
        assert_eq!(write_off(&mesh, &mut buf), Err(SylvesError::NotImplemented));
        assert_eq!(write_svg(&mesh, &mut buf), Err(SylvesError::NotImplemented));
    }
}
