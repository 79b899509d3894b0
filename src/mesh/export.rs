//! Wavefront OBJ export for inspecting generated chunks in a 3D viewer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::HexMesh;

/// Write one mesh as a named OBJ object.
///
/// Indices are 1-based and offset by `index_base` so several meshes can be
/// appended to the same file; returns the next free base.
pub fn write_obj<W: Write>(
    mesh: &HexMesh,
    name: &str,
    index_base: usize,
    writer: &mut W,
) -> io::Result<usize> {
    writeln!(writer, "o {}", name)?;
    for v in mesh.vertices() {
        writeln!(writer, "v {:.5} {:.5} {:.5}", v.x, v.y, v.z)?;
    }
    let has_uvs = mesh.uvs().len() == mesh.vertex_count() && !mesh.uvs().is_empty();
    if has_uvs {
        for uv in mesh.uvs() {
            writeln!(writer, "vt {:.5} {:.5}", uv.x, uv.y)?;
        }
    }
    let has_normals = mesh.normals().len() == mesh.vertex_count() && !mesh.normals().is_empty();
    if has_normals {
        for n in mesh.normals() {
            writeln!(writer, "vn {:.5} {:.5} {:.5}", n.x, n.y, n.z)?;
        }
    }

    for tri in mesh.triangles().chunks_exact(3) {
        write!(writer, "f")?;
        for &i in tri {
            let i = i as usize + index_base;
            match (has_uvs, has_normals) {
                (true, true) => write!(writer, " {}/{}/{}", i, i, i)?,
                (true, false) => write!(writer, " {}/{}", i, i)?,
                (false, true) => write!(writer, " {}//{}", i, i)?,
                (false, false) => write!(writer, " {}", i)?,
            }
        }
        writeln!(writer)?;
    }

    Ok(index_base + mesh.vertex_count())
}

/// Write a set of named meshes into a single OBJ file.
pub fn export_obj<'m, P, I>(path: P, meshes: I) -> io::Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (&'m str, &'m HexMesh)>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut base = 1;
    for (name, mesh) in meshes {
        if mesh.is_empty() {
            continue;
        }
        base = write_obj(mesh, name, base, &mut writer)?;
    }
    writer.flush()
}
