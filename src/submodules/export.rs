use std::{fs::File, io::{BufWriter, Write}, path::{Path, PathBuf}};

use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::debug;

pub struct CurveExport;

impl CurveExport {
    /// Writes `item` as `<dir>/<stem>.json`.
    pub fn write<T: Serialize + ?Sized>(item: &T, dir: &Path, stem: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("Unable to create export directory: {}", dir.display()))?;
        let path = dir.join(format!("{}.json", stem));
        let file = File::create(&path)
            .wrap_err_with(|| format!("Unable to create export file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, item)
            .wrap_err_with(|| format!("Unable to serialize {}", stem))?;
        writer.flush()
            .wrap_err_with(|| format!("Unable to write export file: {}", path.display()))?;
        debug!("exported {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::submodules::{curve::Curve, response_functions::MagneticSusceptibility};

    #[test]
    fn exported_curve_is_readable_json() {
        let dir = std::env::temp_dir().join(format!("holo-sc-curves-export-{}", std::process::id()));
        let curve = Curve::evaluate(&MagneticSusceptibility { e_sq: 1.0 }, &array![0.001, 0.5]);
        let path = CurveExport::write(&curve, &dir, &curve.name).unwrap();
        assert!(path.ends_with("magnetic_susceptibility.json"));

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["name"], "magnetic_susceptibility");
        assert_eq!(json["e_sq"], 1.0);
        assert!(json["values"].is_object() || json["values"].is_array());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_directory_names_the_path() {
        let blocker = std::env::temp_dir().join(format!("holo-sc-curves-blocker-{}", std::process::id()));
        std::fs::write(&blocker, "not a directory").unwrap();

        let curve = Curve::evaluate(&MagneticSusceptibility { e_sq: 1.0 }, &array![0.5]);
        let err = CurveExport::write(&curve, &blocker.join("nested"), &curve.name).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Unable to create export directory"), "{message}");
        assert!(message.contains("holo-sc-curves-blocker"), "{message}");
        assert!(err.downcast_ref::<std::io::Error>().is_some());
        let _ = std::fs::remove_file(&blocker);
    }
}
