use camino::Utf8PathBuf;
use signpack_engine::world::SnapshotWorld;
use signpack_model::{Pack, PackFile};

use crate::errors::CliError;

mod apply;
mod catalog;
mod status;

pub use apply::{apply_packs, ApplyPacksArgs};
pub use catalog::{show_catalog, ShowCatalogArgs};
pub use status::{show_status, ShowStatusArgs};

pub(crate) fn load_packs(path: &str) -> miette::Result<Vec<Pack>> {
    let path = Utf8PathBuf::from(path);
    if !path.as_std_path().exists() {
        return Err(CliError::PackFileNotFound { path }.into());
    }

    let file = PackFile::load(&path).map_err(|source| CliError::PackFileInvalid {
        path: path.clone(),
        source,
    })?;

    Ok(file.packs)
}

pub(crate) fn load_world(path: &str) -> miette::Result<SnapshotWorld> {
    let path = Utf8PathBuf::from(path);
    if !path.as_std_path().exists() {
        return Err(CliError::WorldNotFound { path }.into());
    }

    SnapshotWorld::load(&path)
        .map_err(|source| CliError::WorldInvalid { path, source }.into())
}
