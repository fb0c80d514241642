use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("Pack file not found: {path}")]
    #[diagnostic(
        code(packs::not_found),
        help("Pass the path to a signpacks.json or signpacks.toml file with --packs")
    )]
    PackFileNotFound { path: Utf8PathBuf },

    #[error("Failed to read pack file: {path}")]
    #[diagnostic(
        code(packs::parse_error),
        help("Check the pack file for syntax errors; both JSON and TOML are accepted")
    )]
    PackFileInvalid {
        path: Utf8PathBuf,
        #[source]
        source: signpack_model::PackFileError,
    },

    #[error("World snapshot not found: {path}")]
    #[diagnostic(
        code(world::not_found),
        help("Pass the path to a world snapshot JSON file with --world")
    )]
    WorldNotFound { path: Utf8PathBuf },

    #[error("Failed to read world snapshot: {path}")]
    #[diagnostic(
        code(world::parse_error),
        help("The world snapshot must be JSON with an \"items\" list and a \"loadedAssets\" list")
    )]
    WorldInvalid {
        path: Utf8PathBuf,
        #[source]
        source: signpack_engine::Error,
    },

    #[error("Failed to write world snapshot: {path}")]
    #[diagnostic(code(world::write_error))]
    WorldWriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: signpack_engine::Error,
    },

    #[error("Failed to write settings: {path}")]
    #[diagnostic(code(settings::write_error))]
    SettingsWriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: signpack_engine::Error,
    },
}
