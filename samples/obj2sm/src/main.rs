use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use smconv::de::sm::DecodeError;

mod cli;
use cli::{Cli, Command};

/// Errors reported by the command-line tool.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("couldn't read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("couldn't write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("couldn't convert {path:?}: {source}")]
    Convert {
        path: PathBuf,
        source: smconv::Error,
    },
    #[error("couldn't decode {path:?}: {source}")]
    Decode { path: PathBuf, source: DecodeError },
}

/// Sibling path the output is written to before being renamed into place.
fn temp_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_converted(text: &str, input: &Path, tmp: &Path) -> Result<usize, AppError> {
    let write_err = |source| AppError::Write {
        path: tmp.to_owned(),
        source,
    };
    let mut writer = BufWriter::new(File::create(tmp).map_err(write_err)?);
    let written = smconv::convert(text, &mut writer).map_err(|source| AppError::Convert {
        path: input.to_owned(),
        source,
    })?;
    writer.flush().map_err(write_err)?;
    Ok(written)
}

#[tracing::instrument(skip_all, fields(input = ?input, output = ?output))]
fn convert(input: &Path, output: &Path) -> Result<(), AppError> {
    let text = fs::read_to_string(input).map_err(|source| AppError::Read {
        path: input.to_owned(),
        source,
    })?;

    let tmp = temp_path(output);
    let written = match write_converted(&text, input, &tmp) {
        Ok(written) => written,
        Err(e) => {
            if let Err(rm) = fs::remove_file(&tmp) {
                tracing::warn!(path = ?tmp, error = %rm, "couldn't remove temporary file");
            }
            return Err(e);
        }
    };
    fs::rename(&tmp, output).map_err(|source| AppError::Write {
        path: output.to_owned(),
        source,
    })?;

    tracing::info!(bytes = written, "wrote SM file");
    Ok(())
}

fn dump(file: &Path) -> Result<(), AppError> {
    let bytes = fs::read(file).map_err(|source| AppError::Read {
        path: file.to_owned(),
        source,
    })?;
    let model = smconv::de::sm::decode(&bytes).map_err(|source| AppError::Decode {
        path: file.to_owned(),
        source,
    })?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    model
        .dump(&mut out)
        .and_then(|_| out.flush())
        .map_err(|source| AppError::Write {
            path: PathBuf::from("<stdout>"),
            source,
        })
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::initialize_tracing(&cli.effective_log_filter(), cli.log_format);

    let res = match &cli.command {
        Command::Convert { input, output } => convert(input, output),
        Command::Dump { file } => dump(file),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
