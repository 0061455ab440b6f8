use anyhow::Error;
use phonemark_config::ConfigError;
use phonemark_core::{CoreError, ErrorKind};
use phonemark_sheet::SheetError;
use phonemark_store::StoreError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NO_PHONES: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status_for(err))
}

fn exit_status_for(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(CliError::InvalidInput(_)) = cause.downcast_ref::<CliError>() {
            return EXIT_INVALID_INPUT;
        }
        if let Some(core_err) = cause.downcast_ref::<CoreError>() {
            return kind_exit_code(core_err.kind());
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return kind_exit_code(store_err.kind());
        }
        if let Some(sheet_err) = cause.downcast_ref::<SheetError>() {
            return sheet_exit_code(sheet_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
    }
    EXIT_FAILURE
}

fn kind_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Config => EXIT_INVALID_INPUT,
        ErrorKind::NoPhoneNumbersFound => EXIT_NO_PHONES,
        ErrorKind::Query => EXIT_FAILURE,
    }
}

fn sheet_exit_code(err: &SheetError) -> u8 {
    match err {
        SheetError::Core(core_err) => kind_exit_code(core_err.kind()),
        SheetError::MissingFile(_)
        | SheetError::Open { .. }
        | SheetError::NoWorksheet(_)
        | SheetError::MissingHeaderRow { .. } => EXIT_INVALID_INPUT,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir | ConfigError::Write { .. } | ConfigError::Serialize(_) => {
            EXIT_FAILURE
        }
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::AlreadyExists(_)
        | ConfigError::InvalidPort(_)
        | ConfigError::EmptyDatabase
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
