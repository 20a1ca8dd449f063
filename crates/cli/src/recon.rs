//! `enrollcheck check` and `enrollcheck export`: reconcile applicants and
//! export the ones needing an account.

use std::path::{Path, PathBuf};

use clap::Args;

use enrollcheck_io::{export_targets, load_input, SourcePaths};
use enrollcheck_recon::{reconcile, ReconConfig, ReconError, ReconciliationResult};

use crate::exit_codes::{
    EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_IO, EXIT_MISSING_INPUT, EXIT_NOTHING_TO_EXPORT,
};
use crate::report::render_table;
use crate::CliError;

/// Input files shared by `check` and `export`.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Account export CSV (existing IDs and role slot emails)
    #[arg(long, value_name = "CSV")]
    pub accounts: Option<PathBuf>,

    /// Unregistered applicants CSV (email and provisional ID)
    #[arg(long, value_name = "CSV")]
    pub unregistered: Option<PathBuf>,

    /// Application form workbook (form on the first sheet, plus an Upload sheet)
    #[arg(long, value_name = "XLSX")]
    pub form: Option<PathBuf>,

    /// Column layout config (TOML). Defaults to <config dir>/enrollcheck/recon.toml if present
    #[arg(long, env = "ENROLLCHECK_CONFIG")]
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    fn paths(&self) -> SourcePaths {
        SourcePaths {
            account_export: self.accounts.clone(),
            unregistered: self.unregistered.clone(),
            application_form: self.form.clone(),
        }
    }
}

pub fn recon_err(err: ReconError) -> CliError {
    let code = match &err {
        ReconError::MissingInput(_) => EXIT_MISSING_INPUT,
        ReconError::MissingColumn { .. } | ReconError::Io(_) => EXIT_IO,
        ReconError::NothingToExport => EXIT_NOTHING_TO_EXPORT,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::IdOverflow(_) => EXIT_ERROR,
    };
    let hint = match &err {
        ReconError::MissingInput(_) => Some("both --accounts and --form are required".to_string()),
        ReconError::NothingToExport => {
            Some("every applicant already holds a listed role; check the report".to_string())
        }
        _ => None,
    };
    CliError { code, message: err.to_string(), hint }
}

// ============================================================================
// config
// ============================================================================

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("enrollcheck").join("recon.toml"))
}

/// Explicit path, else the per-user config file if it exists, else defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ReconConfig, CliError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(p) => p,
            None => {
                log::debug!("no config file; using built-in column layout");
                return Ok(ReconConfig::default());
            }
        },
    };

    let text = std::fs::read_to_string(&path).map_err(|e| CliError {
        code: EXIT_IO,
        message: format!("cannot read config {}: {e}", path.display()),
        hint: None,
    })?;
    log::info!("using config {}", path.display());
    ReconConfig::from_toml(&text).map_err(|e| {
        recon_err(e).with_hint(format!("while loading {}", path.display()))
    })
}

pub fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    resolve_config(Some(&config))?;
    eprintln!("{}: ok", config.display());
    Ok(())
}

pub fn cmd_default_config() -> Result<(), CliError> {
    let text = ReconConfig::default().to_toml().map_err(recon_err)?;
    print!("{text}");
    Ok(())
}

// ============================================================================
// check / export
// ============================================================================

fn run_reconciliation(sources: &SourceArgs) -> Result<(ReconConfig, ReconciliationResult), CliError> {
    let config = resolve_config(sources.config.as_deref())?;
    let input = load_input(&sources.paths(), &config).map_err(recon_err)?;
    let result = reconcile(&config, &input).map_err(recon_err)?;
    print_summary(&result);
    Ok((config, result))
}

fn print_summary(result: &ReconciliationResult) {
    let s = &result.summary;
    eprintln!(
        "{} rows: {} existing, {} new, {} unregistered, {} targets ({} emails)",
        s.total_rows, s.existing_ids, s.new_ids, s.unregistered_matches, s.target_rows, s.target_emails,
    );
    if let (Some(first), Some(last)) = (s.first_new_id, s.last_new_id) {
        eprintln!("new IDs {first}..={last}");
    }
}

pub fn cmd_check(sources: SourceArgs, json: bool, output: Option<PathBuf>) -> Result<(), CliError> {
    let (_, result) = run_reconciliation(&sources)?;

    if json || output.is_some() {
        let json_str = result.to_json_pretty().map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;

        if let Some(ref path) = output {
            std::fs::write(path, &json_str).map_err(|e| CliError {
                code: EXIT_IO,
                message: format!("cannot write output {}: {e}", path.display()),
                hint: None,
            })?;
            eprintln!("wrote {}", path.display());
        }
        if json {
            println!("{json_str}");
            return Ok(());
        }
    }

    print!("{}", render_table(&result));
    Ok(())
}

pub fn cmd_export(sources: SourceArgs, out: PathBuf) -> Result<(), CliError> {
    let (config, result) = run_reconciliation(&sources)?;
    let form = sources
        .form
        .as_deref()
        .ok_or_else(|| recon_err(ReconError::MissingInput("application form")))?;

    let written = export_targets(form, &result, &config, &out).map_err(recon_err)?;
    eprintln!("wrote {} rows to {}", written, out.display());
    Ok(())
}
