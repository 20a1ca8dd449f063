//! Loading the three reconciliation sources and writing the upload export.

use std::path::{Path, PathBuf};

use enrollcheck_recon::config::ReconConfig;
use enrollcheck_recon::{filter_upload, ReconError, ReconInput, ReconciliationResult, Table};

use crate::csv::{import_table, write_table_with_bom};
use crate::xlsx::{read_sheet, SheetRef};

/// Source files for one run. Any of them may be absent; the engine reports
/// the ones it requires.
#[derive(Debug, Clone, Default)]
pub struct SourcePaths {
    pub account_export: Option<PathBuf>,
    pub unregistered: Option<PathBuf>,
    pub application_form: Option<PathBuf>,
}

pub fn load_input(paths: &SourcePaths, config: &ReconConfig) -> Result<ReconInput, ReconError> {
    let account_export = paths
        .account_export
        .as_deref()
        .map(import_table)
        .transpose()
        .map_err(ReconError::Io)?;
    let unregistered = paths
        .unregistered
        .as_deref()
        .map(import_table)
        .transpose()
        .map_err(ReconError::Io)?;
    let application_form = paths
        .application_form
        .as_deref()
        .map(|p| load_application_form(p, config))
        .transpose()?;

    Ok(ReconInput {
        account_export,
        unregistered,
        application_form,
    })
}

/// Matching view of the application workbook: configured sheet, header row
/// right below the preamble.
pub fn load_application_form(path: &Path, config: &ReconConfig) -> Result<Table, ReconError> {
    let layout = &config.application_form;
    read_sheet(path, &SheetRef::Index(layout.sheet_index), layout.header_row()).map_err(ReconError::Io)
}

/// Re-read the Upload sheet of the application workbook, keep the target
/// rows, stamp their assigned IDs and write them to `destination`.
///
/// Returns the number of data rows written. Nothing is written on failure.
pub fn export_targets(
    form_path: &Path,
    result: &ReconciliationResult,
    config: &ReconConfig,
    destination: &Path,
) -> Result<usize, ReconError> {
    if result.target_emails.is_empty() {
        return Err(ReconError::NothingToExport);
    }

    let upload = read_sheet(form_path, &SheetRef::Name(config.upload.sheet.clone()), 0)
        .map_err(ReconError::Io)?;
    let filtered = filter_upload(&upload, result, &config.upload)?;

    write_table_with_bom(&filtered, destination).map_err(ReconError::Io)?;
    log::info!("wrote {} rows to {}", filtered.len(), destination.display());
    Ok(filtered.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrollcheck_recon::reconcile;
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// Account export: a@x.com holds individual ID 20, c@x.com holds bulk ID 7.
    fn write_accounts(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("accounts.csv");
        let mut header: Vec<String> = (0..43).map(|i| format!("col{i}")).collect();
        header[0] = "user_id".into();
        let mut a = vec![String::new(); 43];
        a[0] = "20".into();
        a[16] = "a@x.com".into();
        let mut c = vec![String::new(); 43];
        c[0] = "7".into();
        c[42] = "c@x.com".into();
        let body = [header, a, c].map(|r| r.join(",")).join("\n");
        fs::write(&path, body).unwrap();
        path
    }

    /// Workbook with a 7-row preamble form sheet and an Upload sheet.
    fn write_form(dir: &TempDir, emails: &[&str], upload_emails: &[&str]) -> PathBuf {
        let path = dir.path().join("form.xlsx");
        let mut workbook = Workbook::new();

        let form = workbook.add_worksheet();
        form.write_string(0, 0, "アカウント登録申請書").unwrap();
        for (col, h) in ["No", "区分", "施設名", "姓", "名", "", "", "メールアドレス", "利用権限", "備考"]
            .iter()
            .enumerate()
        {
            form.write_string(7, col as u16, *h).unwrap();
        }
        for (i, email) in emails.iter().enumerate() {
            let row = 8 + i as u32;
            form.write_number(row, 0, (i + 1) as f64).unwrap();
            form.write_string(row, 2, "北病院").unwrap();
            form.write_string(row, 7, *email).unwrap();
        }

        let upload = workbook.add_worksheet();
        upload.set_name("Upload").unwrap();
        for (col, h) in ["user_id", "last_name", "email", "role"].iter().enumerate() {
            upload.write_string(0, col as u16, *h).unwrap();
        }
        for (i, email) in upload_emails.iter().enumerate() {
            let row = 1 + i as u32;
            upload.write_string(row, 1, format!("name{i}")).unwrap();
            upload.write_string(row, 2, *email).unwrap();
            upload.write_string(row, 3, "staff").unwrap();
        }

        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn load_then_export_round() {
        let dir = tempdir().unwrap();
        let config = ReconConfig::default();
        let paths = SourcePaths {
            account_export: Some(write_accounts(&dir)),
            unregistered: None,
            application_form: Some(write_form(
                &dir,
                &["a@x.com", "b@x.com", "c@x.com"],
                &["b@x.com", "a@x.com", "c@x.com", "z@x.com"],
            )),
        };

        let input = load_input(&paths, &config).unwrap();
        let result = reconcile(&config, &input).unwrap();
        assert_eq!(result.assigned_ids["a@x.com"], "20");
        assert_eq!(result.assigned_ids["b@x.com"], "21");
        // c@x.com holds only a bulk role, so it is not a target either.
        assert_eq!(
            result.target_emails.iter().collect::<Vec<_>>(),
            vec!["b@x.com"]
        );

        let out = dir.path().join("filtered.csv");
        let form = paths.application_form.as_ref().unwrap();
        let written = export_targets(form, &result, &config, &out).unwrap();
        assert_eq!(written, 1);

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text, "\u{feff}user_id,last_name,email,role\n21,name0,b@x.com,staff\n");
    }

    #[test]
    fn export_without_targets_writes_nothing() {
        let dir = tempdir().unwrap();
        let config = ReconConfig::default();
        let paths = SourcePaths {
            account_export: Some(write_accounts(&dir)),
            unregistered: None,
            application_form: Some(write_form(&dir, &["a@x.com"], &["a@x.com"])),
        };
        let result = reconcile(&config, &load_input(&paths, &config).unwrap()).unwrap();

        let out = dir.path().join("filtered.csv");
        let err = export_targets(paths.application_form.as_ref().unwrap(), &result, &config, &out)
            .unwrap_err();
        assert!(matches!(err, ReconError::NothingToExport));
        assert!(!out.exists());
    }

    #[test]
    fn missing_upload_sheet_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut config = ReconConfig::default();
        config.upload.sheet = "Export".into();
        let paths = SourcePaths {
            account_export: Some(write_accounts(&dir)),
            unregistered: None,
            application_form: Some(write_form(&dir, &["new@x.com"], &["new@x.com"])),
        };
        let result = reconcile(&config, &load_input(&paths, &config).unwrap()).unwrap();

        let out = dir.path().join("filtered.csv");
        let err = export_targets(paths.application_form.as_ref().unwrap(), &result, &config, &out)
            .unwrap_err();
        assert!(err.to_string().contains("sheet 'Export'"));
        assert!(!out.exists());
    }

    #[test]
    fn absent_sources_stay_none() {
        let input = load_input(&SourcePaths::default(), &ReconConfig::default()).unwrap();
        assert!(input.account_export.is_none());
        assert!(input.unregistered.is_none());
        assert!(input.application_form.is_none());
    }
}
