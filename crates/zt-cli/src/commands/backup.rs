//! `zt export` and `zt import`: the whole ledger as one JSON document.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use zt_core::{DATE_FORMAT, Settings, YearData};
use zt_db::Database;

/// Backup document: settings plus every stored day keyed by `yyyy-mm-dd`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub days: BTreeMap<String, String>,
}

/// Runs the export command.
pub fn export<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let data = db.load_all().context("failed to load days")?;
    let backup = Backup {
        settings: db.load_settings().context("failed to load settings")?,
        days: data
            .iter()
            .map(|(date, text)| (date.format(DATE_FORMAT).to_string(), text.to_string()))
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *writer, &backup).context("failed to serialize backup")?;
    writeln!(writer)?;
    Ok(())
}

/// Runs the import command. Returns the number of days written.
///
/// Days in the backup overwrite stored days; keys that are not valid dates
/// are skipped. The whole backup is written in one transaction.
pub fn import<R: Read>(reader: R, db: &mut Database) -> Result<usize> {
    let backup: Backup = serde_json::from_reader(reader).context("invalid backup JSON")?;
    backup
        .settings
        .validate()
        .context("backup contains invalid settings")?;

    let data = YearData::from_raw(&backup.days);
    let written = db
        .import_backup(&data, &backup.settings)
        .context("failed to import backup, nothing was changed")?;
    tracing::info!(days = written, "imported backup");
    Ok(written)
}
