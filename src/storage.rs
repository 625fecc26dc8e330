use crate::calendar::Month;
use crate::config::RosterOptions;
use crate::engine::GeneratedRoster;
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RosterStatus {
    Draft,
    Published,
}

/// Métadonnées d'un planning publié.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPeriod {
    pub id: Uuid,
    pub year: i32,
    pub month: u32,
    pub total_lines: usize,
    pub status: RosterStatus,
    pub created_at: DateTime<Utc>,
}

impl RosterPeriod {
    pub fn published(month: Month, total_lines: usize, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            year: month.year(),
            month: month.month(),
            total_lines,
            status: RosterStatus::Published,
            created_at: now,
        }
    }
}

/// Planning publié avec les options qui l'ont produit ; `check` les réutilise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedRoster {
    pub period: RosterPeriod,
    pub roster: GeneratedRoster,
    #[serde(default)]
    pub options: RosterOptions,
}

pub trait Storage {
    /// Charge le planning publié d'un mois.
    fn load(&self, month: Month) -> anyhow::Result<PublishedRoster>;
    /// Sauvegarde de manière atomique ; échoue si le mois existe déjà sauf `overwrite`.
    fn save(&self, published: &PublishedRoster, overwrite: bool) -> anyhow::Result<PathBuf>;
    fn exists(&self, month: Month) -> bool;
    /// Retire le planning d'un mois ; sans effet s'il n'existe pas.
    fn remove(&self, month: Month) -> anyhow::Result<()>;
    /// Périodes publiées, les plus récentes d'abord.
    fn list(&self) -> anyhow::Result<Vec<RosterPeriod>>;
}

/// Un fichier `YYYY-MM.json` par mois publié.
pub struct JsonRosterStore {
    dir: PathBuf,
}

impl JsonRosterStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn path_for(&self, month: Month) -> PathBuf {
        self.dir.join(format!("{month}.json"))
    }
}

impl Storage for JsonRosterStore {
    fn load(&self, month: Month) -> anyhow::Result<PublishedRoster> {
        let path = self.path_for(month);
        let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
        let published: PublishedRoster = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(published)
    }

    fn save(&self, published: &PublishedRoster, overwrite: bool) -> anyhow::Result<PathBuf> {
        let month = published.roster.month;
        if !overwrite && self.exists(month) {
            bail!("roster already exists: a roster for {month} is already published");
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating store directory {}", self.dir.display()))?;
        let path = self.path_for(month);
        let json = serde_json::to_vec_pretty(published)?;
        write_atomic(&path, &json)?;
        Ok(path)
    }

    fn exists(&self, month: Month) -> bool {
        self.path_for(month).exists()
    }

    fn remove(&self, month: Month) -> anyhow::Result<()> {
        let path = self.path_for(month);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
        }
    }

    fn list(&self) -> anyhow::Result<Vec<RosterPeriod>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut periods = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            match serde_json::from_slice::<PublishedRoster>(&data) {
                Ok(p) => periods.push(p.period),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unreadable roster file");
                }
            }
        }
        periods.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then(b.month.cmp(&a.month))
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(periods)
    }
}

/// Fichier temporaire écrit et synchronisé, pas encore renommé vers sa cible.
pub struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Écrit `bytes` à côté de `target`. La cible n'est pas touchée.
    pub fn stage(target: &Path, bytes: &[u8]) -> anyhow::Result<Self> {
        if target.is_dir() {
            bail!("cannot write {}: a directory is in the way", target.display());
        }
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        Ok(Self {
            tmp,
            target: target.to_path_buf(),
        })
    }

    /// Renommage atomique vers la cible.
    pub fn commit(self) -> anyhow::Result<PathBuf> {
        self.tmp
            .persist(&self.target)
            .with_context(|| format!("atomic rename to {}", self.target.display()))?;
        Ok(self.target)
    }
}

/// Écriture atomique d'un fichier (temporaire + rename).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    StagedFile::stage(path, bytes)?.commit()?;
    Ok(())
}

/// Écrit tous les fichiers avant d'en renommer un seul : si une écriture
/// échoue, aucune cible n'est modifiée et les temporaires sont supprimés.
pub fn write_all_atomic(files: &[(PathBuf, Vec<u8>)]) -> anyhow::Result<()> {
    let staged = files
        .iter()
        .map(|(path, bytes)| StagedFile::stage(path, bytes))
        .collect::<anyhow::Result<Vec<_>>>()?;
    for file in staged {
        file.commit()?;
    }
    Ok(())
}
