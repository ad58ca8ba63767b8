//! Hand histories as JSON Lines: one [`HandRecord`] per line, LF terminated.

use std::fs::{self, create_dir_all, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::GameView;
use crate::rules::{PlayerAction, Round};

/// A single accepted action, tagged with the street it was played on.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: String,
    pub round: Round,
    pub action: PlayerAction,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Format: YYYYMMDD-NNNNNN
    pub hand_id: String,
    /// Seed of the shuffle, `None` for stacked decks
    pub seed: Option<u64>,
    /// Small blind, big blind
    pub blinds: [i64; 2],
    /// Names in acting order, dealer last
    pub players: Vec<String>,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    /// Winner name once the hand is finished
    pub result: Option<String>,
    /// RFC3339, injected on write when missing
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

/// Present only for hands decided by comparing cards.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    pub winners: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

fn sequence_of(hand_id: &str, yyyymmdd: &str) -> Option<u32> {
    hand_id
        .strip_prefix(yyyymmdd)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

/// Reads back every record of a hand history file.
pub fn read_records<P: AsRef<Path>>(path: P) -> io::Result<Vec<HandRecord>> {
    fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        })
        .collect()
}

/// Appends hand records to a history file and hands out hand ids for one date.
pub struct HandLogger {
    sink: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    /// Opens `path` for appending, creating it and its parent directories as
    /// needed. Ids continue after the highest one already logged for `date`.
    pub fn open<P: AsRef<Path>>(path: P, date: &str) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }
        let seq = match read_records(path) {
            Ok(records) => records
                .iter()
                .filter_map(|r| sequence_of(&r.hand_id, date))
                .max()
                .unwrap_or(0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Some(BufWriter::new(file)),
            date: date.to_string(),
            seq,
        })
    }

    /// [`open`](Self::open) with today's UTC date.
    pub fn open_today<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::open(path, &Utc::now().format("%Y%m%d").to_string())
    }

    /// Logger that only hands out ids, for a fixed date.
    pub fn detached(date: &str) -> Self {
        Self {
            sink: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(io::Error::other)?;
        if let Some(w) = &mut self.sink {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }

    /// Records `hand` under the next id and returns that id.
    pub fn log_hand(&mut self, hand: &GameView<'_>) -> io::Result<String> {
        let id = self.next_id();
        self.write(&hand.hand_record(id.as_str()))?;
        Ok(id)
    }
}
