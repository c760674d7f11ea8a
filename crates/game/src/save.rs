//! Save files: a JSON document, zstd-compressed, behind a checksummed header.
//!
//! Only what cannot be regenerated is stored: the seed, the player, the
//! inventory and the edit overlay. Chunks regenerate lazily from the seed
//! after loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use voxelcraft_physics::Player;
use voxelcraft_world::{Inventory, LayeredGenerator, ModificationOverlay};

use crate::state::{GameSettings, GameState};

/// "VXSV".
const SAVE_MAGIC: u32 = 0x5658_5356;

/// Current save format version.
const SAVE_VERSION: u16 = 1;

const HEADER_LEN: usize = 14;

/// zstd level: favour speed, saves are small.
const COMPRESSION_LEVEL: i32 = 3;

/// Everything persisted for one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub name: String,
    pub seed: u64,
    pub player: Player,
    pub inventory: Inventory,
    pub overlay: ModificationOverlay,
}

/// Ways a save file can fail to decode.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save data too short: {0} bytes")]
    Truncated(usize),
    #[error("invalid save magic 0x{0:08X}")]
    BadMagic(u32),
    #[error("unsupported save version {0}")]
    UnsupportedVersion(u16),
    #[error("payload length mismatch: header says {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("CRC32 mismatch: expected {expected:08X}, got {actual:08X}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("compression failed")]
    Compression(#[source] std::io::Error),
    #[error("malformed save document")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
struct SaveHeader {
    magic: u32,
    version: u16,
    crc32: u32,
    payload_len: u32,
}

impl SaveHeader {
    fn new(crc32: u32, payload_len: u32) -> Self {
        Self {
            magic: SAVE_MAGIC,
            version: SAVE_VERSION,
            crc32,
            payload_len,
        }
    }

    fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..10].copy_from_slice(&self.crc32.to_le_bytes());
        bytes[10..14].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, SaveError> {
        if bytes.len() < HEADER_LEN {
            return Err(SaveError::Truncated(bytes.len()));
        }
        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != SAVE_MAGIC {
            return Err(SaveError::BadMagic(magic));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(version));
        }
        let crc32 = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let payload_len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);
        Ok(Self {
            magic,
            version,
            crc32,
            payload_len,
        })
    }
}

fn checksum(bytes: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

impl SaveGame {
    /// Serialize, compress and frame.
    pub fn encode(&self) -> Result<Vec<u8>, SaveError> {
        let json = serde_json::to_vec(self)?;
        let compressed =
            zstd::encode_all(&json[..], COMPRESSION_LEVEL).map_err(SaveError::Compression)?;
        let header = SaveHeader::new(checksum(&compressed), compressed.len() as u32);

        let mut bytes = Vec::with_capacity(HEADER_LEN + compressed.len());
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&compressed);
        Ok(bytes)
    }

    /// Validate the header and checksum, then decompress and parse.
    pub fn decode(bytes: &[u8]) -> Result<Self, SaveError> {
        let header = SaveHeader::from_bytes(bytes)?;
        let payload = &bytes[HEADER_LEN..];
        let expected = header.payload_len as usize;
        if payload.len() != expected {
            return Err(SaveError::LengthMismatch {
                expected,
                actual: payload.len(),
            });
        }
        let actual = checksum(payload);
        if actual != header.crc32 {
            return Err(SaveError::ChecksumMismatch {
                expected: header.crc32,
                actual,
            });
        }
        let json = zstd::decode_all(payload).map_err(SaveError::Compression)?;
        Ok(serde_json::from_slice(&json)?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create save directory {}", parent.display()))?;
        }
        let bytes = self.encode().context("Failed to encode save")?;
        fs::write(path, &bytes)
            .with_context(|| format!("Failed to write save {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), edits = self.overlay.len(), "game saved");
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read save {}", path.display()))?;
        let save = Self::decode(&bytes)
            .with_context(|| format!("Failed to decode save {}", path.display()))?;
        info!(path = %path.display(), name = %save.name, edits = save.overlay.len(), "game loaded");
        Ok(save)
    }
}

impl GameState {
    /// Capture the persistent parts of this game.
    pub fn to_save(&self, name: impl Into<String>) -> SaveGame {
        SaveGame {
            name: name.into(),
            seed: self.settings().seed,
            player: *self.player(),
            inventory: self.inventory().clone(),
            overlay: self.world().overlay().clone(),
        }
    }

    /// Rebuild a game from a save. The save's seed replaces the one in
    /// `settings`; chunks are regenerated on demand.
    pub fn from_save(save: SaveGame, settings: GameSettings) -> Self {
        let settings = GameSettings {
            seed: save.seed,
            ..settings
        };
        let generator = LayeredGenerator::with_surface(settings.seed, settings.surface_y);
        let mut state = Self::from_parts(settings, Box::new(generator), save.player, save.inventory);
        state.world_mut().restore_overlay(save.overlay);
        state
    }
}
