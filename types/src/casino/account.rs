use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};

use super::{BASE_LEVEL_XP, LEVEL_XP_STEP, LEVEL_UP_REWARD};

/// Xp needed to advance past `level`.
pub fn required_xp(level: u32) -> u64 {
    BASE_LEVEL_XP + u64::from(level.saturating_sub(1)) * LEVEL_XP_STEP
}

/// Progression and balance of a single user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub xp: u64,
    pub level: u32,
    pub coins: u64,
    /// Unix seconds of the last successful work claim
    pub last_work: Option<u64>,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            coins: 0,
            last_work: None,
        }
    }
}

/// Result of adding xp to an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Gained { xp: u64 },
    LeveledUp { level: u32, reward: u64 },
}

impl Account {
    /// Add xp and apply at most one level-up.
    ///
    /// The remainder above the threshold carries over, even when it would
    /// already satisfy the next level.
    pub fn gain_xp(&mut self, gain: u64) -> Progress {
        self.xp = self.xp.saturating_add(gain);
        let required = required_xp(self.level);
        if self.xp < required {
            return Progress::Gained { xp: self.xp };
        }
        self.xp -= required;
        self.level += 1;
        self.coins = self.coins.saturating_add(LEVEL_UP_REWARD);
        Progress::LeveledUp {
            level: self.level,
            reward: LEVEL_UP_REWARD,
        }
    }

    /// Xp still missing before the next level-up.
    pub fn xp_to_next_level(&self) -> u64 {
        required_xp(self.level).saturating_sub(self.xp)
    }
}

impl Write for Account {
    fn write(&self, writer: &mut impl BufMut) {
        self.xp.write(writer);
        self.level.write(writer);
        self.coins.write(writer);
        self.last_work.write(writer);
    }
}

impl Read for Account {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let xp = u64::read(reader)?;
        let level = u32::read(reader)?;
        if level == 0 {
            return Err(Error::Invalid("Account", "level must be at least 1"));
        }
        Ok(Self {
            xp,
            level,
            coins: u64::read(reader)?,
            last_work: Option::<u64>::read(reader)?,
        })
    }
}

impl EncodeSize for Account {
    fn encode_size(&self) -> usize {
        self.xp.encode_size()
            + self.level.encode_size()
            + self.coins.encode_size()
            + self.last_work.encode_size()
    }
}
