//! The `VWCF`/`DRCF` movie config chunk: stage size, cast member range, and
//! the protection checksum.

use anyhow::{Context as _, Result as AResult};
use std::io::Cursor;

use crate::byte_stream::{ByteStream, ByteWriter};
use crate::container::human_version;

#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    pub len: i16,
    pub file_version: i16,
    pub movie_top: i16,
    pub movie_left: i16,
    pub movie_bottom: i16,
    pub movie_right: i16,
    pub min_member: i16,
    pub max_member: i16,
    pub field9: i8,
    pub field10: i8,
    pub field11: i16,
    pub comment_font: i16,
    pub comment_size: i16,
    pub comment_style: i16,
    pub stage_color: i16,
    pub bit_depth: i16,
    pub field17: i8,
    pub field18: i8,
    pub field19: i32,
    pub director_version: u16,
    pub field21: i16,
    pub field22: i32,
    pub field23: i32,
    pub field24: i32,
    pub field25: u8,
    pub field26: u8,
    pub frame_rate: i16,
    pub platform: i16,
    pub protection: i16,
    pub field29: i32,
    pub checksum: u32,
    /// Set to `false` when the stored checksum doesn't match the computed
    /// one; such a config is read-only (a write would produce a file
    /// Director considers corrupt, since the checksum can't be recomputed
    /// from data that no longer round-trips).
    pub writable: bool,
}

impl Config {
    pub fn read(stream: &mut ByteStream<Cursor<Vec<u8>>>) -> AResult<Self> {
        let len = stream.read_i16().context("can’t read config length")?;
        let file_version = stream.read_i16().context("can’t read file version")?;
        let movie_top = stream.read_i16().context("can’t read movie rect top")?;
        let movie_left = stream.read_i16().context("can’t read movie rect left")?;
        let movie_bottom = stream.read_i16().context("can’t read movie rect bottom")?;
        let movie_right = stream.read_i16().context("can’t read movie rect right")?;
        let min_member = stream.read_i16().context("can’t read min member")?;
        let max_member = stream.read_i16().context("can’t read max member")?;
        let field9 = stream.read_i8().context("can’t read field9")?;
        let field10 = stream.read_i8().context("can’t read field10")?;
        let field11 = stream.read_i16().context("can’t read field11")?;
        let comment_font = stream.read_i16().context("can’t read comment font")?;
        let comment_size = stream.read_i16().context("can’t read comment size")?;
        let comment_style = stream.read_i16().context("can’t read comment style")?;
        let stage_color = stream.read_i16().context("can’t read stage color")?;
        let bit_depth = stream.read_i16().context("can’t read bit depth")?;
        let field17 = stream.read_i8().context("can’t read field17")?;
        let field18 = stream.read_i8().context("can’t read field18")?;
        let field19 = stream.read_i32().context("can’t read field19")?;
        let director_version = stream.read_u16().context("can’t read director version")?;
        let field21 = stream.read_i16().context("can’t read field21")?;
        let field22 = stream.read_i32().context("can’t read field22")?;
        let field23 = stream.read_i32().context("can’t read field23")?;
        let field24 = stream.read_i32().context("can’t read field24")?;
        let field25 = stream.read_u8().context("can’t read field25")?;
        let field26 = stream.read_u8().context("can’t read field26")?;
        let frame_rate = stream.read_i16().context("can’t read frame rate")?;
        let platform = stream.read_i16().context("can’t read platform")?;
        let protection = stream.read_i16().context("can’t read protection")?;
        let field29 = stream.read_i32().context("can’t read field29")?;
        let checksum = stream.read_u32().context("can’t read checksum")?;

        let mut config = Self {
            len, file_version, movie_top, movie_left, movie_bottom, movie_right,
            min_member, max_member, field9, field10, field11, comment_font,
            comment_size, comment_style, stage_color, bit_depth, field17, field18,
            field19, director_version, field21, field22, field23, field24, field25,
            field26, frame_rate, platform, protection, field29, checksum, writable: true,
        };

        if config.compute_checksum() != checksum {
            log::warn!("movie config checksum mismatch (stored {:08x}, computed {:08x}); marking config read-only", checksum, config.compute_checksum());
            config.writable = false;
        }

        Ok(config)
    }

    #[must_use]
    pub fn size(&self) -> i16 {
        self.len
    }

    pub fn write(&mut self, writer: &mut ByteWriter) -> AResult<()> {
        self.checksum = self.compute_checksum();
        writer.write_i16(self.len)?;
        writer.write_i16(self.file_version)?;
        writer.write_i16(self.movie_top)?;
        writer.write_i16(self.movie_left)?;
        writer.write_i16(self.movie_bottom)?;
        writer.write_i16(self.movie_right)?;
        writer.write_i16(self.min_member)?;
        writer.write_i16(self.max_member)?;
        writer.write_u8(self.field9 as u8)?;
        writer.write_u8(self.field10 as u8)?;
        writer.write_i16(self.field11)?;
        writer.write_i16(self.comment_font)?;
        writer.write_i16(self.comment_size)?;
        writer.write_i16(self.comment_style)?;
        writer.write_i16(self.stage_color)?;
        writer.write_i16(self.bit_depth)?;
        writer.write_u8(self.field17 as u8)?;
        writer.write_u8(self.field18 as u8)?;
        writer.write_i32(self.field19)?;
        writer.write_u16(self.director_version)?;
        writer.write_i16(self.field21)?;
        writer.write_i32(self.field22)?;
        writer.write_i32(self.field23)?;
        writer.write_i32(self.field24)?;
        writer.write_u8(self.field25)?;
        writer.write_u8(self.field26)?;
        writer.write_i16(self.frame_rate)?;
        writer.write_i16(self.platform)?;
        writer.write_i16(self.protection)?;
        writer.write_i32(self.field29)?;
        writer.write_u32(self.checksum)?;
        Ok(())
    }

    /// The 29-step deterministic recurrence used as a light-touch
    /// "protection" integrity check. The accumulator and every operand are
    /// unsigned 32-bit (matching the reference's `uint32_t check`); a
    /// signed field's `value + N` is computed in `i32` first, exactly as
    /// the reference computes it in a promoted `int`, then reinterpreted
    /// as `u32` the same way an implicit conversion to `uint32_t` would.
    /// All arithmetic wraps; the two division steps are unsigned division,
    /// not signed truncating division. Two operand derivations (steps 14
    /// and 15) depend on the human-readable Director version.
    #[must_use]
    pub fn compute_checksum(&self) -> u32 {
        let ver = human_version(self.director_version);

        let mut check: u32 = (i32::from(self.len) + 1) as u32;                                   // 1
        check = check.wrapping_mul((i32::from(self.file_version) + 2) as u32);                    // 2
        check = check.wrapping_div((i32::from(self.movie_top) + 3) as u32);                       // 3
        check = check.wrapping_mul((i32::from(self.movie_left) + 4) as u32);                      // 4
        check = check.wrapping_div((i32::from(self.movie_bottom) + 5) as u32);                    // 5
        check = check.wrapping_mul((i32::from(self.movie_right) + 6) as u32);                     // 6
        check = check.wrapping_sub((i32::from(self.min_member) + 7) as u32);                      // 7
        check = check.wrapping_mul((i32::from(self.max_member) + 8) as u32);                      // 8
        check = check.wrapping_sub((i32::from(self.field9) + 9) as u32);                          // 9
        check = check.wrapping_sub((i32::from(self.field10) + 10) as u32);                        // 10
        check = check.wrapping_add((i32::from(self.field11) + 11) as u32);                        // 11
        check = check.wrapping_mul((i32::from(self.comment_font) + 12) as u32);                   // 12
        check = check.wrapping_add((i32::from(self.comment_size) + 13) as u32);                   // 13

        let operand14 = if ver < 800 {
            i32::from(((self.comment_style as u16) >> 8) as u8)
        } else {
            i32::from(self.comment_style)
        };
        check = check.wrapping_mul((operand14 + 14) as u32);                                      // 14

        let operand15 = if ver < 700 {
            i32::from(self.stage_color)
        } else {
            i32::from((self.stage_color as u16) as u8)
        };
        check = check.wrapping_add((operand15 + 15) as u32);                                      // 15

        check = check.wrapping_add((i32::from(self.bit_depth) + 16) as u32);                      // 16
        check = check.wrapping_add((i32::from(self.field17) + 17) as u32);                        // 17
        check = check.wrapping_mul((i32::from(self.field18) + 18) as u32);                        // 18
        check = check.wrapping_add((self.field19.wrapping_add(19)) as u32);                       // 19
        check = check.wrapping_mul((i32::from(self.director_version) + 20) as u32);                // 20
        check = check.wrapping_add((i32::from(self.field21) + 21) as u32);                        // 21
        check = check.wrapping_add((self.field22.wrapping_add(22)) as u32);                       // 22
        check = check.wrapping_add((self.field23.wrapping_add(23)) as u32);                       // 23
        check = check.wrapping_add((self.field24.wrapping_add(24)) as u32);                       // 24
        check = check.wrapping_mul((i32::from(self.field25) + 25) as u32);                        // 25
        check = check.wrapping_add((i32::from(self.frame_rate) + 26) as u32);                     // 26
        check = check.wrapping_mul((i32::from(self.platform) + 27) as u32);                       // 27

        let operand28 = (i32::from(self.protection).wrapping_mul(0xE06) as u32).wrapping_add(0xFF45_0000);
        check = check.wrapping_mul(operand28);                                                    // 28
        check ^= 0x7261_6C66;                                                                      // 29

        check
    }

    /// Clears container-level protection: subsequent writes use the
    /// movie's own version stamp, and a `protection` value that is an
    /// exact multiple of 23 is perturbed by the minimal amount so that the
    /// on-disk obfuscation marker no longer reads as "protected".
    pub fn unprotect(&mut self) {
        self.file_version = self.director_version as i16;
        if self.protection % 23 == 0 {
            self.protection = self.protection.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            len: 72,
            file_version: 0x45B,
            movie_top: 0,
            movie_left: 0,
            movie_bottom: 480,
            movie_right: 640,
            min_member: 1,
            max_member: 1,
            director_version: 0x45B,
            frame_rate: 30,
            platform: 1,
            ..Config::default()
        }
    }

    #[test]
    fn checksum_is_deterministic() {
        let config = sample();
        assert_eq!(config.compute_checksum(), config.compute_checksum());
    }

    #[test]
    fn checksum_changes_when_a_field_changes() {
        let mut a = sample();
        let mut b = sample();
        b.frame_rate = 15;
        assert_ne!(a.compute_checksum(), b.compute_checksum());
        a.frame_rate = 15;
        assert_eq!(a.compute_checksum(), b.compute_checksum());
    }

    #[test]
    fn unprotect_perturbs_multiples_of_23() {
        let mut config = sample();
        config.protection = 23;
        config.unprotect();
        assert_eq!(config.protection, 24);
        assert_eq!(config.file_version, config.director_version as i16);
    }

    #[test]
    fn unprotect_leaves_non_multiples_alone() {
        let mut config = sample();
        config.protection = 10;
        config.unprotect();
        assert_eq!(config.protection, 10);
    }
}
