//! Short-lived visual feedback driven by engine events.

use crate::core::Observer;
use crate::types::Coord;

/// How long removed cells stay highlighted.
pub const FLASH_MS: u32 = 240;
/// How long a status banner ("SHUFFLED", "LEVEL 3!") stays up.
pub const BANNER_MS: u32 = 1200;

/// Remembers what the last cascade pass removed so the view can highlight it.
///
/// Feed it events through [`Observer`], advance it with [`BurstFlash::tick`]
/// once per frame and read [`BurstFlash::cells`] / [`BurstFlash::banner`]
/// when rendering.
#[derive(Debug, Default, Clone)]
pub struct BurstFlash {
    cells: Vec<Coord>,
    flash_ms: u32,
    banner: Option<String>,
    banner_ms: u32,
}

impl BurstFlash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, elapsed_ms: u32) {
        self.flash_ms = self.flash_ms.saturating_sub(elapsed_ms);
        if self.flash_ms == 0 {
            self.cells.clear();
        }
        self.banner_ms = self.banner_ms.saturating_sub(elapsed_ms);
        if self.banner_ms == 0 {
            self.banner = None;
        }
    }

    /// Cells currently highlighted.
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    fn show_banner(&mut self, text: impl Into<String>) {
        self.banner = Some(text.into());
        self.banner_ms = BANNER_MS;
    }
}

impl Observer for BurstFlash {
    fn on_cells_removed(&mut self, cells: &[Coord], _cluster_sizes: &[usize]) {
        self.cells.clear();
        self.cells.extend_from_slice(cells);
        self.flash_ms = FLASH_MS;
    }

    fn on_level_changed(&mut self, level: u32) {
        // Level 1 only ever comes from a reset.
        if level > 1 {
            self.show_banner(format!("LEVEL {level}!"));
        }
    }

    fn on_no_moves(&mut self) {
        self.show_banner("NO MOVES");
    }

    fn on_board_shuffled(&mut self, refilled: bool) {
        self.show_banner(if refilled { "NEW BOARD" } else { "SHUFFLED" });
    }

    fn on_reset(&mut self, _episode_id: u32) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameEvent;

    #[test]
    fn test_flash_expires() {
        let mut flash = BurstFlash::new();
        GameEvent::CellsRemoved {
            cells: vec![Coord::new(0, 0), Coord::new(0, 1)],
            cluster_sizes: vec![2],
            combo: 0,
            points: 20,
        }
        .dispatch(&mut flash);
        assert_eq!(flash.cells().len(), 2);

        flash.tick(FLASH_MS - 1);
        assert_eq!(flash.cells().len(), 2);
        flash.tick(1);
        assert!(flash.cells().is_empty());
        assert_eq!(flash.banner(), None);
    }

    #[test]
    fn test_shuffle_banner_and_reset() {
        let mut flash = BurstFlash::new();
        GameEvent::BoardShuffled {
            attempts: 3,
            refilled: false,
        }
        .dispatch(&mut flash);
        assert_eq!(flash.banner(), Some("SHUFFLED"));

        GameEvent::Reset { episode_id: 1 }.dispatch(&mut flash);
        GameEvent::LevelChanged { level: 1 }.dispatch(&mut flash);
        assert_eq!(flash.banner(), None);
        assert!(flash.cells().is_empty());
    }

    #[test]
    fn test_level_up_banner() {
        let mut flash = BurstFlash::new();
        GameEvent::LevelChanged { level: 3 }.dispatch(&mut flash);
        assert_eq!(flash.banner(), Some("LEVEL 3!"));

        flash.tick(BANNER_MS);
        assert_eq!(flash.banner(), None);
    }
}
