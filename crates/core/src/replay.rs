//! Replaying PGN games as simulated observation streams
//!
//! Parses PGN movetext and emits one occupancy snapshot per ply, exactly
//! what the vision pipeline would report for a cleanly observed game. The
//! demo driver and the reconstruction tests feed these streams back through
//! a [`GameSession`](crate::session::GameSession).

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Position};
use std::fs;
use std::io::Cursor;
use std::ops::ControlFlow;
use std::path::Path;

use crate::error::{Error, Result};
use crate::grid::OccupancyGrid;

/// A parsed game together with its per-ply occupancy snapshots.
#[derive(Debug, Clone)]
pub struct ReplayedGame {
    pub event: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    /// SAN of every mainline move, in order.
    pub sans: Vec<String>,
    /// Snapshot of the board after each mainline move; aligned with `sans`.
    pub grids: Vec<OccupancyGrid>,
    pub final_position: Chess,
}

impl ReplayedGame {
    pub fn ply_count(&self) -> usize {
        self.sans.len()
    }

    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }
}

#[derive(Default)]
struct GameTags {
    event: Option<String>,
    white: Option<String>,
    black: Option<String>,
    result: Option<String>,
}

struct GameStream {
    tags: GameTags,
    sans: Vec<String>,
    grids: Vec<OccupancyGrid>,
    position: Chess,
    success: bool,
}

struct StreamBuilder;

impl Visitor for StreamBuilder {
    type Tags = GameTags;
    type Movetext = GameStream;
    type Output = Option<ReplayedGame>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let name_str = String::from_utf8_lossy(name);
        let value_str = value.decode_utf8_lossy().to_string();

        match name_str.as_ref() {
            "Event" => tags.event = Some(value_str),
            "White" => tags.white = Some(value_str),
            "Black" => tags.black = Some(value_str),
            "Result" => tags.result = Some(value_str),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(GameStream {
            tags,
            sans: Vec::new(),
            grids: Vec::new(),
            position: Chess::default(),
            success: true,
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        if !movetext.success {
            return ControlFlow::Continue(());
        }

        match san.san.to_move(&movetext.position) {
            Ok(m) => match movetext.position.clone().play(m) {
                Ok(next) => {
                    movetext.sans.push(san.to_string());
                    movetext.grids.push(OccupancyGrid::from_position(&next));
                    movetext.position = next;
                }
                Err(_) => {
                    movetext.success = false;
                }
            },
            Err(_) => {
                movetext.success = false;
            }
        }

        ControlFlow::Continue(())
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        if movetext.success {
            Some(ReplayedGame {
                event: movetext.tags.event,
                white: movetext.tags.white,
                black: movetext.tags.black,
                result: movetext.tags.result,
                sans: movetext.sans,
                grids: movetext.grids,
                final_position: movetext.position,
            })
        } else {
            None
        }
    }
}

pub fn replay_pgn_file<P: AsRef<Path>>(path: P) -> Result<Vec<ReplayedGame>> {
    let contents = fs::read_to_string(path)?;
    replay_pgn_string(&contents)
}

pub fn replay_pgn_string(pgn: &str) -> Result<Vec<ReplayedGame>> {
    let mut visitor = StreamBuilder;
    let mut games: Vec<ReplayedGame> = Vec::new();

    let cursor = Cursor::new(pgn.as_bytes());
    let mut reader = pgn_reader::Reader::new(cursor);

    loop {
        match reader.read_game(&mut visitor) {
            Ok(Some(maybe_game)) => {
                if let Some(game) = maybe_game {
                    games.push(game);
                }
            }
            Ok(None) => break,
            Err(e) => return Err(Error::Pgn(e.to_string())),
        }
    }

    if games.is_empty() {
        Err(Error::NoGamesFound)
    } else {
        Ok(games)
    }
}
