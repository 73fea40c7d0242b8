//! The running notation record of a reconstructed game

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use std::fmt::Write as _;

/// Tag-pair metadata written at the top of the PGN output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeaders {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,
}

impl Default for RecordHeaders {
    fn default() -> Self {
        Self {
            event: "Computer Vision Chess Analysis".to_string(),
            site: "Local Analysis".to_string(),
            date: "????.??.??".to_string(),
            round: "1".to_string(),
            white: "Player 1".to_string(),
            black: "Player 2".to_string(),
            result: "*".to_string(),
        }
    }
}

/// One confirmed ply as it appears in the movetext.
#[derive(Debug, Clone)]
pub struct RecordedPly {
    pub number: u32,
    pub side: Color,
    pub san: String,
}

/// Append-only notation record rooted at the game start.
///
/// Headers are construction-time metadata; the ply list only ever grows. A
/// custom starting position is carried as SetUp/FEN tags.
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    headers: RecordHeaders,
    setup_fen: Option<String>,
    plies: Vec<RecordedPly>,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_setup_fen(fen: &str) -> Self {
        Self {
            setup_fen: Some(fen.to_string()),
            ..Self::default()
        }
    }

    pub fn headers(&self) -> &RecordHeaders {
        &self.headers
    }

    pub fn set_headers(&mut self, headers: RecordHeaders) {
        self.headers = headers;
    }

    pub fn push(&mut self, number: u32, side: Color, san: String) {
        self.plies.push(RecordedPly { number, side, san });
    }

    pub fn plies(&self) -> &[RecordedPly] {
        &self.plies
    }

    pub fn len(&self) -> usize {
        self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    /// Formats a single ply the way callers receive it: light moves carry
    /// their move number, dark replies are bare SAN.
    pub fn fragment(number: u32, side: Color, san: &str) -> String {
        match side {
            Color::White => format!("{}. {}", number, san),
            Color::Black => san.to_string(),
        }
    }

    pub fn movetext(&self) -> String {
        let mut out = String::new();

        for (index, ply) in self.plies.iter().enumerate() {
            if !out.is_empty() {
                out.push(' ');
            }
            match ply.side {
                Color::White => {
                    let _ = write!(out, "{}. {}", ply.number, ply.san);
                }
                // A record can open with a dark ply when the game was picked
                // up mid-position.
                Color::Black if index == 0 => {
                    let _ = write!(out, "{}... {}", ply.number, ply.san);
                }
                Color::Black => out.push_str(&ply.san),
            }
        }

        if out.is_empty() {
            self.headers.result.clone()
        } else {
            format!("{} {}", out, self.headers.result)
        }
    }

    /// Renders the full PGN text: tag pairs, blank line, movetext.
    pub fn pgn(&self) -> String {
        let h = &self.headers;
        let mut out = String::new();
        let _ = writeln!(out, "[Event \"{}\"]", h.event);
        let _ = writeln!(out, "[Site \"{}\"]", h.site);
        let _ = writeln!(out, "[Date \"{}\"]", h.date);
        let _ = writeln!(out, "[Round \"{}\"]", h.round);
        let _ = writeln!(out, "[White \"{}\"]", h.white);
        let _ = writeln!(out, "[Black \"{}\"]", h.black);
        let _ = writeln!(out, "[Result \"{}\"]", h.result);
        if let Some(fen) = &self.setup_fen {
            let _ = writeln!(out, "[SetUp \"1\"]");
            let _ = writeln!(out, "[FEN \"{}\"]", fen);
        }
        let _ = writeln!(out);
        out.push_str(&self.movetext());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_formatting() {
        assert_eq!(GameRecord::fragment(1, Color::White, "e4"), "1. e4");
        assert_eq!(GameRecord::fragment(1, Color::Black, "e5"), "e5");
        assert_eq!(GameRecord::fragment(12, Color::White, "Qxf7#"), "12. Qxf7#");
    }

    #[test]
    fn test_movetext_numbering() {
        let mut record = GameRecord::new();
        record.push(1, Color::White, "e4".to_string());
        record.push(1, Color::Black, "e5".to_string());
        record.push(2, Color::White, "Nf3".to_string());

        assert_eq!(record.movetext(), "1. e4 e5 2. Nf3 *");
    }

    #[test]
    fn test_movetext_opening_with_dark_ply() {
        let mut record = GameRecord::new();
        record.push(3, Color::Black, "Nc6".to_string());
        record.push(4, Color::White, "Bb5".to_string());

        assert_eq!(record.movetext(), "3... Nc6 4. Bb5 *");
    }

    #[test]
    fn test_empty_record_renders_result_only() {
        let record = GameRecord::new();
        assert_eq!(record.movetext(), "*");
    }

    #[test]
    fn test_pgn_carries_headers() {
        let mut record = GameRecord::new();
        record.push(1, Color::White, "d4".to_string());

        let pgn = record.pgn();
        assert!(pgn.contains("[Event \"Computer Vision Chess Analysis\"]"));
        assert!(pgn.contains("[Result \"*\"]"));
        assert!(!pgn.contains("[SetUp"));
        assert!(pgn.ends_with("1. d4 *"));
    }

    #[test]
    fn test_pgn_carries_setup_fen() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        let record = GameRecord::from_setup_fen(fen);

        let pgn = record.pgn();
        assert!(pgn.contains("[SetUp \"1\"]"));
        assert!(pgn.contains(&format!("[FEN \"{}\"]", fen)));
    }
}
