use pcgfont::{palette, CharacterStore, CHAR_HEIGHT, CHAR_WIDTH};

const CHARS_PER_ROW: usize = 16;

/// One terminal cell showing two stacked pixels.
struct Cell {
    upper: [u8; 3],
    lower: [u8; 3],
}

pub struct ConsoleRenderer {
    lines: Vec<Vec<Cell>>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Appends `codes` side by side; each character takes four text lines.
    pub fn push_row(&mut self, store: &CharacterStore, codes: &[u8]) {
        for y in (0..CHAR_HEIGHT).step_by(2) {
            let mut line = Vec::with_capacity(codes.len() * CHAR_WIDTH);
            for code in codes {
                for x in 0..CHAR_WIDTH {
                    line.push(Cell {
                        upper: palette::rgb(store.get_pixel(*code, x, y)),
                        lower: palette::rgb(store.get_pixel(*code, x, y + 1)),
                    });
                }
            }
            self.lines.push(line);
        }
    }

    pub fn into_ansi_string(self) -> String {
        let mut out = String::new();
        for (li, line) in self.lines.iter().enumerate() {
            if li > 0 {
                out.push('\n');
            }
            for cell in line {
                let [fr, fg, fb] = cell.upper;
                let [br, bg, bb] = cell.lower;
                out.push_str(&format!(
                    "\x1B[38;2;{fr};{fg};{fb}m\x1B[48;2;{br};{bg};{bb}m\u{2580}"
                ));
            }
            out.push_str("\x1B[0m");
        }
        out
    }
}

/// Convenience: render characters into an ANSI truecolor String, 16 per row.
pub fn render_to_ansi(store: &CharacterStore, codes: &[u8]) -> String {
    let mut renderer = ConsoleRenderer::new();
    for row in codes.chunks(CHARS_PER_ROW) {
        renderer.push_row(store, row);
    }
    renderer.into_ansi_string()
}
