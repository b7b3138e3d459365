use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// A rectangular buffer of styled characters the map view paints into
/// before handing ratatui a widget-sized block of lines.
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<(char, Style)>,
}

impl CellGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![(' ', Style::default()); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = (ch, style);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<(char, Style)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    pub fn text(&mut self, x: i32, y: i32, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            self.set(x + i as i32, y, ch, style);
        }
    }

    pub fn text_centered(&mut self, cx: i32, y: i32, text: &str, style: Style) {
        self.text(cx - text.chars().count() as i32 / 2, y, text, style);
    }

    /// Straight segment between two cells, stepped along the longer axis.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, ch: char, style: Style) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).max(1);
        for i in 0..=steps {
            let x = x0 + dx * i / steps;
            let y = y0 + dy * i / steps;
            self.set(x, y, ch, style);
        }
    }

    pub fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, style: Style) {
        for x in x0..=x1 {
            self.set(x, y0, '─', style);
            self.set(x, y1, '─', style);
        }
        for y in y0..=y1 {
            self.set(x0, y, '│', style);
            self.set(x1, y, '│', style);
        }
        self.set(x0, y0, '┌', style);
        self.set(x1, y0, '┐', style);
        self.set(x0, y1, '└', style);
        self.set(x1, y1, '┘', style);
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        // A zero-wide grid has no cells to chunk into rows; it still
        // renders as `height` empty lines so callers keep their layout.
        if self.width == 0 {
            return vec![Line::default(); self.height];
        }
        let mut lines = Vec::with_capacity(self.height);
        for row in self.cells.chunks(self.width) {
            let mut spans: Vec<Span> = Vec::new();
            let mut run = String::new();
            let mut run_style = Style::default();
            for &(ch, style) in row {
                if style != run_style && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), run_style));
                }
                run_style = style;
                run.push(ch);
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, run_style));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}
