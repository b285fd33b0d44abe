use serde::{Deserialize, Serialize};

/// Number of trailing columns that count as the zone's exit pit.
pub const LAST_PIT_COLUMNS: usize = 10;

/// Classification of one grid tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Wall,
    /// One-way: blocks only from above.
    Platform,
    BreakableWall,
    Spike,
    Ring,
    ExtraLife,
    Boost,
}

impl CellKind {
    /// Layout glyph mapping. Unknown glyphs are empty.
    pub fn from_glyph(c: char) -> Self {
        match c {
            'w' => CellKind::Wall,
            'p' => CellKind::Platform,
            'b' => CellKind::BreakableWall,
            'o' => CellKind::Spike,
            'r' => CellKind::Ring,
            'l' => CellKind::ExtraLife,
            'z' => CellKind::Boost,
            _ => CellKind::Empty,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Wall => 'w',
            CellKind::Platform => 'p',
            CellKind::BreakableWall => 'b',
            CellKind::Spike => 'o',
            CellKind::Ring => 'r',
            CellKind::ExtraLife => 'l',
            CellKind::Boost => 'z',
        }
    }

    /// Blocks movement from every side.
    pub fn is_solid(self) -> bool {
        matches!(self, CellKind::Wall | CellKind::BreakableWall)
    }

    /// Something a character can land on.
    pub fn is_standable(self) -> bool {
        self.is_solid() || self == CellKind::Platform
    }
}

/// Fixed-size tile grid, row-major. Dimensions never change after creation and
/// the only mutation is downgrading a cell to `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cell_size: f32,
    cells: Vec<CellKind>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
            cells: vec![CellKind::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.cell_size
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.cell_size
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    /// Cell by grid coordinate. Out of range reads as `Empty`.
    pub fn get(&self, col: i32, row: i32) -> CellKind {
        self.index(col, row)
            .map_or(CellKind::Empty, |i| self.cells[i])
    }

    /// World coordinate to grid coordinate. NaN maps to the origin cell.
    pub fn world_to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        let to_idx = |v: f32| {
            let c = (v / self.cell_size).floor();
            if c.is_nan() { 0 } else { c as i32 }
        };
        (to_idx(x), to_idx(y))
    }

    /// Top-left of a cell in world space.
    pub fn cell_origin(&self, col: i32, row: i32) -> (f32, f32) {
        (col as f32 * self.cell_size, row as f32 * self.cell_size)
    }

    /// Cell under a world coordinate.
    pub fn cell_at(&self, x: f32, y: f32) -> CellKind {
        let (col, row) = self.world_to_cell(x, y);
        self.get(col, row)
    }

    /// Grid mutation. Only downgrades to `Empty` are accepted; anything else is
    /// refused and returns `false`, as are out-of-range coordinates.
    pub fn set_cell(&mut self, col: i32, row: i32, kind: CellKind) -> bool {
        if kind != CellKind::Empty {
            return false;
        }
        match self.index(col, row) {
            Some(i) => {
                self.cells[i] = CellKind::Empty;
                true
            },
            None => false,
        }
    }

    /// Clear the cell under a world coordinate.
    pub fn clear_at(&mut self, x: f32, y: f32) -> bool {
        let (col, row) = self.world_to_cell(x, y);
        self.set_cell(col, row, CellKind::Empty)
    }

    /// Construction-time placement, used by layout parsing and generation only.
    pub(crate) fn place(&mut self, col: usize, row: usize, kind: CellKind) {
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] = kind;
        }
    }

    /// Whether a world point lies in an empty cell of the trailing exit columns.
    pub fn is_in_last_pit(&self, x: f32, y: f32) -> bool {
        let (col, row) = self.world_to_cell(x, y);
        if self.index(col, row).is_none() {
            return false;
        }
        col as usize >= self.width.saturating_sub(LAST_PIT_COLUMNS)
            && self.get(col, row) == CellKind::Empty
    }

    /// Standable cell with `clearance` empty-ish cells above it, searched
    /// top-down within one column. Returns the row of the standable cell.
    pub fn landing_row(&self, col: i32, clearance: usize) -> Option<i32> {
        (clearance as i32..self.height as i32).find(|&row| {
            self.get(col, row).is_standable()
                && (1..=clearance as i32).all(|up| !self.get(col, row - up).is_standable())
                && (1..=clearance as i32).all(|up| self.get(col, row - up) != CellKind::Spike)
        })
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    /// Render back to the layout text format.
    pub fn to_layout_string(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width.max(1)) {
            out.extend(row.iter().map(|c| c.glyph()));
            out.push('\n');
        }
        out
    }
}

/// Entity created alongside a layout cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpawn {
    pub kind: CellKind,
    pub col: usize,
    pub row: usize,
}

/// What the parser had to discard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Rows longer than the grid width.
    pub truncated_rows: usize,
    /// Rows beyond the grid height.
    pub ignored_rows: usize,
}

impl LayoutReport {
    pub fn is_clean(&self) -> bool {
        self.truncated_rows == 0 && self.ignored_rows == 0
    }
}

/// A populated grid plus the obstacle and collectible spawns it implies.
#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: TileGrid,
    pub spawns: Vec<LayoutSpawn>,
    pub report: LayoutReport,
}

impl Layout {
    /// Whether the layout contains anything to stand on.
    pub fn has_ground(&self) -> bool {
        (0..self.grid.height()).any(|row| {
            (0..self.grid.width()).any(|col| self.grid.get(col as i32, row as i32).is_standable())
        })
    }
}

/// Parse the row-oriented character-grid format. Never fails: long rows are
/// truncated, extra rows ignored, short rows padded with empty cells.
pub fn parse_layout(text: &str, width: usize, height: usize, cell_size: f32) -> Layout {
    let mut grid = TileGrid::new(width, height, cell_size);
    let mut spawns = Vec::new();
    let mut report = LayoutReport::default();

    for (row, line) in text.lines().enumerate() {
        if row >= height {
            report.ignored_rows += 1;
            continue;
        }
        let line = line.trim_end_matches('\r');
        if line.chars().count() > width {
            report.truncated_rows += 1;
        }
        for (col, glyph) in line.chars().take(width).enumerate() {
            let kind = CellKind::from_glyph(glyph);
            grid.place(col, row, kind);
            if matches!(
                kind,
                CellKind::BreakableWall
                    | CellKind::Spike
                    | CellKind::Ring
                    | CellKind::ExtraLife
                    | CellKind::Boost
            ) {
                spawns.push(LayoutSpawn { kind, col, row });
            }
        }
    }

    Layout {
        grid,
        spawns,
        report,
    }
}

/// Failure reading a layout file.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    Io { path: String, message: String },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read layout {path}: {message}"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Read and parse a layout file.
pub fn load_layout(
    path: &str,
    width: usize,
    height: usize,
    cell_size: f32,
) -> Result<Layout, LayoutError> {
    let text = std::fs::read_to_string(path).map_err(|e| LayoutError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    let layout = parse_layout(&text, width, height, cell_size);
    if !layout.report.is_clean() {
        tracing::warn!(
            path,
            truncated_rows = layout.report.truncated_rows,
            ignored_rows = layout.report.ignored_rows,
            "Layout did not fit the level grid"
        );
    }
    Ok(layout)
}
