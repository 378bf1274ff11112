// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-height tables drawn one row at a time.
//
// A `Table` only holds the column layout; rows are streamed through
// `fit_row`, which reports when the page is full so the caller can start a
// new page and repeat the header.

use super::canvas::{Canvas, Colour, Pen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub pen: Pen,
    pub align: Align,
    pub background: Option<Colour>,
    /// Number of columns covered.
    pub span: usize,
}

impl Cell {
    pub fn new(text: impl Into<String>, pen: Pen) -> Self {
        Self {
            text: text.into(),
            pen,
            align: Align::Left,
            background: None,
            span: 1,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn fill(mut self, colour: Colour) -> Self {
        self.background = Some(colour);
        self
    }

    pub fn span(mut self, columns: usize) -> Self {
        self.span = columns.max(1);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub height: f32,
}

impl Row {
    pub fn new(cells: Vec<Cell>, height: f32) -> Self {
        Self { cells, height }
    }
}

/// Where the next row goes and how far down it may go.
#[derive(Debug, Clone, Copy)]
pub struct TableCursor {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitResult {
    Placed,
    /// Nothing was drawn; the row does not fit above `bottom`.
    BoxFull,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<f32>,
    pub padding: f32,
    pub grid: Option<(Colour, f32)>,
}

impl Table {
    pub fn new(columns: Vec<f32>) -> Self {
        Self {
            columns,
            padding: 4.0,
            grid: None,
        }
    }

    pub fn with_grid(mut self, colour: Colour, thickness: f32) -> Self {
        self.grid = Some((colour, thickness));
        self
    }

    pub fn width(&self) -> f32 {
        self.columns.iter().sum()
    }

    pub fn fit_row(
        &self,
        canvas: &mut Canvas,
        cursor: &mut TableCursor,
        x: f32,
        row: &Row,
    ) -> FitResult {
        if cursor.top - row.height < cursor.bottom {
            return FitResult::BoxFull;
        }
        self.draw_row(canvas, x, cursor.top, row);
        cursor.top -= row.height;
        FitResult::Placed
    }

    /// Draw `header` then `body`, returning the y below the last row.
    ///
    /// A table that does not fit above `bottom` but fits on a fresh page is
    /// moved there whole. A table taller than a page is split row by row,
    /// with the header repeated on every continuation page.
    pub fn draw_flowing(
        &self,
        canvas: &mut Canvas,
        x: f32,
        top: f32,
        bottom: f32,
        page_top: f32,
        header: &Row,
        body: &[Row],
    ) -> f32 {
        let total: f32 = header.height + body.iter().map(|r| r.height).sum::<f32>();
        let mut cursor = TableCursor { top, bottom };
        if top - total < bottom && page_top - total >= bottom {
            canvas.show_page();
            cursor.top = page_top;
        }

        self.draw_row(canvas, x, cursor.top, header);
        cursor.top -= header.height;
        for row in body {
            if self.fit_row(canvas, &mut cursor, x, row) == FitResult::BoxFull {
                canvas.show_page();
                cursor.top = page_top;
                self.draw_row(canvas, x, cursor.top, header);
                cursor.top -= header.height;
                self.draw_row(canvas, x, cursor.top, row);
                cursor.top -= row.height;
            }
        }
        cursor.top
    }

    /// Draw `row` with its top edge at `top`, ignoring page limits.
    pub fn draw_row(&self, canvas: &mut Canvas, x: f32, top: f32, row: &Row) {
        let bottom = top - row.height;
        let mut column = 0;
        let mut left = x;

        for cell in &row.cells {
            let end = (column + cell.span).min(self.columns.len());
            let width: f32 = self.columns[column.min(end)..end].iter().sum();

            if let Some(bg) = cell.background {
                canvas.fill_rect(left, bottom, width, row.height, bg);
            }
            if let Some((colour, thickness)) = self.grid {
                canvas.stroke_rect(left, bottom, width, row.height, colour, thickness);
            }

            let baseline = bottom + row.height / 2.0 - cell.pen.size * 0.35;
            match cell.align {
                Align::Left => canvas.text(left + self.padding, baseline, cell.pen, &cell.text),
                Align::Center => {
                    canvas.text_centered(left + width / 2.0, baseline, cell.pen, &cell.text)
                }
                Align::Right => {
                    canvas.text_right(left + width - self.padding, baseline, cell.pen, &cell.text)
                }
            }

            left += width;
            column = end;
        }
    }
}
