//! Row/column layout solver
//!
//! A [`Layout`] owns a rectangular area and an ordered list of rows. Each row
//! is declared from a whitespace separated string of slot names
//! (`"titlebar closebtn"`), left to right. Rows and columns may be given a
//! fixed size; everything else shares what is left evenly.
//!
//! Row 0 is the visual top of the area. Because rectangles use a bottom-left
//! origin, row 0 receives the largest `y`.

use super::geometry::Rect;
use super::touch::BoxId;
use log::debug;

/// One named cell of a row
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSlot {
    name: String,
    rect: Rect,
    fixed_width: Option<f32>,
    bound: Option<BoxId>,
}

impl LayoutSlot {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rect: Rect::ZERO,
            fixed_width: None,
            bound: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn bound_box(&self) -> Option<BoxId> {
        self.bound
    }
}

#[derive(Debug, Clone, PartialEq)]
struct LayoutRow {
    slots: Vec<LayoutSlot>,
    fixed_height: Option<f32>,
}

/// Grid of named slots inside an area
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    area: Rect,
    rows: Vec<LayoutRow>,
    calculated: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(Rect::new(0.0, 0.0, 1.0, 1.0))
    }
}

/// Share of `total` left to each of `auto_count` items after `fixed` is taken.
/// Never negative.
fn auto_share(total: f32, fixed: f32, auto_count: usize) -> f32 {
    if auto_count == 0 {
        return 0.0;
    }
    ((total - fixed) / auto_count as f32).max(0.0)
}

/// Only strictly positive sizes count as fixed
fn positive(size: f32) -> Option<f32> {
    (size > 0.0).then_some(size)
}

impl Layout {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            rows: Vec::new(),
            calculated: false,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.calculated = false;
    }

    /// Append a row parsed from whitespace separated slot names.
    /// Returns the new row's index.
    pub fn add_row(&mut self, definition: &str) -> usize {
        let slots: Vec<LayoutSlot> = definition.split_whitespace().map(LayoutSlot::new).collect();
        debug!("📐 Layout row {}: {} slot(s)", self.rows.len(), slots.len());
        self.rows.push(LayoutRow {
            slots,
            fixed_height: None,
        });
        self.calculated = false;
        self.rows.len() - 1
    }

    /// Fix the height of a row. A non-positive height returns the row to
    /// automatic sizing. Out of range rows are ignored.
    pub fn set_row_height(&mut self, row: usize, height: f32) -> bool {
        match self.rows.get_mut(row) {
            Some(r) => {
                r.fixed_height = positive(height);
                self.calculated = false;
                true
            }
            None => false,
        }
    }

    /// Fix the width of one column within a row. A non-positive width
    /// returns the slot to automatic sizing. Out of range cells are ignored.
    pub fn set_col_width(&mut self, row: usize, col: usize, width: f32) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.slots.get_mut(col)) {
            Some(slot) => {
                slot.fixed_width = positive(width);
                self.calculated = false;
                true
            }
            None => false,
        }
    }

    /// Bind a box to the first unbound slot called `name` in the most
    /// recently added row.
    pub fn bind(&mut self, name: &str, id: BoxId) -> bool {
        let Some(row) = self.rows.last_mut() else {
            return false;
        };
        match row
            .slots
            .iter_mut()
            .find(|slot| slot.bound.is_none() && slot.name == name)
        {
            Some(slot) => {
                slot.bound = Some(id);
                true
            }
            None => false,
        }
    }

    /// Resolve every slot to an absolute rectangle
    pub fn recalculate(&mut self) {
        if self.rows.is_empty() {
            self.calculated = true;
            return;
        }

        let fixed_height: f32 = self.rows.iter().filter_map(|r| r.fixed_height).sum();
        let auto_rows = self.rows.iter().filter(|r| r.fixed_height.is_none()).count();
        let auto_row_height = auto_share(self.area.height, fixed_height, auto_rows);

        let area = self.area;
        let mut offset_from_top = 0.0;

        for row in &mut self.rows {
            let row_height = row.fixed_height.unwrap_or(auto_row_height);

            let fixed_width: f32 = row.slots.iter().filter_map(|s| s.fixed_width).sum();
            let auto_cols = row.slots.iter().filter(|s| s.fixed_width.is_none()).count();
            let auto_col_width = auto_share(area.width, fixed_width, auto_cols);

            let y = area.y + area.height - offset_from_top - row_height;
            let mut x = area.x;

            for slot in &mut row.slots {
                let width = slot.fixed_width.unwrap_or(auto_col_width);
                slot.rect = Rect::new(x, y, width, row_height);
                x += width;
            }

            offset_from_top += row_height;
        }

        self.calculated = true;
    }

    /// Resolved rectangle of a cell, or [`Rect::ZERO`] when out of range
    pub fn element_area(&self, row: usize, col: usize) -> Rect {
        self.rows
            .get(row)
            .and_then(|r| r.slots.get(col))
            .map(|slot| slot.rect)
            .unwrap_or(Rect::ZERO)
    }

    /// Resolved rectangle of the first slot with this name
    pub fn slot_area(&self, name: &str) -> Option<Rect> {
        self.slots().find(|slot| slot.name == name).map(|slot| slot.rect)
    }

    pub fn needs_recalculation(&self) -> bool {
        !self.calculated
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |r| r.slots.len())
    }

    /// All slots, top row first, left to right
    pub fn slots(&self) -> impl Iterator<Item = &LayoutSlot> {
        self.rows.iter().flat_map(|r| r.slots.iter())
    }

    /// Boxes bound to slots together with their slot rectangles
    pub fn bindings(&self) -> impl Iterator<Item = (BoxId, Rect)> + '_ {
        self.slots()
            .filter_map(|slot| slot.bound.map(|id| (id, slot.rect)))
    }

    /// Place this layout as a fractional sub-area of `parent` and recalculate
    pub fn update_from_parent_ratio(&mut self, parent: Rect, ratio: Rect) {
        self.area = parent.fraction(ratio);
        self.calculated = false;
        self.recalculate();
    }
}
