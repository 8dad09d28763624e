use std::collections::VecDeque;

use tracing::trace;

use crate::board::{Cell, Occupancy};
use crate::config::{GridSize, INITIAL_SNAKE_LENGTH};
use crate::error::LayoutError;
use crate::input::{Direction, direction_change_is_valid};

/// Snake body, its occupancy index, and pending direction requests.
///
/// The body runs tail first, head last. Every mutation of the body goes
/// through this type so the occupancy index always matches it.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    occupancy: Occupancy,
    direction: Direction,
    pending: VecDeque<Direction>,
}

impl Snake {
    /// Creates the starting snake: five cells along row 0, heading right.
    pub fn initial(bounds: GridSize) -> Result<Self, LayoutError> {
        let segments = (0..INITIAL_SNAKE_LENGTH)
            .map(|col| Cell::new(0, col as i32))
            .collect();

        Self::from_segments(segments, Direction::Right, bounds)
    }

    /// Creates a snake from explicit body segments (tail first, head last).
    pub fn from_segments(
        segments: Vec<Cell>,
        direction: Direction,
        bounds: GridSize,
    ) -> Result<Self, LayoutError> {
        if segments.is_empty() {
            return Err(LayoutError::EmptySnake);
        }

        let mut occupancy = Occupancy::new(bounds);
        for &segment in &segments {
            if !segment.is_within_bounds(bounds) {
                return Err(LayoutError::SegmentOutOfBounds(segment));
            }
            if !occupancy.occupy(segment) {
                return Err(LayoutError::DuplicateSegment(segment));
            }
        }

        Ok(Self {
            body: VecDeque::from(segments),
            occupancy,
            direction,
            pending: VecDeque::new(),
        })
    }

    /// Appends a direction request to the pending queue.
    pub fn buffer_direction(&mut self, direction: Direction) {
        self.pending.push_back(direction);
    }

    /// Consumes pending requests until one is not a reversal, and adopts it.
    ///
    /// Reversals of the current direction are discarded. Requests after the
    /// adopted one stay queued for later ticks. With nothing adoptable the
    /// current direction is kept.
    pub fn resolve_direction(&mut self) -> Direction {
        while let Some(candidate) = self.pending.pop_front() {
            if direction_change_is_valid(self.direction, candidate) {
                self.direction = candidate;
                break;
            }
            trace!(?candidate, current = ?self.direction, "skipping reversal");
        }

        self.direction
    }

    /// Returns the head position for the next movement tick.
    #[must_use]
    pub fn next_head(&self) -> Cell {
        self.direction.step(self.head())
    }

    /// Pushes `head` and, unless growing, drops the tail.
    ///
    /// Returns the vacated tail cell when one was dropped. `head` must be a
    /// vacant in-bounds cell; callers check collisions first.
    pub fn advance(&mut self, head: Cell, grow: bool) -> Option<Cell> {
        let placed = self.occupancy.occupy(head);
        debug_assert!(placed, "advance: head {head} is not a vacant board cell");
        self.body.push_back(head);

        if grow {
            return None;
        }

        let tail = self.body.pop_front()?;
        self.occupancy.vacate(tail);
        Some(tail)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Cell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.occupancy.is_occupied(cell)
    }

    #[must_use]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the current movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the number of direction requests not yet consumed.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Iterates over body segments from tail to head.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::board::Cell;
    use crate::config::GridSize;
    use crate::error::LayoutError;
    use crate::input::Direction;

    use super::Snake;

    const BOUNDS: GridSize = GridSize::REFERENCE;

    fn row_snake(cols: std::ops::Range<i32>, direction: Direction) -> Snake {
        let segments = cols.map(|col| Cell::new(0, col)).collect();
        Snake::from_segments(segments, direction, BOUNDS).expect("layout should be valid")
    }

    #[test]
    fn initial_snake_is_five_cells_heading_right() {
        let snake = Snake::initial(BOUNDS).expect("reference board fits the snake");

        assert_eq!(snake.len(), 5);
        assert_eq!(snake.tail(), Cell::new(0, 0));
        assert_eq!(snake.head(), Cell::new(0, 4));
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.occupancy().occupied_count(), 5);
    }

    #[test]
    fn initial_snake_does_not_fit_a_narrow_board() {
        let result = Snake::initial(GridSize { rows: 5, cols: 4 });

        assert_eq!(result.unwrap_err(), LayoutError::SegmentOutOfBounds(Cell::new(0, 4)));
    }

    #[test]
    fn layout_rejects_empty_and_duplicate_segments() {
        assert_eq!(
            Snake::from_segments(Vec::new(), Direction::Up, BOUNDS).unwrap_err(),
            LayoutError::EmptySnake
        );
        assert_eq!(
            Snake::from_segments(
                vec![Cell::new(1, 1), Cell::new(1, 2), Cell::new(1, 1)],
                Direction::Up,
                BOUNDS
            )
            .unwrap_err(),
            LayoutError::DuplicateSegment(Cell::new(1, 1))
        );
    }

    #[test]
    fn advance_without_growth_moves_tail() {
        let mut snake = row_snake(0..3, Direction::Right);

        let vacated = snake.advance(Cell::new(0, 3), false);

        assert_eq!(vacated, Some(Cell::new(0, 0)));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Cell::new(0, 3));
        assert!(!snake.occupies(Cell::new(0, 0)));
        assert!(snake.occupies(Cell::new(0, 3)));
    }

    #[test]
    fn advance_with_growth_keeps_previous_tail() {
        let mut snake = row_snake(0..3, Direction::Right);

        let vacated = snake.advance(Cell::new(0, 3), true);

        assert_eq!(vacated, None);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Cell::new(0, 0));
        assert_eq!(snake.occupancy().occupied_count(), 4);
    }

    #[test]
    fn occupancy_mirrors_body_after_moves() {
        let mut snake = row_snake(0..4, Direction::Right);
        for col in 4..10 {
            snake.advance(Cell::new(0, col), col % 3 == 0);
        }

        let body: HashSet<Cell> = snake.segments().copied().collect();
        let occupied: HashSet<Cell> = snake.occupancy().occupied_cells().collect();
        assert_eq!(body, occupied);
    }

    #[test]
    fn reversal_in_queue_is_skipped() {
        let mut snake = row_snake(0..2, Direction::Right);
        snake.buffer_direction(Direction::Left);

        assert_eq!(snake.resolve_direction(), Direction::Right);
        assert_eq!(snake.pending_len(), 0);
    }

    #[test]
    fn first_valid_request_is_adopted_and_rest_stay_queued() {
        let mut snake = row_snake(0..2, Direction::Right);
        snake.buffer_direction(Direction::Left);
        snake.buffer_direction(Direction::Down);
        snake.buffer_direction(Direction::Left);

        assert_eq!(snake.resolve_direction(), Direction::Down);
        assert_eq!(snake.pending_len(), 1);

        assert_eq!(snake.resolve_direction(), Direction::Left);
        assert_eq!(snake.pending_len(), 0);
    }

    #[test]
    fn empty_queue_keeps_direction() {
        let mut snake = row_snake(0..2, Direction::Up);

        assert_eq!(snake.resolve_direction(), Direction::Up);
        assert_eq!(snake.next_head(), Cell::new(-1, 1));
    }
}
